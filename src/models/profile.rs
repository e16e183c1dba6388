use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Valorant,
    Lol,
}

impl Game {
    pub fn launch_args(&self) -> &'static [&'static str] {
        match self {
            Game::Valorant => &["--launch-product=valorant", "--launch-patchline=live"],
            Game::Lol => &["--launch-product=league_of_legends", "--launch-patchline=live"],
        }
    }

    pub fn processes_to_kill(&self) -> &'static [&'static str] {
        match self {
            Game::Valorant => &[
                "VALORANT.exe",
                "RiotClientServices.exe",
                "VALORANT-Win64-Shipping.exe",
            ],
            Game::Lol => &[
                "LeagueClient.exe",
                "RiotClientServices.exe",
                "LeagueClientUx.exe",
            ],
        }
    }

    /// Only Valorant has settings files worth patching after launch.
    pub fn has_settings_sync(&self) -> bool {
        matches!(self, Game::Valorant)
    }

    pub fn all() -> [Game; 2] {
        [Game::Valorant, Game::Lol]
    }
}

/// Which game a profile is meant for.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Affinity {
    #[default]
    Valorant,
    Lol,
    Both,
}

impl Affinity {
    /// Resolves the game to launch. `None` means the caller has to choose.
    pub fn resolve(&self, selected: Option<Game>) -> Option<Game> {
        match (self, selected) {
            (Affinity::Valorant, _) => Some(Game::Valorant),
            (Affinity::Lol, _) => Some(Game::Lol),
            (Affinity::Both, selected) => selected,
        }
    }
}

impl From<Game> for Affinity {
    fn from(game: Game) -> Self {
        match game {
            Game::Valorant => Affinity::Valorant,
            Game::Lol => Affinity::Lol,
        }
    }
}

/// Contents of `game.json` inside a profile.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AffinityFile {
    #[serde(default)]
    pub game: Affinity,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProfileSummary {
    pub name: String,
    pub icon: Option<Utf8PathBuf>,
    pub affinity: Affinity,
}

/// Mutations reported to the profile observer.
#[derive(Clone, Debug, PartialEq)]
pub enum ProfileChange {
    Added(String),
    Renamed { old: String, new: String },
    Deleted(String),
    Updated(String),
    Restored,
}
