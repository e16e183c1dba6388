use crate::models::profile::Game;
use crate::utils::tasks::TaskHandle;
use camino::Utf8PathBuf;
use derive_more::Display;

/// Steps of a single switch request.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum SwitchState {
    Idle,
    Validating,
    Terminating,
    Linking,
    Launching,
    PostLaunchSync,
    Done,
    Failed,
}

#[derive(Debug)]
pub struct SwitchReport {
    pub game: Game,
    pub executable: Utf8PathBuf,
    /// Background settings sync, if one was scheduled.
    pub post_launch: Option<TaskHandle>,
}

#[derive(Debug)]
pub enum SwitchOutcome {
    /// The profile plays both games and no game was given. Nothing was touched.
    SelectionRequired,
    Switched(SwitchReport),
}

impl SwitchOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SwitchOutcome::SelectionRequired => "Game selection required.",
            SwitchOutcome::Switched(_) => "Account switched successfully.",
        }
    }
}
