use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Engine-file namespace for the quality sliders.
pub const QUALITY_PREFIX: &str = "sg.";
/// Platform-file namespace for client settings.
pub const CLIENT_SETTING_PREFIX: &str = "EAres";

pub const QUALITY_KEYS: [&str; 8] = [
    "sg.ViewDistanceQuality",
    "sg.AntiAliasingQuality",
    "sg.ShadowQuality",
    "sg.PostProcessQuality",
    "sg.TextureQuality",
    "sg.EffectsQuality",
    "sg.FoliageQuality",
    "sg.ShadingQuality",
];

pub const DEFAULT_QUALITY: u8 = 3;
pub const MAX_QUALITY: u8 = 3;

/// Values the client treats the same as an absent key.
pub const DEFAULT_SENTINELS: [&str; 3] = ["High", "On", "MAX"];

pub fn is_default_sentinel(value: &str) -> bool {
    DEFAULT_SENTINELS.contains(&value)
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Default,
    Fullscreen,
    #[serde(rename = "Windowed Fullscreen")]
    WindowedFullscreen,
    Windowed,
}

impl DisplayMode {
    /// Engine-file keys rewritten for this mode. Empty for `Default`.
    pub fn preset(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            DisplayMode::Default => &[],
            DisplayMode::Fullscreen => &[
                ("ResolutionSizeX", "1920"),
                ("ResolutionSizeY", "1080"),
                ("LastUserConfirmedResolutionSizeX", "1920"),
                ("LastUserConfirmedResolutionSizeY", "1080"),
                ("WindowPosX", "0"),
                ("WindowPosY", "0"),
                ("LastConfirmedFullscreenMode", "0"),
                ("PreferredFullscreenMode", "0"),
            ],
            DisplayMode::WindowedFullscreen => &[
                ("ResolutionSizeX", "1920"),
                ("ResolutionSizeY", "1080"),
                ("LastUserConfirmedResolutionSizeX", "1280"),
                ("LastUserConfirmedResolutionSizeY", "720"),
                ("WindowPosX", "0"),
                ("WindowPosY", "0"),
                ("LastConfirmedFullscreenMode", "1"),
                ("PreferredFullscreenMode", "1"),
            ],
            DisplayMode::Windowed => &[
                ("ResolutionSizeX", "1920"),
                ("ResolutionSizeY", "1032"),
                ("LastUserConfirmedResolutionSizeX", "1280"),
                ("LastUserConfirmedResolutionSizeY", "720"),
                ("WindowPosX", "0"),
                ("WindowPosY", "24"),
                ("LastConfirmedFullscreenMode", "2"),
                ("PreferredFullscreenMode", "1"),
            ],
        }
    }

    /// Value written for the `FullscreenMode` key. Exclusive fullscreen leaves it out.
    pub fn fullscreen_mode(&self) -> Option<&'static str> {
        match self {
            DisplayMode::Default | DisplayMode::Fullscreen => None,
            DisplayMode::WindowedFullscreen => Some("1"),
            DisplayMode::Windowed => Some("2"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingKind {
    Int,
    Float,
    Bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingGroup {
    Quality,
    Audio,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSetting {
    pub key: String,
    pub kind: SettingKind,
    pub group: SettingGroup,
}

impl ClientSetting {
    /// Classifies a raw platform-file key. Returns `None` outside the client namespace.
    pub fn classify(key: &str) -> Option<ClientSetting> {
        if let Some(known) = CLIENT_SETTINGS.get(key) {
            return Some(known.clone());
        }

        let kind = if key.starts_with("EAresIntSettingName::") {
            SettingKind::Int
        } else if key.starts_with("EAresFloatSettingName::") {
            SettingKind::Float
        } else if key.starts_with("EAresBoolSettingName::") {
            SettingKind::Bool
        } else {
            return None;
        };

        let group = match kind {
            SettingKind::Int => SettingGroup::Quality,
            SettingKind::Float | SettingKind::Bool => SettingGroup::Audio,
        };

        Some(ClientSetting {
            key: key.to_string(),
            kind,
            group,
        })
    }
}

static CLIENT_SETTINGS: Lazy<HashMap<&'static str, ClientSetting>> = Lazy::new(|| {
    use SettingGroup::*;
    use SettingKind::*;

    [
        ("EAresIntSettingName::MaterialQuality", Int, Quality),
        ("EAresIntSettingName::TextureQuality", Int, Quality),
        ("EAresIntSettingName::DetailQuality", Int, Quality),
        ("EAresIntSettingName::UIQuality", Int, Quality),
        ("EAresIntSettingName::NvidiaReflexLowLatencySetting", Int, Quality),
        ("EAresFloatSettingName::OverallVolume", Float, Audio),
        ("EAresFloatSettingName::SoundEffectsVolume", Float, Audio),
        ("EAresFloatSettingName::VoiceOverVolume", Float, Audio),
        ("EAresFloatSettingName::VideoVolume", Float, Audio),
        ("EAresFloatSettingName::AllMusicOverallVolume", Float, Audio),
        ("EAresFloatSettingName::MenuAndLobbyMusicVolume", Float, Audio),
        ("EAresFloatSettingName::CharacterSelectMusicVolume", Float, Audio),
        ("EAresIntSettingName::MicVolume", Int, Audio),
        ("EAresIntSettingName::VoiceVolume", Int, Audio),
        ("EAresBoolSettingName::PushToTalkEnabled", Bool, Audio),
        ("EAresBoolSettingName::EnableHRTF", Bool, Audio),
    ]
    .into_iter()
    .map(|(key, kind, group)| {
        (
            key,
            ClientSetting {
                key: key.to_string(),
                kind,
                group,
            },
        )
    })
    .collect()
});

/// Graphics and audio preferences applied to every discovered settings file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct GraphicsSettings {
    #[serde(default)]
    pub display_mode: DisplayMode,
    #[serde(default)]
    pub quality: BTreeMap<String, u8>,
    #[serde(default)]
    pub riot_settings: BTreeMap<String, String>,
    #[serde(default)]
    pub audio_settings: BTreeMap<String, String>,
}

impl GraphicsSettings {
    pub fn default_quality() -> BTreeMap<String, u8> {
        QUALITY_KEYS
            .iter()
            .map(|k| (k.to_string(), DEFAULT_QUALITY))
            .collect()
    }

    /// Splits raw client settings into the quality and audio groups.
    pub fn with_client_settings(mut self, raw: BTreeMap<String, String>) -> Self {
        for (key, value) in raw {
            match ClientSetting::classify(&key).map(|s| s.group) {
                Some(SettingGroup::Quality) => {
                    self.riot_settings.insert(key, value);
                }
                Some(SettingGroup::Audio) => {
                    self.audio_settings.insert(key, value);
                }
                None => {}
            }
        }
        self
    }

    /// Every platform-file key to write, audio overriding quality on overlap.
    pub fn client_settings(&self) -> BTreeMap<&str, &str> {
        self.riot_settings
            .iter()
            .chain(self.audio_settings.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}
