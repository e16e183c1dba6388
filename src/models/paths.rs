use camino::{Utf8Path, Utf8PathBuf};

macro_rules! define_paths {
    ($name:ident { $($field:ident : $default:expr),* $(,)? }) => {
        #[derive(Clone, Debug)]
        pub struct $name {
            $(pub $field: Utf8PathBuf,)*
        }

        impl $name {
            pub fn to_absolute(mut self, base: &Utf8Path) -> Self {
                $(self.$field = base.join(self.$field);)*
                self
            }

            pub fn new(base: &Utf8Path) -> Self {
                Self::default().to_absolute(base)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default.into(),)*
                }
            }
        }
    };
}

// Rooted at the tool's base directory.
define_paths!(AppPaths {
    profiles: "profiles",
    config: "config.json",
    logs: "logs",
});

// Rooted at a single profile directory.
define_paths!(ProfilePaths {
    icon: "icon.png",
    game: "game.json",
});

// Rooted at the per-user local application data directory.
define_paths!(RiotPathRules {
    client_data: "Riot Games/Riot Client",
    valorant_config: "VALORANT/Saved/Config",
});

// Rooted at the launcher's import directory.
define_paths!(MenuPaths {
    script: "valo.nss",
    icons: "icons",
});

/// Items that together make up the live client session.
pub const LOGIN_DATA_ITEMS: [&str; 3] = ["Config", "Data", "Logs"];

/// Directory holding the executable, falling back to the working directory.
pub fn default_base_dir() -> Utf8PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}

/// `%LOCALAPPDATA%` on Windows, the XDG data dir elsewhere.
pub fn local_app_data() -> Option<Utf8PathBuf> {
    directories::BaseDirs::new()
        .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.data_local_dir().to_path_buf()).ok())
}
