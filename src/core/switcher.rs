use crate::config::SharedConfig;
use crate::core::client::ClientLocator;
use crate::core::linker::{clear_path, DirectoryLink};
use crate::core::profile_store::ProfileStore;
use crate::core::settings_sync::SettingsSync;
use crate::models::error::SError;
use crate::models::paths::LOGIN_DATA_ITEMS;
use crate::models::profile::Game;
use crate::models::switch::{SwitchOutcome, SwitchReport, SwitchState};
use crate::utils::privilege::PrivilegeCheck;
use crate::utils::process::ProcessControl;
use crate::utils::tasks::{TaskHandle, TaskRunner};
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Collaborators a switch needs from the host.
pub struct SwitchEnv {
    pub linker: Arc<dyn DirectoryLink>,
    pub processes: Arc<dyn ProcessControl>,
    pub privilege: Arc<dyn PrivilegeCheck>,
    pub runner: Arc<dyn TaskRunner>,
}

/// Repoints the live session at a profile and relaunches the client.
pub struct SessionSwitcher {
    profiles: Arc<ProfileStore>,
    settings: Arc<SettingsSync>,
    config: SharedConfig,
    env: SwitchEnv,
    /// Serialises the Linking step within this process.
    linking: Mutex<()>,
}

/// Tracks and logs the state of one request.
struct Transition<'a> {
    profile: &'a str,
    state: SwitchState,
}

impl<'a> Transition<'a> {
    fn start(profile: &'a str) -> Self {
        Self {
            profile,
            state: SwitchState::Idle,
        }
    }

    fn enter(&mut self, next: SwitchState) {
        debug!("switch '{}': {} -> {}", self.profile, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, e: SError) -> SError {
        warn!("switch '{}' failed while {}: {}", self.profile, self.state, e);
        self.enter(SwitchState::Failed);
        e
    }
}

impl SessionSwitcher {
    pub fn new(
        profiles: Arc<ProfileStore>,
        settings: Arc<SettingsSync>,
        config: SharedConfig,
        env: SwitchEnv,
    ) -> Self {
        Self {
            profiles,
            settings,
            config,
            env,
            linking: Mutex::new(()),
        }
    }

    fn live_item(&self, item: &str) -> Utf8PathBuf {
        self.profiles.live_root().join(item)
    }

    /// Switches the live session to `name`. With a `both` profile and no
    /// `game`, returns [`SwitchOutcome::SelectionRequired`] without side effects.
    #[instrument(skip(self))]
    pub fn switch(&self, name: &str, game: Option<Game>) -> Result<SwitchOutcome, SError> {
        let mut t = Transition::start(name);

        t.enter(SwitchState::Validating);
        if !self.env.privilege.is_elevated() {
            return Err(t.fail(SError::NotElevated));
        }
        let stored = self.profiles.stored_name(name).map_err(|e| t.fail(e))?;
        let affinity = self.profiles.affinity(&stored).map_err(|e| t.fail(e))?;
        let Some(game) = affinity.resolve(game) else {
            debug!("'{}' plays both games; selection required", name);
            return Ok(SwitchOutcome::SelectionRequired);
        };
        let executable = self.client_executable().map_err(|e| t.fail(e))?;

        t.enter(SwitchState::Terminating);
        self.terminate_all();

        t.enter(SwitchState::Linking);
        self.link_profile(&stored).map_err(|e| t.fail(e))?;

        t.enter(SwitchState::Launching);
        self.launch(&executable, game.launch_args())
            .map_err(|e| t.fail(e))?;

        let post_launch = game.has_settings_sync().then(|| {
            t.enter(SwitchState::PostLaunchSync);
            self.schedule_settings_sync()
        });

        t.enter(SwitchState::Done);
        info!("Switched to '{}' ({:?})", name, game);
        Ok(SwitchOutcome::Switched(SwitchReport {
            game,
            executable,
            post_launch,
        }))
    }

    /// Clears the live session and starts the bare client so a new account
    /// can sign in. Capture it afterwards with [`ProfileStore::save`].
    #[instrument(skip(self))]
    pub fn add_account_flow(&self) -> Result<Utf8PathBuf, SError> {
        if !self.env.privilege.is_elevated() {
            return Err(SError::NotElevated);
        }
        let executable = self.client_executable()?;

        self.terminate_all();
        {
            let _guard = self.linking.lock();
            for item in LOGIN_DATA_ITEMS {
                clear_path(self.env.linker.as_ref(), &self.live_item(item));
            }
        }

        self.launch(&executable, &[])?;
        info!("Started bare client for a new account");
        Ok(executable)
    }

    fn terminate_all(&self) {
        let images: Vec<&str> = Game::all()
            .iter()
            .flat_map(|g| g.processes_to_kill().iter().copied())
            .collect();
        self.env.processes.terminate(&images);
    }

    fn link_profile(&self, name: &str) -> Result<(), SError> {
        let profile_dir = self.profiles.profile_dir(name);
        let _guard = self.linking.lock();

        for item in LOGIN_DATA_ITEMS {
            let live = self.live_item(item);
            clear_path(self.env.linker.as_ref(), &live);

            let stored = profile_dir.join(item);
            if !stored.exists() {
                debug!("'{}' has no {}; left empty", name, item);
                continue;
            }

            self.env
                .linker
                .create(&stored, &live)
                .map_err(|e| SError::JunctionFailed {
                    item: item.to_string(),
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }

    fn client_executable(&self) -> Result<Utf8PathBuf, SError> {
        let configured = self.config.lock().load().riot_client_exe_path.clone();
        ClientLocator::resolve(None, configured.as_deref()).ok_or_else(|| {
            let tried: Vec<String> = configured
                .into_iter()
                .chain(ClientLocator::common_paths())
                .map(|p| p.to_string())
                .collect();
            SError::ClientNotFound(tried.join("\n"))
        })
    }

    fn launch(&self, executable: &Utf8Path, args: &[&str]) -> Result<(), SError> {
        self.env
            .processes
            .launch(executable, args)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SError::ClientNotFound(executable.to_string()),
                _ => SError::LaunchFailed {
                    path: executable.to_string(),
                    reason: e.to_string(),
                },
            })
    }

    /// Applies the cached graphics settings in the background. The outcome is only logged.
    fn schedule_settings_sync(&self) -> TaskHandle {
        let settings = self.settings.clone();
        let config = self.config.clone();

        self.env.runner.submit(
            "post-launch settings sync",
            Box::new(move |cancel| {
                let graphics = match config.lock().graphics_settings(&settings) {
                    Ok(g) => g,
                    Err(e) => {
                        error!("Could not load graphics settings: {}", e);
                        return;
                    }
                };
                if cancel.is_cancelled() {
                    return;
                }

                let report = settings.apply(&graphics);
                if report.is_success() {
                    info!("Post-launch settings applied to {} file(s)", report.patched.len());
                } else {
                    error!("Post-launch settings failed for {} file(s)", report.failed.len());
                }
            }),
        )
    }
}
