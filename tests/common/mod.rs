#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use session_keeper_lib::core::linker::{DirectoryLink, JunctionLink};
use session_keeper_lib::core::registry::{AppRegistry, RegistryPaths};
use session_keeper_lib::core::switcher::SwitchEnv;
use session_keeper_lib::models::paths::{AppPaths, RiotPathRules, LOGIN_DATA_ITEMS};
use session_keeper_lib::utils::privilege::PrivilegeCheck;
use session_keeper_lib::utils::process::ProcessControl;
use session_keeper_lib::utils::tasks::InlineRunner;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Clone, Debug, PartialEq)]
pub enum ProcessCall {
    Terminate(Vec<String>),
    Launch(Utf8PathBuf, Vec<String>),
}

/// Records process calls instead of touching real processes.
#[derive(Default)]
pub struct FakeProcesses {
    pub calls: Mutex<Vec<ProcessCall>>,
    pub launch_error: Option<std::io::ErrorKind>,
}

impl FakeProcesses {
    pub fn failing(kind: std::io::ErrorKind) -> Self {
        Self {
            launch_error: Some(kind),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<ProcessCall> {
        self.calls.lock().clone()
    }
}

impl ProcessControl for FakeProcesses {
    fn terminate(&self, images: &[&str]) {
        self.calls
            .lock()
            .push(ProcessCall::Terminate(images.iter().map(|s| s.to_string()).collect()));
    }

    fn launch(&self, exe: &Utf8Path, args: &[&str]) -> std::io::Result<()> {
        self.calls.lock().push(ProcessCall::Launch(
            exe.to_path_buf(),
            args.iter().map(|s| s.to_string()).collect(),
        ));
        match self.launch_error {
            Some(kind) => Err(kind.into()),
            None => Ok(()),
        }
    }
}

pub struct FakePrivilege(pub bool);

impl PrivilegeCheck for FakePrivilege {
    fn is_elevated(&self) -> bool {
        self.0
    }
}

/// A link that can never be created.
pub struct BrokenLink;

impl DirectoryLink for BrokenLink {
    fn create(&self, _target: &Utf8Path, _link: &Utf8Path) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "junctions disabled",
        ))
    }

    fn remove(&self, link: &Utf8Path) -> std::io::Result<()> {
        JunctionLink.remove(link)
    }
}

/// Temp directory holding the tool's data, the live client data and a dummy client.
pub struct TestEnv {
    pub tmp: TempDir,
    pub paths: RegistryPaths,
    pub client_exe: Utf8PathBuf,
}

impl TestEnv {
    pub fn live_root(&self) -> &Utf8Path {
        &self.paths.riot.client_data
    }

    pub fn valorant_config(&self) -> &Utf8Path {
        &self.paths.riot.valorant_config
    }
}

pub fn setup_test_env() -> TestEnv {
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();

    let local = root.join("local");
    let client_exe = root.join("client").join("RiotClientServices.exe");
    fs::create_dir_all(client_exe.parent().unwrap()).unwrap();
    fs::write(&client_exe, "dummy").unwrap();

    let paths = RegistryPaths {
        app: AppPaths::new(&root.join("app")),
        riot: RiotPathRules::new(&local),
        launcher: root.join("launcher").join("session_keeper.exe"),
    };
    fs::create_dir_all(&paths.riot.client_data).unwrap();

    TestEnv {
        tmp,
        paths,
        client_exe,
    }
}

pub struct Harness {
    pub registry: AppRegistry,
    pub processes: Arc<FakeProcesses>,
}

pub fn build_registry(
    env: &TestEnv,
    elevated: bool,
    linker: Arc<dyn DirectoryLink>,
    processes: FakeProcesses,
) -> Harness {
    let processes = Arc::new(processes);
    let switch_env = SwitchEnv {
        linker,
        processes: processes.clone(),
        privilege: Arc::new(FakePrivilege(elevated)),
        runner: Arc::new(InlineRunner),
    };
    let registry = AppRegistry::with_env(env.paths.clone(), switch_env);
    registry.set_client_path(&env.client_exe).unwrap();

    Harness {
        registry,
        processes,
    }
}

/// Elevated registry with real links and recorded processes.
pub fn default_registry(env: &TestEnv) -> Harness {
    build_registry(env, true, Arc::new(JunctionLink), FakeProcesses::default())
}

/// Fills the live session with files tagged by `account`.
pub fn seed_live_session(live_root: &Utf8Path, account: &str) {
    for item in LOGIN_DATA_ITEMS {
        let dir = live_root.join(item);
        if dir.is_symlink() {
            fs::remove_file(&dir).unwrap();
        } else if dir.exists() {
            fs::remove_dir_all(&dir).unwrap();
        }
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("owner.txt"), account).unwrap();
    }
}

pub fn live_owner(live_root: &Utf8Path, item: &str) -> Option<String> {
    fs::read_to_string(live_root.join(item).join("owner.txt")).ok()
}

/// Writes a settings file inside a `Windows` platform directory.
pub fn write_settings_file(config_root: &Utf8Path, account_dir: &str, name: &str, content: &str) -> Utf8PathBuf {
    let dir = config_root.join(account_dir).join("Windows");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
