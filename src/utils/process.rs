use camino::Utf8Path;
use std::process::{Command, Stdio};
use sysinfo::System;
use tracing::{debug, warn};

/// Process side effects of a switch. Faked in tests.
pub trait ProcessControl: Send + Sync {
    /// Force-terminates every process whose image name matches. Best effort.
    fn terminate(&self, images: &[&str]);

    /// Spawns `exe` detached. The child is never waited on.
    fn launch(&self, exe: &Utf8Path, args: &[&str]) -> std::io::Result<()>;
}

pub struct SystemProcesses;

impl ProcessControl for SystemProcesses {
    fn terminate(&self, images: &[&str]) {
        let mut sys = System::new();
        sys.refresh_processes();

        for image in images {
            for process in sys.processes_by_exact_name(image) {
                if process.kill() {
                    debug!("Killed {} ({})", image, process.pid());
                } else {
                    warn!("Failed to kill {} ({})", image, process.pid());
                }
            }
        }
    }

    fn launch(&self, exe: &Utf8Path, args: &[&str]) -> std::io::Result<()> {
        let mut command = Command::new(exe.as_std_path());
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
            command.creation_flags(CREATE_NEW_PROCESS_GROUP);
        }

        // Dropping the handle detaches the child.
        let child = command.spawn()?;
        debug!("Spawned {} (pid {})", exe, child.id());
        Ok(())
    }
}
