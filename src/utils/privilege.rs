/// Whether the hosting process may create junctions.
pub trait PrivilegeCheck: Send + Sync {
    fn is_elevated(&self) -> bool;
}

pub struct OsPrivilege;

impl PrivilegeCheck for OsPrivilege {
    #[cfg(windows)]
    fn is_elevated(&self) -> bool {
        // SAFETY: IsUserAnAdmin takes no arguments and only reads the process token.
        unsafe { windows::Win32::UI::Shell::IsUserAnAdmin().as_bool() }
    }

    #[cfg(unix)]
    fn is_elevated(&self) -> bool {
        nix::unistd::geteuid().is_root()
    }

    #[cfg(not(any(windows, unix)))]
    fn is_elevated(&self) -> bool {
        false
    }
}
