//! Process liveness and termination by PID.
//!
//! The watchdog only ever knows the identifiers of the processes it
//! watches, so everything here works on raw PIDs rather than child handles.

use std::io;
use std::process::Command;

/// Check if a process with the given PID is currently running.
#[cfg(unix)]
pub fn is_process_running(pid: u32) -> bool {
    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };

    // SAFETY: kill with signal 0 only checks existence, no signal is sent.
    if unsafe { libc::kill(raw, 0) } == 0 {
        return true;
    }

    // EPERM: the process exists but belongs to someone else.
    io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(windows)]
pub fn is_process_running(pid: u32) -> bool {
    use windows_sys::Win32::Foundation::{CloseHandle, STILL_ACTIVE};
    use windows_sys::Win32::System::Threading::{
        GetExitCodeProcess, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION,
    };

    // SAFETY: OpenProcess returns null on failure, the handle is closed
    // before returning.
    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
        if handle.is_null() {
            return false;
        }

        let mut exit_code: u32 = 0;
        let success = GetExitCodeProcess(handle, &mut exit_code);
        CloseHandle(handle);

        success != 0 && exit_code == STILL_ACTIVE as u32
    }
}

/// Ask a process to exit (SIGTERM / `taskkill` without `/F`).
#[cfg(unix)]
pub fn request_termination(pid: u32) -> io::Result<()> {
    send_signal(pid, nix::sys::signal::Signal::SIGTERM)
}

#[cfg(windows)]
pub fn request_termination(pid: u32) -> io::Result<()> {
    taskkill(pid, false)
}

/// Kill a process outright (SIGKILL / `taskkill /F`).
#[cfg(unix)]
pub fn force_kill(pid: u32) -> io::Result<()> {
    send_signal(pid, nix::sys::signal::Signal::SIGKILL)
}

#[cfg(windows)]
pub fn force_kill(pid: u32) -> io::Result<()> {
    taskkill(pid, true)
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: nix::sys::signal::Signal) -> io::Result<()> {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let raw = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid pid {pid}")))?;
    kill(Pid::from_raw(raw), signal).map_err(io::Error::from)
}

#[cfg(windows)]
fn taskkill(pid: u32, force: bool) -> io::Result<()> {
    let mut cmd = Command::new("taskkill");
    if force {
        cmd.arg("/F");
    }
    let output = cmd.args(["/T", "/PID", &pid.to_string()]).output()?;

    if output.status.success() {
        Ok(())
    } else {
        Err(io::Error::other(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

/// Detach a command from the launcher's session / console so it survives
/// the launcher and is not hit by the launcher's Ctrl-C.
pub fn detach(cmd: &mut Command) {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;

        // SAFETY: setsid is async-signal-safe and touches no parent state.
        unsafe {
            cmd.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        use windows_sys::Win32::System::Threading::{CREATE_NEW_PROCESS_GROUP, DETACHED_PROCESS};

        cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
    }
}
