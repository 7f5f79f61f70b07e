use crate::process;
use crate::update::UpdateDescriptor;
use crate::{LauncherError, LauncherResult};

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

/// Shell the helper script is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperShell {
    Posix,
    PowerShell,
}

impl HelperShell {
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::PowerShell
        } else {
            Self::Posix
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Download {
    url: String,
    path: PathBuf,
}

/// A detached script that waits for the launcher to exit, downloads every
/// release asset next to the launcher and starts the newest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateHelper {
    wait_pid: u32,
    downloads: Vec<Download>,
    restart: PathBuf,
    restart_args: Vec<String>,
}

impl UpdateHelper {
    /// `None` when the release has nothing to download.
    pub fn plan(
        descriptor: &UpdateDescriptor,
        install_dir: &Path,
        wait_pid: u32,
        restart_args: &[String],
    ) -> Option<Self> {
        let newest = descriptor.newest_asset.as_deref()?;

        let downloads = descriptor
            .assets
            .iter()
            .map(|asset| Download {
                url: asset.browser_download_url.clone(),
                path: install_dir.join(&asset.name),
            })
            .collect();

        Some(Self {
            wait_pid,
            downloads,
            restart: install_dir.join(newest),
            restart_args: restart_args.to_vec(),
        })
    }

    pub fn restart_path(&self) -> &Path {
        &self.restart
    }

    pub fn script(&self, shell: HelperShell) -> String {
        match shell {
            HelperShell::Posix => self.posix_script(),
            HelperShell::PowerShell => self.powershell_script(),
        }
    }

    fn posix_script(&self) -> String {
        let mut lines = vec![format!(
            "while kill -0 {} 2>/dev/null; do sleep 1; done",
            self.wait_pid
        )];

        for download in &self.downloads {
            lines.push(format!(
                "curl -fsSL -o {} {} || exit 1",
                sh_quote(&download.path.display().to_string()),
                sh_quote(&download.url)
            ));
        }

        let restart = sh_quote(&self.restart.display().to_string());
        lines.push(format!("chmod +x {restart}"));

        let mut exec = format!("exec {restart}");
        for arg in &self.restart_args {
            exec.push(' ');
            exec.push_str(&sh_quote(arg));
        }
        lines.push(exec);

        lines.join("\n")
    }

    fn powershell_script(&self) -> String {
        let mut steps = vec![
            "Write-Host 'Starting download of the latest launcher..'".to_string(),
            format!(
                "Wait-Process -Id {} -ErrorAction SilentlyContinue",
                self.wait_pid
            ),
        ];

        for download in &self.downloads {
            steps.push(format!(
                "Invoke-WebRequest -Uri {} -OutFile {}",
                ps_quote(&download.url),
                ps_quote(&download.path.display().to_string())
            ));
        }

        let mut start = format!(
            "Start-Process -NoNewWindow -FilePath {}",
            ps_quote(&self.restart.display().to_string())
        );
        if !self.restart_args.is_empty() {
            let args: Vec<String> = self.restart_args.iter().map(|a| ps_quote(a)).collect();
            start.push_str(" -ArgumentList ");
            start.push_str(&args.join(","));
        }
        steps.push(start);

        steps.join("; ")
    }

    fn command(&self) -> Command {
        let shell = HelperShell::native();
        let script = self.script(shell);

        match shell {
            HelperShell::Posix => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(script);
                cmd
            }
            HelperShell::PowerShell => {
                let mut cmd = Command::new("powershell");
                cmd.args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command"])
                    .arg(script);
                cmd
            }
        }
    }

    /// Start the helper detached from this process.
    pub fn spawn(&self) -> LauncherResult<()> {
        let mut cmd = self.command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        process::detach(&mut cmd);

        let child = cmd.spawn().map_err(LauncherError::update_helper_spawn)?;
        debug!("Update helper started (PID {})", child.id());
        Ok(())
    }
}

fn sh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
