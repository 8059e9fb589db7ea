//! Opens URLs in the host's default browser.

use std::process::{Command, Stdio};

use tracing::info;

use nova_core::service::launcher::Launcher;
use nova_types::error::LaunchError;

/// [`Launcher`] that shells out to the platform opener.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    /// Program and leading arguments for the current platform.
    fn opener() -> (&'static str, &'static [&'static str]) {
        if cfg!(target_os = "macos") {
            ("open", &[])
        } else if cfg!(target_os = "windows") {
            ("cmd", &["/C", "start", ""])
        } else {
            ("xdg-open", &[])
        }
    }
}

impl Launcher for SystemLauncher {
    fn open_url(&self, url: &str) -> Result<(), LaunchError> {
        let (program, args) = Self::opener();
        Command::new(program)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| LaunchError::Failed {
                url: url.to_string(),
                reason: format!("{program}: {e}"),
            })?;
        info!(url, "opened url");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opener_matches_platform() {
        let (program, _) = SystemLauncher::opener();
        if cfg!(target_os = "linux") {
            assert_eq!(program, "xdg-open");
        }
        assert!(!program.is_empty());
    }
}
