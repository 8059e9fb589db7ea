//! Data directory layout.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "NOVA_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `NOVA_DATA_DIR` environment variable
/// 2. `~/.nova`
/// 3. `.nova` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".nova");
    }

    PathBuf::from(".nova")
}

/// Path of the global configuration file inside `data_dir`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_lives_in_data_dir() {
        assert_eq!(
            config_path(Path::new("/home/user/.nova")),
            PathBuf::from("/home/user/.nova/config.toml")
        );
    }

    #[test]
    fn resolve_data_dir_from_env() {
        // SAFETY: no other test in this crate reads NOVA_DATA_DIR.
        unsafe {
            std::env::set_var(DATA_DIR_ENV, "/tmp/test-nova");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-nova"));
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
    }
}
