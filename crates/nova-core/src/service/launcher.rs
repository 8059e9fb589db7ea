use nova_types::error::LaunchError;

/// Opens a URL on the host (default browser).
///
/// Synchronous: platform openers return as soon as the browser is handed
/// the URL.
pub trait Launcher: Send + Sync {
    fn open_url(&self, url: &str) -> Result<(), LaunchError>;
}
