//! Tracing subscriber initialization.
//!
//! # Usage
//!
//! ```no_run
//! // Human-readable logs at `warn`, overridable with RUST_LOG
//! nova_observe::tracing_setup::init_tracing("warn", false).unwrap();
//!
//! // JSON lines for the web front end
//! nova_observe::tracing_setup::init_tracing("info", true).unwrap();
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Build the filter: `RUST_LOG` wins over `default_filter` when set.
pub fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Initialize the global tracing subscriber.
///
/// - Installs a `fmt` layer writing to stderr so logs never interleave with
///   streamed replies on stdout.
/// - `json` switches the layer to JSON lines with span close timing.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(default_filter: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = build_filter(default_filter);
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE);
        registry.with(fmt_layer).try_init()?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);
        registry.with(fmt_layer).try_init()?;
    }

    Ok(())
}
