//! CLI command definitions for the `nova` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod models;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use nova_types::chat::InputMode;

/// Voice and text personal assistant.
#[derive(Parser)]
#[command(name = "nova", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default tracing filter for the chosen verbosity; `RUST_LOG` overrides it.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,nova=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Talk to the assistant in the terminal.
    Chat {
        /// How utterances are collected.
        #[arg(long, default_value_t = InputMode::Text)]
        mode: InputMode,

        /// Start on the remote backend instead of the local model.
        #[arg(long)]
        remote: bool,
    },

    /// Start the web front end.
    Serve {
        /// Port to listen on (defaults to `server.port`).
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// List model aliases and which models the local runtime has installed.
    Models,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_defaults_to_text_on_local() {
        let cli = Cli::try_parse_from(["nova", "chat"]).unwrap();
        match cli.command {
            Commands::Chat { mode, remote } => {
                assert_eq!(mode, InputMode::Text);
                assert!(!remote);
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn chat_accepts_voice_mode() {
        let cli = Cli::try_parse_from(["nova", "chat", "--mode", "voice", "--remote"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Chat {
                mode: InputMode::Voice,
                remote: true
            }
        ));
        assert!(Cli::try_parse_from(["nova", "chat", "--mode", "telepathy"]).is_err());
    }

    #[test]
    fn verbosity_maps_to_filter() {
        assert_eq!(Cli::try_parse_from(["nova", "models"]).unwrap().log_filter(), "warn");
        assert_eq!(
            Cli::try_parse_from(["nova", "--quiet", "models"]).unwrap().log_filter(),
            "error"
        );
        assert_eq!(
            Cli::try_parse_from(["nova", "-v", "models"]).unwrap().log_filter(),
            "info,nova=debug"
        );
        assert_eq!(
            Cli::try_parse_from(["nova", "-vv", "serve"]).unwrap().log_filter(),
            "trace"
        );
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["nova", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve {
                port: Some(8080),
                host: None
            }
        ));
    }
}
