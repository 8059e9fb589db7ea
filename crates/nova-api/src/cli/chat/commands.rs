//! Slash commands and exit words for the chat loop.

use console::style;

use nova_core::intent::matching::collapse;

/// Words that end the session when said on their own outside
/// specification mode.
pub const EXIT_WORDS: [&str; 3] = ["stop", "exit", "bye"];

pub const GOODBYE: &str = "Goodbye! Have a great day.";

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Send generations to the remote backend.
    Remote,
    /// Send generations to the local model.
    Local,
    /// Exit the chat session.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/remote" | "/cloud" => Some(ChatCommand::Remote),
        "/local" => Some(ChatCommand::Local),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Whether `input` is a bare exit word ("bye", "Stop.", ...).
pub fn is_exit_word(input: &str) -> bool {
    let text = collapse(&input.to_lowercase());
    EXIT_WORDS.contains(&text.as_str())
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}    Show this help message", style("/help").cyan());
    println!("  {}   Clear the screen", style("/clear").cyan());
    println!("  {}  Use the remote backend", style("/remote").cyan());
    println!("  {}   Use the local model", style("/local").cyan());
    println!("  {}    End the chat session", style("/exit").cyan());
    println!();
    println!(
        "  {}",
        style("Try: \"open youtube lofi\", \"switch to coder\", \"give specs of <phone>\"").dim()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_backend_toggle() {
        assert_eq!(parse("/remote"), Some(ChatCommand::Remote));
        assert_eq!(parse("/CLOUD"), Some(ChatCommand::Remote));
        assert_eq!(parse("/local"), Some(ChatCommand::Local));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit now"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo"), Some(ChatCommand::Unknown("/foo".to_string())));
    }

    #[test]
    fn exit_words_match_whole_input_only() {
        assert!(is_exit_word("bye"));
        assert!(is_exit_word("  Stop. "));
        assert!(is_exit_word("EXIT!"));
        assert!(!is_exit_word("stop the music"));
        assert!(!is_exit_word("goodbye"));
        assert!(!is_exit_word(""));
    }
}
