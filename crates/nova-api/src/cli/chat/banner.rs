//! Welcome banner display for chat sessions.

use console::style;

use nova_types::chat::InputMode;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(name: &str, mode: InputMode, model: &str, remote: Option<&str>) {
    println!();
    println!("  {} {}", style("*").cyan(), style(name).cyan().bold());
    println!();
    println!("  {}   {}", style("Mode:").bold(), style(mode).dim());
    println!("  {}  {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {} {}",
        style("Remote:").bold(),
        style(remote.unwrap_or("not configured")).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, say \"bye\" or press Ctrl+D to exit").dim()
    );
    if mode == InputMode::Voice {
        println!("  {}", style("Press Enter while I'm speaking to interrupt").dim());
    }
    println!("  {}", style("---").dim());
    println!();
}
