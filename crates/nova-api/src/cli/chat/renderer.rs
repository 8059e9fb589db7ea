//! Terminal rendering for replies.
//!
//! During streaming, tokens are printed raw; complete replies (short-circuit
//! answers and spoken responses) are rendered as markdown through termimad.

use std::io::Write;
use std::time::Duration;

use console::style;
use termimad::MadSkin;

use nova_core::playback::controller::ResponseDisplay;
use nova_types::llm::Fragment;

/// Terminal markdown renderer.
pub struct ChatRenderer {
    skin: MadSkin,
    name: String,
}

impl ChatRenderer {
    pub fn new(name: impl Into<String>) -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(termimad::crossterm::style::Color::Cyan);
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            name: name.into(),
        }
    }

    /// Render a complete markdown reply.
    pub fn render_final(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }

    /// Print a complete reply under the assistant's name.
    pub fn print_reply(&self, text: &str) {
        println!();
        println!("  {}", style(&self.name).cyan().bold());
        for line in self.render_final(text).trim_end().lines() {
            println!("  {line}");
        }
        println!();
    }

    /// Print a notice shown before a generation starts.
    pub fn print_notice(&self, notice: &str) {
        println!("\n  {} {}", style("~").cyan(), style(notice).italic());
    }

    /// Print the assistant label before the first streamed token.
    pub fn print_stream_start(&self) {
        print!("\n  {} ", style(&self.name).cyan().bold());
        let _ = std::io::stdout().flush();
    }

    /// Print a single streamed fragment (raw, no formatting).
    pub fn print_fragment(&self, fragment: &Fragment) {
        if fragment.is_error() {
            print!("{}", style(&fragment.text).red());
        } else {
            print!("{}", fragment.text);
        }
        let _ = std::io::stdout().flush();
    }

    /// Print the footer after a generation.
    ///
    /// Format: "| {elapsed}s . {backend}"
    pub fn print_stats_footer(&self, elapsed: Duration, backend: &str) {
        println!(
            "\n  {} {} {} {}",
            style("|").dim(),
            style(format!("{:.1}s", elapsed.as_secs_f64())).dim(),
            style("\u{00b7}").dim(),
            style(backend).dim(),
        );
        println!();
    }
}

/// [`ResponseDisplay`] that prints spoken replies to the terminal.
pub struct TerminalDisplay {
    renderer: ChatRenderer,
}

impl TerminalDisplay {
    pub fn new(renderer: ChatRenderer) -> Self {
        Self { renderer }
    }
}

impl ResponseDisplay for TerminalDisplay {
    fn show_response(&self, text: &str) {
        self.renderer.print_reply(text);
    }

    fn show_interrupted(&self) {
        println!("  {}", style("(interrupted)").dim());
    }
}
