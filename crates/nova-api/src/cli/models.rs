//! `nova models`: alias table with install status.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use tracing::warn;

use crate::state::AppState;

/// Print the alias table, marking the active model and installed models.
pub async fn list_models(state: &AppState) -> Result<()> {
    let dispatcher = &state.dispatcher;
    let active = dispatcher.active_model().await;

    let installed = match dispatcher.brain().local_provider() {
        Some(provider) => match provider.installed_models().await {
            Ok(models) => Some(models),
            Err(e) => {
                warn!(error = %e, "could not list installed models");
                None
            }
        },
        None => None,
    };

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Alias").fg(Color::White),
        Cell::new("Model").fg(Color::White),
        Cell::new("Installed").fg(Color::White),
    ]);

    for entry in dispatcher.aliases().entries() {
        let installed_cell = match &installed {
            Some(models) if is_installed(models, &entry.model) => Cell::new("yes").fg(Color::Green),
            Some(_) => Cell::new("no").fg(Color::Red),
            None => Cell::new("?").fg(Color::DarkGrey),
        };
        let model_cell = if entry.model == active {
            Cell::new(format!("{} (active)", entry.model)).fg(Color::Cyan)
        } else {
            Cell::new(&entry.model)
        };
        table.add_row(vec![Cell::new(&entry.alias), model_cell, installed_cell]);
    }

    println!();
    println!("{table}");
    match dispatcher.brain().remote_model() {
        Some(model) => println!("  {} {}", style("Remote:").bold(), style(model).dim()),
        None => println!(
            "  {} {}",
            style("Remote:").bold(),
            style(format!("not configured (set {})", state.config.remote.api_key_env)).dim()
        ),
    }
    if installed.is_none() {
        println!(
            "  {}",
            style(format!("Local runtime unreachable at {}", state.config.local.base_url)).yellow()
        );
    }
    println!();
    Ok(())
}

/// Ollama reports `llama3.1:latest` for a model pulled as `llama3.1`.
fn is_installed(installed: &[String], model: &str) -> bool {
    installed
        .iter()
        .any(|name| name == model || name.strip_suffix(":latest") == Some(model))
}
