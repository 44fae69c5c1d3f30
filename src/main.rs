mod config;
mod gemini;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use kulturcal_core::event::FetchOutcome;
use kulturcal_core::ics;
use kulturcal_core::ingest;
use kulturcal_core::source::SourceRegistry;
use kulturcal_core::style::{default_palette, resolve_style};

use config::FileSourceStore;

#[derive(Parser)]
#[command(name = "kulturcal")]
#[command(about = "Aggregate cultural events from venue websites via AI web search and export selections as .ics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh events from all active sources
    Sync,
    /// List the current events
    Events,
    /// Toggle selection of an event
    Select {
        /// Event id (shown by `events`)
        id: String,
    },
    /// Clear the selection
    Clear,
    /// Export selected events as an iCalendar file
    Export {
        /// Output path (defaults to ./selected-events-<date>.ics)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage event sources
    Sources {
        #[command(subcommand)]
        command: SourceCommands,
    },
}

#[derive(Subcommand)]
enum SourceCommands {
    /// List configured sources
    List,
    /// Add a source URL
    Add { url: String },
    /// Toggle a source on or off
    Toggle { id: String },
    /// Remove a source
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sync => cmd_sync().await,
        Commands::Events => cmd_events(),
        Commands::Select { id } => cmd_select(&id),
        Commands::Clear => cmd_clear(),
        Commands::Export { output } => cmd_export(output),
        Commands::Sources { command } => cmd_sources(command),
    }
}

async fn cmd_sync() -> Result<()> {
    let registry = SourceRegistry::load(FileSourceStore::at_default_location()?);

    let state_path = config::state_path()?;
    let mut state = config::load_state(&state_path);

    let active_urls = registry.active_urls();
    let generation = state.begin_refresh();

    if active_urls.is_empty() {
        state.clear();
        config::save_state(&state_path, &state)?;
        println!("No active sources. Cleared the calendar.");
        println!("Add one with `kulturcal sources add <url>`.");
        return Ok(());
    }

    let cfg = config::load_config()?;

    println!("🔎 Searching {} active source(s)...", active_urls.len());

    // On failure, nothing below runs: the previous event set and
    // selection stay untouched on disk.
    let result = gemini::fetch_events(
        &active_urls,
        gemini::DEFAULT_API_HOSTNAME,
        &cfg.gemini.api_key,
        &cfg.gemini.model,
    )
    .await
    .context("Failed to synchronize events. Check your connection or API key.")?;

    let events = ingest::ingest(result.events);
    println!("  Found {} event(s)", events.len());

    let outcome = FetchOutcome {
        events,
        sources: result.sources,
    };
    if !state.apply_refresh(generation, outcome) {
        println!("  Discarded a stale refresh result.");
        return Ok(());
    }

    config::save_state(&state_path, &state)?;

    if !state.grounding_sources.is_empty() {
        println!("\nVerified sources:");
        for source in &state.grounding_sources {
            match (&source.title, &source.uri) {
                (Some(title), Some(uri)) => println!("  {} <{}>", title, uri),
                (Some(title), None) => println!("  {}", title),
                (None, Some(uri)) => println!("  <{}>", uri),
                (None, None) => {}
            }
        }
    }

    println!(
        "\n{} event(s) in calendar, {} selected.",
        state.events.len(),
        state.selection.len()
    );

    Ok(())
}

fn cmd_events() -> Result<()> {
    let registry = SourceRegistry::load(FileSourceStore::at_default_location()?);
    let state = config::load_state(&config::state_path()?);

    if state.events.is_empty() {
        println!("No events. Run `kulturcal sync` first.");
        return Ok(());
    }

    let palette = default_palette();
    let mut events: Vec<_> = state.events.iter().collect();
    events.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));

    let mut current_date = "";
    for event in events {
        if event.date.as_str() != current_date {
            println!("\n📅 {}", event.date);
            current_date = event.date.as_str();
        }

        let style = resolve_style(
            &event.organizer,
            event.url.as_deref(),
            registry.list(),
            palette,
        );
        let marker = if state.selection.contains(&event.id) {
            "[x]"
        } else {
            "[ ]"
        };
        let time = if event.time.is_empty() {
            ics::DEFAULT_START_TIME
        } else {
            event.time.as_str()
        };

        println!(
            "  {} {}  {} @ {} ({}, {})",
            marker, time, event.title, event.location, event.organizer, style.name
        );
        println!("      id: {}", event.id);
    }

    println!(
        "\n{} event(s), {} selected.",
        state.events.len(),
        state.selection.len()
    );

    Ok(())
}

fn cmd_select(id: &str) -> Result<()> {
    let state_path = config::state_path()?;
    let mut state = config::load_state(&state_path);

    let selected = state.selection.toggle(id);
    if state.event(id).is_none() {
        // Allowed: the id just gets pruned at the next sync
        println!("Note: no current event has id '{}'.", id);
    }
    config::save_state(&state_path, &state)?;

    if selected {
        println!("Selected {} ({} total).", id, state.selection.len());
    } else {
        println!("Deselected {} ({} total).", id, state.selection.len());
    }

    Ok(())
}

fn cmd_clear() -> Result<()> {
    let state_path = config::state_path()?;
    let mut state = config::load_state(&state_path);

    state.selection.clear();
    config::save_state(&state_path, &state)?;

    println!("Selection cleared.");
    Ok(())
}

fn cmd_export(output: Option<PathBuf>) -> Result<()> {
    let state = config::load_state(&config::state_path()?);

    let selected = state.selected_events();
    let now = Utc::now();

    let Some(content) = ics::generate_ics(&selected, now) else {
        println!("No events selected. Use `kulturcal select <id>` first.");
        return Ok(());
    };

    let path = output.unwrap_or_else(|| PathBuf::from(ics::export_filename(now)));
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Exported {} event(s) to {}", selected.len(), path.display());
    Ok(())
}

fn cmd_sources(command: SourceCommands) -> Result<()> {
    let mut registry = SourceRegistry::load(FileSourceStore::at_default_location()?);

    match command {
        SourceCommands::List => {
            for source in registry.list() {
                let marker = if source.active { "[x]" } else { "[ ]" };
                println!("{} {}  {}", marker, source.id, source.url);
            }
        }
        SourceCommands::Add { url } => {
            let source = registry.add(&url)?;
            println!("Added {} ({})", source.id, source.url);
        }
        SourceCommands::Toggle { id } => {
            if registry.get(&id).is_none() {
                println!("No such source: {}", id);
                return Ok(());
            }
            registry.toggle(&id);
            let active = registry.get(&id).map(|s| s.active).unwrap_or(false);
            println!("{} is now {}.", id, if active { "active" } else { "inactive" });
        }
        SourceCommands::Remove { id } => {
            if registry.get(&id).is_none() {
                println!("No such source: {}", id);
                return Ok(());
            }
            registry.remove(&id);
            println!("Removed {}.", id);
        }
    }

    Ok(())
}
