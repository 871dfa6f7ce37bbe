//! table-view - A scrollable, refreshable data table for the terminal
//!
//! Loads rows from a file or command and shows them in a `TableView`.
//! Pull to refresh (`r`, or scroll up past the top) reloads the source.

mod app;

use crate::app::App;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use log::{error, info};
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;
use table_view::action::Action;
use table_view::component::Component;
use table_view::config::Config;
use table_view::services::DataSource;
use table_view::tui::Tui;

#[derive(Debug, Parser)]
#[command(name = "table-view", version, about = "Scrollable, refreshable data table")]
struct Cli {
    /// Config file (JSON or YAML); defaults to ~/.table-view/config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data file (CSV, TSV, JSON or YAML)
    #[arg(short, long, conflicts_with = "command")]
    data: Option<PathBuf>,

    /// Shell command whose CSV output provides the rows
    #[arg(long)]
    command: Option<String>,

    /// Title row shown above the header
    #[arg(short, long)]
    title: Option<String>,

    /// Write debug logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn load_config(cli: Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };

    if let Some(path) = cli.data {
        config.source = Some(DataSource::File { path });
    } else if let Some(command) = cli.command {
        config.source = Some(DataSource::Command { command });
    }
    if cli.title.is_some() {
        config.title = cli.title;
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file;
    }
    Ok(config)
}

fn init_logging(config: &Config) -> Result<()> {
    // stdout belongs to the TUI, so logs only go to a file
    if let Some(path) = &config.log_file {
        let file = File::create(path)
            .with_context(|| format!("Could not create log file {}", path.display()))?;
        WriteLogger::init(LevelFilter::Debug, LogConfig::default(), file)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = load_config(Cli::parse())?;
    init_logging(&config)?;

    let source = config
        .source
        .clone()
        .context("No data source: pass --data or --command, or set `source` in the config")?;
    let rows = source.load()?;
    info!("starting with {} rows from {}", rows.len(), source);

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(config.tick_rate_ms));
    tui.enter()?;

    let mut app = App::new(&config, rows);
    app.init()?;

    let result = run_app(&mut tui, &mut app);

    tui.exit()?;

    if let Err(err) = result {
        error!("exiting with error: {:?}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                error!("draw error: {}", e);
            }
        })?;

        let action = match tui.next_event()? {
            Some(Event::Key(key)) => app.handle_key_event(key)?,
            Some(Event::Mouse(mouse)) => app.handle_mouse_event(mouse)?,
            Some(Event::Resize(w, h)) => Some(Action::Resize(w, h)),
            Some(_) => None,
            // No event - send a tick for time-based updates
            None => Some(Action::Tick),
        };

        // An action might produce a follow-up action
        let mut current_action = action;
        while let Some(a) = current_action {
            current_action = app.update(a)?;
        }
    }

    Ok(())
}
