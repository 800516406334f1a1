use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod advice;
mod app;
mod config;
mod handler;
mod session;
mod tui;
mod ui;

use app::App;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_or_default();
    init_logging(&config)?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(&config, events.sender());

    info!(version = env!("CARGO_PKG_VERSION"), "advisor started");
    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    info!("advisor stopped");
    result
}

async fn run(terminal: &mut tui::Tui, events: &mut tui::EventHandler, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;
        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}

/// Logs go to a file since the TUI owns the terminal. Filter comes from
/// ADVISOR_LOG, then the config file, then "advisor=info".
fn init_logging(config: &Config) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .context("Could not determine data directory")?
        .join("advisor");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("advisor.log"))?;

    let filter = EnvFilter::try_from_env("ADVISOR_LOG").or_else(|_| {
        EnvFilter::try_new(config.log_filter.as_deref().unwrap_or("advisor=info"))
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}
