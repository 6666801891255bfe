//! fraudlens - Fraud review analyst console
//!
//! Terminal UI for reviewing like activity, drilling into suspicious hours,
//! and inspecting risk-ranked accounts.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fraudlens_core::console::Completion;
use fraudlens_core::{Config, ConsoleSettings, Dispatcher, HttpGateway};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::App;

/// Fraud review analyst console
#[derive(Parser, Debug)]
#[command(name = "fraudlens", version, about)]
struct Args {
    /// Backend API base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Path to a config file (defaults to ~/.config/fraudlens/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    if let Some(base_url) = args.base_url {
        config.gateway.base_url = base_url;
    }

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        fraudlens_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!(
        base_url = %config.gateway.base_url,
        log_file = %fraudlens_core::logging::log_file_path().display(),
        "fraudlens TUI starting up"
    );

    // Network calls run on a background runtime; the UI loop stays synchronous.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let gateway = HttpGateway::new(&config.gateway).context("failed to create gateway")?;
    let (dispatcher, completions) = Dispatcher::new(Arc::new(gateway), runtime.handle().clone());

    let mut app = App::new(ConsoleSettings::from(&config.console));

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &dispatcher, completions);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!("fraudlens TUI shutting down");
    runtime.shutdown_timeout(Duration::from_millis(500));

    result
}

/// Run the main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &Dispatcher,
    mut completions: UnboundedReceiver<Completion>,
) -> Result<()> {
    loop {
        // Release settled searches, fold in finished requests, start new ones
        app.tick();
        while let Ok(completion) = completions.try_recv() {
            app.apply(completion);
        }
        dispatcher.dispatch_all(app.take_requests());

        // Render
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
