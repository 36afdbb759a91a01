//! M&E field toolkit - terminal front-end for humanitarian survey forms
//!
//! A Ratatui-based TUI with a login gate, a dashboard of sector forms and
//! store-and-forward submission with an offline pending queue.

mod app;
mod backend;
mod config;
mod error;
mod gateway;
mod platform;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::App;
use backend::{FileStore, HttpSink, LocalIdentityService, TcpProbe};
use config::ToolkitConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gateway::{PendingQueue, SubmissionGateway};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::FormSchemaRegistry;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TICK: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    let config = ToolkitConfig::load()?;
    let data_dir = config.data_dir()?;
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    init_logging(&data_dir)?;
    tracing::info!("Starting with data directory {}", data_dir.display());

    let registry = load_registry(&config)?;
    let endpoint = config.endpoint()?;
    if endpoint.is_none() {
        tracing::warn!("No submit endpoint configured, every submission will be queued");
    }

    let identity = Arc::new(LocalIdentityService::new(
        config.username(),
        config.password(),
        data_dir.join("session.json"),
    ));
    let store = Arc::new(FileStore::new(&data_dir));
    tracing::info!("Pending queue stored in {}", store.dir().display());
    let queue = PendingQueue::new(store);
    log_backlog(&queue);

    let gateway = Arc::new(SubmissionGateway::new(
        Arc::new(HttpSink::new(endpoint.clone())),
        Arc::new(TcpProbe::new(
            endpoint.as_ref(),
            config.probe_timeout(),
            config.force_offline(),
        )),
        queue,
    ));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let mut app = App::new(Arc::new(registry), identity, gateway);
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if app.state.submissions_in_flight > 0 {
        eprintln!(
            "Finishing {} submissions before exit...",
            app.state.submissions_in_flight
        );
    }
    app.shutdown().await;

    if let Err(err) = result {
        tracing::error!("Exiting after error: {err:?}");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    tracing::info!("Exiting");
    Ok(())
}

/// Log to a file in the data directory; the terminal belongs to the UI
fn init_logging(data_dir: &Path) -> Result<()> {
    let log_path = data_dir.join("mne-tui.log");
    let log_file = File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mne_tui=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

/// Built-in sectors, or the configured schema file; the catalog must resolve
fn load_registry(config: &ToolkitConfig) -> Result<FormSchemaRegistry> {
    let registry = match &config.schema_path {
        Some(path) => {
            tracing::info!("Loading form schema from {}", path.display());
            FormSchemaRegistry::from_file(path)
                .with_context(|| format!("Invalid form schema {}", path.display()))?
        }
        None => FormSchemaRegistry::builtin(),
    };
    registry.verify_catalog().map_err(|e| {
        tracing::error!("Dashboard catalog does not match the registry: {e}");
        e
    })?;
    Ok(registry)
}

fn log_backlog(queue: &PendingQueue) {
    match queue.entries() {
        Ok(entries) => {
            if let Some(oldest) = entries.first() {
                tracing::info!(
                    "{} submissions awaiting sync, oldest from {}",
                    entries.len(),
                    oldest.submitted_at()
                );
            }
        }
        Err(e) => tracing::warn!("Pending queue is unreadable: {e}"),
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.poll_background();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if platform::is_quit_shortcut(&key) {
                        return Ok(());
                    }
                    app.handle_key(key).await?;
                }
                Event::Resize(_width, _height) => {
                    // Redrawn on the next tick
                }
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
