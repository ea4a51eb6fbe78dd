//! usermgmt-tui binary entry point.
//!
//! Parses configuration, sets up file logging and the async runtime that
//! carries the HTTP requests, then runs the TUI in raw mode and restores the
//! terminal on exit.
//!
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use usermgmt_tui::app::config::Config;
use usermgmt_tui::app::keymap::Keymap;
use usermgmt_tui::app::{AppState, run};
use usermgmt_tui::{ApiClient, Controller};

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode. Mouse
/// capture stays off so the terminal can still select and copy text.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

/// The terminal belongs to the UI, so logs only go to a file, and only when
/// one is configured. `RUST_LOG` overrides the default `info` level.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("init logging: {e}"))
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.log_file.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("usermgmt-io")
        .build()
        .context("build async runtime")?;
    let client = ApiClient::new(config.base_url.clone()).context("build HTTP client")?;
    let controller = Controller::new(client, runtime.handle().clone(), config.page_size);
    let keymap = Keymap::load(config.keybinds.as_deref());
    let mut app = AppState::new(controller, config.theme.theme(), keymap);

    let mut terminal = init_terminal().context("init terminal")?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    // Nothing waits on requests still in flight.
    runtime.shutdown_background();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
