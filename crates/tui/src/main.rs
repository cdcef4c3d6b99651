mod app;
mod events;
mod persist;
mod strings;
mod terminal;
mod theme;
mod ui;

use anyhow::Result;
use once_cell::sync::OnceCell;
use terminal::TerminalGuard;
use tracing_appender::non_blocking::WorkerGuard;

// Keeps the non-blocking writer flushing for the life of the process.
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

fn init_logging() {
    let Some(base) = directories::BaseDirs::new() else {
        return;
    };
    let dir = base.data_dir().join("atlas").join("logs");
    let appender = tracing_appender::rolling::daily(dir, "atlas.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    let _ = LOG_GUARD.set(guard);
}

fn main() -> Result<()> {
    init_logging();
    let mut app = app::App::new();
    app.load_all();
    let mut term = TerminalGuard::new()?;
    events::run(&mut term.terminal, &mut app)
}
