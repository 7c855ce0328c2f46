use std::io;

use clap::Parser;
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use retro_desk::config::{Cli, DesktopConfig};
use retro_desk::drivers::console::ConsoleDriver;
use retro_desk::log_buffer::LogBuffer;
use retro_desk::portfolio::Portfolio;
use retro_desk::runner::{run_desktop, run_guarded};
use retro_desk::tracing_sub;

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = DesktopConfig::try_from(&cli)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let log = LogBuffer::default();
    tracing_sub::init(config.log_level, config.log_file.as_deref(), &log)
        .map_err(io::Error::other)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting retro-desk");

    let mut app = Portfolio::new(&config, log).map_err(io::Error::other)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let mut driver = ConsoleDriver::new();

    let result = run_guarded(
        &mut terminal,
        |term| {
            terminal::enable_raw_mode()?;
            execute!(term.backend_mut(), EnterAlternateScreen, EnableFocusChange)
        },
        |term| run_desktop(term, &mut driver, &mut app, config.tick),
        |term| {
            let raw = terminal::disable_raw_mode();
            let screen = execute!(term.backend_mut(), DisableFocusChange, LeaveAlternateScreen);
            let cursor = term.show_cursor();
            raw.and(screen).and(cursor)
        },
    );

    match &result {
        Ok(()) => tracing::info!("retro-desk exited"),
        Err(err) => tracing::error!(error = %err, "retro-desk stopped on error"),
    }
    result
}
