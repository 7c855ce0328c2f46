use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::Level;

use crate::constants::{DEFAULT_INITIAL_Z, DEFAULT_STAGGER_MS, DEFAULT_TICK_MS, MIN_VISIBLE_MARGIN};
use crate::portfolio::PortfolioWindow;
use crate::window::ClampPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "retro-desk",
    version = env!("CARGO_PKG_VERSION"),
    about = "A retro desktop with draggable windows, a taskbar and a start menu"
)]
pub struct Cli {
    /// Starting value of the window stacking counter.
    #[arg(long = "initial-z", value_name = "N", default_value_t = DEFAULT_INITIAL_Z)]
    pub initial_z: u64,

    /// Idle poll interval. Also drives the clock and staggered opens.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Delay between windows opened by "Open All". 0 opens them at once.
    #[arg(long = "stagger-ms", value_name = "MS", default_value_t = DEFAULT_STAGGER_MS)]
    pub stagger_ms: u64,

    /// Let windows be dragged partly off screen.
    #[arg(long = "allow-offscreen")]
    pub allow_offscreen: bool,

    /// Cells that must stay on screen with --allow-offscreen.
    #[arg(long = "margin", value_name = "CELLS", default_value_t = MIN_VISIBLE_MARGIN)]
    pub margin: u16,

    /// Window to open at startup. Repeatable.
    #[arg(long = "open", value_name = "WINDOW", value_enum)]
    pub open: Vec<PortfolioWindow>,

    /// Append logs to this file instead of the System Log window.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[arg(long = "log-level", value_name = "LEVEL", default_value = "debug")]
    pub log_level: Level,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick interval must be between 5 and 1000 ms, got {0}")]
    TickOutOfRange(u64),
    #[error("stagger delay must be at most 2000 ms, got {0}")]
    StaggerOutOfRange(u64),
    #[error("visible margin must be at least 1 cell")]
    ZeroMargin,
}

#[derive(Debug, Clone)]
pub struct DesktopConfig {
    pub initial_z: u64,
    pub tick: Duration,
    pub stagger: Duration,
    pub clamp: ClampPolicy,
    pub open_at_start: Vec<PortfolioWindow>,
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            initial_z: DEFAULT_INITIAL_Z,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            stagger: Duration::from_millis(DEFAULT_STAGGER_MS),
            clamp: ClampPolicy::default(),
            open_at_start: Vec::new(),
            log_file: None,
            log_level: Level::DEBUG,
        }
    }
}

impl TryFrom<&Cli> for DesktopConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(5..=1000).contains(&cli.tick_ms) {
            return Err(ConfigError::TickOutOfRange(cli.tick_ms));
        }
        if cli.stagger_ms > 2000 {
            return Err(ConfigError::StaggerOutOfRange(cli.stagger_ms));
        }
        if cli.margin == 0 {
            return Err(ConfigError::ZeroMargin);
        }
        let clamp = if cli.allow_offscreen {
            ClampPolicy::KeepVisible { margin: cli.margin }
        } else {
            ClampPolicy::Contain
        };
        Ok(Self {
            initial_z: cli.initial_z,
            tick: Duration::from_millis(cli.tick_ms),
            stagger: Duration::from_millis(cli.stagger_ms),
            clamp,
            open_at_start: cli.open.clone(),
            log_file: cli.log_file.clone(),
            log_level: cli.log_level,
        })
    }
}
