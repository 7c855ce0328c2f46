use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling or starting a desktop.
///
/// Window operations themselves never fail: unknown ids and operations that
/// make no sense in the current state are absorbed as no-ops.
#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("window {0} is defined more than once")]
    DuplicateWindow(String),
    #[error("cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}
