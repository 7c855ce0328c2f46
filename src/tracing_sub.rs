use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::error::DesktopError;
use crate::log_buffer::{LogBuffer, LogBufferWriter};

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    Buffer(LogBufferWriter),
    File(Arc<Mutex<File>>),
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::Buffer(w) => w.write(buf),
            DelegatingInner::File(f) => f
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::Buffer(w) => w.flush(),
            DelegatingInner::File(f) => f
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
        }
    }
}

/// Where log lines go: the in-memory buffer behind the "System Log" window,
/// or an append-only file. Never the terminal, which belongs to the UI.
#[derive(Clone, Debug)]
pub enum SubscriberMakeWriter {
    Buffer(LogBuffer),
    File(Arc<Mutex<File>>),
}

impl SubscriberMakeWriter {
    pub fn to_file(path: &Path) -> Result<Self, DesktopError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| DesktopError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(SubscriberMakeWriter::File(Arc::new(Mutex::new(file))))
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        let inner = match self {
            SubscriberMakeWriter::Buffer(buffer) => DelegatingInner::Buffer(buffer.writer()),
            SubscriberMakeWriter::File(file) => DelegatingInner::File(Arc::clone(file)),
        };
        DelegatingWriter { inner }
    }
}

/// Install the global subscriber. Logs go to `log_file` when given,
/// otherwise into `buffer`. Safe to call more than once; later calls leave
/// the first subscriber in place.
pub fn init(level: Level, log_file: Option<&Path>, buffer: &LogBuffer) -> Result<(), DesktopError> {
    let writer = match log_file {
        Some(path) => SubscriberMakeWriter::to_file(path)?,
        None => SubscriberMakeWriter::Buffer(buffer.clone()),
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}
