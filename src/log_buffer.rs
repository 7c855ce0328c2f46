use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::constants::LOG_BUFFER_LINES;

#[derive(Debug)]
struct Lines {
    lines: VecDeque<String>,
    max_lines: usize,
    written: u64,
}

impl Lines {
    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        self.written = self.written.wrapping_add(1);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

/// Bounded in-memory log shared between the tracing writer and the
/// "System Log" window. Clones share the same lines.
#[derive(Clone, Debug)]
pub struct LogBuffer {
    inner: Arc<Mutex<Lines>>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(LOG_BUFFER_LINES)
    }
}

impl LogBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Lines {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
                written: 0,
            })),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut lines) = self.inner.lock() {
            lines.push_line(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|l| l.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lines pushed since creation, including those already dropped. Keeps
    /// moving once the buffer is full, unlike [`len`](Self::len).
    pub fn written(&self) -> u64 {
        self.inner.lock().map(|l| l.written).unwrap_or(0)
    }

    /// The last `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> Vec<String> {
        let Ok(lines) = self.inner.lock() else {
            return Vec::new();
        };
        let skip = lines.lines.len().saturating_sub(n);
        lines.lines.iter().skip(skip).cloned().collect()
    }

    pub fn writer(&self) -> LogBufferWriter {
        LogBufferWriter {
            buffer: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// `io::Write` adapter that splits output into lines. Partial lines wait
/// for their newline, or for `flush`.
#[derive(Debug)]
pub struct LogBufferWriter {
    buffer: LogBuffer,
    pending: Vec<u8>,
}

impl LogBufferWriter {
    fn flush_pending(&mut self, force: bool) {
        let end = if force {
            self.pending.len()
        } else {
            match self.pending.iter().rposition(|b| *b == b'\n') {
                Some(pos) => pos + 1,
                None => return,
            }
        };
        let drained: Vec<u8> = self.pending.drain(..end).collect();
        let text = String::from_utf8_lossy(&drained);
        for line in text.split('\n').filter(|line| !line.is_empty()) {
            self.buffer.push(line.trim_end_matches('\r'));
        }
    }
}

impl Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.flush_pending(false);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending(true);
        Ok(())
    }
}

impl Drop for LogBufferWriter {
    fn drop(&mut self) {
        self.flush_pending(true);
    }
}
