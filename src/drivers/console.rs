use std::io;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;

use super::InputDriver;
use super::keyboard::KeyboardNormalizer;

/// Reads crossterm events from the controlling terminal.
#[derive(Debug, Default)]
pub struct ConsoleDriver {
    normalizer: KeyboardNormalizer,
    pending: Option<Event>,
}

impl ConsoleDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next event that survives normalization, without blocking past
    /// `timeout`.
    fn fill(&mut self, timeout: Duration) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        let mut timeout = timeout;
        while crossterm::event::poll(timeout)? {
            if let Some(evt) = self.normalizer.normalize(crossterm::event::read()?) {
                self.pending = Some(evt);
                return Ok(true);
            }
            // a dropped event does not restart the wait
            timeout = Duration::ZERO;
        }
        Ok(false)
    }
}

impl InputDriver for ConsoleDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        self.fill(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        loop {
            if let Some(evt) = self.pending.take() {
                return Ok(evt);
            }
            if let Some(evt) = self.normalizer.normalize(crossterm::event::read()?) {
                return Ok(evt);
            }
        }
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        }
    }
}
