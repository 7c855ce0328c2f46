use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Irons out terminal differences in key reporting before events reach the
/// desktop: Shift+Tab always arrives as a bare `BackTab`, and key releases
/// (reported by Windows consoles and the kitty protocol) are dropped.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        let Event::Key(mut key) = evt else {
            return Some(evt);
        };
        if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
            key.code = KeyCode::BackTab;
        }
        if key.code == KeyCode::BackTab {
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
        match key.kind {
            KeyEventKind::Release => {
                if key.code == KeyCode::Esc {
                    self.esc_down = false;
                }
                return None;
            }
            // a held Esc would open and close the start menu repeatedly
            KeyEventKind::Repeat if key.code == KeyCode::Esc => return None,
            _ => {}
        }
        if key.code == KeyCode::Esc {
            if self.esc_down && cfg!(windows) {
                return None;
            }
            self.esc_down = true;
        } else {
            self.esc_down = false;
        }
        Some(Event::Key(key))
    }
}
