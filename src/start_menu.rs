use std::collections::VecDeque;
use std::fmt::Debug;
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::actions::Command;
use crate::keybindings::{Action, KeyBindings};
use crate::theme;
use crate::ui::{fill, rect_contains, safe_set_string};
use crate::window::WindowRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMenuItem<R> {
    Launch(R),
    OpenAll,
    CloseAll,
    ShutDown,
}

/// Result of feeding input to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome<R> {
    /// The menu is hidden or the input was not for it.
    Ignored,
    /// Handled without any effect outside the menu.
    Consumed,
    /// The menu closed without issuing anything. A pointer press that
    /// dismissed the menu still belongs to whatever lies under it.
    Dismissed,
    Command(Command<R>),
    ShutDown,
}

#[derive(Debug)]
pub struct StartMenu<R> {
    visible: bool,
    selected: usize,
    items: Vec<(StartMenuItem<R>, String)>,
    anchor: Rect,
}

impl<R: Copy + Eq + Ord + Debug> StartMenu<R> {
    pub fn new(items: Vec<(StartMenuItem<R>, String)>) -> Self {
        Self {
            visible: false,
            selected: 0,
            items,
            anchor: Rect::default(),
        }
    }

    /// One launcher per defined window followed by the bulk actions.
    pub fn for_registry(registry: &WindowRegistry<R>) -> Self {
        let mut items: Vec<(StartMenuItem<R>, String)> = registry
            .iter()
            .map(|(id, window)| (StartMenuItem::Launch(id), window.title().to_string()))
            .collect();
        items.push((StartMenuItem::OpenAll, "Open All".to_string()));
        items.push((StartMenuItem::CloseAll, "Close All".to_string()));
        items.push((StartMenuItem::ShutDown, "Shut Down...".to_string()));
        Self::new(items)
    }

    pub fn items(&self) -> impl Iterator<Item = StartMenuItem<R>> + '_ {
        self.items.iter().map(|(item, _)| *item)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn open(&mut self) {
        self.visible = true;
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn toggle(&mut self) {
        if self.visible {
            self.close();
        } else {
            self.open();
        }
    }

    /// The menu pops up from the top edge of `anchor` (the taskbar).
    pub fn set_anchor(&mut self, anchor: Rect) {
        self.anchor = anchor;
    }

    pub fn menu_rect(&self) -> Rect {
        let label_width = self
            .items
            .iter()
            .map(|(_, label)| label.chars().count() as u16)
            .max()
            .unwrap_or(0);
        // border, banner column, padding
        let width = (label_width + 5).min(self.anchor.width);
        let height = (self.items.len() as u16 + 2).min(self.anchor.y);
        Rect {
            x: self.anchor.x,
            y: self.anchor.y - height,
            width,
            height,
        }
    }

    fn item_rect(&self, idx: usize) -> Option<Rect> {
        let menu = self.menu_rect();
        let y = menu.y + 1 + idx as u16;
        if menu.width < 3 || y + 1 >= menu.y + menu.height {
            return None;
        }
        Some(Rect::new(menu.x + 2, y, menu.width - 3, 1))
    }

    fn move_selection(&mut self, forward: bool) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
    }

    pub fn handle_key(&mut self, key: &KeyEvent, bindings: &KeyBindings) -> MenuOutcome<R> {
        if !self.visible {
            return MenuOutcome::Ignored;
        }
        match bindings.action_for_key(key) {
            Some(Action::MenuUp | Action::MenuPrev) => {
                self.move_selection(false);
                MenuOutcome::Consumed
            }
            Some(Action::MenuDown | Action::MenuNext) => {
                self.move_selection(true);
                MenuOutcome::Consumed
            }
            Some(Action::MenuSelect) => self.activate(self.selected),
            Some(Action::CloseMenu | Action::ToggleStartMenu) => {
                self.close();
                MenuOutcome::Dismissed
            }
            // global shortcuts keep working while the menu is up
            Some(Action::Quit) => MenuOutcome::Ignored,
            _ => MenuOutcome::Consumed,
        }
    }

    pub fn handle_pointer_down(&mut self, column: u16, row: u16) -> MenuOutcome<R> {
        if !self.visible {
            return MenuOutcome::Ignored;
        }
        if !rect_contains(self.menu_rect(), column, row) {
            self.close();
            return MenuOutcome::Dismissed;
        }
        let hit = (0..self.items.len())
            .find(|idx| self.item_rect(*idx).is_some_and(|r| rect_contains(r, column, row)));
        match hit {
            Some(idx) => self.activate(idx),
            None => MenuOutcome::Consumed,
        }
    }

    /// Issue the item at `idx`. The menu always closes.
    pub fn activate(&mut self, idx: usize) -> MenuOutcome<R> {
        self.close();
        let Some((item, _)) = self.items.get(idx) else {
            return MenuOutcome::Dismissed;
        };
        tracing::debug!(?item, "start menu item activated");
        match *item {
            StartMenuItem::Launch(id) => MenuOutcome::Command(Command::Open(id)),
            StartMenuItem::OpenAll => MenuOutcome::Command(Command::OpenAll),
            StartMenuItem::CloseAll => MenuOutcome::Command(Command::CloseAll),
            StartMenuItem::ShutDown => MenuOutcome::ShutDown,
        }
    }

    pub fn render(&self, buffer: &mut Buffer) {
        if !self.visible {
            return;
        }
        let menu = self.menu_rect();
        if menu.width < 3 || menu.height < 2 {
            return;
        }
        fill(buffer, menu, theme::menu());
        let right = menu.x + menu.width - 1;
        let bottom = menu.y + menu.height - 1;
        let border = theme::menu();
        for x in menu.x..=right {
            let (top, low) = if x == menu.x {
                ("┌", "└")
            } else if x == right {
                ("┐", "┘")
            } else {
                ("─", "─")
            };
            safe_set_string(buffer, menu, x, menu.y, top, border);
            safe_set_string(buffer, menu, x, bottom, low, border);
        }
        for y in menu.y + 1..bottom {
            safe_set_string(buffer, menu, menu.x, y, "│", border);
            safe_set_string(buffer, menu, right, y, "│", border);
            safe_set_string(buffer, menu, menu.x + 1, y, " ", theme::menu_banner());
        }
        for (idx, (_, label)) in self.items.iter().enumerate() {
            let Some(rect) = self.item_rect(idx) else {
                break;
            };
            let style = if idx == self.selected {
                theme::menu_selected()
            } else {
                theme::menu()
            };
            fill(buffer, rect, style);
            safe_set_string(buffer, rect, rect.x + 1, rect.y, label, style);
        }
    }
}

/// Opens a batch of windows one by one, `interval` apart, driven by the idle
/// tick.
#[derive(Debug)]
pub struct StaggeredOpen<R> {
    pending: VecDeque<R>,
    interval: Duration,
    next_due: Option<Instant>,
}

impl<R: Copy> StaggeredOpen<R> {
    pub fn new(interval: Duration) -> Self {
        Self {
            pending: VecDeque::new(),
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Queue `ids`, replacing any batch still in flight. The first one is
    /// due at `now`.
    pub fn begin(&mut self, ids: impl IntoIterator<Item = R>, now: Instant) {
        self.pending = ids.into_iter().collect();
        self.next_due = (!self.pending.is_empty()).then_some(now);
    }

    pub fn drain_due(&mut self, now: Instant) -> Vec<R> {
        let mut due = Vec::new();
        while let Some(at) = self.next_due {
            if at > now {
                break;
            }
            let Some(id) = self.pending.pop_front() else {
                self.next_due = None;
                break;
            };
            due.push(id);
            self.next_due = (!self.pending.is_empty()).then(|| at + self.interval);
        }
        due
    }

    pub fn cancel(&mut self) {
        self.pending.clear();
        self.next_due = None;
    }
}
