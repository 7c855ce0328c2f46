//! The desktop surface: routes terminal input to the window manager and its
//! views, and composites everything into one frame.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::actions::Command;
use crate::constants::{DEFAULT_STAGGER_MS, DOUBLE_CLICK_MS};
use crate::keybindings::{Action, KeyBindings};
use crate::pointer::{PointerEvent, PointerNormalizer, PointerPhase, PointerTracker, TouchEvent};
use crate::start_menu::{MenuOutcome, StaggeredOpen, StartMenu};
use crate::taskbar::{Taskbar, TaskbarHit, click_action, clock_label};
use crate::theme;
use crate::ui::{UiFrame, fill};
use crate::window::decorator::{ClassicDecorator, HeaderAction, WindowDecorator};
use crate::window::{WindowManager, WmEvent};

/// One window handed to the application for content drawing. `area` is the
/// region inside the chrome, in the window's local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDraw<R> {
    pub id: R,
    pub area: Rect,
    pub focused: bool,
}

#[derive(Debug)]
pub struct Desktop<R: Copy + Eq + Ord> {
    wm: WindowManager<R>,
    taskbar: Taskbar,
    start_menu: StartMenu<R>,
    tracker: PointerTracker<R>,
    normalizer: PointerNormalizer,
    decorator: Box<dyn WindowDecorator>,
    keys: KeyBindings,
    stagger: StaggeredOpen<R>,
    last_header_click: Option<(R, Instant)>,
    area: Rect,
    clock: String,
    dirty: bool,
    quit_requested: bool,
}

impl<R: Copy + Eq + Ord + Debug> Desktop<R> {
    pub fn new(wm: WindowManager<R>) -> Self {
        let start_menu = StartMenu::for_registry(wm.registry());
        Self {
            wm,
            taskbar: Taskbar::new(),
            start_menu,
            tracker: PointerTracker::new(),
            normalizer: PointerNormalizer::new(),
            decorator: Box::new(ClassicDecorator),
            keys: KeyBindings::default(),
            stagger: StaggeredOpen::new(Duration::from_millis(DEFAULT_STAGGER_MS)),
            last_header_click: None,
            area: Rect::default(),
            clock: String::new(),
            dirty: true,
            quit_requested: false,
        }
    }

    pub fn with_stagger(mut self, interval: Duration) -> Self {
        self.stagger = StaggeredOpen::new(interval);
        self
    }

    pub fn with_decorator(mut self, decorator: Box<dyn WindowDecorator>) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn with_key_bindings(mut self, keys: KeyBindings) -> Self {
        self.keys = keys;
        self
    }

    pub fn manager(&self) -> &WindowManager<R> {
        &self.wm
    }

    /// Direct manager access. Changes made here are picked up on the next
    /// event or tick.
    pub fn manager_mut(&mut self) -> &mut WindowManager<R> {
        &mut self.wm
    }

    pub fn start_menu(&self) -> &StartMenu<R> {
        &self.start_menu
    }

    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    pub fn key_bindings(&self) -> &KeyBindings {
        &self.keys
    }

    pub fn dragging(&self) -> Option<R> {
        self.tracker.dragging()
    }

    pub fn clock(&self) -> &str {
        &self.clock
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty || self.wm.has_pending_events()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Force a redraw on the next idle pass, for content that changed
    /// outside the desktop's knowledge.
    pub fn request_redraw(&mut self) {
        self.dirty = true;
    }

    pub fn request_quit(&mut self) {
        tracing::info!("shut down requested");
        self.quit_requested = true;
    }

    /// Size the desktop to `area`: the taskbar takes the bottom row and the
    /// rest becomes the window viewport.
    pub fn layout(&mut self, area: Rect) {
        self.area = area;
        let viewport = self.taskbar.split_area(area);
        self.start_menu.set_anchor(self.taskbar.area());
        self.wm.set_viewport(viewport);
        self.dirty = true;
        self.sync();
    }

    pub fn dispatch(&mut self, command: Command<R>) {
        self.run_command(command, Instant::now());
        self.sync();
    }

    pub fn handle_event(&mut self, event: &Event) -> bool {
        self.handle_event_at(event, Instant::now())
    }

    /// [`handle_event`](Self::handle_event) with an explicit clock, which
    /// decides double clicks and staggered opens.
    pub fn handle_event_at(&mut self, event: &Event, now: Instant) -> bool {
        let handled = match event {
            Event::Resize(width, height) => {
                self.layout(Rect::new(0, 0, *width, *height));
                true
            }
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key, now),
            Event::Key(_) => false,
            other => match self.normalizer.normalize(other) {
                Some(pointer) => self.handle_pointer(&pointer, now),
                None => false,
            },
        };
        self.sync();
        handled
    }

    pub fn handle_touch(&mut self, touch: &TouchEvent, now: Instant) -> bool {
        let handled = match self.normalizer.normalize_touch(touch) {
            Some(pointer) => self.handle_pointer(&pointer, now),
            None => false,
        };
        self.sync();
        handled
    }

    /// Idle work: release due staggered opens and refresh the clock.
    pub fn tick(&mut self, now: Instant) {
        for id in self.stagger.drain_due(now) {
            self.wm.open(id);
        }
        let clock = clock_label(&chrono::Local::now());
        if clock != self.clock {
            self.clock = clock;
            self.dirty = true;
        }
        self.sync();
    }

    fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> bool {
        match self.start_menu.handle_key(key, &self.keys) {
            MenuOutcome::Ignored => {}
            MenuOutcome::Consumed | MenuOutcome::Dismissed => {
                self.dirty = true;
                return true;
            }
            MenuOutcome::Command(command) => {
                self.run_command(command, now);
                self.dirty = true;
                return true;
            }
            MenuOutcome::ShutDown => {
                self.request_quit();
                return true;
            }
        }
        let Some(action) = self.keys.action_for_key(key) else {
            return false;
        };
        let focused = self.wm.focused();
        match action {
            Action::Quit => self.request_quit(),
            Action::ToggleStartMenu => {
                self.start_menu.toggle();
                self.dirty = true;
            }
            Action::FocusNext => self.wm.cycle_focus(true),
            Action::FocusPrev => self.wm.cycle_focus(false),
            Action::CloseWindow => {
                let Some(id) = focused else { return false };
                self.wm.close(id);
            }
            Action::MinimizeWindow => {
                let Some(id) = focused else { return false };
                self.wm.minimize(id);
            }
            Action::MaximizeWindow => {
                let Some(id) = focused else { return false };
                self.wm.maximize_toggle(id);
            }
            Action::CloseMenu
            | Action::MenuUp
            | Action::MenuDown
            | Action::MenuSelect
            | Action::MenuNext
            | Action::MenuPrev => return false,
        }
        true
    }

    fn run_command(&mut self, command: Command<R>, now: Instant) {
        match command {
            Command::OpenAll if !self.stagger.interval().is_zero() => {
                tracing::debug!(%command, interval_ms = self.stagger.interval().as_millis() as u64, "staggering");
                self.stagger.begin(self.wm.registry().ids(), now);
                for id in self.stagger.drain_due(now) {
                    self.wm.open(id);
                }
            }
            Command::CloseAll => {
                self.stagger.cancel();
                self.wm.close_all();
            }
            other => self.wm.dispatch(other),
        }
    }

    fn handle_pointer(&mut self, pointer: &PointerEvent, now: Instant) -> bool {
        match pointer.phase {
            PointerPhase::Down => self.pointer_down(pointer, now),
            PointerPhase::Move => match self.tracker.update(pointer) {
                Some((id, x, y)) => {
                    self.wm.move_to(id, x, y);
                    true
                }
                None => false,
            },
            PointerPhase::Up | PointerPhase::Cancel => self.tracker.finish(pointer).is_some(),
        }
    }

    fn pointer_down(&mut self, pointer: &PointerEvent, now: Instant) -> bool {
        if let Some(stale) = self.tracker.cancel() {
            tracing::debug!(window_id = ?stale, "ended stale drag");
        }
        // Any Down that is not on a title bar breaks a double click.
        let last_header_click = self.last_header_click.take();
        let (x, y) = (pointer.x, pointer.y);
        if let (Ok(column), Ok(row)) = (u16::try_from(x), u16::try_from(y)) {
            if let Some(hit) = self.taskbar.hit_test(&self.wm, column, row) {
                self.taskbar_click(hit);
                return true;
            }
            match self.start_menu.handle_pointer_down(column, row) {
                MenuOutcome::Ignored => {}
                MenuOutcome::Dismissed => self.dirty = true,
                MenuOutcome::Consumed => return true,
                MenuOutcome::Command(command) => {
                    self.run_command(command, now);
                    self.dirty = true;
                    return true;
                }
                MenuOutcome::ShutDown => {
                    self.request_quit();
                    return true;
                }
            }
        }

        let Some(id) = self.wm.window_at(x, y) else {
            return false;
        };
        self.wm.focus(id);
        let Some(window) = self.wm.window(id) else {
            return true;
        };
        let rect = window.rect();
        let maximized = window.is_maximized();
        match self.decorator.hit_test(rect, x, y) {
            HeaderAction::Minimize => self.wm.minimize(id),
            HeaderAction::Maximize => self.wm.maximize_toggle(id),
            HeaderAction::Close => self.wm.close(id),
            HeaderAction::Drag => {
                let double = last_header_click.is_some_and(|(last, at)| {
                    last == id
                        && now.saturating_duration_since(at) <= Duration::from_millis(DOUBLE_CLICK_MS)
                });
                if double {
                    self.wm.maximize_toggle(id);
                } else {
                    self.last_header_click = Some((id, now));
                    if !maximized {
                        self.tracker.begin(id, (rect.x, rect.y), pointer);
                    }
                }
            }
            HeaderAction::None => {}
        }
        true
    }

    fn taskbar_click(&mut self, hit: TaskbarHit<R>) {
        self.dirty = true;
        match hit {
            TaskbarHit::Start => self.start_menu.toggle(),
            TaskbarHit::Window(id) => {
                self.start_menu.close();
                if let Some(action) = click_action(&self.wm, id) {
                    action.apply(&mut self.wm);
                }
            }
            TaskbarHit::Tray | TaskbarHit::Empty => self.start_menu.close(),
        }
    }

    /// Drain manager notifications. A window that stops being visible while
    /// it is dragged takes the gesture with it.
    fn sync(&mut self) {
        for event in self.wm.take_events() {
            tracing::trace!(?event, "window event");
            if let WmEvent::Closed(id) | WmEvent::Minimized(id) = event
                && self.tracker.dragging() == Some(id)
            {
                self.tracker.cancel();
            }
            self.dirty = true;
        }
    }

    /// Draw desktop, windows (bottom to top), taskbar and start menu.
    /// `content` fills each window's client area.
    pub fn render<F>(&mut self, frame: &mut UiFrame<'_>, mut content: F)
    where
        F: FnMut(&mut UiFrame<'_>, WindowDraw<R>),
    {
        let area = frame.area();
        if area != self.area {
            self.layout(area);
        }
        self.sync();
        let viewport = self.wm.viewport();
        fill(frame.buffer_mut(), viewport, ratatui::style::Style::default().bg(theme::desktop_bg()));

        for id in self.wm.draw_order() {
            let Some(window) = self.wm.window(id) else {
                continue;
            };
            let rect = window.rect();
            let local = Rect::new(0, 0, rect.width, rect.height);
            let mut offscreen = Buffer::empty(local);
            let focused = self.wm.is_focused(id);
            self.decorator.render_window(
                &mut offscreen,
                local,
                window.title(),
                focused,
                window.is_maximized(),
            );
            let client = self.decorator.content_area(local);
            if client.width > 0 && client.height > 0 {
                let mut sub = UiFrame::from_parts(client, &mut offscreen);
                content(
                    &mut sub,
                    WindowDraw {
                        id,
                        area: client,
                        focused,
                    },
                );
            }
            frame.blit_from_signed(&offscreen, rect, viewport);
        }

        self.taskbar.render(
            frame.buffer_mut(),
            &self.wm,
            self.start_menu.is_visible(),
            &self.clock,
        );
        self.start_menu.render(frame.buffer_mut());
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

    use super::*;
    use crate::window::WindowRegistry;

    fn desktop() -> Desktop<u8> {
        let registry = WindowRegistry::new()
            .with_window(1, "About", 30, 8)
            .and_then(|r| r.with_window(2, "Projects", 30, 8))
            .unwrap();
        let mut desktop = Desktop::new(WindowManager::new(registry));
        desktop.layout(Rect::new(0, 0, 80, 24));
        desktop
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn down(column: u16, row: u16) -> Event {
        mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    fn key(code: KeyCode, mods: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, mods))
    }

    #[test]
    fn title_bar_drag_moves_window() {
        let mut desk = desktop();
        desk.dispatch(Command::Open(1));
        desk.manager_mut().move_to(1, 10, 5);
        let now = Instant::now();
        assert!(desk.handle_event_at(&down(14, 5), now));
        assert_eq!(desk.dragging(), Some(1));
        desk.handle_event_at(&mouse(MouseEventKind::Drag(MouseButton::Left), 20, 9), now);
        assert_eq!(desk.manager().window(1).unwrap().position(), (16, 9));
        desk.handle_event_at(&mouse(MouseEventKind::Up(MouseButton::Left), 20, 9), now);
        assert_eq!(desk.dragging(), None);
        desk.handle_event_at(&mouse(MouseEventKind::Drag(MouseButton::Left), 40, 9), now);
        assert_eq!(desk.manager().window(1).unwrap().position(), (16, 9));
    }

    #[test]
    fn double_click_on_title_toggles_maximize() {
        let mut desk = desktop();
        desk.dispatch(Command::Open(1));
        let (x, y) = desk.manager().window(1).unwrap().position();
        let at = (x as u16 + 2, y as u16);
        let now = Instant::now();
        desk.handle_event_at(&down(at.0, at.1), now);
        desk.handle_event_at(&mouse(MouseEventKind::Up(MouseButton::Left), at.0, at.1), now);
        desk.handle_event_at(&down(at.0, at.1), now + Duration::from_millis(200));
        assert!(desk.manager().window(1).unwrap().is_maximized());
        assert_eq!(desk.dragging(), None);
    }

    #[test]
    fn slow_second_click_does_not_maximize() {
        let mut desk = desktop();
        desk.dispatch(Command::Open(1));
        let (x, y) = desk.manager().window(1).unwrap().position();
        let now = Instant::now();
        desk.handle_event_at(&down(x as u16 + 2, y as u16), now);
        desk.handle_event_at(&down(x as u16 + 2, y as u16), now + Duration::from_secs(2));
        assert!(!desk.manager().window(1).unwrap().is_maximized());
    }

    #[test]
    fn close_button_closes_window() {
        let mut desk = desktop();
        desk.dispatch(Command::Open(1));
        let rect = desk.manager().window(1).unwrap().rect();
        // "[X]" occupies the three cells before the last column
        let close_x = (rect.right() - 3) as u16;
        desk.handle_event(&down(close_x, rect.y as u16));
        assert!(!desk.manager().window(1).unwrap().is_open());
    }

    #[test]
    fn clicking_a_window_body_raises_it() {
        let mut desk = desktop();
        desk.dispatch(Command::Open(1));
        desk.dispatch(Command::Open(2));
        desk.manager_mut().move_to(1, 0, 0);
        desk.manager_mut().move_to(2, 40, 0);
        desk.handle_event(&down(5, 3));
        assert_eq!(desk.manager().focused(), Some(1));
        assert_eq!(desk.dragging(), None);
    }

    #[test]
    fn keyboard_shortcuts_drive_focused_window() {
        let mut desk = desktop();
        desk.dispatch(Command::Open(1));
        desk.dispatch(Command::Open(2));
        desk.handle_event(&key(KeyCode::Char('x'), KeyModifiers::ALT));
        assert!(desk.manager().window(2).unwrap().is_maximized());
        desk.handle_event(&key(KeyCode::Char('n'), KeyModifiers::ALT));
        assert!(desk.manager().window(2).unwrap().is_minimized());
        assert_eq!(desk.manager().focused(), Some(1));
        desk.handle_event(&key(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert!(!desk.manager().window(1).unwrap().is_open());
        assert_eq!(desk.manager().focused(), None);
        assert!(!desk.handle_event(&key(KeyCode::Char('w'), KeyModifiers::CONTROL)));
        desk.handle_event(&key(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(desk.quit_requested());
    }

    #[test]
    fn closing_a_dragged_window_ends_the_gesture() {
        let mut desk = desktop();
        desk.dispatch(Command::Open(1));
        let (x, y) = desk.manager().window(1).unwrap().position();
        desk.handle_event(&down(x as u16 + 1, y as u16));
        assert_eq!(desk.dragging(), Some(1));
        desk.handle_event(&key(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(desk.dragging(), None);
    }

    #[test]
    fn staggered_open_all_runs_on_ticks() {
        let mut desk = desktop().with_stagger(Duration::from_millis(100));
        desk.layout(Rect::new(0, 0, 80, 24));
        let now = Instant::now();
        desk.handle_event_at(&key(KeyCode::F(1), KeyModifiers::NONE), now);
        assert!(desk.start_menu().is_visible());
        // launchers for both windows come first
        desk.handle_event_at(&key(KeyCode::Down, KeyModifiers::NONE), now);
        desk.handle_event_at(&key(KeyCode::Down, KeyModifiers::NONE), now);
        desk.handle_event_at(&key(KeyCode::Enter, KeyModifiers::NONE), now);
        assert!(!desk.start_menu().is_visible());
        assert_eq!(desk.manager().registry().open_ids(), vec![1]);
        desk.tick(now + Duration::from_millis(100));
        assert_eq!(desk.manager().registry().open_ids(), vec![1, 2]);
    }

    #[test]
    fn resize_refits_viewport() {
        let mut desk = desktop();
        desk.handle_event(&Event::Resize(100, 30));
        assert_eq!(desk.manager().viewport(), Rect::new(0, 0, 100, 29));
        assert_eq!(desk.taskbar().area(), Rect::new(0, 29, 100, 1));
    }

    #[test]
    fn render_composites_windows_and_taskbar() {
        let mut desk = desktop();
        desk.dispatch(Command::Open(1));
        desk.manager_mut().move_to(1, 0, 0);
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        let mut drawn = Vec::new();
        desk.render(&mut frame, |_, window| drawn.push(window));
        assert_eq!(
            drawn,
            vec![WindowDraw {
                id: 1,
                area: Rect::new(1, 1, 28, 6),
                focused: true
            }]
        );
        assert!(!desk.needs_redraw());
        assert_eq!(buffer.cell((1, 0)).map(|c| c.symbol()), Some("A"));
        assert_eq!(buffer.cell((0, 23)).map(|c| c.symbol()), Some("["));
    }

    #[test]
    fn click_elsewhere_between_header_clicks_is_not_a_double_click() {
        let mut desk = desktop();
        desk.dispatch(Command::Open(1));
        desk.dispatch(Command::Open(2));
        desk.manager_mut().move_to(1, 0, 0);
        desk.manager_mut().move_to(2, 40, 0);
        let now = Instant::now();
        desk.handle_event_at(&down(2, 0), now);
        desk.handle_event_at(&down(45, 3), now + Duration::from_millis(100));
        desk.handle_event_at(&down(2, 0), now + Duration::from_millis(200));
        assert!(!desk.manager().window(1).unwrap().is_maximized());
        assert_eq!(desk.dragging(), Some(1));
    }
}
