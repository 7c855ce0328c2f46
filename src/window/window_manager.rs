use std::fmt::Debug;

use ratatui::prelude::Rect;

use super::{FloatRect, Visibility, Window, WindowRegistry};
use crate::actions::Command;
use crate::constants::{DEFAULT_INITIAL_Z, MIN_VISIBLE_MARGIN};

/// How far a dragged window may travel past the viewport edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClampPolicy {
    /// The whole window stays inside the viewport. A window larger than the
    /// viewport is pinned to the viewport's top-left corner.
    #[default]
    Contain,
    /// The window may leave the viewport, but at least `margin` columns and
    /// rows stay inside and the title bar never goes above the top edge.
    KeepVisible { margin: u16 },
}

impl ClampPolicy {
    pub fn keep_visible() -> Self {
        ClampPolicy::KeepVisible {
            margin: MIN_VISIBLE_MARGIN,
        }
    }

    pub fn clamp(self, rect: FloatRect, bounds: Rect) -> FloatRect {
        if bounds.width == 0 || bounds.height == 0 {
            return rect;
        }
        let bx = i32::from(bounds.x);
        let by = i32::from(bounds.y);
        let bw = i32::from(bounds.width);
        let bh = i32::from(bounds.height);
        let w = i32::from(rect.width);
        let h = i32::from(rect.height);
        let (x, y) = match self {
            ClampPolicy::Contain => (
                rect.x.min(bx + bw - w).max(bx),
                rect.y.min(by + bh - h).max(by),
            ),
            ClampPolicy::KeepVisible { margin } => {
                let margin = i32::from(margin.max(1));
                let mx = margin.min(w).min(bw);
                let my = margin.min(h).min(bh);
                (
                    rect.x.clamp(bx - (w - mx), bx + bw - mx),
                    rect.y.clamp(by, by + bh - my),
                )
            }
        };
        FloatRect { x, y, ..rect }
    }
}

/// Change notifications queued by every state-changing operation and drained
/// by the views through [`WindowManager::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmEvent<R> {
    Opened(R),
    Closed(R),
    Minimized(R),
    MaximizeToggled { id: R, maximized: bool },
    Moved(R),
    FocusChanged(Option<R>),
}

/// Owns the window registry and the stacking state of one desktop.
///
/// All counters live here rather than in process-wide statics, so several
/// desktops can coexist (and tests get a fresh one each).
#[derive(Debug, Clone)]
pub struct WindowManager<R: Copy + Eq + Ord> {
    registry: WindowRegistry<R>,
    z_counter: u64,
    focused: Option<R>,
    viewport: Rect,
    clamp: ClampPolicy,
    events: Vec<WmEvent<R>>,
}

impl<R: Copy + Eq + Ord + Debug> WindowManager<R> {
    pub fn new(registry: WindowRegistry<R>) -> Self {
        Self::with_initial_z(registry, DEFAULT_INITIAL_Z)
    }

    pub fn with_initial_z(registry: WindowRegistry<R>, initial_z: u64) -> Self {
        Self {
            registry,
            z_counter: initial_z,
            focused: None,
            viewport: Rect::default(),
            clamp: ClampPolicy::default(),
            events: Vec::new(),
        }
    }

    pub fn set_clamp_policy(&mut self, policy: ClampPolicy) {
        self.clamp = policy;
    }

    pub fn clamp_policy(&self) -> ClampPolicy {
        self.clamp
    }

    pub fn registry(&self) -> &WindowRegistry<R> {
        &self.registry
    }

    pub fn window(&self, id: R) -> Option<&Window> {
        self.registry.get(id)
    }

    pub fn focused(&self) -> Option<R> {
        self.focused
    }

    pub fn is_focused(&self, id: R) -> bool {
        self.focused == Some(id)
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Last value handed out by the z-order counter.
    pub fn z_counter(&self) -> u64 {
        self.z_counter
    }

    /// Drain queued change notifications.
    pub fn take_events(&mut self) -> Vec<WmEvent<R>> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Visible windows bottom-to-top.
    pub fn draw_order(&self) -> Vec<R> {
        let mut visible: Vec<(R, u64)> = self
            .registry
            .iter()
            .filter(|(_, window)| window.is_visible())
            .map(|(id, window)| (id, window.z_order.unwrap_or(0)))
            .collect();
        visible.sort_by_key(|(_, z)| *z);
        visible.into_iter().map(|(id, _)| id).collect()
    }

    pub fn topmost_visible(&self) -> Option<R> {
        self.topmost_visible_except(None)
    }

    fn topmost_visible_except(&self, skip: Option<R>) -> Option<R> {
        self.registry
            .iter()
            .filter(|(id, window)| Some(*id) != skip && window.is_visible())
            .max_by_key(|(_, window)| window.z_order)
            .map(|(id, _)| id)
    }

    /// Hit-test by stacking order so clicks never fall through to a window
    /// underneath.
    pub fn window_at(&self, x: i32, y: i32) -> Option<R> {
        self.draw_order().into_iter().rev().find(|id| {
            self.registry
                .get(*id)
                .is_some_and(|window| window.rect.contains(x, y))
        })
    }

    pub fn open(&mut self, id: R) {
        let viewport = self.viewport;
        let policy = self.clamp;
        let Some(window) = self.registry.get_mut(id) else {
            tracing::debug!(window_id = ?id, "open ignored: unknown window");
            return;
        };
        if !window.is_open() {
            window.visibility = Visibility::Open;
            window.minimized = false;
            if !window.placed && !is_empty(viewport) {
                window.rect = centered(window.rect, viewport);
                window.placed = true;
            }
            if !window.maximized {
                window.rect = policy.clamp(window.rect, viewport);
            }
            tracing::debug!(window_id = ?id, x = window.rect.x, y = window.rect.y, "opened window");
            self.events.push(WmEvent::Opened(id));
        }
        self.focus(id);
    }

    pub fn close(&mut self, id: R) {
        let Some(window) = self.registry.get_mut(id) else {
            tracing::debug!(window_id = ?id, "close ignored: unknown window");
            return;
        };
        if !window.is_open() {
            return;
        }
        window.visibility = Visibility::Closed;
        window.minimized = false;
        tracing::debug!(window_id = ?id, "closed window");
        self.events.push(WmEvent::Closed(id));
        self.release_focus(id);
    }

    pub fn minimize(&mut self, id: R) {
        let Some(window) = self.registry.get_mut(id) else {
            tracing::debug!(window_id = ?id, "minimize ignored: unknown window");
            return;
        };
        if !window.is_open() || window.minimized {
            return;
        }
        window.minimized = true;
        tracing::debug!(window_id = ?id, "minimized window");
        self.events.push(WmEvent::Minimized(id));
        self.release_focus(id);
    }

    /// Restoring clamps the saved geometry, so a window maximized before
    /// the terminal shrank comes back reachable.
    pub fn maximize_toggle(&mut self, id: R) {
        let viewport = self.viewport;
        let policy = self.clamp;
        let Some(window) = self.registry.get_mut(id) else {
            tracing::debug!(window_id = ?id, "maximize ignored: unknown window");
            return;
        };
        if !window.is_open() {
            return;
        }
        if window.maximized {
            if let Some(prev) = window.restore_rect.take() {
                window.rect = policy.clamp(prev, viewport);
            }
            window.maximized = false;
        } else {
            window.restore_rect = Some(window.rect);
            window.rect = FloatRect::from(viewport);
            window.maximized = true;
        }
        let maximized = window.maximized;
        tracing::debug!(window_id = ?id, maximized, "toggled maximize");
        self.events.push(WmEvent::MaximizeToggled { id, maximized });
    }

    /// Raise `id` above every other window and make it the sole focused one.
    ///
    /// Re-focusing the window that is already focused and on top changes
    /// nothing, the z counter included.
    pub fn focus(&mut self, id: R) {
        let Some(window) = self.registry.get(id) else {
            tracing::debug!(window_id = ?id, "focus ignored: unknown window");
            return;
        };
        if !window.is_open() {
            return;
        }
        if self.focused == Some(id) && !window.minimized && self.topmost_visible() == Some(id) {
            return;
        }
        let z = match self.z_counter.checked_add(1) {
            Some(z) => z,
            None => self.renumber_stack() + 1,
        };
        self.z_counter = z;
        if let Some(window) = self.registry.get_mut(id) {
            window.z_order = Some(z);
            window.minimized = false;
        }
        self.focused = Some(id);
        tracing::debug!(window_id = ?id, z, "focused window");
        self.events.push(WmEvent::FocusChanged(Some(id)));
    }

    /// Move a window by a delta. Maximized, minimized and closed windows do
    /// not move; the result is clamped by the active [`ClampPolicy`].
    pub fn drag(&mut self, id: R, dx: i32, dy: i32) {
        let viewport = self.viewport;
        let policy = self.clamp;
        let Some(window) = self.registry.get_mut(id) else {
            tracing::debug!(window_id = ?id, "drag ignored: unknown window");
            return;
        };
        if !window.is_visible() || window.maximized {
            return;
        }
        let moved = FloatRect {
            x: window.rect.x.saturating_add(dx),
            y: window.rect.y.saturating_add(dy),
            ..window.rect
        };
        let clamped = policy.clamp(moved, viewport);
        if clamped != window.rect {
            window.rect = clamped;
            self.events.push(WmEvent::Moved(id));
        }
    }

    /// Absolute form of [`drag`](Self::drag).
    pub fn move_to(&mut self, id: R, x: i32, y: i32) {
        let Some(window) = self.registry.get(id) else {
            return;
        };
        let (cx, cy) = window.position();
        self.drag(id, x.saturating_sub(cx), y.saturating_sub(cy));
    }

    pub fn open_all(&mut self) {
        for id in self.registry.ids() {
            self.open(id);
        }
    }

    pub fn close_all(&mut self) {
        for id in self.registry.open_ids() {
            self.close(id);
        }
    }

    /// Focus the next (or previous) open window in definition order.
    pub fn cycle_focus(&mut self, forward: bool) {
        let open = self.registry.open_ids();
        if open.is_empty() {
            return;
        }
        let len = open.len() as isize;
        let next = match self.focused.and_then(|id| open.iter().position(|x| *x == id)) {
            Some(idx) => {
                let step = if forward { 1 } else { -1 };
                (idx as isize + step).rem_euclid(len) as usize
            }
            None if forward => 0,
            None => open.len() - 1,
        };
        self.focus(open[next]);
    }

    pub fn dispatch(&mut self, command: Command<R>) {
        tracing::debug!(%command, "dispatching window command");
        match command {
            Command::Open(id) => self.open(id),
            Command::Close(id) => self.close(id),
            Command::Minimize(id) => self.minimize(id),
            Command::MaximizeToggle(id) => self.maximize_toggle(id),
            Command::Focus(id) => self.focus(id),
            Command::OpenAll => self.open_all(),
            Command::CloseAll => self.close_all(),
        }
    }

    /// Record the area windows live in (terminal minus taskbar).
    ///
    /// Maximized windows follow the new viewport so they stay maximized
    /// across terminal resizes; the others are re-clamped. Windows opened
    /// before the first viewport was known are centred now.
    pub fn set_viewport(&mut self, area: Rect) {
        if self.viewport == area {
            return;
        }
        self.viewport = area;
        if is_empty(area) {
            return;
        }
        let policy = self.clamp;
        let mut moved = Vec::new();
        for (id, window) in self.registry.iter_mut() {
            let before = window.rect;
            if window.maximized {
                window.rect = FloatRect::from(area);
            } else if window.is_open() {
                if !window.placed {
                    window.rect = centered(window.rect, area);
                    window.placed = true;
                }
                window.rect = policy.clamp(window.rect, area);
            }
            if window.rect != before {
                moved.push(id);
            }
        }
        self.events.extend(moved.into_iter().map(WmEvent::Moved));
    }

    /// Reassign z-orders as `1..=n` keeping their relative order, and
    /// return the new counter value. Used when the counter runs out.
    fn renumber_stack(&mut self) -> u64 {
        let mut stacked: Vec<(u64, R)> = self
            .registry
            .iter()
            .filter_map(|(id, window)| window.z_order.map(|z| (z, id)))
            .collect();
        stacked.sort();
        let mut next = 0;
        for (_, id) in stacked {
            next += 1;
            if let Some(window) = self.registry.get_mut(id) {
                window.z_order = Some(next);
            }
        }
        tracing::debug!(windows = next, "z counter exhausted, stack renumbered");
        self.z_counter = next;
        next
    }

    fn release_focus(&mut self, id: R) {
        if self.focused != Some(id) {
            return;
        }
        // The successor already holds the highest visible z, so it is not
        // re-stacked.
        let next = self.topmost_visible_except(Some(id));
        self.focused = next;
        tracing::debug!(from = ?id, to = ?next, "focus transferred");
        self.events.push(WmEvent::FocusChanged(next));
    }
}

fn is_empty(area: Rect) -> bool {
    area.width == 0 || area.height == 0
}

fn centered(rect: FloatRect, viewport: Rect) -> FloatRect {
    let x = i32::from(viewport.x) + (i32::from(viewport.width) - i32::from(rect.width)) / 2;
    let y = i32::from(viewport.y) + (i32::from(viewport.height) - i32::from(rect.height)) / 2;
    FloatRect { x, y, ..rect }
}
