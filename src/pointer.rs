//! Pointer input unification and the window drag gesture.
//!
//! Mouse and touch input are reduced to one [`PointerEvent`] shape by the
//! [`PointerNormalizer`]; the [`PointerTracker`] runs the drag state machine
//! on top of it. Only one gesture exists at a time and the tracker owns it,
//! so ending a gesture is always a matter of taking it.

use std::fmt::Debug;

use crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub x: i32,
    pub y: i32,
    pub source: PointerSource,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, x: i32, y: i32, source: PointerSource) -> Self {
        Self {
            phase,
            x,
            y,
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Touch input as delivered by an embedder. Terminals do not produce touch
/// events, so hosts that have them feed these in directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub id: u64,
    pub phase: TouchPhase,
    pub x: i32,
    pub y: i32,
}

/// Converts raw input into [`PointerEvent`]s.
///
/// Only the left mouse button and the first touch point take part; other
/// buttons and extra fingers are dropped.
#[derive(Debug, Default)]
pub struct PointerNormalizer {
    mouse_down: bool,
    primary_touch: Option<u64>,
}

impl PointerNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, event: &Event) -> Option<PointerEvent> {
        match event {
            Event::Mouse(mouse) => self.normalize_mouse(mouse),
            Event::FocusLost if self.mouse_down => {
                self.mouse_down = false;
                Some(PointerEvent::new(
                    PointerPhase::Cancel,
                    0,
                    0,
                    PointerSource::Mouse,
                ))
            }
            _ => None,
        }
    }

    pub fn normalize_mouse(&mut self, mouse: &MouseEvent) -> Option<PointerEvent> {
        let x = i32::from(mouse.column);
        let y = i32::from(mouse.row);
        let phase = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.mouse_down = true;
                PointerPhase::Down
            }
            MouseEventKind::Drag(MouseButton::Left) => PointerPhase::Move,
            MouseEventKind::Up(MouseButton::Left) => {
                self.mouse_down = false;
                PointerPhase::Up
            }
            // Some terminals swallow the release; a plain move with the
            // button believed down means it was let go somewhere.
            MouseEventKind::Moved if self.mouse_down => {
                self.mouse_down = false;
                PointerPhase::Up
            }
            _ => return None,
        };
        Some(PointerEvent::new(phase, x, y, PointerSource::Mouse))
    }

    pub fn normalize_touch(&mut self, touch: &TouchEvent) -> Option<PointerEvent> {
        let phase = match touch.phase {
            TouchPhase::Start => {
                if self.primary_touch.is_some() {
                    return None;
                }
                self.primary_touch = Some(touch.id);
                PointerPhase::Down
            }
            TouchPhase::Move if self.primary_touch == Some(touch.id) => PointerPhase::Move,
            TouchPhase::End if self.primary_touch == Some(touch.id) => {
                self.primary_touch = None;
                PointerPhase::Up
            }
            TouchPhase::Cancel if self.primary_touch == Some(touch.id) => {
                self.primary_touch = None;
                PointerPhase::Cancel
            }
            _ => return None,
        };
        Some(PointerEvent::new(
            phase,
            touch.x,
            touch.y,
            PointerSource::Touch,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDrag<R> {
    pub id: R,
    pub offset_x: i32,
    pub offset_y: i32,
    pub source: PointerSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState<R> {
    Idle,
    Dragging(ActiveDrag<R>),
}

impl<R> Default for GestureState<R> {
    fn default() -> Self {
        GestureState::Idle
    }
}

/// Drag gesture state machine: `Idle -> Dragging -> Idle`.
#[derive(Debug)]
pub struct PointerTracker<R> {
    state: GestureState<R>,
}

impl<R> Default for PointerTracker<R> {
    fn default() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }
}

impl<R: Copy + Eq + Debug> PointerTracker<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState<R> {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    pub fn dragging(&self) -> Option<R> {
        match self.state {
            GestureState::Dragging(drag) => Some(drag.id),
            GestureState::Idle => None,
        }
    }

    /// Start dragging `id` whose origin is at `origin`. Returns the stale
    /// gesture this one replaced, if the previous Up never arrived.
    pub fn begin(&mut self, id: R, origin: (i32, i32), pointer: &PointerEvent) -> Option<R> {
        let stale = self.cancel();
        let drag = ActiveDrag {
            id,
            offset_x: pointer.x - origin.0,
            offset_y: pointer.y - origin.1,
            source: pointer.source,
        };
        tracing::debug!(window_id = ?id, offset_x = drag.offset_x, offset_y = drag.offset_y, "drag started");
        self.state = GestureState::Dragging(drag);
        stale
    }

    /// Target origin for a move of the active gesture. Moves from another
    /// source, or while idle, yield nothing.
    pub fn update(&self, pointer: &PointerEvent) -> Option<(R, i32, i32)> {
        match self.state {
            GestureState::Dragging(drag) if drag.source == pointer.source => Some((
                drag.id,
                pointer.x - drag.offset_x,
                pointer.y - drag.offset_y,
            )),
            _ => None,
        }
    }

    /// End the gesture on Up from its own source or on Cancel from any
    /// source. Returns the window that was being dragged.
    pub fn finish(&mut self, pointer: &PointerEvent) -> Option<R> {
        let ends = match (self.state, pointer.phase) {
            (GestureState::Dragging(drag), PointerPhase::Up) => drag.source == pointer.source,
            (GestureState::Dragging(_), PointerPhase::Cancel) => true,
            _ => false,
        };
        if ends { self.cancel() } else { None }
    }

    pub fn cancel(&mut self) -> Option<R> {
        match std::mem::take(&mut self.state) {
            GestureState::Dragging(drag) => {
                tracing::debug!(window_id = ?drag.id, "drag ended");
                Some(drag.id)
            }
            GestureState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn ptr(phase: PointerPhase, x: i32, y: i32) -> PointerEvent {
        PointerEvent::new(phase, x, y, PointerSource::Mouse)
    }

    #[test]
    fn drag_keeps_grab_offset() {
        let mut tracker = PointerTracker::new();
        tracker.begin(7u8, (100, 50), &ptr(PointerPhase::Down, 140, 90));
        assert_eq!(
            tracker.update(&ptr(PointerPhase::Move, 120, 130)),
            Some((7, 80, 90))
        );
        assert_eq!(tracker.finish(&ptr(PointerPhase::Up, 120, 130)), Some(7));
        assert_eq!(tracker.update(&ptr(PointerPhase::Move, 10, 10)), None);
    }

    #[test]
    fn new_down_replaces_stale_gesture() {
        let mut tracker = PointerTracker::new();
        tracker.begin(1u8, (0, 0), &ptr(PointerPhase::Down, 2, 0));
        let stale = tracker.begin(2u8, (10, 10), &ptr(PointerPhase::Down, 12, 10));
        assert_eq!(stale, Some(1));
        assert_eq!(tracker.dragging(), Some(2));
    }

    #[test]
    fn other_source_is_ignored_except_cancel() {
        let mut tracker = PointerTracker::new();
        tracker.begin(1u8, (0, 0), &ptr(PointerPhase::Down, 2, 0));
        let touch_move = PointerEvent::new(PointerPhase::Move, 5, 5, PointerSource::Touch);
        let touch_up = PointerEvent::new(PointerPhase::Up, 5, 5, PointerSource::Touch);
        assert_eq!(tracker.update(&touch_move), None);
        assert_eq!(tracker.finish(&touch_up), None);
        assert!(tracker.is_dragging());
        let cancel = PointerEvent::new(PointerPhase::Cancel, 0, 0, PointerSource::Touch);
        assert_eq!(tracker.finish(&cancel), Some(1));
        assert_eq!(tracker.state(), GestureState::Idle);
    }

    #[test]
    fn normalizer_keeps_left_button_only() {
        let mut norm = PointerNormalizer::new();
        assert_eq!(
            norm.normalize(&mouse(MouseEventKind::Down(MouseButton::Right), 1, 1)),
            None
        );
        assert_eq!(
            norm.normalize(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 4)),
            Some(ptr(PointerPhase::Down, 3, 4))
        );
        assert_eq!(
            norm.normalize(&mouse(MouseEventKind::Drag(MouseButton::Left), 5, 4)),
            Some(ptr(PointerPhase::Move, 5, 4))
        );
        assert_eq!(norm.normalize(&mouse(MouseEventKind::ScrollUp, 5, 4)), None);
    }

    #[test]
    fn normalizer_synthesizes_up_for_lost_release() {
        let mut norm = PointerNormalizer::new();
        norm.normalize(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 4));
        assert_eq!(
            norm.normalize(&mouse(MouseEventKind::Moved, 6, 6)),
            Some(ptr(PointerPhase::Up, 6, 6))
        );
        assert_eq!(norm.normalize(&mouse(MouseEventKind::Moved, 7, 7)), None);
    }

    #[test]
    fn focus_loss_cancels_only_while_pressed() {
        let mut norm = PointerNormalizer::new();
        assert_eq!(norm.normalize(&Event::FocusLost), None);
        norm.normalize(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 4));
        let cancel = norm.normalize(&Event::FocusLost).map(|p| p.phase);
        assert_eq!(cancel, Some(PointerPhase::Cancel));
    }

    #[test]
    fn touch_follows_primary_finger() {
        let mut norm = PointerNormalizer::new();
        let start = |id| TouchEvent {
            id,
            phase: TouchPhase::Start,
            x: 1,
            y: 1,
        };
        assert!(norm.normalize_touch(&start(1)).is_some());
        assert!(norm.normalize_touch(&start(2)).is_none());
        let second_move = TouchEvent {
            id: 2,
            phase: TouchPhase::Move,
            x: 9,
            y: 9,
        };
        assert!(norm.normalize_touch(&second_move).is_none());
        let end = TouchEvent {
            id: 1,
            phase: TouchPhase::End,
            x: 4,
            y: 4,
        };
        assert_eq!(
            norm.normalize_touch(&end),
            Some(PointerEvent::new(PointerPhase::Up, 4, 4, PointerSource::Touch))
        );
        assert!(norm.normalize_touch(&start(2)).is_some());
    }
}
