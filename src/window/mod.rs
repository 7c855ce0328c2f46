pub mod decorator;
pub mod registry;

mod window_manager;

use ratatui::prelude::Rect;

/// Signed window origin with unsigned size, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(i32::from(self.width))
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(i32::from(self.height))
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// The part of this rect that lies inside `bounds`, or an empty rect.
    pub fn visible_in(&self, bounds: Rect) -> Rect {
        let left = self.x.max(i32::from(bounds.x));
        let top = self.y.max(i32::from(bounds.y));
        let right = self.right().min(i32::from(bounds.right()));
        let bottom = self.bottom().min(i32::from(bounds.bottom()));
        if right <= left || bottom <= top {
            return Rect::default();
        }
        Rect {
            x: left as u16,
            y: top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        }
    }
}

impl From<Rect> for FloatRect {
    fn from(rect: Rect) -> Self {
        Self {
            x: i32::from(rect.x),
            y: i32::from(rect.y),
            width: rect.width,
            height: rect.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Closed,
    Open,
}

pub use registry::WindowRegistry;
pub use window_manager::{ClampPolicy, WindowManager, WmEvent};

/// One desktop application panel. Defined once in a [`WindowRegistry`] and
/// only ever mutated by the [`WindowManager`].
#[derive(Debug, Clone)]
pub struct Window {
    title: String,
    rect: FloatRect,
    visibility: Visibility,
    minimized: bool,
    maximized: bool,
    // geometry before maximizing; restored verbatim on the second toggle
    restore_rect: Option<FloatRect>,
    z_order: Option<u64>,
    creation_order: usize,
    placed: bool,
}

impl Window {
    fn new(title: String, width: u16, height: u16, creation_order: usize) -> Self {
        Self {
            title,
            rect: FloatRect::new(0, 0, width, height),
            visibility: Visibility::Closed,
            minimized: false,
            maximized: false,
            restore_rect: None,
            z_order: None,
            creation_order,
            placed: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rect(&self) -> FloatRect {
        self.rect
    }

    pub fn position(&self) -> (i32, i32) {
        (self.rect.x, self.rect.y)
    }

    pub fn size(&self) -> (u16, u16) {
        (self.rect.width, self.rect.height)
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_open(&self) -> bool {
        self.visibility == Visibility::Open
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    /// Open and not minimized: drawn on the desktop and eligible for focus.
    pub fn is_visible(&self) -> bool {
        self.is_open() && !self.minimized
    }

    /// `None` until the window is focused for the first time.
    pub fn z_order(&self) -> Option<u64> {
        self.z_order
    }

    pub fn creation_order(&self) -> usize {
        self.creation_order
    }
}
