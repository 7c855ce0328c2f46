use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;

use super::FloatRect;
use crate::theme;
use crate::ui::{fill, safe_set_string, truncate_to_width};

/// What a pointer press on a window's chrome means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    None,
    Drag,
    Minimize,
    Maximize,
    Close,
}

/// Draws window chrome and answers which part of it sits under the pointer.
///
/// Rendering happens in window-local coordinates: `area` starts at 0,0 and
/// has the window's full size. The compositor moves the result into place.
pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(
        &self,
        buffer: &mut Buffer,
        area: Rect,
        title: &str,
        focused: bool,
        maximized: bool,
    );

    fn hit_test(&self, rect: FloatRect, x: i32, y: i32) -> HeaderAction;

    /// Region left for the application inside the chrome.
    fn content_area(&self, area: Rect) -> Rect;
}

const BUTTON_WIDTH: u16 = 3;
const CONTROLS_WIDTH: u16 = BUTTON_WIDTH * 3;

/// Title bar on the first row with minimize/maximize/close buttons at the
/// right, single-line border around the body.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassicDecorator;

impl ClassicDecorator {
    /// Local x of the first control button, if the window is wide enough to
    /// show them next to a title cell.
    fn controls_x(width: u16) -> Option<u16> {
        let x = width.checked_sub(CONTROLS_WIDTH + 1)?;
        (x >= 2).then_some(x)
    }
}

impl WindowDecorator for ClassicDecorator {
    fn render_window(
        &self,
        buffer: &mut Buffer,
        area: Rect,
        title: &str,
        focused: bool,
        maximized: bool,
    ) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let header_style = if focused {
            theme::title_active()
        } else {
            theme::title_inactive()
        };
        fill(buffer, area, theme::window_body());
        fill(
            buffer,
            Rect {
                height: 1,
                ..area
            },
            header_style,
        );

        let title_room = match Self::controls_x(area.width) {
            Some(x) => x.saturating_sub(1),
            None => area.width.saturating_sub(1),
        };
        let label = truncate_to_width(title, title_room as usize);
        safe_set_string(buffer, area, area.x + 1, area.y, &label, header_style);

        if let Some(cx) = Self::controls_x(area.width) {
            let max_label = if maximized { "[v]" } else { "[^]" };
            let style = theme::control_button();
            for (idx, label) in ["[_]", max_label, "[X]"].into_iter().enumerate() {
                let x = area.x + cx + BUTTON_WIDTH * idx as u16;
                safe_set_string(buffer, area, x, area.y, label, style);
            }
        }

        if area.height < 2 {
            return;
        }
        let border = theme::window_border();
        let left = area.x;
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;
        for y in area.y + 1..bottom {
            safe_set_string(buffer, area, left, y, "│", border);
            safe_set_string(buffer, area, right, y, "│", border);
        }
        for x in left..=right {
            let symbol = if x == left {
                "└"
            } else if x == right {
                "┘"
            } else {
                "─"
            };
            safe_set_string(buffer, area, x, bottom, symbol, border);
        }
    }

    fn hit_test(&self, rect: FloatRect, x: i32, y: i32) -> HeaderAction {
        if !rect.contains(x, y) || y != rect.y {
            return HeaderAction::None;
        }
        let local_x = x - rect.x;
        if let Some(cx) = Self::controls_x(rect.width) {
            let cx = i32::from(cx);
            let button = i32::from(BUTTON_WIDTH);
            if local_x >= cx && local_x < cx + i32::from(CONTROLS_WIDTH) {
                return match (local_x - cx) / button {
                    0 => HeaderAction::Minimize,
                    1 => HeaderAction::Maximize,
                    _ => HeaderAction::Close,
                };
            }
        }
        HeaderAction::Drag
    }

    fn content_area(&self, area: Rect) -> Rect {
        Rect {
            x: area.x.saturating_add(1),
            y: area.y.saturating_add(1),
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        }
    }
}
