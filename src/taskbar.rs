//! The bottom bar: Start button, one button per open window and a clock.
//!
//! Nothing here holds window state. Buttons are recomputed from the
//! [`WindowManager`] every time they are drawn or hit-tested, so they can
//! never disagree with it.

use std::fmt::Debug;

use chrono::{DateTime, TimeZone};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::constants::TASKBAR_HEIGHT;
use crate::theme;
use crate::ui::{fill, rect_contains, safe_set_string, truncate_to_width};
use crate::window::WindowManager;

const START_LABEL: &str = "[Start]";
const MAX_BUTTON_WIDTH: u16 = 22;
const MIN_BUTTON_WIDTH: u16 = 6;
const TRAY_WIDTH: u16 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarButton<R> {
    pub id: R,
    pub title: String,
    pub pressed: bool,
    pub minimized: bool,
}

/// One button per open window, in definition order.
pub fn taskbar_buttons<R: Copy + Eq + Ord + Debug>(wm: &WindowManager<R>) -> Vec<TaskbarButton<R>> {
    wm.registry()
        .iter()
        .filter(|(_, window)| window.is_open())
        .map(|(id, window)| TaskbarButton {
            id,
            title: window.title().to_string(),
            pressed: wm.is_focused(id) && !window.is_minimized(),
            minimized: window.is_minimized(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarAction<R> {
    /// Raise the window, restoring it first if minimized.
    Focus(R),
    Minimize(R),
}

impl<R: Copy + Eq + Ord + Debug> TaskbarAction<R> {
    pub fn apply(self, wm: &mut WindowManager<R>) {
        match self {
            TaskbarAction::Focus(id) => wm.focus(id),
            TaskbarAction::Minimize(id) => wm.minimize(id),
        }
    }
}

/// What clicking a window's taskbar button does right now.
pub fn click_action<R: Copy + Eq + Ord + Debug>(
    wm: &WindowManager<R>,
    id: R,
) -> Option<TaskbarAction<R>> {
    let window = wm.window(id)?;
    if !window.is_open() {
        return None;
    }
    if window.is_minimized() {
        Some(TaskbarAction::Focus(id))
    } else if wm.is_focused(id) {
        Some(TaskbarAction::Minimize(id))
    } else {
        Some(TaskbarAction::Focus(id))
    }
}

pub fn clock_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%H:%M").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarHit<R> {
    Start,
    Window(R),
    Tray,
    Empty,
}

#[derive(Debug, Default)]
pub struct Taskbar {
    area: Rect,
}

impl Taskbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Reserve the bottom row(s) of `area` and return what is left for
    /// windows.
    pub fn split_area(&mut self, area: Rect) -> Rect {
        let height = TASKBAR_HEIGHT.min(area.height);
        self.area = Rect {
            x: area.x,
            y: area.y + area.height - height,
            width: area.width,
            height,
        };
        Rect {
            height: area.height - height,
            ..area
        }
    }

    pub fn start_button_rect(&self) -> Rect {
        let width = (START_LABEL.chars().count() as u16).min(self.area.width);
        Rect {
            x: self.area.x,
            y: self.area.y,
            width,
            height: self.area.height.min(1),
        }
    }

    fn tray_rect(&self) -> Rect {
        let width = TRAY_WIDTH.min(self.area.width.saturating_sub(self.start_button_rect().width));
        Rect {
            x: self.area.x + self.area.width - width,
            y: self.area.y,
            width,
            height: self.area.height.min(1),
        }
    }

    /// Button rectangles for the given projection. Buttons share the space
    /// between the Start button and the tray; those that do not fit at the
    /// minimum width are left out.
    fn button_rects<R>(&self, buttons: &[TaskbarButton<R>]) -> Vec<Rect> {
        if buttons.is_empty() || self.area.height == 0 {
            return Vec::new();
        }
        let start = self.start_button_rect();
        let left = start.x + start.width + 1;
        let right = self.tray_rect().x.saturating_sub(1);
        let room = right.saturating_sub(left);
        let each = (room / buttons.len() as u16).min(MAX_BUTTON_WIDTH);
        if each < MIN_BUTTON_WIDTH {
            let fit = (room / MIN_BUTTON_WIDTH) as usize;
            return (0..fit.min(buttons.len()))
                .map(|idx| Rect::new(left + MIN_BUTTON_WIDTH * idx as u16, self.area.y, MIN_BUTTON_WIDTH, 1))
                .collect();
        }
        (0..buttons.len())
            .map(|idx| Rect::new(left + each * idx as u16, self.area.y, each, 1))
            .collect()
    }

    pub fn hit_test<R: Copy + Eq + Ord + Debug>(
        &self,
        wm: &WindowManager<R>,
        column: u16,
        row: u16,
    ) -> Option<TaskbarHit<R>> {
        if !rect_contains(self.area, column, row) {
            return None;
        }
        if rect_contains(self.start_button_rect(), column, row) {
            return Some(TaskbarHit::Start);
        }
        if rect_contains(self.tray_rect(), column, row) {
            return Some(TaskbarHit::Tray);
        }
        let buttons = taskbar_buttons(wm);
        let hit = self
            .button_rects(&buttons)
            .into_iter()
            .zip(buttons.iter())
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map(|(_, button)| TaskbarHit::Window(button.id));
        Some(hit.unwrap_or(TaskbarHit::Empty))
    }

    pub fn render<R: Copy + Eq + Ord + Debug>(
        &self,
        buffer: &mut Buffer,
        wm: &WindowManager<R>,
        start_open: bool,
        clock: &str,
    ) {
        let area = self.area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        fill(buffer, area, theme::taskbar());
        let start = self.start_button_rect();
        safe_set_string(
            buffer,
            area,
            start.x,
            start.y,
            START_LABEL,
            theme::start_button(start_open),
        );

        let buttons = taskbar_buttons(wm);
        for (rect, button) in self.button_rects(&buttons).into_iter().zip(buttons.iter()) {
            let style = if button.pressed {
                theme::taskbar_button_pressed()
            } else if button.minimized {
                theme::taskbar_button_minimized()
            } else {
                theme::taskbar_button()
            };
            let inner = rect.width.saturating_sub(2) as usize;
            let label = format!("[{:<inner$}]", truncate_to_width(&button.title, inner));
            safe_set_string(buffer, area, rect.x, rect.y, &label, style);
        }

        let tray = self.tray_rect();
        if tray.width > 0 {
            let label = format!("│ {clock}");
            safe_set_string(buffer, area, tray.x, tray.y, &label, theme::tray());
        }
    }
}
