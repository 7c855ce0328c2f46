use ratatui::style::{Color, Modifier, Style};

// Classic desktop palette. Everything goes through `rgb` so terminals
// without truecolor get the nearest xterm-256 entry instead.

pub const DESKTOP_RGB: (u8, u8, u8) = (0, 128, 128);
pub const NAVY_RGB: (u8, u8, u8) = (0, 0, 128);
pub const SILVER_RGB: (u8, u8, u8) = (192, 192, 192);
pub const GRAY_RGB: (u8, u8, u8) = (128, 128, 128);

pub fn rgb(color: (u8, u8, u8)) -> Color {
    let truecolor = std::env::var("COLORTERM")
        .map(|v| {
            let v = v.to_lowercase();
            v.contains("truecolor") || v.contains("24bit")
        })
        .unwrap_or(false);
    if truecolor {
        Color::Rgb(color.0, color.1, color.2)
    } else {
        Color::Indexed(xterm_index(color))
    }
}

fn xterm_index((r, g, b): (u8, u8, u8)) -> u8 {
    let cube = |v: u8| ((u16::from(v) * 5 + 127) / 255) as u8;
    16 + 36 * cube(r) + 6 * cube(g) + cube(b)
}

pub fn desktop_bg() -> Color {
    rgb(DESKTOP_RGB)
}

// Window chrome
pub fn title_active() -> Style {
    Style::default()
        .bg(rgb(NAVY_RGB))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}
pub fn title_inactive() -> Style {
    Style::default().bg(rgb(GRAY_RGB)).fg(rgb(SILVER_RGB))
}
pub fn window_body() -> Style {
    Style::default().bg(rgb(SILVER_RGB)).fg(Color::Black)
}
pub fn window_border() -> Style {
    Style::default().bg(rgb(SILVER_RGB)).fg(Color::DarkGray)
}
pub fn control_button() -> Style {
    Style::default().bg(rgb(SILVER_RGB)).fg(Color::Black)
}

// Taskbar
pub fn taskbar() -> Style {
    Style::default().bg(rgb(SILVER_RGB)).fg(Color::Black)
}
pub fn taskbar_button() -> Style {
    taskbar()
}
pub fn taskbar_button_pressed() -> Style {
    Style::default()
        .bg(rgb(GRAY_RGB))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}
pub fn taskbar_button_minimized() -> Style {
    taskbar().add_modifier(Modifier::DIM)
}
pub fn start_button(open: bool) -> Style {
    let style = taskbar().add_modifier(Modifier::BOLD);
    if open {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}
pub fn tray() -> Style {
    taskbar()
}

// Start menu
pub fn menu() -> Style {
    Style::default().bg(rgb(SILVER_RGB)).fg(Color::Black)
}
pub fn menu_selected() -> Style {
    Style::default().bg(rgb(NAVY_RGB)).fg(Color::White)
}
pub fn menu_banner() -> Style {
    Style::default()
        .bg(rgb(GRAY_RGB))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}
