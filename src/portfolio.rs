//! The portfolio desktop shipped with the binary: its windows and what they
//! show.

use std::time::Instant;

use clap::ValueEnum;
use indoc::indoc;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::actions::Command;
use crate::config::DesktopConfig;
use crate::desktop::{Desktop, WindowDraw};
use crate::error::DesktopError;
use crate::keybindings::KeyBindings;
use crate::log_buffer::LogBuffer;
use crate::runner::DesktopApp;
use crate::theme;
use crate::ui::UiFrame;
use crate::window::{WindowManager, WindowRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum PortfolioWindow {
    About,
    Projects,
    Skills,
    Contact,
    Help,
    SystemLog,
}

impl PortfolioWindow {
    pub const ALL: [PortfolioWindow; 6] = [
        PortfolioWindow::About,
        PortfolioWindow::Projects,
        PortfolioWindow::Skills,
        PortfolioWindow::Contact,
        PortfolioWindow::Help,
        PortfolioWindow::SystemLog,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PortfolioWindow::About => "About Me",
            PortfolioWindow::Projects => "Projects",
            PortfolioWindow::Skills => "Skills",
            PortfolioWindow::Contact => "Contact",
            PortfolioWindow::Help => "Help",
            PortfolioWindow::SystemLog => "System Log",
        }
    }

    pub fn size(self) -> (u16, u16) {
        match self {
            PortfolioWindow::About => (44, 12),
            PortfolioWindow::Projects => (50, 14),
            PortfolioWindow::Skills => (36, 12),
            PortfolioWindow::Contact => (40, 9),
            PortfolioWindow::Help => (48, 19),
            PortfolioWindow::SystemLog => (64, 14),
        }
    }

    fn body(self) -> &'static str {
        match self {
            PortfolioWindow::About => indoc! {"
                Hi, I build small, sharp tools.

                This desktop runs entirely in your terminal.
                Drag windows by their title bar, double-click
                a title to maximize, and use the taskbar to
                switch between them.
            "},
            PortfolioWindow::Projects => indoc! {"
                * retro-desk: this desktop, in a terminal
                * a log shipper that fits in 2 MB of RAM
                * a tiny Forth for microcontrollers
                * static site generator with live reload

                Open \"Help\" from the Start menu for keys.
            "},
            PortfolioWindow::Skills => indoc! {"
                Languages   Rust, C, Python
                Systems     Linux, networking
                Tooling     CI, profiling
                Interfaces  TUIs, CLIs
            "},
            PortfolioWindow::Contact => indoc! {"
                mail    hello@example.com
                web     https://example.com
            "},
            PortfolioWindow::Help | PortfolioWindow::SystemLog => "",
        }
    }
}

pub fn portfolio_registry() -> Result<WindowRegistry<PortfolioWindow>, DesktopError> {
    let mut registry = WindowRegistry::new();
    for window in PortfolioWindow::ALL {
        let (width, height) = window.size();
        registry.define(window, window.title(), width, height)?;
    }
    Ok(registry)
}

#[derive(Debug)]
pub struct Portfolio {
    desktop: Desktop<PortfolioWindow>,
    log: LogBuffer,
    log_drawn: u64,
}

impl Portfolio {
    pub fn new(config: &DesktopConfig, log: LogBuffer) -> Result<Self, DesktopError> {
        let mut wm = WindowManager::with_initial_z(portfolio_registry()?, config.initial_z);
        wm.set_clamp_policy(config.clamp);
        let mut desktop = Desktop::new(wm).with_stagger(config.stagger);
        for window in &config.open_at_start {
            desktop.dispatch(Command::Open(*window));
        }
        tracing::info!(windows = PortfolioWindow::ALL.len(), "desktop ready");
        Ok(Self {
            desktop,
            log,
            log_drawn: 0,
        })
    }

    pub fn desktop_ref(&self) -> &Desktop<PortfolioWindow> {
        &self.desktop
    }
}

fn help_text(keys: &KeyBindings) -> Text<'static> {
    let mut lines = vec![
        Line::from("Mouse: drag title bars, click [_] [^] [X]."),
        Line::from("Double-click a title bar to maximize."),
        Line::from(""),
    ];
    for (action, combos) in keys.help_entries() {
        lines.push(Line::from(format!("{:<12} {action}", combos.join(", "))));
    }
    Text::from(lines)
}

fn draw_content(frame: &mut UiFrame<'_>, window: WindowDraw<PortfolioWindow>, keys: &KeyBindings, log: &LogBuffer) {
    let area = window.area;
    let text = match window.id {
        PortfolioWindow::Help => help_text(keys),
        PortfolioWindow::SystemLog => {
            let lines = log.tail(area.height as usize);
            if lines.is_empty() {
                Text::from("(no log output; see --log-file)")
            } else {
                Text::from(lines.into_iter().map(Line::from).collect::<Vec<_>>())
            }
        }
        other => Text::from(other.body()),
    };
    let paragraph = Paragraph::new(text).style(theme::window_body());
    let paragraph = if window.id == PortfolioWindow::SystemLog {
        paragraph
    } else {
        paragraph.wrap(Wrap { trim: false })
    };
    frame.render_widget(paragraph, area);
}

impl DesktopApp for Portfolio {
    type Id = PortfolioWindow;

    fn desktop(&mut self) -> &mut Desktop<PortfolioWindow> {
        &mut self.desktop
    }

    fn draw(&mut self, frame: &mut UiFrame<'_>) {
        self.log_drawn = self.log.written();
        let keys = self.desktop.key_bindings().clone();
        let log = &self.log;
        self.desktop
            .render(frame, |frame, window| draw_content(frame, window, &keys, log));
    }

    fn tick(&mut self, now: Instant) {
        self.desktop.tick(now);
        let log_visible = self
            .desktop
            .manager()
            .window(PortfolioWindow::SystemLog)
            .is_some_and(|w| w.is_visible());
        if log_visible && self.log.written() != self.log_drawn {
            self.desktop.request_redraw();
        }
    }
}
