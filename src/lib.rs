pub mod actions;
pub mod config;
pub mod constants;
pub mod desktop;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod log_buffer;
pub mod pointer;
pub mod portfolio;
pub mod runner;
pub mod start_menu;
pub mod taskbar;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;
