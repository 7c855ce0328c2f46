//! Shared crate-wide constants.

/// Minimum number of visible cells a window must keep within the viewport
/// when off-screen dragging is allowed, so the user can grab its title bar
/// again.
pub const MIN_VISIBLE_MARGIN: u16 = 4;

/// Value the z-order counter starts from. The first focused window receives
/// `DEFAULT_INITIAL_Z + 1`.
pub const DEFAULT_INITIAL_Z: u64 = 100;

/// Rows reserved at the bottom of the terminal for the taskbar.
pub const TASKBAR_HEIGHT: u16 = 1;

/// Two title-bar clicks on the same window within this window toggle maximize.
pub const DOUBLE_CLICK_MS: u64 = 500;

/// Delay between windows opened by the start menu's "Open All".
pub const DEFAULT_STAGGER_MS: u64 = 120;

/// Idle poll interval of the event loop. Also the clock and stagger resolution.
pub const DEFAULT_TICK_MS: u64 = 50;

/// Lines retained by the in-memory log buffer.
pub const LOG_BUFFER_LINES: usize = 500;
