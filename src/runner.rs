use std::fmt::Debug;
use std::io;
use std::time::{Duration, Instant};

use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::desktop::Desktop;
use crate::drivers::InputDriver;
use crate::event_loop::{ControlFlow, EventLoop};
use crate::ui::UiFrame;

/// An application hosted on a [`Desktop`]. The app owns the desktop and
/// draws window content; the runner feeds it input and idle ticks.
pub trait DesktopApp {
    type Id: Copy + Eq + Ord + Debug;

    fn desktop(&mut self) -> &mut Desktop<Self::Id>;

    /// Draw one frame, typically `Desktop::render` with a content callback.
    fn draw(&mut self, frame: &mut UiFrame<'_>);

    /// Idle work. Apps whose window content changes on its own override
    /// this to request a redraw.
    fn tick(&mut self, now: Instant) {
        self.desktop().tick(now);
    }
}

pub fn run_desktop<B, D, A>(
    terminal: &mut Terminal<B>,
    driver: &mut D,
    app: &mut A,
    poll_interval: Duration,
) -> io::Result<()>
where
    B: Backend,
    D: InputDriver,
    A: DesktopApp,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;

    let result = event_loop.run(|_driver, event| {
        match event {
            Some(evt) => {
                app.desktop().handle_event(&evt);
            }
            None => {
                app.tick(Instant::now());
                if app.desktop().needs_redraw() {
                    terminal
                        .draw(|frame| {
                            let mut ui = UiFrame::new(frame);
                            app.draw(&mut ui);
                        })
                        .map_err(|e| io::Error::other(e.to_string()))?;
                }
            }
        }
        if app.desktop().quit_requested() {
            Ok(ControlFlow::Quit)
        } else {
            Ok(ControlFlow::Continue)
        }
    });

    event_loop.driver().set_mouse_capture(false)?;
    result
}

/// Run `body` on `state` between `enter` and `leave`. `leave` runs whether
/// `enter` or `body` failed or not, so a half-entered terminal mode is
/// always undone. The first error wins.
pub fn run_guarded<S, T>(
    state: &mut S,
    enter: impl FnOnce(&mut S) -> io::Result<()>,
    body: impl FnOnce(&mut S) -> io::Result<T>,
    leave: impl FnOnce(&mut S) -> io::Result<()>,
) -> io::Result<T> {
    let result = enter(state).and_then(|()| body(state));
    let left = leave(state);
    let value = result?;
    left?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_runs_when_enter_fails() {
        let mut steps: Vec<&str> = Vec::new();
        let result = run_guarded(
            &mut steps,
            |steps| {
                steps.push("enter");
                Err(io::Error::other("no tty"))
            },
            |steps| {
                steps.push("body");
                Ok(())
            },
            |steps| {
                steps.push("leave");
                Ok(())
            },
        );
        assert_eq!(result.unwrap_err().to_string(), "no tty");
        assert_eq!(steps, vec!["enter", "leave"]);
    }

    #[test]
    fn body_error_wins_over_leave_error() {
        let mut left = false;
        let result: io::Result<()> = run_guarded(
            &mut left,
            |_| Ok(()),
            |_| Err(io::Error::other("body")),
            |left| {
                *left = true;
                Err(io::Error::other("leave"))
            },
        );
        assert!(left);
        assert_eq!(result.unwrap_err().to_string(), "body");
    }
}
