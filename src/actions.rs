use std::fmt;

/// Externally invokable window commands. Each maps 1:1 onto a
/// [`WindowManager`](crate::window::WindowManager) operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command<R> {
    Open(R),
    Close(R),
    Minimize(R),
    MaximizeToggle(R),
    Focus(R),
    OpenAll,
    CloseAll,
}

impl<R: fmt::Debug> fmt::Display for Command<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Open(id) => write!(f, "open {id:?}"),
            Command::Close(id) => write!(f, "close {id:?}"),
            Command::Minimize(id) => write!(f, "minimize {id:?}"),
            Command::MaximizeToggle(id) => write!(f, "maximize-toggle {id:?}"),
            Command::Focus(id) => write!(f, "focus {id:?}"),
            Command::OpenAll => write!(f, "open-all"),
            Command::CloseAll => write!(f, "close-all"),
        }
    }
}
