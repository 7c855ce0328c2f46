use std::collections::BTreeMap;
use std::fmt::Debug;

use super::Window;
use crate::error::DesktopError;

/// The static set of windows on a desktop, keyed by id.
///
/// Enumeration is always in definition order so views that list windows
/// (taskbar, start menu) stay stable while focus moves around.
#[derive(Debug, Clone)]
pub struct WindowRegistry<R: Copy + Eq + Ord> {
    windows: BTreeMap<R, Window>,
}

impl<R: Copy + Eq + Ord + Debug> Default for WindowRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Copy + Eq + Ord + Debug> WindowRegistry<R> {
    pub fn new() -> Self {
        Self {
            windows: BTreeMap::new(),
        }
    }

    pub fn define(
        &mut self,
        id: R,
        title: impl Into<String>,
        width: u16,
        height: u16,
    ) -> Result<(), DesktopError> {
        if self.windows.contains_key(&id) {
            return Err(DesktopError::DuplicateWindow(format!("{id:?}")));
        }
        let order = self.windows.len();
        self.windows
            .insert(id, Window::new(title.into(), width, height, order));
        Ok(())
    }

    /// Builder form of [`define`](Self::define).
    pub fn with_window(
        mut self,
        id: R,
        title: impl Into<String>,
        width: u16,
        height: u16,
    ) -> Result<Self, DesktopError> {
        self.define(id, title, width, height)?;
        Ok(self)
    }

    pub fn get(&self, id: R) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: R) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    pub fn contains(&self, id: R) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// All windows in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (R, &Window)> {
        let mut ordered: Vec<(R, &Window)> =
            self.windows.iter().map(|(id, window)| (*id, window)).collect();
        ordered.sort_by_key(|(_, window)| window.creation_order);
        ordered.into_iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (R, &mut Window)> {
        self.windows.iter_mut().map(|(id, window)| (*id, window))
    }

    pub fn ids(&self) -> Vec<R> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Ids of open windows (minimized included) in definition order.
    pub fn open_ids(&self) -> Vec<R> {
        self.iter()
            .filter(|(_, window)| window.is_open())
            .map(|(id, _)| id)
            .collect()
    }
}
