use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    ToggleStartMenu,
    CloseMenu,
    // Start menu navigation
    MenuUp,
    MenuDown,
    MenuSelect,
    MenuNext, // 'j'
    MenuPrev, // 'k'
    // Focused window
    FocusNext,
    FocusPrev,
    CloseWindow,
    MinimizeWindow,
    MaximizeWindow,
}

impl Action {
    /// Every action, in the order the help window lists them.
    pub const ALL: [Action; 13] = [
        Action::ToggleStartMenu,
        Action::CloseMenu,
        Action::MenuUp,
        Action::MenuDown,
        Action::MenuNext,
        Action::MenuPrev,
        Action::MenuSelect,
        Action::FocusNext,
        Action::FocusPrev,
        Action::MinimizeWindow,
        Action::MaximizeWindow,
        Action::CloseWindow,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Shut down",
            Action::ToggleStartMenu => "Toggle start menu",
            Action::CloseMenu => "Close start menu",
            Action::MenuUp => "Menu up",
            Action::MenuDown => "Menu down",
            Action::MenuSelect => "Menu select",
            Action::MenuNext => "Menu next (j)",
            Action::MenuPrev => "Menu previous (k)",
            Action::FocusNext => "Focus next window",
            Action::FocusPrev => "Focus previous window",
            Action::CloseWindow => "Close window",
            Action::MinimizeWindow => "Minimize window",
            Action::MaximizeWindow => "Maximize / restore window",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        kb.add(
            ToggleStartMenu,
            KeyCombo::new(KeyCode::F(1), KeyModifiers::NONE),
        );
        kb.add(CloseMenu, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        // Start menu navigation
        kb.add(MenuUp, KeyCombo::new(KeyCode::Up, KeyModifiers::NONE));
        kb.add(MenuDown, KeyCombo::new(KeyCode::Down, KeyModifiers::NONE));
        kb.add(
            MenuSelect,
            KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE),
        );
        kb.add(
            MenuNext,
            KeyCombo::new(KeyCode::Char('j'), KeyModifiers::NONE),
        );
        kb.add(
            MenuPrev,
            KeyCombo::new(KeyCode::Char('k'), KeyModifiers::NONE),
        );
        // Window management
        kb.add(FocusNext, KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE));
        kb.add(
            FocusPrev,
            KeyCombo::new(KeyCode::BackTab, KeyModifiers::NONE),
        );
        kb.add(
            CloseWindow,
            KeyCombo::new(KeyCode::Char('w'), KeyModifiers::CONTROL),
        );
        kb.add(
            MinimizeWindow,
            KeyCombo::new(KeyCode::Char('n'), KeyModifiers::ALT),
        );
        kb.add(
            MaximizeWindow,
            KeyCombo::new(KeyCode::Char('x'), KeyModifiers::ALT),
        );
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    /// First action in [`Action::ALL`] order bound to `key`.
    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|action| self.matches(*action, key))
    }

    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        Action::ALL
            .into_iter()
            .filter_map(|action| {
                let combos = self.combos_for(action);
                (!combos.is_empty()).then_some((action, combos))
            })
            .collect()
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}
