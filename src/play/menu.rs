use std::fmt;

/// Entries of the in-game menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Close the menu
    Resume,
    /// Open the inventory overlay
    Inventory,
    /// Settings (placeholder)
    Settings,
    /// Leave the play view
    Exit,
}

impl MenuItem {
    /// All items, top to bottom
    pub const ALL: [MenuItem; 4] = [MenuItem::Resume, MenuItem::Inventory, MenuItem::Settings, MenuItem::Exit];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MenuItem::Resume => "Resume",
            MenuItem::Inventory => "Inventory",
            MenuItem::Settings => "Settings",
            MenuItem::Exit => "Exit",
        };
        f.write_str(name)
    }
}

/// Menu open state and stick-driven focus.
///
/// A push past the trigger threshold moves focus one item (wrapping) and
/// latches; the latch releases once `|dy|` falls below the re-arm threshold.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    open: bool,
    focus: usize,
    latched: bool,
}

impl Menu {
    /// Whether the menu is shown
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open or close; opening clears the latch
    pub fn set_open(&mut self, open: bool) {
        if open && !self.open {
            self.latched = false;
        }
        self.open = open;
    }

    /// Flip the open state
    pub fn toggle(&mut self) {
        self.set_open(!self.open);
    }

    /// Index of the focused item
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// The focused item
    pub fn focused(&self) -> MenuItem {
        MenuItem::ALL[self.focus % MenuItem::ALL.len()]
    }

    /// Feed one tick of vertical stick input. Returns whether focus moved.
    pub fn navigate(&mut self, dy: f32, trigger: f32, rearm: f32) -> bool {
        if dy.abs() < rearm {
            self.latched = false;
        }
        if self.latched {
            return false;
        }
        let n = MenuItem::ALL.len();
        if dy < -trigger {
            self.focus = (self.focus + n - 1) % n;
        } else if dy > trigger {
            self.focus = (self.focus + 1) % n;
        } else {
            return false;
        }
        self.latched = true;
        true
    }
}
