//! Keyboard shortcut registry and documentation.

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl/Cmd");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("A", true, false, "Select all rooms"),
            Shortcut::new("Delete", false, false, "Delete selected object or rooms"),
            Shortcut::new("Backspace", false, false, "Delete selected object or rooms"),
            Shortcut::new("ArrowUp", false, false, "Nudge selected rooms 5 cm"),
            Shortcut::new("ArrowDown", false, false, "Nudge selected rooms 5 cm"),
            Shortcut::new("ArrowLeft", false, false, "Nudge selected rooms 5 cm"),
            Shortcut::new("ArrowRight", false, false, "Nudge selected rooms 5 cm"),
            Shortcut::new("ArrowUp", false, true, "Nudge selected rooms 20 cm"),
            Shortcut::new("ArrowDown", false, true, "Nudge selected rooms 20 cm"),
            Shortcut::new("ArrowLeft", false, true, "Nudge selected rooms 20 cm"),
            Shortcut::new("ArrowRight", false, true, "Nudge selected rooms 20 cm"),
            Shortcut::new("M", false, false, "Toggle measurement tool"),
            Shortcut::new("Escape", false, false, "Exit tool or clear selection"),
        ]
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:24} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::{EditorCommand, Modifiers};

    #[test]
    fn test_every_shortcut_is_bound() {
        for shortcut in ShortcutRegistry::all() {
            let modifiers = Modifiers {
                ctrl: shortcut.ctrl,
                shift: shortcut.shift,
                ..Modifiers::NONE
            };
            assert!(
                EditorCommand::from_key(shortcut.key, modifiers).is_some(),
                "{} is not bound",
                shortcut.format()
            );
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("Z", true, true, "Redo").format(), "Ctrl/Cmd+Shift+Z");
        assert_eq!(Shortcut::new("Escape", false, false, "").format(), "Escape");
    }
}
