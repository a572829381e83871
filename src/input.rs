//! Keyboard mapping
//!
//! The simulation only sees the resolved [`Controls`]; raw key names stop here.

use serde::{Deserialize, Serialize};

/// A logical key binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    /// Shell command, not a held control
    Pause,
}

impl Action {
    /// Map a DOM `KeyboardEvent.key` name
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Action::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(Action::MoveRight),
            "ArrowUp" | "w" | "W" | " " => Some(Action::Jump),
            "Escape" => Some(Action::Pause),
            _ => None,
        }
    }
}

/// Held movement controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl Controls {
    /// -1, 0 or +1. Right wins when both directions are held.
    #[inline]
    pub fn horizontal(&self) -> f32 {
        if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        }
    }

    /// Apply a press or release. Returns false for actions that are not
    /// held controls.
    pub fn set(&mut self, action: Action, pressed: bool) -> bool {
        match action {
            Action::MoveLeft => self.left = pressed,
            Action::MoveRight => self.right = pressed,
            Action::Jump => self.jump = pressed,
            Action::Pause => return false,
        }
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Action::from_key("ArrowLeft"), Some(Action::MoveLeft));
        assert_eq!(Action::from_key("a"), Some(Action::MoveLeft));
        assert_eq!(Action::from_key("d"), Some(Action::MoveRight));
        assert_eq!(Action::from_key("ArrowUp"), Some(Action::Jump));
        assert_eq!(Action::from_key("w"), Some(Action::Jump));
        assert_eq!(Action::from_key(" "), Some(Action::Jump));
        assert_eq!(Action::from_key("Escape"), Some(Action::Pause));
        assert_eq!(Action::from_key("ArrowDown"), None);
        assert_eq!(Action::from_key("Enter"), None);
    }

    #[test]
    fn test_right_wins_over_left() {
        let mut controls = Controls::default();
        assert_eq!(controls.horizontal(), 0.0);

        controls.set(Action::MoveLeft, true);
        assert_eq!(controls.horizontal(), -1.0);
        controls.set(Action::MoveRight, true);
        assert_eq!(controls.horizontal(), 1.0);
        controls.set(Action::MoveRight, false);
        assert_eq!(controls.horizontal(), -1.0);
    }

    #[test]
    fn test_pause_is_not_a_control() {
        let mut controls = Controls::default();
        assert!(!controls.set(Action::Pause, true));
        assert_eq!(controls, Controls::default());

        assert!(controls.set(Action::Jump, true));
        controls.clear();
        assert!(!controls.jump);
    }
}
