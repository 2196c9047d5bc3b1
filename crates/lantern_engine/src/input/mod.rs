//! Input polling types and edge detection
//!
//! The windowing collaborator exposes discrete key state only; anything
//! edge-triggered (like the flashlight toggle) is derived here by comparing
//! against the previous frame's state. The previous state is owned by the
//! polling loop, not by the object being toggled.

/// Discrete state of a key as reported by the windowing collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// The key is currently held down
    Pressed,
    /// The key is currently up
    Released,
}

/// Keys the engine polls each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// W key (camera forward)
    W,
    /// A key (camera strafe left)
    A,
    /// S key (camera backward)
    S,
    /// D key (camera strafe right)
    D,
    /// F key (flashlight toggle)
    F,
    /// Left shift (camera up)
    LeftShift,
    /// Left control (camera down)
    LeftControl,
    /// Escape key (close request)
    Escape,
    /// Number row 0 (post-processing effect selection)
    Num0,
    /// Number row 1
    Num1,
    /// Number row 2
    Num2,
    /// Number row 3
    Num3,
    /// Number row 4
    Num4,
    /// Number row 5
    Num5,
}

impl KeyCode {
    /// Map a digit to its number-row key, if one exists
    pub fn digit(value: usize) -> Option<Self> {
        match value {
            0 => Some(Self::Num0),
            1 => Some(Self::Num1),
            2 => Some(Self::Num2),
            3 => Some(Self::Num3),
            4 => Some(Self::Num4),
            5 => Some(Self::Num5),
            _ => None,
        }
    }
}

/// Press-then-release edge detector
///
/// `update` must be called exactly once per frame with the key's current
/// state. It reports `true` only on a PRESS-to-RELEASE transition, so a key
/// held across many polls fires once, on release.
#[derive(Debug, Clone)]
pub struct EdgeToggle {
    previous: KeyState,
}

impl EdgeToggle {
    /// Create a detector assuming the key starts released
    pub fn new() -> Self {
        Self {
            previous: KeyState::Released,
        }
    }

    /// Feed the current key state; returns whether the edge fired
    pub fn update(&mut self, current: KeyState) -> bool {
        let fired = self.previous == KeyState::Pressed && current == KeyState::Released;
        self.previous = current;
        fired
    }
}

impl Default for EdgeToggle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use KeyState::{Pressed, Released};

    #[test]
    fn fires_only_on_press_to_release() {
        let mut toggle = EdgeToggle::new();
        let sequence = [Pressed, Pressed, Released, Released, Pressed, Released];
        let fired: Vec<bool> = sequence.iter().map(|s| toggle.update(*s)).collect();
        assert_eq!(fired, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn holding_the_key_never_fires() {
        let mut toggle = EdgeToggle::new();
        for _ in 0..100 {
            assert!(!toggle.update(Pressed));
        }
        assert!(toggle.update(Released));
    }

    #[test]
    fn digit_mapping_covers_the_effect_range() {
        assert_eq!(KeyCode::digit(0), Some(KeyCode::Num0));
        assert_eq!(KeyCode::digit(5), Some(KeyCode::Num5));
        assert_eq!(KeyCode::digit(6), None);
    }
}
