//! Held movement keys
//!
//! Raw key events only flip membership: press sets, release clears. Auto-repeat
//! presses are harmless because setting an already-held direction is a no-op.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical movement directions on the XZ plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Away from the camera (-z)
    Forward,
    /// Toward the camera (+z)
    Back,
    /// -x
    Left,
    /// +x
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Back,
        Direction::Left,
        Direction::Right,
    ];

    /// Map a DOM `KeyboardEvent.key` value to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => return Some(Direction::Forward),
            "ArrowDown" => return Some(Direction::Back),
            "ArrowLeft" => return Some(Direction::Left),
            "ArrowRight" => return Some(Direction::Right),
            _ => {}
        }
        match key.to_ascii_lowercase().as_str() {
            "w" => Some(Direction::Forward),
            "s" => Some(Direction::Back),
            "a" => Some(Direction::Left),
            "d" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit step on the XZ plane (x, z)
    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Forward => Vec2::new(0.0, -1.0),
            Direction::Back => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    fn bit(&self) -> u8 {
        match self {
            Direction::Forward => 1,
            Direction::Back => 1 << 1,
            Direction::Left => 1 << 2,
            Direction::Right => 1 << 3,
        }
    }
}

/// Set of currently held directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    held: u8,
}

impl InputState {
    pub fn press(&mut self, dir: Direction) {
        self.held |= dir.bit();
    }

    pub fn release(&mut self, dir: Direction) {
        self.held &= !dir.bit();
    }

    /// Set or clear a direction
    pub fn set(&mut self, dir: Direction, down: bool) {
        if down {
            self.press(dir);
        } else {
            self.release(dir);
        }
    }

    /// Feed a raw key event; returns true if the key is a movement key
    pub fn handle_key(&mut self, key: &str, down: bool) -> bool {
        match Direction::from_key(key) {
            Some(dir) => {
                self.set(dir, down);
                true
            }
            None => false,
        }
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        self.held & dir.bit() != 0
    }

    pub fn any(&self) -> bool {
        self.held != 0
    }

    /// Release everything (focus loss)
    pub fn clear(&mut self) {
        self.held = 0;
    }

    /// Per-tick displacement: each held direction adds `speed` on its axis
    ///
    /// Diagonals are not normalized, so they cover more ground per tick.
    pub fn displacement(&self, speed: f32) -> Vec2 {
        Direction::ALL
            .iter()
            .filter(|d| self.is_held(**d))
            .map(|d| d.unit() * speed)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Direction::from_key("w"), Some(Direction::Forward));
        assert_eq!(Direction::from_key("W"), Some(Direction::Forward));
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("d"), Some(Direction::Right));
        assert_eq!(Direction::from_key("Escape"), None);
        assert_eq!(Direction::from_key("arrowup"), None);
    }

    #[test]
    fn test_press_release_idempotent() {
        let mut input = InputState::default();
        input.press(Direction::Left);
        input.press(Direction::Left);
        assert!(input.is_held(Direction::Left));
        input.release(Direction::Left);
        assert!(!input.any());
        // Releasing an unheld key is fine
        input.release(Direction::Right);
        assert!(!input.any());
    }

    #[test]
    fn test_handle_key_reports_movement_keys() {
        let mut input = InputState::default();
        assert!(input.handle_key("s", true));
        assert!(!input.handle_key("Enter", true));
        assert!(input.is_held(Direction::Back));
        assert!(input.handle_key("ArrowDown", false));
        assert!(!input.is_held(Direction::Back));
    }

    #[test]
    fn test_diagonal_not_normalized() {
        let mut input = InputState::default();
        input.press(Direction::Forward);
        input.press(Direction::Right);
        assert_eq!(input.displacement(0.2), Vec2::new(0.2, -0.2));
    }

    #[test]
    fn test_opposites_cancel() {
        let mut input = InputState::default();
        input.press(Direction::Left);
        input.press(Direction::Right);
        assert_eq!(input.displacement(0.2), Vec2::ZERO);
        input.clear();
        assert_eq!(input.displacement(0.2), Vec2::ZERO);
    }
}
