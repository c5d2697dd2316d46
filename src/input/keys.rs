//! Directional key state

use glam::Vec2;

/// A control direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a `KeyboardEvent.key` value (arrows and WASD) to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Which directions are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    fn slot(&mut self, dir: Direction) -> &mut bool {
        match dir {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Mark a direction held; true if it was not held before
    pub fn press(&mut self, dir: Direction) -> bool {
        let slot = self.slot(dir);
        let newly = !*slot;
        *slot = true;
        newly
    }

    pub fn release(&mut self, dir: Direction) {
        *self.slot(dir) = false;
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Sum of held directions (screen axes, +y down); diagonals are not
    /// renormalized
    pub fn target(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_aliases() {
        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(Direction::from_key("W"), Some(Direction::Up));
        assert_eq!(Direction::from_key("a"), Some(Direction::Left));
        assert_eq!(Direction::from_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(Direction::from_key("s"), Some(Direction::Down));
        assert_eq!(Direction::from_key("Enter"), None);
    }

    #[test]
    fn test_press_reports_transition() {
        let mut keys = KeyState::default();
        assert!(keys.press(Direction::Left));
        assert!(!keys.press(Direction::Left));
        keys.release(Direction::Left);
        assert!(!keys.any());
        assert!(keys.press(Direction::Left));
    }

    #[test]
    fn test_target_sums_directions() {
        let mut keys = KeyState::default();
        assert_eq!(keys.target(), Vec2::ZERO);

        keys.press(Direction::Up);
        keys.press(Direction::Right);
        assert_eq!(keys.target(), Vec2::new(1.0, -1.0));

        // Opposites cancel
        keys.press(Direction::Left);
        assert_eq!(keys.target(), Vec2::new(0.0, -1.0));
    }
}
