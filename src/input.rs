//! Input collection
//!
//! Browser events arrive at arbitrary times; the simulation wants one
//! [`TickInput`] per fixed step. [`InputState`] sits in between: held
//! directions persist, presses are latched until the next tick consumes
//! them, and on-screen touch buttons hold their direction for a short while.

use crate::consts::TOUCH_HOLD_MS;
use crate::ms_to_ticks;
use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Jump,
    /// Start or restart a run
    Start,
    /// Back to the title screen
    Menu,
}

/// Map a `KeyboardEvent.code` to a game key
pub fn key_from_code(code: &str) -> Option<Key> {
    match code {
        "ArrowLeft" => Some(Key::Left),
        "ArrowRight" => Some(Key::Right),
        "Space" | "ArrowUp" => Some(Key::Jump),
        "Enter" | "NumpadEnter" => Some(Key::Start),
        "Escape" => Some(Key::Menu),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    left_held: bool,
    right_held: bool,
    /// Remaining touch hold per direction, in ticks
    touch_left: u64,
    touch_right: u64,
    jump: bool,
    start: bool,
    menu: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press; auto-repeat never re-triggers a jump
    pub fn key_down(&mut self, key: Key, repeat: bool) {
        match key {
            Key::Left => self.left_held = true,
            Key::Right => self.right_held = true,
            Key::Jump if !repeat => self.jump = true,
            Key::Jump => {}
            Key::Start => self.start = true,
            Key::Menu => self.menu = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left_held = false,
            Key::Right => self.right_held = false,
            Key::Jump | Key::Start | Key::Menu => {}
        }
    }

    /// On-screen direction button tapped
    pub fn touch_move(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.touch_left = ms_to_ticks(TOUCH_HOLD_MS),
            Direction::Right => self.touch_right = ms_to_ticks(TOUCH_HOLD_MS),
        }
    }

    /// On-screen jump button tapped
    pub fn touch_jump(&mut self) {
        self.jump = true;
    }

    /// Start button clicked
    pub fn request_start(&mut self) {
        self.start = true;
    }

    /// Menu button clicked
    pub fn request_menu(&mut self) {
        self.menu = true;
    }

    /// Input for the next tick
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.left_held || self.touch_left > 0,
            right: self.right_held || self.touch_right > 0,
            jump: self.jump,
            start: self.start,
            menu: self.menu,
        }
    }

    /// Clear one-shot presses and run down touch holds after a tick
    pub fn after_tick(&mut self) {
        self.jump = false;
        self.start = false;
        self.menu = false;
        self.touch_left = self.touch_left.saturating_sub(1);
        self.touch_right = self.touch_right.saturating_sub(1);
    }

    /// Drop everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(key_from_code("Space"), Some(Key::Jump));
        assert_eq!(key_from_code("Enter"), Some(Key::Start));
        assert_eq!(key_from_code("Escape"), Some(Key::Menu));
        assert_eq!(key_from_code("KeyQ"), None);
    }

    #[test]
    fn test_held_keys_persist_across_ticks() {
        let mut input = InputState::new();
        input.key_down(Key::Right, false);
        for _ in 0..10 {
            assert!(input.snapshot().right);
            input.after_tick();
        }
        input.key_up(Key::Right);
        assert!(!input.snapshot().right);
    }

    #[test]
    fn test_jump_is_one_shot() {
        let mut input = InputState::new();
        input.key_down(Key::Jump, false);
        assert!(input.snapshot().jump);
        input.after_tick();
        assert!(!input.snapshot().jump);

        // Held key auto-repeat
        input.key_down(Key::Jump, true);
        assert!(!input.snapshot().jump);
    }

    #[test]
    fn test_touch_hold_expires() {
        let mut input = InputState::new();
        input.touch_move(Direction::Left);
        // 100ms is six ticks at 60Hz
        for _ in 0..6 {
            assert!(input.snapshot().left);
            input.after_tick();
        }
        assert!(!input.snapshot().left);
    }

    #[test]
    fn test_both_directions_reported() {
        let mut input = InputState::new();
        input.key_down(Key::Left, false);
        input.touch_move(Direction::Right);
        let snap = input.snapshot();
        assert!(snap.left && snap.right);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut input = InputState::new();
        input.key_down(Key::Left, false);
        input.key_down(Key::Start, false);
        input.touch_move(Direction::Right);
        input.clear();
        let snap = input.snapshot();
        assert!(!snap.left && !snap.right && !snap.start);
    }
}
