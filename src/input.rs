use std::collections::{HashMap, HashSet};

/// Keyboard keys, numbered like USB HID scancodes
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum KeyCode {
    Invalid = 0,
    KeyA = 4,
    KeyB = 5,
    KeyC = 6,
    KeyD = 7,
    KeyE = 8,
    KeyF = 9,
    KeyG = 10,
    KeyH = 11,
    KeyI = 12,
    KeyJ = 13,
    KeyK = 14,
    KeyL = 15,
    KeyM = 16,
    KeyN = 17,
    KeyO = 18,
    KeyP = 19,
    KeyQ = 20,
    KeyR = 21,
    KeyS = 22,
    KeyT = 23,
    KeyU = 24,
    KeyV = 25,
    KeyW = 26,
    KeyX = 27,
    KeyY = 28,
    KeyZ = 29,
    Return = 40,
    Escape = 41,
    BackSpace = 42,
    Tab = 43,
    Space = 44,
    Right = 79,
    Left = 80,
    Down = 81,
    Up = 82,
}

impl From<u8> for KeyCode {
    fn from(value: u8) -> Self {
        use KeyCode::*;

        const LETTERS: [KeyCode; 26] = [
            KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM, KeyN,
            KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
        ];

        match value {
            4..=29 => LETTERS[(value - 4) as usize],
            40 => Return,
            41 => Escape,
            42 => BackSpace,
            43 => Tab,
            44 => Space,
            79 => Right,
            80 => Left,
            81 => Down,
            82 => Up,
            _ => Invalid,
        }
    }
}

/// ActionId represent a player's action
#[derive(Hash, PartialEq, Eq, Debug, Clone, Copy)]
pub struct ActionId(pub u8);

/// KeyState
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct KeyState(pub f32);

impl KeyState {
    /// Down state
    pub fn down() -> Self {
        Self(1.0)
    }

    /// Up state
    pub fn up() -> Self {
        Self(0.0)
    }

    /// Key is up
    pub fn is_up(&self) -> bool {
        self.0 == 0.0
    }

    /// Key is down
    pub fn is_down(&self) -> bool {
        self.0 != 0.0
    }
}

/// Manage input state
#[derive(Default)]
pub struct InputState {
    bindings: HashMap<KeyCode, ActionId>,
    expected: HashMap<ActionId, KeyCode>,
    actions_state: HashMap<ActionId, KeyState>,
    actions_pressed: HashSet<ActionId>,
    actions_released: HashSet<ActionId>,
}

impl InputState {
    pub(crate) fn set_input_state(&mut self, key: KeyCode, state: KeyState) {
        if key == KeyCode::Invalid {
            log::warn!("Invalid input button");
            return;
        }

        let Some(action) = self.bindings.get(&key) else {
            return;
        };

        // while one key holds an action, other keys bound to it are ignored
        let expected = self.expected.get(action);
        if expected.is_none() || expected.is_some_and(|e| *e == key) {
            let current = self.actions_state.get(action).cloned().unwrap_or_default();
            if state.is_down() && current.is_up() {
                self.actions_pressed.insert(*action);
                self.expected.insert(*action, key);
            } else if state.is_up() && current.is_down() {
                self.actions_released.insert(*action);
                self.expected.remove(action);
            }
            self.actions_state.insert(*action, state);
        }
    }

    /// Bind a keycode to an action
    pub fn bind(&mut self, code: KeyCode, action: ActionId) {
        if code == KeyCode::Invalid {
            log::warn!("bind: Invalid key code");
            return;
        }
        self.actions_state.insert(action, KeyState::default());
        self.bindings.insert(code, action);
    }

    /// Get action of a keycode
    pub fn action_for_keycode(&self, code: KeyCode) -> Option<&ActionId> {
        self.bindings.get(&code)
    }

    /// Unbind all KeyCode
    pub fn unbind_all(&mut self) {
        self.bindings.clear();
    }

    /// Get key state
    pub fn get_state(&self, action: &ActionId) -> Option<&KeyState> {
        self.actions_state.get(action)
    }

    /// Key is held down
    pub fn pressed(&self, action: &ActionId) -> bool {
        self.get_state(action).is_some_and(|s| s.is_down())
    }

    /// Key is up
    pub fn released(&self, action: &ActionId) -> bool {
        self.get_state(action).map(|s| s.is_up()).unwrap_or(true)
    }

    /// Key went down this frame
    pub fn just_pressed(&self, action: &ActionId) -> bool {
        self.actions_pressed.contains(action)
    }

    /// Key went up this frame
    pub fn just_released(&self, action: &ActionId) -> bool {
        self.actions_released.contains(action)
    }

    /// Clear per-frame state
    pub fn clear(&mut self) {
        self.actions_pressed.clear();
        self.actions_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JUMP: ActionId = ActionId(1);

    #[test]
    fn test_keycode_from_scancode_number() {
        assert_eq!(KeyCode::from(4), KeyCode::KeyA);
        assert_eq!(KeyCode::from(12), KeyCode::KeyI);
        assert_eq!(KeyCode::from(29), KeyCode::KeyZ);
        assert_eq!(KeyCode::from(41), KeyCode::Escape);
        assert_eq!(KeyCode::from(82), KeyCode::Up);
        assert_eq!(KeyCode::from(30), KeyCode::Invalid);
        assert_eq!(KeyCode::from(255), KeyCode::Invalid);
    }

    #[test]
    fn test_press_and_release() {
        let mut input = InputState::default();
        input.bind(KeyCode::Space, JUMP);
        assert!(input.released(&JUMP));

        input.set_input_state(KeyCode::Space, KeyState::down());
        assert!(input.pressed(&JUMP));
        assert!(input.just_pressed(&JUMP));

        input.clear();
        assert!(input.pressed(&JUMP));
        assert!(!input.just_pressed(&JUMP));

        // key repeat does not count as a new press
        input.set_input_state(KeyCode::Space, KeyState::down());
        assert!(!input.just_pressed(&JUMP));

        input.set_input_state(KeyCode::Space, KeyState::up());
        assert!(input.released(&JUMP));
        assert!(input.just_released(&JUMP));
    }

    #[test]
    fn test_second_key_ignored_while_first_held() {
        let mut input = InputState::default();
        input.bind(KeyCode::Space, JUMP);
        input.bind(KeyCode::KeyW, JUMP);

        input.set_input_state(KeyCode::Space, KeyState::down());
        input.set_input_state(KeyCode::KeyW, KeyState::up());
        assert!(input.pressed(&JUMP));

        input.set_input_state(KeyCode::Space, KeyState::up());
        assert!(input.released(&JUMP));
    }

    #[test]
    fn test_unbound_key() {
        let mut input = InputState::default();
        input.set_input_state(KeyCode::KeyQ, KeyState::down());
        assert!(input.action_for_keycode(KeyCode::KeyQ).is_none());
        assert!(!input.pressed(&JUMP));
    }
}
