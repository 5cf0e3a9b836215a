//! Input snapshot
//!
//! Device polling and debouncing happen in the host. The engine consumes one
//! immutable [`InputSnapshot`] per frame.

use crate::foundation::math::Vec2;

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

impl MouseButton {
    const fn mask(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 2,
            Self::Middle => 4,
        }
    }
}

/// Keyboard key
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Comma,
    Period,
    Minus,
    Equals,
    Semicolon,
    Apostrophe,
    Backslash,
    LeftBracket,
    RightBracket,
    Slash,
    Grave,
}

const LETTERS: [KeyCode; 26] = [
    KeyCode::A, KeyCode::B, KeyCode::C, KeyCode::D, KeyCode::E, KeyCode::F, KeyCode::G,
    KeyCode::H, KeyCode::I, KeyCode::J, KeyCode::K, KeyCode::L, KeyCode::M, KeyCode::N,
    KeyCode::O, KeyCode::P, KeyCode::Q, KeyCode::R, KeyCode::S, KeyCode::T, KeyCode::U,
    KeyCode::V, KeyCode::W, KeyCode::X, KeyCode::Y, KeyCode::Z,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Num0, KeyCode::Num1, KeyCode::Num2, KeyCode::Num3, KeyCode::Num4,
    KeyCode::Num5, KeyCode::Num6, KeyCode::Num7, KeyCode::Num8, KeyCode::Num9,
];

impl KeyCode {
    /// Printable character for this key on a US layout, if any
    pub fn to_char(self, shift: bool) -> Option<char> {
        if let Some(i) = LETTERS.iter().position(|&k| k == self) {
            let base = if shift { b'A' } else { b'a' };
            return Some(char::from(base + i as u8));
        }

        if let Some(i) = DIGITS.iter().position(|&k| k == self) {
            if shift {
                return Some([')', '!', '@', '#', '$', '%', '^', '&', '*', '('][i]);
            }
            return Some(char::from(b'0' + i as u8));
        }

        let pair = match self {
            Self::Space => (' ', ' '),
            Self::Comma => (',', '<'),
            Self::Period => ('.', '>'),
            Self::Minus => ('-', '_'),
            Self::Equals => ('=', '+'),
            Self::Semicolon => (';', ':'),
            Self::Apostrophe => ('\'', '"'),
            Self::Backslash => ('\\', '|'),
            Self::LeftBracket => ('[', '{'),
            Self::RightBracket => (']', '}'),
            Self::Slash => ('/', '?'),
            Self::Grave => ('`', '~'),
            _ => return None,
        };

        Some(if shift { pair.1 } else { pair.0 })
    }
}

/// Modifier keys state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held
    pub shift: bool,
    /// Control key is held
    pub ctrl: bool,
    /// Alt key is held
    pub alt: bool,
}

/// Input state for the current frame
#[derive(Debug, Clone)]
pub struct InputSnapshot {
    pointer: Vec2,
    prev_pointer: Vec2,
    buttons_pressed: u8,
    buttons_released: u8,
    buttons_down: u8,
    wheel_delta: Vec2,
    modifiers: Modifiers,
    keys_pressed: Vec<KeyCode>,
    keys_down: Vec<KeyCode>,
    pointer_in_frame: bool,
    clipboard: Option<String>,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            pointer: Vec2::zeros(),
            prev_pointer: Vec2::zeros(),
            buttons_pressed: 0,
            buttons_released: 0,
            buttons_down: 0,
            wheel_delta: Vec2::zeros(),
            modifiers: Modifiers::default(),
            keys_pressed: Vec::new(),
            keys_down: Vec::new(),
            pointer_in_frame: true,
            clipboard: None,
        }
    }
}

impl InputSnapshot {
    /// Snapshot with no input and the pointer at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a snapshot
    pub fn builder() -> InputSnapshotBuilder {
        InputSnapshotBuilder::default()
    }

    /// Snapshot for the next frame: held state carries over, edges reset
    pub fn next_frame(&self) -> InputSnapshotBuilder {
        InputSnapshotBuilder {
            snapshot: Self {
                prev_pointer: self.pointer,
                buttons_pressed: 0,
                buttons_released: 0,
                wheel_delta: Vec2::zeros(),
                keys_pressed: Vec::new(),
                clipboard: None,
                ..self.clone()
            },
        }
    }

    /// Pointer position in presentation (screen) space
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Pointer movement since the previous snapshot
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer - self.prev_pointer
    }

    /// Button went down this frame
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed & button.mask() != 0
    }

    /// Button is held
    pub fn is_held(&self, button: MouseButton) -> bool {
        self.buttons_down & button.mask() != 0
    }

    /// Button went up this frame
    pub fn is_released(&self, button: MouseButton) -> bool {
        self.buttons_released & button.mask() != 0
    }

    /// Wheel movement this frame (x, y)
    pub fn wheel_delta(&self) -> Vec2 {
        self.wheel_delta
    }

    /// Modifier keys
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Keys that went down this frame, in arrival order
    pub fn keys_pressed(&self) -> &[KeyCode] {
        &self.keys_pressed
    }

    /// Key went down this frame
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Key is held
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Pointer lies within the presentation area
    pub fn pointer_in_frame(&self) -> bool {
        self.pointer_in_frame
    }

    /// Clipboard text the host offers for paste this frame
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }
}

/// Builder for [`InputSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct InputSnapshotBuilder {
    snapshot: InputSnapshot,
}

impl InputSnapshotBuilder {
    /// Pointer position
    pub fn pointer(mut self, x: f32, y: f32) -> Self {
        self.snapshot.pointer = Vec2::new(x, y);
        self
    }

    /// Previous pointer position (defaults to the origin)
    pub fn prev_pointer(mut self, x: f32, y: f32) -> Self {
        self.snapshot.prev_pointer = Vec2::new(x, y);
        self
    }

    /// Button went down this frame (and is held)
    pub fn press(mut self, button: MouseButton) -> Self {
        self.snapshot.buttons_pressed |= button.mask();
        self.snapshot.buttons_down |= button.mask();
        self
    }

    /// Button is held without a new edge
    pub fn hold(mut self, button: MouseButton) -> Self {
        self.snapshot.buttons_down |= button.mask();
        self
    }

    /// Button went up this frame
    pub fn release(mut self, button: MouseButton) -> Self {
        self.snapshot.buttons_released |= button.mask();
        self.snapshot.buttons_down &= !button.mask();
        self
    }

    /// Wheel movement
    pub fn wheel(mut self, x: f32, y: f32) -> Self {
        self.snapshot.wheel_delta = Vec2::new(x, y);
        self
    }

    /// Modifier state
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.snapshot.modifiers = modifiers;
        self
    }

    /// Key went down this frame (and is held)
    pub fn key_press(mut self, key: KeyCode) -> Self {
        if !self.snapshot.keys_pressed.contains(&key) {
            self.snapshot.keys_pressed.push(key);
        }
        if !self.snapshot.keys_down.contains(&key) {
            self.snapshot.keys_down.push(key);
        }
        self
    }

    /// Key released
    pub fn key_release(mut self, key: KeyCode) -> Self {
        self.snapshot.keys_down.retain(|&k| k != key);
        self
    }

    /// Whether the pointer is inside the presentation area
    pub fn pointer_in_frame(mut self, inside: bool) -> Self {
        self.snapshot.pointer_in_frame = inside;
        self
    }

    /// Clipboard text offered for paste
    pub fn clipboard(mut self, text: impl Into<String>) -> Self {
        self.snapshot.clipboard = Some(text.into());
        self
    }

    /// Finish the snapshot
    pub fn build(self) -> InputSnapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_edges() {
        let frame = InputSnapshot::builder().press(MouseButton::Left).build();
        assert!(frame.is_pressed(MouseButton::Left));
        assert!(frame.is_held(MouseButton::Left));

        let frame = frame.next_frame().build();
        assert!(!frame.is_pressed(MouseButton::Left));
        assert!(frame.is_held(MouseButton::Left));

        let frame = frame.next_frame().release(MouseButton::Left).build();
        assert!(frame.is_released(MouseButton::Left));
        assert!(!frame.is_held(MouseButton::Left));
    }

    #[test]
    fn test_pointer_delta_carries_over() {
        let first = InputSnapshot::builder().pointer(10.0, 10.0).build();
        let second = first.next_frame().pointer(15.0, 4.0).build();
        assert_eq!(second.pointer_delta(), Vec2::new(5.0, -6.0));
    }

    #[test]
    fn test_key_to_char() {
        assert_eq!(KeyCode::A.to_char(false), Some('a'));
        assert_eq!(KeyCode::Z.to_char(true), Some('Z'));
        assert_eq!(KeyCode::Num3.to_char(false), Some('3'));
        assert_eq!(KeyCode::Num1.to_char(true), Some('!'));
        assert_eq!(KeyCode::Slash.to_char(true), Some('?'));
        assert_eq!(KeyCode::Left.to_char(false), None);
    }
}
