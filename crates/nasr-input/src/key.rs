//! The fixed physical key-code space
//!
//! Every supported key has a stable index in `0..KEY_COUNT`. Variant names
//! match `winit::keyboard::KeyCode` so the platform mapping is one-to-one.

use winit::keyboard::KeyCode;

macro_rules! define_keys {
    ($($name:ident),+ $(,)?) => {
        /// A physical keyboard key, independent of layout
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum Key {
            $($name),+
        }

        impl Key {
            /// Every key, ordered by index
            pub const ALL: &'static [Key] = &[$(Key::$name),+];

            /// Stable key name (the variant name)
            pub fn name(self) -> &'static str {
                match self {
                    $(Key::$name => stringify!($name)),+
                }
            }

            /// Map a platform key code into the supported key space
            pub fn from_winit(code: KeyCode) -> Option<Key> {
                match code {
                    $(KeyCode::$name => Some(Key::$name),)+
                    _ => None,
                }
            }

            pub fn to_winit(self) -> KeyCode {
                match self {
                    $(Key::$name => KeyCode::$name),+
                }
            }
        }
    };
}

define_keys! {
    // Letters
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM,
    KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
    // Digit row
    Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    F13, F14, F15, F16, F17, F18, F19, F20, F21, F22, F23, F24,
    // Numpad
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4, Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    NumpadAdd, NumpadSubtract, NumpadMultiply, NumpadDivide, NumpadDecimal, NumpadEnter,
    NumpadEqual, NumpadComma, NumpadParenLeft, NumpadParenRight, NumLock,
    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown, Insert, Delete,
    // Control
    Escape, Enter, Tab, Backspace, Space, CapsLock, ScrollLock, PrintScreen, Pause,
    ContextMenu, Help, Fn, FnLock,
    // Modifiers
    ShiftLeft, ShiftRight, ControlLeft, ControlRight, AltLeft, AltRight, SuperLeft, SuperRight,
    // Punctuation
    Backquote, Backslash, BracketLeft, BracketRight, Comma, Equal, Minus, Period, Quote,
    Semicolon, Slash, IntlBackslash, IntlRo, IntlYen,
    // Editing
    Copy, Cut, Paste, Undo, Find,
    // Media and system
    MediaPlayPause, MediaStop, MediaTrackNext, MediaTrackPrevious,
    AudioVolumeUp, AudioVolumeDown, AudioVolumeMute,
    BrowserBack, BrowserForward, BrowserHome, BrowserRefresh, BrowserSearch,
    LaunchMail, LaunchApp1, LaunchApp2, Power, Sleep, WakeUp,
}

/// Number of keys in the supported key space
pub const KEY_COUNT: usize = Key::ALL.len();

impl Key {
    /// Stable index of this key in `0..KEY_COUNT`
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Option<Key> {
        Key::ALL.get(index as usize).copied()
    }

    /// Look a key up by name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Key> {
        Key::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }
}
