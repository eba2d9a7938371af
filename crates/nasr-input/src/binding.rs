//! Bindings between logical inputs and physical keys

use crate::key::Key;

/// Host-defined id of an abstract action ("jump", "move right", ...)
pub type InputId = u32;

/// One (logical input, physical key) association.
///
/// The key is kept as a raw index into the key space so codes coming from
/// a host can be validated at registration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Binding {
    pub input: InputId,
    pub key: u32,
}

impl Binding {
    pub fn new(input: InputId, key: Key) -> Self {
        Self {
            input,
            key: key.index(),
        }
    }

    /// Binding from an unchecked key index
    pub fn from_raw(input: InputId, key: u32) -> Self {
        Self { input, key }
    }
}

/// Edge reported by the platform for a physical key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}
