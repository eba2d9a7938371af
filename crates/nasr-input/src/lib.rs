//! Nasr Input - Key-to-input mapping engine
//!
//! Provides:
//! - `Key` / `KEY_COUNT`: the fixed physical key-code space
//! - `Binding`: one (logical input, physical key) association
//! - `InputMap`: compiled binding tables with held/pressed tracking
//! - `handle_window_event`: feeds winit keyboard events into an `InputMap`
//! - `InputConfig`: bindings loaded from TOML

mod binding;
mod config;
mod key;
mod map;
mod platform;

pub use binding::{Binding, InputId, KeyAction};
pub use config::{BindingConfig, InputConfig};
pub use key::{Key, KEY_COUNT};
pub use map::{InputMap, MAX_INPUTS};
pub use platform::{handle_window_event, process_physical_key};
