//! Nasringine - a small engine facade
//!
//! Ties together the input map (`nasr-input`), localization (`nasr-locale`),
//! audio (`nasr-audio`) and a rectangle canvas (`nasr-render`) behind one
//! `Engine` handle configured from TOML.

mod config;
mod engine;
mod logging;
mod window;

pub use config::{AudioConfig, EngineConfig, WindowConfig};
pub use engine::Engine;
pub use logging::{init_logging, parse_level};

pub use nasr_core::{Color, NasrError, Rect, Result};
pub use nasr_input::{Binding, InputId, Key, KeyAction};
