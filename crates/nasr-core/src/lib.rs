//! Nasr Core - Foundational types for Nasringine
//!
//! This crate provides the pieces every other Nasringine crate depends on:
//! - `NasrError` / `Result` - the shared error taxonomy
//! - `hash` - prime sizing and FNV-1a slot selection for open-addressing tables
//! - `Color`, `Rect` - value types for the 2D canvas

mod error;
pub mod hash;
mod types;

pub use error::{NasrError, Result};
pub use types::{Color, Rect};
