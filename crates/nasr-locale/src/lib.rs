//! Nasr Locale - Translation lookup for Nasringine
//!
//! - `parse_source`: reads the `localization` array of a JSON resource
//! - `TranslationTable`: two-level open-addressing table (original -> context -> record)
//! - `Localizer`: owns the active table and answers translate requests

mod localizer;
mod source;
mod table;

pub use localizer::Localizer;
pub use source::{parse_source, SourceEntry};
pub use table::TranslationTable;
