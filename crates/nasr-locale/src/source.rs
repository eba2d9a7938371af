//! Translation resource parsing
//!
//! The resource is a JSON document of the form:
//!
//! ```json
//! {
//!   "localization": [
//!     { "original": "Start", "translation": "Iniciar" },
//!     { "original": "item", "translation": "objeto", "translationPlural": "objetos" },
//!     { "original": "Open", "context": "menu", "translation": "Abrir" }
//!   ]
//! }
//! ```
//!
//! Only `original` is required. Optional fields may be absent or `null`;
//! any other non-string value rejects the whole document.

use nasr_core::{NasrError, Result};
use serde_json::{Map, Value};

/// One record of the `localization` array
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceEntry {
    pub original: String,
    pub translation: Option<String>,
    pub translation_plural: Option<String>,
    pub context: Option<String>,
}

impl SourceEntry {
    pub fn new(original: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translation: Some(translation.into()),
            ..Default::default()
        }
    }

    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.translation_plural = Some(plural.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Context key of this entry; the default context is the empty string
    pub fn context_key(&self) -> &str {
        self.context.as_deref().unwrap_or("")
    }
}

/// Parse a translation resource into its entries, in document order
pub fn parse_source(json: &str) -> Result<Vec<SourceEntry>> {
    let document: Value = serde_json::from_str(json)?;

    let root = document
        .as_object()
        .ok_or_else(|| NasrError::malformed("<document>", None, "expected an object"))?;
    let list = match root.get("localization") {
        Some(Value::Array(list)) => list,
        Some(other) => {
            return Err(NasrError::malformed(
                "localization",
                None,
                format!("expected an array, got {}", kind_of(other)),
            ))
        }
        None => return Err(NasrError::malformed("localization", None, "missing")),
    };

    list.iter()
        .enumerate()
        .map(|(index, item)| parse_entry(index, item))
        .collect()
}

fn parse_entry(index: usize, item: &Value) -> Result<SourceEntry> {
    let fields = item.as_object().ok_or_else(|| {
        NasrError::malformed(
            "localization",
            Some(index),
            format!("expected an object, got {}", kind_of(item)),
        )
    })?;

    let original = optional_string(fields, "original", index)?
        .ok_or_else(|| NasrError::malformed("original", Some(index), "missing"))?;

    Ok(SourceEntry {
        original,
        translation: optional_string(fields, "translation", index)?,
        translation_plural: optional_string(fields, "translationPlural", index)?,
        context: optional_string(fields, "context", index)?,
    })
}

fn optional_string(fields: &Map<String, Value>, field: &str, index: usize) -> Result<Option<String>> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(NasrError::malformed(
            field,
            Some(index),
            format!("expected a string, got {}", kind_of(other)),
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
