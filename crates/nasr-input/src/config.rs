//! Binding configuration loaded from TOML
//!
//! ```toml
//! [[binding]]
//! input = 0
//! key = "KeyW"
//!
//! [[binding]]
//! input = 0
//! key = "ArrowUp"
//! ```

use crate::binding::{Binding, InputId};
use crate::key::Key;
use nasr_core::{NasrError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One `[[binding]]` table: a logical input and a key name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub input: InputId,
    pub key: String,
}

/// A list of bindings in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default, rename = "binding")]
    pub bindings: Vec<BindingConfig>,
}

impl InputConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve key names into bindings, keeping the configured order
    pub fn to_bindings(&self) -> Result<Vec<Binding>> {
        self.bindings
            .iter()
            .map(|b| {
                Key::from_name(&b.key)
                    .map(|key| Binding::new(b.input, key))
                    .ok_or_else(|| NasrError::ConfigError(format!("Unknown key name: {}", b.key)))
            })
            .collect()
    }
}
