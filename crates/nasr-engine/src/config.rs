//! Engine configuration loaded from TOML
//!
//! ```toml
//! language = "lang/es.json"
//! log_level = "debug"
//!
//! [window]
//! title = "My Game"
//! width = 1280
//! height = 720
//!
//! [audio]
//! volume = 0.8
//!
//! [[binding]]
//! input = 0
//! key = "Space"
//! ```

use nasr_core::Result;
use nasr_input::{Binding, BindingConfig, InputConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl WindowConfig {
    /// Window attributes for `ActiveEventLoop::create_window`
    pub fn attributes(&self) -> winit::window::WindowAttributes {
        winit::window::Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.width, self.height))
    }
}

fn default_title() -> String {
    "Nasringine".to_string()
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Linear amplitude, 0.0 to 1.0
    #[serde(default = "default_volume")]
    pub volume: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
        }
    }
}

fn default_volume() -> f64 {
    1.0
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    /// JSON translation resource loaded at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default, rename = "binding")]
    pub bindings: Vec<BindingConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            audio: AudioConfig::default(),
            language: None,
            log_level: default_log_level(),
            bindings: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the `[[binding]]` tables into registrable bindings
    pub fn to_bindings(&self) -> Result<Vec<Binding>> {
        InputConfig {
            bindings: self.bindings.clone(),
        }
        .to_bindings()
    }
}
