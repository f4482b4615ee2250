//! Runtime configuration with documented defaults
//!
//! Values can come from a TOML file, then be overridden by environment
//! variables. Everything has a default so the library works unconfigured.

use std::path::Path;

use serde::Deserialize;

use crate::core::error::{GearError, Result};

/// Configuration for data loading and the simulators
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GearConfig {
    /// Base URL the static JSON files are served under
    ///
    /// `character.json`, `item.json`, `weapon.json` and `set.json` are
    /// fetched relative to this.
    pub data_base_url: String,

    /// Path prefix for image assets (portraits, item and weapon icons)
    pub image_prefix: String,

    /// Maximum number of refine attempts kept in a session log
    ///
    /// Older entries fall off the end once the log is full.
    pub refine_log_capacity: usize,

    /// Maximum memo length (in characters) stored on a damage record
    pub memo_max_len: usize,

    /// Shortest normalized query that actually filters catalog search
    pub search_min_query_len: usize,
}

impl Default for GearConfig {
    fn default() -> Self {
        Self {
            data_base_url: "http://localhost:5173/data".into(),
            image_prefix: "/images".into(),
            refine_log_capacity: 200,
            memo_max_len: 30,
            search_min_query_len: 2,
        }
    }
}

impl GearConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GearConfig = toml::from_str(content)?;
        config.validate().map_err(GearError::Config)?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Apply `GEARSMITH_DATA_URL` and `GEARSMITH_IMAGE_PREFIX` when set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("GEARSMITH_DATA_URL") {
            if !url.trim().is_empty() {
                self.data_base_url = url.trim().to_string();
            }
        }
        if let Ok(prefix) = std::env::var("GEARSMITH_IMAGE_PREFIX") {
            if !prefix.trim().is_empty() {
                self.image_prefix = prefix.trim().to_string();
            }
        }
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.data_base_url.trim().is_empty() {
            return Err("data_base_url must not be empty".into());
        }
        if self.image_prefix.trim().is_empty() {
            return Err("image_prefix must not be empty".into());
        }
        if self.refine_log_capacity == 0 {
            return Err("refine_log_capacity must be positive".into());
        }
        if self.memo_max_len == 0 {
            return Err("memo_max_len must be positive".into());
        }
        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<GearConfig> = OnceLock::new();

/// Get the global config (initializes with defaults if not set)
pub fn config() -> &'static GearConfig {
    CONFIG.get_or_init(GearConfig::default)
}

/// Set the global config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: GearConfig) -> std::result::Result<(), GearConfig> {
    CONFIG.set(config)
}
