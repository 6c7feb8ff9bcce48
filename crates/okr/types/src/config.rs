//! Engine configuration
//!
//! Every field has a default, so an empty or missing file yields a working
//! configuration.

use crate::{OkrError, OkrResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for an OKR workspace
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cycle label assigned to drafts that do not name one
    pub default_cycle: String,
    /// Avatar URL for users created without one; `{seed}` becomes the user id
    pub avatar_url_template: String,
    /// Key result advisory settings
    pub advisory: AdvisoryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_cycle: "Q3 2024".to_string(),
            avatar_url_template: "https://i.pravatar.cc/150?u={seed}".to_string(),
            advisory: AdvisoryConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse from TOML text
    pub fn from_toml_str(contents: &str) -> OkrResult<Self> {
        toml::from_str(contents).map_err(|e| OkrError::Config(e.to_string()))
    }

    /// Load from a TOML file, falling back to defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> OkrResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| OkrError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn avatar_url_for(&self, seed: &str) -> String {
        self.avatar_url_template.replace("{seed}", seed)
    }
}

/// Settings for the external key result advisory model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-preview-04-17".to_string(),
            api_key_env: "API_KEY".to_string(),
            temperature: 0.2,
        }
    }
}

impl AdvisoryConfig {
    /// Read the API key, treating an empty value as absent
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
