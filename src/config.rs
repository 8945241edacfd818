//! Configuration file and environment support

use crate::orchestration::{ErrorKind, GatePolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const PLACEHOLDER_KEY: &str = "your-api-key-here";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no Gemini API key configured (set GEMINI_API_KEY or gemini.api_key)")]
    MissingApiKey,

    #[error("no Gemini model configured (set GEMINI_MODEL or gemini.model)")]
    MissingModel,

    #[error("invalid setting: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ConfigError
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub gemini: GeminiSettings,

    #[serde(default)]
    pub image: ImageSettings,

    /// Bound on every remote call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a timed-out text call
    #[serde(default)]
    pub retries: u32,

    #[serde(default)]
    pub moderation: ModerationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSettings {
    #[serde(default = "default_image_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_image_size")]
    pub width: u32,

    #[serde(default = "default_image_size")]
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModerationSettings {
    /// Halt later stages when the verdict says the text is inappropriate
    #[serde(default)]
    pub strict: bool,
}

// Defaults

fn default_timeout_secs() -> u64 {
    30
}

fn default_model() -> String {
    gemini::DEFAULT_MODEL.to_string()
}

fn default_gemini_endpoint() -> String {
    gemini::DEFAULT_ENDPOINT.to_string()
}

fn default_image_endpoint() -> String {
    imagent::DEFAULT_ENDPOINT.to_string()
}

fn default_image_size() -> u32 {
    1024
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_gemini_endpoint(),
        }
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            endpoint: default_image_endpoint(),
            width: default_image_size(),
            height: default_image_size(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini: GeminiSettings::default(),
            image: ImageSettings::default(),
            timeout_secs: default_timeout_secs(),
            retries: 0,
            moderation: ModerationSettings::default(),
        }
    }
}

impl Settings {
    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("clowder").join("config.toml"))
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load from `path` (or the default file if present), apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => {
                    tracing::debug!(path = %p.display(), "loading default configuration file");
                    Self::from_file(p)?
                }
                None => Self::default(),
            },
        };

        settings.apply_overrides(|name| std::env::var(name).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Override file values from `GEMINI_API_KEY`, `GEMINI_MODEL` and `CLOWDER_TIMEOUT_SECS`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(secs) = lookup("CLOWDER_TIMEOUT_SECS") {
            self.timeout_secs = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("CLOWDER_TIMEOUT_SECS must be an integer, got '{secs}'")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.gemini.api_key.as_deref().map(str::trim) {
            None | Some("") | Some(PLACEHOLDER_KEY) => return Err(ConfigError::MissingApiKey),
            Some(_) => {}
        }
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::MissingModel);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be greater than zero".into()));
        }
        if self.image.width == 0 || self.image.height == 0 {
            return Err(ConfigError::Invalid("image width and height must be non-zero".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn gate_policy(&self) -> GatePolicy {
        if self.moderation.strict {
            GatePolicy::Strict
        } else {
            GatePolicy::Permissive
        }
    }
}
