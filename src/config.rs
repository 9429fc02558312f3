//! Configuration management for basket
//!
//! Config file location: ~/.config/basket/config.toml
//!
//! The recipe API key can come from three places, first match wins:
//! the `api_key` field here, `GROQ_API_KEY` in the environment at runtime,
//! or `GROQ_API_KEY` baked in at build time.

use crate::services::recipe::{RecipeSettings, DEFAULT_API_URL, DEFAULT_MODEL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Credential compiled into the binary, if any
const BUILD_TIME_API_KEY: Option<&str> = option_env!("GROQ_API_KEY");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeName,

    // Recipe request
    pub api_key: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// 0 disables the timeout
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    // Reminder
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,

    /// tracing filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeName::Slate,
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            request_timeout_secs: default_timeout(),
            notifications_enabled: true,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("basket");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        // Restrict config file permissions (may contain API keys)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// API key from config, then runtime environment, then build time
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(std::env::var(API_KEY_ENV).ok(), BUILD_TIME_API_KEY)
    }

    fn resolve_api_key_with(
        &self,
        runtime: Option<String>,
        build_time: Option<&str>,
    ) -> Option<String> {
        let non_empty = |k: &String| !k.trim().is_empty();
        self.api_key
            .clone()
            .filter(non_empty)
            .or_else(|| runtime.filter(non_empty))
            .or_else(|| build_time.map(str::to_string).filter(non_empty))
    }

    pub fn recipe_settings(&self) -> RecipeSettings {
        RecipeSettings {
            api_url: self.api_url.clone(),
            model: self.model.clone(),
            api_key: self.resolve_api_key(),
        }
    }
}

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Slate,
    Gruvbox,
    Nord,
    Transparent,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Slate => "Slate",
            ThemeName::Gruvbox => "Gruvbox",
            ThemeName::Nord => "Nord",
            ThemeName::Transparent => "Transparent",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemeName::Slate => ThemeName::Gruvbox,
            ThemeName::Gruvbox => ThemeName::Nord,
            ThemeName::Nord => ThemeName::Transparent,
            ThemeName::Transparent => ThemeName::Slate,
        }
    }
}
