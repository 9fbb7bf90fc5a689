//! Configuration loaded from `pinefix.toml`.
//!
//! Values absent from the file fall back to sensible defaults. The
//! `OPENAI_API_KEY` environment variable takes precedence over the file for
//! the oracle key.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from `pinefix.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PinefixConfig {
    /// OpenAI API key for the repair oracle.
    #[serde(default)]
    pub api_key: String,

    /// Oracle model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for repair requests.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Repair attempts allowed beyond the first before an item is parked.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Upper bound on the dynamic repair prompt, in characters.
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,

    /// Path of the work-queue document.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_model() -> String {
    "gpt-3.5-turbo-16k".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

fn default_max_retries() -> u32 {
    2
}

fn default_max_prompt_chars() -> usize {
    24_000
}

fn default_db_path() -> String {
    "db.json".to_string()
}

impl Default for PinefixConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            max_retries: default_max_retries(),
            max_prompt_chars: default_max_prompt_chars(),
            db_path: default_db_path(),
        }
    }
}

impl PinefixConfig {
    /// Load configuration from `pinefix.toml` in the current directory,
    /// using defaults if the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Path::new("pinefix.toml");
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<PinefixConfig>(&contents)?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }
}
