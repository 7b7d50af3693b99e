// src/config.rs
use serde::Deserialize;

use crate::errors::{GymError, Result};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Configuration for the Gemini text and Imagen image models.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: String,
    pub text_model: String,
    pub image_model: String,
    /// Kept low so descriptions stay close to the image.
    pub describe_temperature: f32,
    pub challenge_temperature: f32,
    pub aspect_ratio: String,
    pub output_mime_type: String,
}

/// High-level application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub bind: String,
}

/// Optional TOML file named by `GYM_CONFIG`. Every field overrides the
/// environment default when present.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    #[serde(default)]
    pub bind: Option<String>,
    #[serde(default)]
    pub gemini: GeminiOverrides,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct GeminiOverrides {
    pub api_base: Option<String>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
    pub describe_temperature: Option<f32>,
    pub challenge_temperature: Option<f32>,
    pub aspect_ratio: Option<String>,
    pub output_mime_type: Option<String>,
}

impl FileSettings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, reading the TOML file
    /// named by `GYM_CONFIG` if one is given.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GymError::Config("GEMINI_API_KEY environment variable not set.".to_string()))?;

        let mut config = AppConfig {
            gemini: GeminiConfig {
                api_base: lookup("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                api_key,
                text_model: lookup("GEMINI_TEXT_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
                image_model: lookup("GEMINI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
                describe_temperature: 0.2,
                challenge_temperature: 1.2,
                aspect_ratio: "1:1".to_string(),
                output_mime_type: "image/jpeg".to_string(),
            },
            bind: lookup("GYM_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
        };

        if let Some(path) = lookup("GYM_CONFIG") {
            let text = std::fs::read_to_string(&path)?;
            config.apply(FileSettings::from_toml_str(&text)?);
            log::info!("Loaded settings from {}", path);
        }

        Ok(config)
    }

    pub fn apply(&mut self, settings: FileSettings) {
        if let Some(bind) = settings.bind {
            self.bind = bind;
        }
        let g = settings.gemini;
        let target = &mut self.gemini;
        if let Some(v) = g.api_base {
            target.api_base = v;
        }
        if let Some(v) = g.text_model {
            target.text_model = v;
        }
        if let Some(v) = g.image_model {
            target.image_model = v;
        }
        if let Some(v) = g.describe_temperature {
            target.describe_temperature = v;
        }
        if let Some(v) = g.challenge_temperature {
            target.challenge_temperature = v;
        }
        if let Some(v) = g.aspect_ratio {
            target.aspect_ratio = v;
        }
        if let Some(v) = g.output_mime_type {
            target.output_mime_type = v;
        }
    }
}
