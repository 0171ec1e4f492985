use std::env;

use crate::app::policy::parse_threshold;

/// Fallback for the minimum "safe" confidence when neither the environment nor
/// the config store provide one
pub const DEFAULT_SAFETY_CONFIDENCE_THRESHOLD: f64 = 80.0;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Imagga API base URL (v2)
    pub imagga_api_url: String,
    pub imagga_api_key: String,
    pub imagga_api_secret: String,
    /// Preferred language for tag text returned by Imagga
    pub imagga_language: String,
    /// Threshold applied when the config store has no SAFETY_CONFIDENCE_THRESHOLD entry
    pub default_safety_threshold: f64,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            imagga_api_url: env::var("IMAGGA_API_URL")
                .unwrap_or_else(|_| "https://api.imagga.com/v2".to_string()),
            imagga_api_key: env::var("IMAGGA_API_KEY").unwrap_or_default(),
            imagga_api_secret: env::var("IMAGGA_API_SECRET").unwrap_or_default(),
            imagga_language: env::var("IMAGGA_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            default_safety_threshold: default_safety_threshold(
                env::var("IMAGE_SAFETY_CONFIDENCE_DEFAULT_THRESHOLD")
                    .ok()
                    .as_deref(),
            ),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }

    /// Check if Imagga credentials are configured
    pub fn imagga_configured(&self) -> bool {
        !self.imagga_api_key.is_empty() && !self.imagga_api_secret.is_empty()
    }
}

/// Resolve the env-provided default threshold with the same rules as stored
/// values: finite, clamped to 0-100, otherwise the built-in default.
fn default_safety_threshold(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return DEFAULT_SAFETY_CONFIDENCE_THRESHOLD;
    };

    match parse_threshold(raw) {
        Some(threshold) => {
            if raw.trim().parse::<f64>().ok() != Some(threshold) {
                tracing::warn!(
                    value = %raw,
                    threshold,
                    "IMAGE_SAFETY_CONFIDENCE_DEFAULT_THRESHOLD out of range, clamped"
                );
            }
            threshold
        }
        None => {
            tracing::warn!(
                value = %raw,
                default = DEFAULT_SAFETY_CONFIDENCE_THRESHOLD,
                "IMAGE_SAFETY_CONFIDENCE_DEFAULT_THRESHOLD is not a number, using default"
            );
            DEFAULT_SAFETY_CONFIDENCE_THRESHOLD
        }
    }
}
