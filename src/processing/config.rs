// src/processing/config.rs
use std::time::Duration;

use super::messages::StageMessages;

pub const BASE_URL_ENV: &str = "MENUSNAP_API_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Status line shown while the run falls back to the previous screen.
pub const ERROR_STATUS: &str = "Error occurred ⚠️";

/// Fixed delays of the staged loading screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimings {
    /// Cosmetic switch from Upload to OCR, independent of the network call.
    pub upload_to_ocr: Duration,
    pub enrichment_to_completion: Duration,
    pub completion_to_navigate: Duration,
    pub error_to_back: Duration,
    pub message_interval: Duration,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            upload_to_ocr: Duration::from_millis(2000),
            enrichment_to_completion: Duration::from_millis(1500),
            completion_to_navigate: Duration::from_millis(1500),
            error_to_back: Duration::from_millis(1500),
            message_interval: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub base_url: String,
    pub timings: StageTimings,
    pub messages: StageMessages,
}

impl ProcessingConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            timings: StageTimings::default(),
            messages: StageMessages::default(),
        }
    }

    /// Build from the CLI flag, falling back to the environment.
    pub fn from_args(base_url_arg: Option<String>) -> Self {
        Self::new(get_base_url(base_url_arg))
    }
}

/// `--base-url` wins, then `MENUSNAP_API_URL`, then localhost.
pub fn get_base_url(url_arg: Option<String>) -> String {
    let url = url_arg.unwrap_or_else(|| {
        std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
    });
    normalize_base_url(&url)
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
