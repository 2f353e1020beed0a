use serde::{Deserialize, Serialize};

use crate::shared::error::{AppError, AppResult};

pub const DEFAULT_ENDPOINT: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";
pub const DEFAULT_POPUP_ID: &str = "definition-popup";

/// Runtime configuration for the popup.
///
/// Every field has a default, so a partial JSON object (or none at all) is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupSettings {
    /// Lookup base URL; the percent-encoded word is appended to it
    pub endpoint: String,
    /// `id` attribute of the popup element
    pub popup_id: String,
    /// Distance from the cursor to the popup's top-left corner, on both axes
    pub cursor_offset: f64,
    /// Total definitions rendered, across all parts of speech
    pub max_definitions: usize,
    /// Ignore a response if a newer lookup started after it was requested
    pub discard_stale_responses: bool,
    /// `tracing` filter directive
    pub log_level: String,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            popup_id: DEFAULT_POPUP_ID.to_string(),
            cursor_offset: 5.0,
            max_definitions: 3,
            discard_stale_responses: false,
            log_level: "info".to_string(),
        }
    }
}

impl PopupSettings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> AppResult<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| AppError::Settings(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(AppError::Settings("endpoint must not be empty".to_string()));
        }
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(AppError::Settings(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.popup_id.trim().is_empty() {
            return Err(AppError::Settings("popup_id must not be empty".to_string()));
        }
        if self.max_definitions == 0 {
            return Err(AppError::Settings(
                "max_definitions must be at least 1".to_string(),
            ));
        }
        if !self.cursor_offset.is_finite() {
            return Err(AppError::Settings("cursor_offset must be finite".to_string()));
        }
        Ok(())
    }
}
