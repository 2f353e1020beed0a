use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Double-click landed with nothing (or only whitespace) selected
    #[error("Empty selection")]
    EmptySelection,

    /// The dictionary service answered with a non-success status
    #[error("Lookup failed with status {0}")]
    LookupFailed(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network Error: {0}")]
    Network(String),

    #[error("Render Error: {0}")]
    Render(String),

    #[error("Settings Error: {0}")]
    Settings(String),

    #[error("DOM Error: {0}")]
    Dom(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(format!("JSON error: {}", err))
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::Render(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_maps_to_malformed_response() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_status_is_kept_in_message() {
        assert_eq!(
            AppError::LookupFailed(503).to_string(),
            "Lookup failed with status 503"
        );
    }
}
