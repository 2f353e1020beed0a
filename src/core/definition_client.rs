use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::definition::{self, DefinitionView};
use crate::core::render;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::PopupSettings;

/// Anything that can turn a word into a popup fragment.
///
/// `?Send` because in the browser the underlying fetch future is not `Send`.
#[async_trait(?Send)]
pub trait DefinitionSource {
    /// Fetch and render the definition of `word`.
    ///
    /// A word the service doesn't know is not an error: it renders the "no definition"
    /// fragment. Only transport failures, non-success statuses and unusable bodies are `Err`.
    async fn fetch_definition(&self, word: &str) -> AppResult<String>;
}

/// Free Dictionary API client
#[derive(Clone)]
pub struct DefinitionClient {
    client: Client,
    endpoint: String,
    max_definitions: usize,
}

impl DefinitionClient {
    pub fn new(settings: &PopupSettings) -> Self {
        Self {
            client: Client::new(),
            endpoint: settings.endpoint.clone(),
            max_definitions: settings.max_definitions,
        }
    }

    pub fn lookup_url(&self, word: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(word)
        )
    }

    /// Fetch the raw entry list and reduce it to a view
    pub async fn lookup(&self, word: &str) -> AppResult<DefinitionView> {
        let url = self.lookup_url(word);
        debug!("Looking up '{}' at {}", word, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Dictionary API network error: {}", e);
            AppError::Network(format!("Dictionary API connection failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!("Dictionary API returned {} for '{}'", status, word);
            return Err(AppError::LookupFailed(status.as_u16()));
        }

        let body = response.json::<Value>().await.map_err(|e| {
            warn!("Dictionary API parse error: {}", e);
            AppError::MalformedResponse(format!("Failed to parse definition: {}", e))
        })?;

        definition::interpret(word, &body, self.max_definitions)
    }
}

#[async_trait(?Send)]
impl DefinitionSource for DefinitionClient {
    async fn fetch_definition(&self, word: &str) -> AppResult<String> {
        let view = self.lookup(word).await?;
        render::render_view(&view)
    }
}
