//! Remote Trait Dictionary retrieval
//!
//! The registry serves one ontology's dictionary as text given its root id.
//! There is no retry; a failed request fails the run.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use trait_ontology_core::config::FetchConfig;
use trait_ontology_core::error::{OntologyError, Result};
use tracing::info;
use url::Url;

/// Source of raw Trait Dictionary text
#[async_trait]
pub trait DictionaryFetcher: Send + Sync {
    /// Fetch the dictionary of the ontology `root_id`
    ///
    /// # Errors
    ///
    /// Returns a `Fetch` error when the dictionary cannot be retrieved.
    async fn fetch(&self, root_id: &str) -> Result<String>;
}

/// Fetches dictionaries over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    url_template: String,
}

impl HttpFetcher {
    /// Build a fetcher from the configured URL template and timeout
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the template has no `{id}` placeholder,
    /// or a `Fetch` error if the HTTP client cannot be built.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        if !config.url_template.contains("{id}") {
            return Err(OntologyError::config(format!(
                "fetch url template '{}' has no {{id}} placeholder",
                config.url_template
            )));
        }
        let client = Client::builder()
            .user_agent(concat!("trait-ontology/", env!("CARGO_PKG_VERSION")))
            .timeout(if config.timeout.is_zero() {
                Duration::from_secs(60)
            } else {
                config.timeout
            })
            .build()
            .map_err(|e| OntologyError::fetch(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url_template: config.url_template.clone(),
        })
    }

    /// Dictionary URL for `root_id`
    ///
    /// # Errors
    ///
    /// Returns a `Fetch` error if the substituted template is not a URL.
    pub fn url_for(&self, root_id: &str) -> Result<Url> {
        let raw = self.url_template.replace("{id}", root_id.trim());
        Url::parse(&raw).map_err(|e| OntologyError::fetch(format!("invalid url '{raw}': {e}")))
    }
}

#[async_trait]
impl DictionaryFetcher for HttpFetcher {
    async fn fetch(&self, root_id: &str) -> Result<String> {
        let url = self.url_for(root_id)?;
        info!("fetching dictionary from {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| OntologyError::fetch(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OntologyError::fetch(format!(
                "request to {url} failed with status: {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| OntologyError::fetch(format!("cannot read response from {url}: {e}")))
    }
}
