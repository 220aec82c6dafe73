use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::{
    domain::{self, Airport, SearchResultPage},
    AviowikiURL,
};

#[derive(Debug, Clone)]
pub struct AviowikiClient {
    client: reqwest::Client,
    search_url: AviowikiURL,
}

impl AviowikiClient {
    pub fn new(search_url: AviowikiURL) -> Self {
        Self {
            client: reqwest::Client::new(),
            search_url,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: impl AsRef<str>,
    ) -> Result<T, AviowikiFetchError> {
        let resp = self
            .client
            .get(url.as_ref())
            .send()
            .await
            .map_err(AviowikiFetchError::from_send_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AviowikiFetchError::BadStatus(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| AviowikiFetchError::Transport(e.to_string()))?;

        serde_json::from_slice::<T>(&body).map_err(|e| {
            AviowikiFetchError::Decode(format!("Failed to parse response as JSON: {}", e))
        })
    }

    /// Fetches the raw first page of results for `query`.
    pub async fn fetch_search_page(
        &self,
        query: &str,
    ) -> Result<SearchResultPage, AviowikiFetchError> {
        let url = self.search_url.with_query(query);
        debug!(url = url.as_ref(), "Fetching airport search page");

        self.fetch(url).await
    }

    /// Searches airports and normalizes the page, dropping code-less entries.
    pub async fn search_airports(&self, query: &str) -> Result<Vec<Airport>, AviowikiFetchError> {
        let page = self.fetch_search_page(query).await?;
        let total = page.content.len();
        let airports = domain::normalize_page(page);

        debug!(
            query,
            received = total,
            kept = airports.len(),
            "Normalized airport search page"
        );

        Ok(airports)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AviowikiFetchError {
    #[error("Transport: {0}")]
    Transport(String),
    #[error("BadStatus: {0}")]
    BadStatus(u16),
    #[error("Decode: {0}")]
    Decode(String),
    #[error("Unknown: {0}")]
    Unknown(String),
}

impl AviowikiFetchError {
    fn from_send_error(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Self::Unknown(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}
