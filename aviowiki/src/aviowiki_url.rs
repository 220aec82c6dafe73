use thiserror::Error;

/// The public, key-less airport search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://api.aviowiki.com/free/airports/search";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AviowikiURL(String);

#[derive(Error, Debug)]
#[error("Invalid aviowiki URL '{url}': {reason}")]
pub struct InvalidUrlError {
    pub url: String,
    pub reason: String,
}

impl AsRef<str> for AviowikiURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Default for AviowikiURL {
    fn default() -> Self {
        Self(DEFAULT_SEARCH_URL.to_string())
    }
}

impl AviowikiURL {
    /// Parses and validates an absolute search endpoint URL.
    pub fn parse(url: &str) -> Result<Self, InvalidUrlError> {
        let trimmed = url.trim();
        reqwest::Url::parse(trimmed).map_err(|e| InvalidUrlError {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self(trimmed.trim_end_matches('/').to_string()))
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// Adds a percent-encoded `query` parameter.
    pub fn with_query(&self, query: &str) -> Self {
        let encoded = urlencoding::encode(query);
        if self.0.contains('?') {
            Self(format!("{}&query={}", self.0, encoded))
        } else {
            Self(format!("{}?query={}", self.0, encoded))
        }
    }
}
