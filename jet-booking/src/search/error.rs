use aviowiki::AviowikiFetchError;

/// Why a search produced no results. Cancellation is deliberately absent: a
/// superseded search completes with nothing at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchFailure {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    BadStatus(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("{0}")]
    Unknown(String),
}

impl SearchFailure {
    /// The inline message shown in the search slot.
    pub fn user_message(&self) -> String {
        match self {
            SearchFailure::Transport(detail) => format!("Network Error: {detail}"),
            SearchFailure::BadStatus(status) => {
                format!("Server Error: the airport service responded with status {status}")
            }
            SearchFailure::Decode(detail) => format!("Data Decoding Error: {detail}"),
            SearchFailure::Unknown(detail) => format!("An unexpected error occurred: {detail}"),
        }
    }
}

impl From<AviowikiFetchError> for SearchFailure {
    fn from(e: AviowikiFetchError) -> Self {
        match e {
            AviowikiFetchError::Transport(detail) => SearchFailure::Transport(detail),
            AviowikiFetchError::BadStatus(status) => SearchFailure::BadStatus(status),
            AviowikiFetchError::Decode(detail) => SearchFailure::Decode(detail),
            AviowikiFetchError::Unknown(detail) => SearchFailure::Unknown(detail),
        }
    }
}
