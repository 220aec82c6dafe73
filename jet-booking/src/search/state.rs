use aviowiki::domain::Airport;
use serde::Serialize;
use strum::{Display, EnumString};

use super::SearchFailure;

/// Which airport a search slot picks. Each slot gets its own controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, clap::ValueEnum)]
pub enum SearchSlot {
    #[strum(ascii_case_insensitive, serialize = "departure")]
    Departure,
    #[strum(ascii_case_insensitive, serialize = "arrival")]
    Arrival,
}

/// What the presentation layer renders for one search slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchViewState {
    pub query: String,
    pub results: Vec<Airport>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl SearchViewState {
    pub(crate) fn clear(&mut self) {
        self.results.clear();
        self.error_message = None;
        self.is_loading = false;
    }

    pub(crate) fn begin_search(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    pub(crate) fn apply_results(&mut self, airports: Vec<Airport>) {
        self.results = airports;
        self.is_loading = false;
        self.error_message = None;
    }

    /// Results are kept so a transient failure doesn't blank the list.
    pub(crate) fn apply_failure(&mut self, failure: &SearchFailure) {
        self.is_loading = false;
        self.error_message = Some(failure.user_message());
    }
}
