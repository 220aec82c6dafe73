//! Debounced, cancellable airport search.
//!
//! An [`AirportSearchController`] owns one search slot. The presentation layer
//! pushes raw query edits with [`AirportSearchController::set_query`] and reads
//! [`SearchViewState`] snapshots, either by polling or through a
//! `tokio::sync::watch` subscription. Queries settle after a quiescence window
//! and at most one request per slot is ever in flight.

mod controller;
mod debounce;
mod dev_source;
mod error;
mod source;
mod state;

#[cfg(test)]
pub(crate) mod mock;

pub use controller::{AirportSearchController, SearchOptions, DEFAULT_DEBOUNCE};
pub use debounce::Debouncer;
pub use dev_source::DevAirportSource;
pub use error::SearchFailure;
pub use source::AirportSource;
pub use state::{SearchSlot, SearchViewState};
