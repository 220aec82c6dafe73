use async_trait::async_trait;
use aviowiki::{domain::Airport, AviowikiClient};

use super::SearchFailure;

/// Anything that can turn a non-empty query into normalized airports.
///
/// Implementations must be cancel-safe: the controller drops the future of a
/// superseded search at any await point.
#[async_trait]
pub trait AirportSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Airport>, SearchFailure>;
}

#[async_trait]
impl AirportSource for AviowikiClient {
    async fn search(&self, query: &str) -> Result<Vec<Airport>, SearchFailure> {
        self.search_airports(query).await.map_err(SearchFailure::from)
    }
}
