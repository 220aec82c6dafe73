//! Scripted airport source for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use aviowiki::domain::Airport;

use super::{AirportSource, SearchFailure};

#[derive(Clone)]
struct MockResponse {
    delay: Duration,
    result: Result<Vec<Airport>, SearchFailure>,
}

/// Answers queries from a script and records every call. Unscripted queries
/// answer immediately with no results.
#[derive(Clone, Default)]
pub(crate) struct MockAirportSource {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAirportSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, query: &str, airports: Vec<Airport>) -> Self {
        self.respond_after(query, Duration::ZERO, airports)
    }

    pub(crate) fn respond_after(
        self,
        query: &str,
        delay: Duration,
        airports: Vec<Airport>,
    ) -> Self {
        self.script(query, delay, Ok(airports))
    }

    pub(crate) fn fail(self, query: &str, failure: SearchFailure) -> Self {
        self.script(query, Duration::ZERO, Err(failure))
    }

    fn script(
        self,
        query: &str,
        delay: Duration,
        result: Result<Vec<Airport>, SearchFailure>,
    ) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), MockResponse { delay, result });
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AirportSource for MockAirportSource {
    async fn search(&self, query: &str) -> Result<Vec<Airport>, SearchFailure> {
        self.calls.lock().unwrap().push(query.to_string());
        let response = self.responses.lock().unwrap().get(query).cloned();

        let Some(response) = response else {
            return Ok(vec![]);
        };
        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        response.result
    }
}

/// A minimal airport identified by its ICAO code.
pub(crate) fn airport(icao: &str) -> Airport {
    Airport {
        id: icao.to_lowercase(),
        name: format!("{icao} Airport"),
        icao: Some(icao.to_string()),
        iata: None,
        served_city: None,
        country_name: "United States".to_string(),
    }
}
