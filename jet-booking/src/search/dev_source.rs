use std::time::Duration;

use async_trait::async_trait;
use aviowiki::domain::Airport;

use super::{AirportSource, SearchFailure};

/// In-memory airports for running without network access.
#[derive(Debug, Clone)]
pub struct DevAirportSource {
    airports: Vec<Airport>,
    latency: Duration,
}

impl DevAirportSource {
    pub fn new(airports: Vec<Airport>) -> Self {
        Self {
            airports,
            latency: Duration::ZERO,
        }
    }

    /// A handful of well-known business aviation airports.
    pub fn seeded() -> Self {
        Self::new(seed_airports())
    }

    /// Simulated round-trip time per search.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn matches(airport: &Airport, needle: &str) -> bool {
        let fields = [
            Some(airport.name.as_str()),
            airport.served_city.as_deref(),
            airport.icao.as_deref(),
            airport.iata.as_deref(),
        ];

        fields
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[async_trait]
impl AirportSource for DevAirportSource {
    async fn search(&self, query: &str) -> Result<Vec<Airport>, SearchFailure> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(vec![]);
        }

        Ok(self
            .airports
            .iter()
            .filter(|airport| Self::matches(airport, &needle))
            .cloned()
            .collect())
    }
}

/// (name, ICAO, IATA, served city, country)
const SEED: &[(&str, &str, &str, &str, &str)] = &[
    ("Harry Reid International Airport", "KLAS", "LAS", "Las Vegas", "United States"),
    ("Henderson Executive Airport", "KHND", "HSH", "Las Vegas", "United States"),
    ("John F. Kennedy International Airport", "KJFK", "JFK", "New York", "United States"),
    ("Teterboro Airport", "KTEB", "TEB", "Teterboro", "United States"),
    ("Los Angeles International Airport", "KLAX", "LAX", "Los Angeles", "United States"),
    ("Van Nuys Airport", "KVNY", "VNY", "Los Angeles", "United States"),
    ("Miami-Opa Locka Executive Airport", "KOPF", "OPF", "Miami", "United States"),
    ("London Luton Airport", "EGGW", "LTN", "London", "United Kingdom"),
    ("Farnborough Airport", "EGLF", "FAB", "Farnborough", "United Kingdom"),
    ("Paris-Le Bourget Airport", "LFPB", "LBG", "Paris", "France"),
    ("Aspen-Pitkin County Airport", "KASE", "ASE", "Aspen", "United States"),
    ("Nice Côte d'Azur Airport", "LFMN", "NCE", "Nice", "France"),
];

fn seed_airports() -> Vec<Airport> {
    SEED.iter()
        .enumerate()
        .map(|(i, (name, icao, iata, city, country))| Airport {
            id: format!("dev-{}", i + 1),
            name: name.to_string(),
            icao: Some(icao.to_string()),
            iata: Some(iata.to_string()),
            served_city: Some(city.to_string()),
            country_name: country.to_string(),
        })
        .collect()
}
