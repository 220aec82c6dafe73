use serde::{Deserialize, Serialize};

use super::{AirportSearchResult, SearchResultPage};

/// An airport usable as a booking endpoint. Always carries at least one of
/// `icao`/`iata`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub id: String,
    pub name: String,
    pub icao: Option<String>,
    pub iata: Option<String>,
    pub served_city: Option<String>,
    pub country_name: String,
}

impl Airport {
    /// Normalizes a raw search record, discarding it when it has neither an
    /// ICAO nor an IATA code.
    pub fn from_search_result(result: AirportSearchResult) -> Option<Self> {
        let icao = non_empty(result.icao);
        let iata = non_empty(result.iata);
        if icao.is_none() && iata.is_none() {
            return None;
        }

        Some(Self {
            id: result.id,
            name: result.name,
            icao,
            iata,
            served_city: result.served_city,
            country_name: result.country.name,
        })
    }

    /// The code to show next to the airport: ICAO when known, otherwise IATA.
    pub fn code(&self) -> &str {
        self.icao
            .as_deref()
            .or(self.iata.as_deref())
            .unwrap_or_default()
    }

    /// "City, Country" when the served city adds information, else just the country.
    pub fn location_label(&self) -> String {
        match self.served_city.as_deref() {
            Some(city) if !city.is_empty() && city != self.name => {
                format!("{}, {}", city, self.country_name)
            }
            _ => self.country_name.clone(),
        }
    }
}

/// Normalizes a whole page, keeping the order the service returned.
pub fn normalize_page(page: SearchResultPage) -> Vec<Airport> {
    page.content
        .into_iter()
        .filter_map(Airport::from_search_result)
        .collect()
}

fn non_empty(code: Option<String>) -> Option<String> {
    code.filter(|c| !c.trim().is_empty())
}
