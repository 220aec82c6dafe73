use serde::{Deserialize, Serialize};

/// One page of results from the airport search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultPage {
    pub page: PageInfo,
    pub content: Vec<AirportSearchResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub number: i64,
    pub size: i64,
    pub total_pages: i64,
    pub total_results: i64,
}

/// A raw airport record as returned by aviowiki. Codes may be missing or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportSearchResult {
    #[serde(rename = "aid")]
    pub id: String,
    pub name: String,
    pub icao: Option<String>,
    pub iata: Option<String>,
    pub served_city: Option<String>,
    pub country: CountryInfo,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryInfo {
    pub iso2: String,
    pub iso3: String,
    pub iso_numeric: i64,
    /// Common name, e.g. "United States".
    pub name: String,
    pub official_name: String,
    pub local_identifier_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}
