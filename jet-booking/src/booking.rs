use std::fmt;

use aviowiki::domain::Airport;
use serde::Serialize;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::info;

use crate::catalog::AircraftCategory;
use crate::search::SearchSlot;

pub const MIN_PASSENGERS: u8 = 1;
pub const MAX_PASSENGERS: u8 = 16;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BookingError {
    #[error("Departure date {0} is in the past")]
    DepartureInPast(OffsetDateTime),
}

/// A booking request being filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub departure_airport: Option<Airport>,
    pub arrival_airport: Option<Airport>,
    departure_date: OffsetDateTime,
    passenger_count: u8,
    pub notes: String,
    pub aircraft_category: Option<AircraftCategory>,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingForm {
    pub fn new() -> Self {
        Self {
            departure_airport: None,
            arrival_airport: None,
            departure_date: OffsetDateTime::now_utc(),
            passenger_count: MIN_PASSENGERS,
            notes: String::new(),
            aircraft_category: None,
        }
    }

    pub fn departure_date(&self) -> OffsetDateTime {
        self.departure_date
    }

    pub fn passenger_count(&self) -> u8 {
        self.passenger_count
    }

    pub fn select_airport(&mut self, slot: SearchSlot, airport: Airport) {
        match slot {
            SearchSlot::Departure => self.departure_airport = Some(airport),
            SearchSlot::Arrival => self.arrival_airport = Some(airport),
        }
    }

    pub fn airport(&self, slot: SearchSlot) -> Option<&Airport> {
        match slot {
            SearchSlot::Departure => self.departure_airport.as_ref(),
            SearchSlot::Arrival => self.arrival_airport.as_ref(),
        }
    }

    pub fn set_departure_date(&mut self, date: OffsetDateTime) -> Result<(), BookingError> {
        if date < OffsetDateTime::now_utc() {
            return Err(BookingError::DepartureInPast(date));
        }
        self.departure_date = date;
        Ok(())
    }

    /// Clamped to `MIN_PASSENGERS..=MAX_PASSENGERS`.
    pub fn set_passenger_count(&mut self, count: u8) {
        self.passenger_count = count.clamp(MIN_PASSENGERS, MAX_PASSENGERS);
    }

    pub fn increment_passengers(&mut self) {
        self.set_passenger_count(self.passenger_count.saturating_add(1));
    }

    pub fn decrement_passengers(&mut self) {
        self.set_passenger_count(self.passenger_count.saturating_sub(1));
    }

    /// Logs the request and returns what was submitted. Nothing is persisted.
    pub fn submit(&self) -> BookingSummary {
        let summary = BookingSummary::from(self);
        info!(
            departure_airport = %summary.departure_airport,
            arrival_airport = %summary.arrival_airport,
            departure_date = %summary.departure_date,
            passenger_count = summary.passenger_count,
            aircraft_category = %summary.aircraft_category,
            notes = %summary.notes,
            "Booking submitted"
        );
        summary
    }
}

/// Display form of a submitted booking; missing values read "None".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_date: String,
    pub passenger_count: u8,
    pub aircraft_category: String,
    pub notes: String,
}

impl From<&BookingForm> for BookingSummary {
    fn from(form: &BookingForm) -> Self {
        let airport_label = |airport: Option<&Airport>| {
            airport
                .map(|a| format!("{} ({})", a.name, a.code()))
                .unwrap_or_else(|| "None".to_string())
        };

        Self {
            departure_airport: airport_label(form.departure_airport.as_ref()),
            arrival_airport: airport_label(form.arrival_airport.as_ref()),
            departure_date: form
                .departure_date
                .format(&Rfc3339)
                .unwrap_or_else(|_| form.departure_date.to_string()),
            passenger_count: form.passenger_count,
            aircraft_category: form
                .aircraft_category
                .map(|c| c.name.to_string())
                .unwrap_or_else(|| "None".to_string()),
            notes: form.notes.clone(),
        }
    }
}

impl fmt::Display for BookingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Booking Submitted:")?;
        writeln!(f, "Departure Airport: {}", self.departure_airport)?;
        writeln!(f, "Arrival Airport: {}", self.arrival_airport)?;
        writeln!(f, "Departure Date: {}", self.departure_date)?;
        writeln!(f, "Passenger Count: {}", self.passenger_count)?;
        writeln!(f, "Aircraft Model: {}", self.aircraft_category)?;
        write!(f, "Notes: {}", self.notes)
    }
}
