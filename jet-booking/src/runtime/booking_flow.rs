use std::sync::Arc;

use anyhow::{bail, Context, Result};
use aviowiki::domain::Airport;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tokio::runtime::Handle;
use tracing::debug;

use crate::booking::{BookingForm, BookingSummary};
use crate::catalog;
use crate::cli::BookArgs;
use crate::search::{
    AirportSearchController, AirportSource, SearchOptions, SearchSlot, SearchViewState,
};

/// Resolves both airports through independent search slots, fills in the
/// form and submits it.
pub async fn run_booking(
    args: BookArgs,
    source: Arc<dyn AirportSource>,
    options: SearchOptions,
) -> Result<BookingSummary> {
    let executor = Handle::current();
    let departure = AirportSearchController::spawn(Arc::clone(&source), options.clone(), &executor);
    let arrival = AirportSearchController::spawn(source, options, &executor);

    departure.set_query(args.from.as_str());
    arrival.set_query(args.to.as_str());

    let (departure_state, arrival_state) =
        tokio::join!(departure.wait_until_idle(), arrival.wait_until_idle());

    let mut form = BookingForm::new();
    form.select_airport(
        SearchSlot::Departure,
        first_result(SearchSlot::Departure, departure_state)?,
    );
    form.select_airport(
        SearchSlot::Arrival,
        first_result(SearchSlot::Arrival, arrival_state)?,
    );

    if let Some(date) = &args.date {
        let date = OffsetDateTime::parse(date, &Rfc3339)
            .with_context(|| format!("Invalid departure date: {date}"))?;
        form.set_departure_date(date)?;
    }

    form.set_passenger_count(args.passengers);

    if let Some(name) = &args.category {
        let category = catalog::by_name(name)
            .with_context(|| format!("Unknown aircraft category: {name}"))?;
        form.aircraft_category = Some(*category);
    }

    form.notes = args.notes;

    Ok(form.submit())
}

fn first_result(slot: SearchSlot, state: Option<SearchViewState>) -> Result<Airport> {
    let Some(state) = state else {
        bail!("{slot} search stopped before finishing");
    };
    if let Some(error) = state.error_message {
        bail!("{slot} search for {:?} failed: {error}", state.query);
    }

    let Some(airport) = state.results.into_iter().next() else {
        bail!("No airports found for {slot} query {:?}", state.query);
    };
    debug!(%slot, code = airport.code(), name = %airport.name, "Picked airport");

    Ok(airport)
}
