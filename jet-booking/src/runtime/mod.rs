mod booking_flow;
mod event_loop;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use aviowiki::{AviowikiClient, AviowikiURL};
use tracing::info;

use crate::config::BookingConfig;
use crate::search::{AirportSource, DevAirportSource};

pub use booking_flow::run_booking;
pub use event_loop::run_search_session;

const DEV_LATENCY: Duration = Duration::from_millis(150);

/// The network client, or the built-in airports when `dev` is set.
pub fn airport_source(config: &BookingConfig, dev: bool) -> Result<Arc<dyn AirportSource>> {
    if dev {
        info!("Using built-in dev airports");
        return Ok(Arc::new(DevAirportSource::seeded().with_latency(DEV_LATENCY)));
    }

    let url = AviowikiURL::parse(&config.search_url)
        .with_context(|| format!("Invalid search_url in config: {}", config.search_url))?;
    info!(search_url = url.as_ref(), "Using aviowiki airport search");

    Ok(Arc::new(AviowikiClient::new(url)))
}
