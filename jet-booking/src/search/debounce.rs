//! Trailing-edge debounce with duplicate suppression.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

#[derive(Debug)]
struct Pending {
    value: String,
    deadline: Instant,
}

/// Holds the latest query until it has been quiet for `window`, then releases
/// it unless it equals the previously released value.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<Pending>,
    last_emitted: Option<String>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_emitted: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a new value, replacing any pending one and restarting the window.
    pub fn push(&mut self, value: String, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.window,
        });
    }

    /// When the pending value settles, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending value if its window has elapsed.
    ///
    /// Returns `None` while still waiting, and also when the settled value is a
    /// repeat of the last one released.
    pub fn settle(&mut self, now: Instant) -> Option<String> {
        if self.deadline()? > now {
            return None;
        }

        let Pending { value, .. } = self.pending.take()?;
        if self.last_emitted.as_deref() == Some(value.as_str()) {
            debug!(query = %value, "Settled query unchanged, skipping search");
            return None;
        }

        self.last_emitted = Some(value.clone());
        Some(value)
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
