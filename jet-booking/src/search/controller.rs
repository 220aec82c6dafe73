use std::{panic::AssertUnwindSafe, sync::Arc, time::Duration};

use aviowiki::domain::Airport;
use futures::FutureExt;
use tokio::{
    runtime::Handle,
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::{self, Instant},
};
use tracing::{debug, info, warn};

use super::{AirportSource, Debouncer, SearchFailure, SearchViewState};

/// Quiet period after the last edit before a query is searched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub debounce: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

enum Command {
    Query(String),
    WhenIdle(oneshot::Sender<SearchViewState>),
    Shutdown,
}

struct Completion {
    id: u64,
    result: Result<Vec<Airport>, SearchFailure>,
}

/// One running request. Dropping it aborts the request.
struct InFlightSearch {
    id: u64,
    query: String,
    task: JoinHandle<()>,
}

impl InFlightSearch {
    fn spawn(
        executor: &Handle,
        id: u64,
        query: String,
        source: Arc<dyn AirportSource>,
        completions: mpsc::UnboundedSender<Completion>,
    ) -> Self {
        let task_query = query.clone();
        let task = executor.spawn(async move {
            let result = match AssertUnwindSafe(source.search(&task_query))
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(_) => Err(SearchFailure::Unknown("search task panicked".to_string())),
            };
            let _ = completions.send(Completion { id, result });
        });

        Self { id, query, task }
    }

    /// Abort the request. Idempotent, and a no-op once the request finished.
    fn cancel(&self) {
        if !self.task.is_finished() {
            debug!(id = self.id, query = %self.query, "Cancelling in-flight search");
        }
        self.task.abort();
    }
}

impl Drop for InFlightSearch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Handle to one search slot.
///
/// Query edits go in through [`set_query`](Self::set_query); state comes out as
/// [`SearchViewState`] snapshots. Dropping the controller (or calling
/// [`shutdown`](Self::shutdown)) cancels any pending debounce and in-flight
/// request, after which the state never changes again.
pub struct AirportSearchController {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SearchViewState>,
    task: JoinHandle<()>,
}

impl AirportSearchController {
    /// Starts the slot on `executor`.
    ///
    /// Every state mutation runs on the single task spawned here, so
    /// subscribers never observe a half-applied update. Requests are spawned
    /// on the same executor.
    pub fn spawn(
        source: Arc<dyn AirportSource>,
        options: SearchOptions,
        executor: &Handle,
    ) -> Self {
        let (actor, commands, state) = SearchActor::new(source, options, executor.clone());
        let task = executor.spawn(actor.run());

        Self {
            commands,
            state,
            task,
        }
    }

    /// Record a query edit. Cheap; call it on every keystroke.
    pub fn set_query(&self, query: impl Into<String>) {
        if self.commands.send(Command::Query(query.into())).is_err() {
            debug!("Search controller stopped, ignoring query");
        }
    }

    pub fn snapshot(&self) -> SearchViewState {
        self.state.borrow().clone()
    }

    /// A receiver that wakes on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchViewState> {
        self.state.clone()
    }

    /// Resolves once every edit sent so far has settled and its search, if
    /// any, has finished. Returns `None` if the controller has been shut down.
    pub async fn wait_until_idle(&self) -> Option<SearchViewState> {
        let (tx, rx) = oneshot::channel();
        self.commands.send(Command::WhenIdle(tx)).ok()?;
        rx.await.ok()
    }

    /// Stop the slot. Safe to call more than once.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

impl Drop for AirportSearchController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct SearchActor {
    source: Arc<dyn AirportSource>,
    executor: Handle,
    debouncer: Debouncer,
    commands: mpsc::UnboundedReceiver<Command>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    state: watch::Sender<SearchViewState>,
    active: Option<InFlightSearch>,
    next_id: u64,
    idle_waiters: Vec<oneshot::Sender<SearchViewState>>,
}

impl SearchActor {
    fn new(
        source: Arc<dyn AirportSource>,
        options: SearchOptions,
        executor: Handle,
    ) -> (
        Self,
        mpsc::UnboundedSender<Command>,
        watch::Receiver<SearchViewState>,
    ) {
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (state, state_rx) = watch::channel(SearchViewState::default());

        let actor = Self {
            source,
            executor,
            debouncer: Debouncer::new(options.debounce),
            commands,
            completions_tx,
            completions,
            state,
            active: None,
            next_id: 0,
            idle_waiters: Vec::new(),
        };

        (actor, commands_tx, state_rx)
    }

    async fn run(mut self) {
        debug!(
            debounce_ms = self.debouncer.window().as_millis() as u64,
            "Search controller started"
        );

        loop {
            let deadline = self.debouncer.deadline();

            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(Command::Query(query)) => self.on_query(query),
                    Some(Command::WhenIdle(waiter)) => self.idle_waiters.push(waiter),
                    Some(Command::Shutdown) | None => break,
                },
                Some(completion) = self.completions.recv() => self.on_completion(completion),
                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(query) = self.debouncer.settle(Instant::now()) {
                        self.on_settled(query);
                    }
                }
            }

            self.notify_idle_waiters();
        }

        self.cancel_active();
        self.debouncer.cancel();
        debug!("Search controller stopped");
    }

    fn on_query(&mut self, query: String) {
        self.state.send_modify(|s| s.query.clone_from(&query));
        self.debouncer.push(query, Instant::now());
    }

    fn on_settled(&mut self, query: String) {
        self.cancel_active();

        if query.is_empty() {
            debug!("Empty query settled, clearing results");
            self.state.send_modify(SearchViewState::clear);
            return;
        }

        self.next_id += 1;
        let id = self.next_id;
        info!(id, query = %query, "Searching airports");

        self.state.send_modify(SearchViewState::begin_search);
        self.active = Some(InFlightSearch::spawn(
            &self.executor,
            id,
            query,
            Arc::clone(&self.source),
            self.completions_tx.clone(),
        ));
    }

    fn on_completion(&mut self, completion: Completion) {
        if self.active.as_ref().map(|a| a.id) != Some(completion.id) {
            debug!(id = completion.id, "Dropping completion of superseded search");
            return;
        }
        let Some(active) = self.active.take() else {
            return;
        };

        match completion.result {
            Ok(airports) => {
                info!(
                    id = active.id,
                    query = %active.query,
                    results = airports.len(),
                    "Airport search completed"
                );
                self.state.send_modify(|s| s.apply_results(airports));
            }
            Err(failure) => {
                warn!(
                    id = active.id,
                    query = %active.query,
                    error = %failure,
                    "Airport search failed"
                );
                self.state.send_modify(|s| s.apply_failure(&failure));
            }
        }
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel();
        }
    }

    fn is_idle(&self) -> bool {
        !self.debouncer.has_pending() && self.active.is_none()
    }

    fn notify_idle_waiters(&mut self) {
        if self.idle_waiters.is_empty() || !self.is_idle() {
            return;
        }

        let snapshot = self.state.borrow().clone();
        for waiter in self.idle_waiters.drain(..) {
            let _ = waiter.send(snapshot.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use aviowiki::{AviowikiClient, AviowikiURL};
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::json;

    use super::*;
    use crate::search::mock::{airport, MockAirportSource};

    fn controller(source: &MockAirportSource) -> AirportSearchController {
        AirportSearchController::spawn(
            Arc::new(source.clone()),
            SearchOptions::default(),
            &Handle::current(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_searches_only_the_last_value() {
        let source = MockAirportSource::new();
        let controller = controller(&source);

        for query in ["a", "ab", "abc"] {
            controller.set_query(query);
            time::sleep(Duration::from_millis(100)).await;
        }
        let state = controller.wait_until_idle().await.unwrap();

        assert_eq!(source.calls(), vec!["abc"]);
        assert_eq!(state.query, "abc");
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn query_is_visible_before_it_settles() {
        let source = MockAirportSource::new();
        let controller = controller(&source);

        controller.set_query("teb");
        time::sleep(Duration::from_millis(50)).await;

        let state = controller.snapshot();
        assert_eq!(state.query, "teb");
        assert!(!state.is_loading);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn settling_on_the_same_value_twice_searches_once() {
        let source = MockAirportSource::new().respond("lax", vec![airport("KLAX")]);
        let controller = controller(&source);

        controller.set_query("lax");
        controller.wait_until_idle().await.unwrap();

        controller.set_query("la");
        controller.set_query("lax");
        let state = controller.wait_until_idle().await.unwrap();

        controller.set_query("lax");
        controller.wait_until_idle().await.unwrap();

        assert_eq!(source.calls(), vec!["lax"]);
        assert_eq!(state.results, vec![airport("KLAX")]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_query_clears_without_searching() {
        let source = MockAirportSource::new();
        let controller = controller(&source);

        controller.set_query("");
        let state = controller.wait_until_idle().await.unwrap();

        assert_eq!(source.call_count(), 0);
        assert!(state.results.is_empty());
        assert_eq!(state.error_message, None);
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_the_query_drops_previous_results() {
        let source = MockAirportSource::new().respond("lax", vec![airport("KLAX")]);
        let controller = controller(&source);

        controller.set_query("lax");
        assert_eq!(
            controller.wait_until_idle().await.unwrap().results.len(),
            1
        );

        controller.set_query("");
        let state = controller.wait_until_idle().await.unwrap();

        assert!(state.results.is_empty());
        assert!(!state.is_loading);
        assert_eq!(source.calls(), vec!["lax"]);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_the_query_cancels_the_running_search() {
        let source = MockAirportSource::new().respond_after(
            "lax",
            Duration::from_secs(5),
            vec![airport("KLAX")],
        );
        let controller = controller(&source);

        controller.set_query("lax");
        time::sleep(Duration::from_millis(500)).await;
        assert!(controller.snapshot().is_loading);

        controller.set_query("");
        controller.wait_until_idle().await.unwrap();
        time::sleep(Duration::from_secs(10)).await;

        let state = controller.snapshot();
        assert!(state.results.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_superseded_search_never_overwrites_newer_results() {
        let source = MockAirportSource::new()
            .respond_after("lax", Duration::from_secs(5), vec![airport("KLAX")])
            .respond_after("jfk", Duration::from_millis(100), vec![airport("KJFK")]);
        let controller = controller(&source);

        controller.set_query("lax");
        time::sleep(Duration::from_millis(500)).await;
        assert!(controller.snapshot().is_loading);

        controller.set_query("jfk");
        let state = controller.wait_until_idle().await.unwrap();
        assert_eq!(state.results, vec![airport("KJFK")]);

        // Well past the point where "lax" would have answered.
        time::sleep(Duration::from_secs(10)).await;

        assert_eq!(controller.snapshot().results, vec![airport("KJFK")]);
        assert_eq!(source.calls(), vec!["lax", "jfk"]);
    }

    #[tokio::test]
    async fn completion_for_a_superseded_id_is_ignored() {
        let source = MockAirportSource::new().respond_after(
            "lax",
            Duration::from_secs(3600),
            vec![],
        );
        let (mut actor, _commands, state) =
            SearchActor::new(Arc::new(source), SearchOptions::default(), Handle::current());

        actor.on_settled("lax".to_string());
        actor.on_settled("jfk".to_string());

        actor.on_completion(Completion {
            id: 2,
            result: Ok(vec![airport("KJFK")]),
        });
        actor.on_completion(Completion {
            id: 1,
            result: Ok(vec![airport("KLAX")]),
        });
        actor.on_completion(Completion {
            id: 1,
            result: Err(SearchFailure::Transport("reset".into())),
        });

        let state = state.borrow().clone();
        assert_eq!(state.results, vec![airport("KJFK")]);
        assert_eq!(state.error_message, None);
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn bad_status_sets_error_and_keeps_results() {
        let source = MockAirportSource::new()
            .respond("lax", vec![airport("KLAX")])
            .fail("zzz", SearchFailure::BadStatus(500))
            .fail("nowhere", SearchFailure::BadStatus(404));
        let controller = controller(&source);

        controller.set_query("lax");
        controller.wait_until_idle().await.unwrap();

        controller.set_query("zzz");
        let state = controller.wait_until_idle().await.unwrap();
        assert!(state.error_message.as_deref().unwrap().contains("500"));
        assert!(!state.is_loading);
        assert_eq!(state.results, vec![airport("KLAX")]);

        controller.set_query("nowhere");
        let state = controller.wait_until_idle().await.unwrap();
        assert!(state.error_message.as_deref().unwrap().contains("404"));
        assert_eq!(state.results, vec![airport("KLAX")]);
    }

    #[tokio::test(start_paused = true)]
    async fn next_search_clears_previous_error() {
        let source = MockAirportSource::new()
            .fail("zzz", SearchFailure::Decode("eof".into()))
            .respond("teb", vec![airport("KTEB")]);
        let controller = controller(&source);

        controller.set_query("zzz");
        let state = controller.wait_until_idle().await.unwrap();
        assert!(state
            .error_message
            .as_deref()
            .unwrap()
            .starts_with("Data Decoding Error"));

        controller.set_query("teb");
        let state = controller.wait_until_idle().await.unwrap();
        assert_eq!(state.error_message, None);
        assert_eq!(state.results, vec![airport("KTEB")]);
    }

    struct PanickingSource;

    #[async_trait]
    impl AirportSource for PanickingSource {
        async fn search(&self, _query: &str) -> Result<Vec<Airport>, SearchFailure> {
            panic!("source exploded");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_source_is_reported_as_unexpected_error() {
        let controller = AirportSearchController::spawn(
            Arc::new(PanickingSource),
            SearchOptions::default(),
            &Handle::current(),
        );

        controller.set_query("lax");
        let state = controller.wait_until_idle().await.unwrap();

        assert!(state
            .error_message
            .as_deref()
            .unwrap()
            .starts_with("An unexpected error occurred"));
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_twice_or_after_completion_is_harmless() {
        let source: Arc<dyn AirportSource> = Arc::new(
            MockAirportSource::new()
                .respond_after("lax", Duration::from_secs(1), vec![airport("KLAX")])
                .respond("jfk", vec![airport("KJFK")]),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();

        let running =
            InFlightSearch::spawn(&Handle::current(), 1, "lax".into(), source.clone(), tx.clone());
        time::sleep(Duration::from_millis(100)).await;
        running.cancel();
        running.cancel();
        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());

        let finished = InFlightSearch::spawn(&Handle::current(), 2, "jfk".into(), source, tx);
        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.id, 2);
        assert_eq!(completion.result, Ok(vec![airport("KJFK")]));

        finished.cancel();
        finished.cancel();
        drop(finished);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_in_flight_search_and_freezes_state() {
        let source = MockAirportSource::new().respond_after(
            "lax",
            Duration::from_secs(10),
            vec![airport("KLAX")],
        );
        let controller = controller(&source);

        controller.set_query("lax");
        time::sleep(Duration::from_millis(500)).await;
        let before = controller.snapshot();
        assert!(before.is_loading);

        controller.shutdown();
        controller.shutdown();
        time::sleep(Duration::from_secs(20)).await;

        assert_eq!(controller.snapshot(), before);
        assert!(controller.wait_until_idle().await.is_none());
        controller.set_query("jfk");
        assert_eq!(source.calls(), vec!["lax"]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_discards_pending_edit() {
        let source = MockAirportSource::new();
        let controller = controller(&source);

        controller.set_query("abc");
        controller.shutdown();
        time::sleep(Duration::from_secs(1)).await;

        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slots_do_not_interfere() {
        let source = MockAirportSource::new()
            .respond_after("las", Duration::from_millis(300), vec![airport("KLAS")])
            .respond_after("teb", Duration::from_millis(50), vec![airport("KTEB")]);
        let departure = controller(&source);
        let arrival = controller(&source);

        departure.set_query("las");
        arrival.set_query("teb");
        let (departure_state, arrival_state) =
            tokio::join!(departure.wait_until_idle(), arrival.wait_until_idle());

        assert_eq!(departure_state.unwrap().results, vec![airport("KLAS")]);
        assert_eq!(arrival_state.unwrap().results, vec![airport("KTEB")]);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_loading_then_results() {
        let source = MockAirportSource::new().respond_after(
            "jfk",
            Duration::from_millis(200),
            vec![airport("KJFK")],
        );
        let controller = controller(&source);
        let mut updates = controller.subscribe();

        controller.set_query("jfk");
        updates.wait_for(|s| s.is_loading).await.unwrap();
        let state = updates
            .wait_for(|s| !s.is_loading && !s.results.is_empty())
            .await
            .unwrap()
            .clone();

        assert_eq!(state.results, vec![airport("KJFK")]);
    }

    async fn las_vegas_search(
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<serde_json::Value> {
        let content = if params.get("query").map(String::as_str) == Some("Las Vegas") {
            json!([{
                "aid": "1",
                "name": "Harry Reid International Airport",
                "icao": "KLAS",
                "iata": "LAS",
                "servedCity": "Las Vegas",
                "country": {
                    "iso2": "US",
                    "iso3": "USA",
                    "isoNumeric": 840,
                    "name": "United States",
                    "officialName": "United States of America"
                },
                "coordinates": { "latitude": 36.08, "longitude": -115.15 }
            }])
        } else {
            json!([])
        };

        Json(json!({
            "page": { "number": 0, "size": 10, "totalPages": 1, "totalResults": 1 },
            "content": content
        }))
    }

    #[tokio::test]
    async fn las_vegas_search_over_http() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route("/free/airports/search", get(las_vegas_search));
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let url = AviowikiURL::parse(&format!("http://{addr}/free/airports/search")).unwrap();
        let controller = AirportSearchController::spawn(
            Arc::new(AviowikiClient::new(url)),
            SearchOptions::default(),
            &Handle::current(),
        );

        controller.set_query("Las Vegas");
        let state = time::timeout(Duration::from_secs(10), controller.wait_until_idle())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            state,
            SearchViewState {
                query: "Las Vegas".to_string(),
                results: vec![Airport {
                    id: "1".to_string(),
                    name: "Harry Reid International Airport".to_string(),
                    icao: Some("KLAS".to_string()),
                    iata: Some("LAS".to_string()),
                    served_city: Some("Las Vegas".to_string()),
                    country_name: "United States".to_string(),
                }],
                is_loading: false,
                error_message: None,
            }
        );
    }
}
