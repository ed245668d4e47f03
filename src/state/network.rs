use crate::state::messages::{NetworkRequest, NetworkResponse};
use futures_util::future::try_join;
use log::{debug, error};
use olympics_api::backend::StatsBackend;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Serves the requests that sit outside the filter pipeline: startup
/// metadata, athlete search and athlete profiles.
pub struct NetworkWorker<B> {
    client: Arc<B>,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl<B: StatsBackend> NetworkWorker<B> {
    pub fn new(
        client: Arc<B>,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let response = match request {
                NetworkRequest::LoadFilters => self.handle_load_filters().await,
                NetworkRequest::SearchAthletes { query } => self.handle_search(query).await,
                NetworkRequest::LoadAthlete { id } => self.handle_load_athlete(id).await,
            };

            debug!("network request complete");
            let is_ok = !matches!(
                response,
                NetworkResponse::FiltersFailed { .. }
                    | NetworkResponse::SearchFailed { .. }
                    | NetworkResponse::AthleteFailed { .. }
            );
            self.stop_loading_animation(is_ok).await;

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_filters(&self) -> NetworkResponse {
        debug!("loading filter options");
        match self.client.filters().await {
            Ok(options) => NetworkResponse::FiltersLoaded { options },
            Err(e) => NetworkResponse::FiltersFailed { message: e.to_string() },
        }
    }

    async fn handle_search(&self, query: String) -> NetworkResponse {
        debug!("searching athletes for {query:?}");
        match self.client.search_athletes(&query).await {
            Ok(results) => NetworkResponse::SearchResults { query, results },
            Err(e) => NetworkResponse::SearchFailed { query, message: e.to_string() },
        }
    }

    /// Profile and stats are requested together; either failing fails both.
    async fn handle_load_athlete(&self, id: u64) -> NetworkResponse {
        debug!("loading athlete {id}");
        let profile = self.client.athlete_profile(id);
        let stats = self.client.athlete_stats(id);
        match try_join(profile, stats).await {
            Ok((profile, stats)) => NetworkResponse::AthleteLoaded { profile, stats },
            Err(e) => NetworkResponse::AthleteFailed { id, message: e.to_string() },
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::orchestrator::tests::FakeBackend;

    async fn run_one(
        backend: Arc<FakeBackend>,
        request: NetworkRequest,
    ) -> NetworkResponse {
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(64);
        tokio::spawn(NetworkWorker::new(backend, req_rx, resp_tx).run());
        req_tx.send(request).await.unwrap();

        loop {
            match resp_rx.recv().await {
                Some(NetworkResponse::LoadingStateChanged { .. }) => continue,
                Some(response) => return response,
                None => panic!("worker stopped without answering"),
            }
        }
    }

    #[tokio::test]
    async fn selecting_an_athlete_requests_profile_and_stats_once_each() {
        let backend = Arc::new(FakeBackend::default());
        let response = run_one(backend.clone(), NetworkRequest::LoadAthlete { id: 42 }).await;

        assert!(matches!(response, NetworkResponse::AthleteLoaded { ref profile, .. } if profile.id == 42));
        let mut calls = backend.calls();
        calls.sort();
        assert_eq!(calls, vec!["profile 42".to_string(), "stats 42".to_string()]);
    }

    #[tokio::test]
    async fn athlete_failure_is_scoped_to_the_athlete() {
        let backend = Arc::new(FakeBackend { fail_athlete_stats: true, ..Default::default() });
        let response = run_one(backend.clone(), NetworkRequest::LoadAthlete { id: 7 }).await;

        match response {
            NetworkResponse::AthleteFailed { id, message } => {
                assert_eq!(id, 7);
                assert!(message.contains("athlete stats"));
            }
            other => panic!("expected an athlete failure, got {other:?}"),
        }
        assert_eq!(backend.count("profile 7"), 1);
        assert_eq!(backend.count("map"), 0);
    }

    #[tokio::test]
    async fn search_results_carry_their_query() {
        let backend = Arc::new(FakeBackend::default());
        let response =
            run_one(backend, NetworkRequest::SearchAthletes { query: "nurmi".into() }).await;
        assert!(matches!(response, NetworkResponse::SearchResults { ref query, .. } if query == "nurmi"));
    }
}
