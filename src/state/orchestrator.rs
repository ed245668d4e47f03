use crate::state::cache::{CacheKey, SeriesCache};
use crate::state::messages::NetworkResponse;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use log::{debug, warn};
use olympics_api::backend::StatsBackend;
use olympics_api::client::{ApiResult, DEFAULT_TOP_ATHLETES};
use olympics_api::{
    BiometricPoint, EvolutionPoint, FilterState, GenderStat, MapStat, MedalStat, TopAthlete,
    YearSelection,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Every series one filter state needs, applied to the charts as a unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesBundle {
    pub map: Vec<MapStat>,
    pub biometrics: Vec<BiometricPoint>,
    pub evolution: Arc<Vec<EvolutionPoint>>,
    pub medals: Vec<MedalStat>,
    pub top_athletes: Vec<TopAthlete>,
    pub gender: Vec<GenderStat>,
}

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<SeriesBundle>, String>>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackContext {
    pub playing: bool,
    /// Year playback moves to after the requested one, if any.
    pub next_year: Option<u16>,
}

#[derive(Debug)]
pub enum Resolution {
    Cached(Arc<SeriesBundle>),
    Fetching { generation: u64 },
}

#[derive(Debug)]
pub enum Settled {
    Applied(Arc<SeriesBundle>),
    /// Shown to the user.
    Failed(String),
    /// Failed during playback; logged only.
    Suppressed,
    /// Superseded by a newer request; already cached under its own key.
    Stale,
}

/// Turns settled filter states into chart data.
///
/// Each request gets a generation number. Only the response matching the
/// latest generation may change what is displayed or the loading flag, but
/// every successful response is cached under the filters it was issued for.
pub struct DataOrchestrator<B> {
    backend: Arc<B>,
    cache: SeriesCache,
    responses: mpsc::Sender<NetworkResponse>,
    generation: u64,
    loading: bool,
    /// Fetches still running, foreground or prefetch, by bundle key.
    in_flight: HashMap<CacheKey, SharedFetch>,
}

impl<B: StatsBackend> DataOrchestrator<B> {
    pub fn new(backend: Arc<B>, cache: SeriesCache, responses: mpsc::Sender<NetworkResponse>) -> Self {
        Self {
            backend,
            cache,
            responses,
            generation: 0,
            loading: false,
            in_flight: HashMap::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&mut self, filters: FilterState, playback: PlaybackContext) -> Resolution {
        self.generation += 1;
        let generation = self.generation;
        self.in_flight.retain(|_, fetch| fetch.peek().is_none());

        let resolution = match self.cache.bundle(&filters) {
            Some(bundle) => {
                debug!("series cache hit for {}", filters.year);
                self.loading = false;
                Resolution::Cached(bundle)
            }
            None => {
                self.loading = true;
                let running = self.in_flight.get(&CacheKey::series(&filters)).cloned();
                let fetch = match running {
                    Some(running) => {
                        debug!("joining running fetch for {} (request {generation})", filters.year);
                        running
                    }
                    None => {
                        debug!("fetching series for {} (request {generation})", filters.year);
                        self.start_fetch(&filters)
                    }
                };
                let responses = self.responses.clone();
                let filters = filters.clone();
                tokio::spawn(async move {
                    let result = fetch.await;
                    let _ = responses
                        .send(NetworkResponse::SeriesLoaded { generation, filters, result })
                        .await;
                });
                Resolution::Fetching { generation }
            }
        };

        if playback.playing
            && let Some(next_year) = playback.next_year
        {
            self.prefetch(filters.with_year(YearSelection::Specific(next_year)));
        }

        resolution
    }

    /// Classify a settled fetch. `playing` is read when the response arrives.
    pub fn on_settled(
        &mut self,
        generation: u64,
        result: Result<Arc<SeriesBundle>, String>,
        playing: bool,
    ) -> Settled {
        if generation != self.generation {
            debug!("dropping series response {generation}, latest is {}", self.generation);
            return Settled::Stale;
        }
        self.loading = false;

        match result {
            Ok(bundle) => Settled::Applied(bundle),
            Err(message) if playing => {
                warn!("series fetch failed during playback: {message}");
                Settled::Suppressed
            }
            Err(message) => Settled::Failed(message),
        }
    }

    fn prefetch(&mut self, filters: FilterState) {
        if self.cache.is_warm(&filters) || self.in_flight.contains_key(&CacheKey::series(&filters)) {
            return;
        }
        debug!("prefetching series for {}", filters.year);
        let fetch = self.start_fetch(&filters);
        tokio::spawn(async move {
            if let Err(e) = fetch.await {
                debug!("prefetch for {} failed: {e}", filters.year);
            }
        });
    }

    /// Start fetching the bundle for `filters` and register it so later
    /// requests for the same key wait on it instead of fetching again.
    fn start_fetch(&mut self, filters: &FilterState) -> SharedFetch {
        let backend = self.backend.clone();
        let cache = self.cache.clone();
        let owned = filters.clone();
        let fetch = async move {
            fetch_and_store(backend.as_ref(), &cache, &owned)
                .await
                .map_err(|e| e.to_string())
        }
        .boxed()
        .shared();
        self.in_flight.insert(CacheKey::series(filters), fetch.clone());
        fetch
    }
}

/// Fetch every series concurrently and cache the result. The evolution series
/// is reused from the cache when fresh, since it does not depend on the year.
pub async fn fetch_and_store<B: StatsBackend>(
    backend: &B,
    cache: &SeriesCache,
    filters: &FilterState,
) -> ApiResult<Arc<SeriesBundle>> {
    let cached_evolution = cache.evolution(filters);
    let evolution_was_cached = cached_evolution.is_some();
    let evolution = async {
        match cached_evolution {
            Some(series) => Ok(series),
            None => backend.evolution(filters, &[]).await.map(Arc::new),
        }
    };

    let (map, biometrics, medals, top_athletes, gender, evolution) = futures_util::try_join!(
        backend.map_stats(filters),
        backend.biometrics(filters),
        backend.medal_table(filters),
        backend.top_athletes(filters, DEFAULT_TOP_ATHLETES),
        backend.gender(filters),
        evolution,
    )?;

    if !evolution_was_cached {
        cache.put_evolution(filters, evolution.clone());
    }
    let bundle = Arc::new(SeriesBundle { map, biometrics, evolution, medals, top_athletes, gender });
    cache.put_bundle(filters, bundle.clone());
    Ok(bundle)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use olympics_api::client::ApiError;
    use olympics_api::{
        AthleteProfile, AthleteSearchResult, AthleteStats, FilterOptions, Season,
    };
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory backend that records calls and can be told to fail.
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        pub calls: Mutex<Vec<String>>,
        pub failing_years: Mutex<HashSet<u16>>,
        pub fail_athlete_stats: bool,
        /// How long each map request takes to answer.
        pub delay: std::time::Duration,
    }

    impl FakeBackend {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, prefix: &str) -> usize {
            self.calls().iter().filter(|c| c.starts_with(prefix)).count()
        }

        pub fn fail_year(&self, year: u16) {
            self.failing_years.lock().unwrap().insert(year);
        }

        fn check(&self, op: &'static str, filters: &FilterState) -> ApiResult<()> {
            if let Some(year) = filters.year.specific()
                && self.failing_years.lock().unwrap().contains(&year)
            {
                return Err(ApiError::Other(format!("{op} unavailable for {year}")));
            }
            Ok(())
        }
    }

    impl StatsBackend for FakeBackend {
        async fn filters(&self) -> ApiResult<FilterOptions> {
            self.record("filters".into());
            Ok(FilterOptions { years: vec![2000, 2004, 2008], ..Default::default() })
        }

        async fn map_stats(&self, filters: &FilterState) -> ApiResult<Vec<MapStat>> {
            self.record(format!("map {}", filters.year));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.check("map stats", filters)?;
            Ok(vec![MapStat { id: filters.year.to_string(), total: 1, ..Default::default() }])
        }

        async fn biometrics(&self, filters: &FilterState) -> ApiResult<Vec<BiometricPoint>> {
            self.record(format!("biometrics {}", filters.year));
            self.check("biometrics", filters)?;
            Ok(Vec::new())
        }

        async fn evolution(
            &self,
            filters: &FilterState,
            _countries: &[String],
        ) -> ApiResult<Vec<EvolutionPoint>> {
            self.record(format!("evolution {:?}", filters.season));
            Ok(vec![EvolutionPoint { year: 2000, ..Default::default() }])
        }

        async fn medal_table(&self, filters: &FilterState) -> ApiResult<Vec<MedalStat>> {
            self.record(format!("medals {}", filters.year));
            self.check("medal table", filters)?;
            Ok(Vec::new())
        }

        async fn top_athletes(&self, filters: &FilterState, limit: u32) -> ApiResult<Vec<TopAthlete>> {
            self.record(format!("top {} limit={limit}", filters.year));
            self.check("top athletes", filters)?;
            Ok(Vec::new())
        }

        async fn gender(&self, filters: &FilterState) -> ApiResult<Vec<GenderStat>> {
            self.record(format!("gender {}", filters.year));
            self.check("gender stats", filters)?;
            Ok(Vec::new())
        }

        async fn search_athletes(&self, query: &str) -> ApiResult<Vec<AthleteSearchResult>> {
            self.record(format!("search {query}"));
            Ok(vec![AthleteSearchResult { id: 1, name: query.to_string(), ..Default::default() }])
        }

        async fn athlete_profile(&self, id: u64) -> ApiResult<AthleteProfile> {
            self.record(format!("profile {id}"));
            Ok(AthleteProfile { id, name: "Paavo Nurmi".into(), ..Default::default() })
        }

        async fn athlete_stats(&self, id: u64) -> ApiResult<AthleteStats> {
            self.record(format!("stats {id}"));
            if self.fail_athlete_stats {
                return Err(ApiError::NotFound("athlete stats", "Athlete not found".into()));
            }
            Ok(AthleteStats::default())
        }
    }

    fn year(y: u16) -> FilterState {
        FilterState { year: YearSelection::Specific(y), ..Default::default() }
    }

    fn orchestrator(
        backend: Arc<FakeBackend>,
    ) -> (DataOrchestrator<FakeBackend>, mpsc::Receiver<NetworkResponse>) {
        let (tx, rx) = mpsc::channel(16);
        (DataOrchestrator::new(backend, SeriesCache::default(), tx), rx)
    }

    async fn settle(
        orchestrator: &mut DataOrchestrator<FakeBackend>,
        rx: &mut mpsc::Receiver<NetworkResponse>,
        playing: bool,
    ) -> Settled {
        match rx.recv().await {
            Some(NetworkResponse::SeriesLoaded { generation, result, .. }) => {
                orchestrator.on_settled(generation, result, playing)
            }
            other => panic!("expected series response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn miss_fetches_all_series_once_then_hits_the_cache() {
        let backend = Arc::new(FakeBackend::default());
        let (mut orchestrator, mut rx) = orchestrator(backend.clone());

        let resolution = orchestrator.request(year(2004), PlaybackContext::default());
        assert!(matches!(resolution, Resolution::Fetching { generation: 1 }));
        assert!(orchestrator.is_loading());

        let Settled::Applied(bundle) = settle(&mut orchestrator, &mut rx, false).await else {
            panic!("expected the bundle to apply");
        };
        assert_eq!(bundle.map[0].id, "2004");
        assert!(!orchestrator.is_loading());
        for series in ["map", "biometrics", "medals", "top", "gender", "evolution"] {
            assert_eq!(backend.count(series), 1, "{series}");
        }
        assert_eq!(backend.count("top 2004 limit=10"), 1);

        let resolution = orchestrator.request(year(2004), PlaybackContext::default());
        assert!(matches!(resolution, Resolution::Cached(_)));
        assert!(!orchestrator.is_loading());
        assert_eq!(backend.count("map"), 1);
    }

    #[tokio::test]
    async fn evolution_is_reused_across_years() {
        let backend = Arc::new(FakeBackend::default());
        let (mut orchestrator, mut rx) = orchestrator(backend.clone());

        orchestrator.request(year(2000), PlaybackContext::default());
        settle(&mut orchestrator, &mut rx, false).await;
        orchestrator.request(year(2004), PlaybackContext::default());
        let Settled::Applied(bundle) = settle(&mut orchestrator, &mut rx, false).await else {
            panic!("expected the bundle to apply");
        };

        assert_eq!(backend.count("evolution"), 1);
        assert_eq!(backend.count("map"), 2);
        assert_eq!(bundle.evolution[0].year, 2000);

        let winter = FilterState { season: Season::Winter, ..year(2004) };
        orchestrator.request(winter, PlaybackContext::default());
        settle(&mut orchestrator, &mut rx, false).await;
        assert_eq!(backend.count("evolution"), 2);
    }

    #[tokio::test]
    async fn failure_is_visible_outside_playback_and_suppressed_during_it() {
        let backend = Arc::new(FakeBackend::default());
        backend.fail_year(2008);
        let (mut orchestrator, mut rx) = orchestrator(backend.clone());

        orchestrator.request(year(2008), PlaybackContext::default());
        let settled = settle(&mut orchestrator, &mut rx, false).await;
        assert!(matches!(settled, Settled::Failed(ref m) if m.contains("2008")));
        assert!(!orchestrator.is_loading());

        orchestrator.request(year(2008), PlaybackContext { playing: true, next_year: None });
        let settled = settle(&mut orchestrator, &mut rx, true).await;
        assert!(matches!(settled, Settled::Suppressed));
        assert!(!orchestrator.is_loading());
    }

    #[tokio::test]
    async fn only_the_latest_request_is_applied() {
        let backend = Arc::new(FakeBackend::default());
        let (mut orchestrator, mut rx) = orchestrator(backend.clone());

        orchestrator.request(year(2000), PlaybackContext::default());
        orchestrator.request(year(2004), PlaybackContext::default());

        let mut outcomes = Vec::new();
        for _ in 0..2 {
            outcomes.push(settle(&mut orchestrator, &mut rx, false).await);
        }
        let applied: Vec<_> = outcomes
            .iter()
            .filter_map(|s| match s {
                Settled::Applied(bundle) => Some(bundle.map[0].id.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(applied, vec!["2004".to_string()]);
        assert!(outcomes.iter().any(|s| matches!(s, Settled::Stale)));
        assert!(!orchestrator.is_loading());

        // The superseded response still landed in the cache.
        assert!(matches!(
            orchestrator.request(year(2000), PlaybackContext::default()),
            Resolution::Cached(_)
        ));
    }

    #[tokio::test]
    async fn playback_prefetches_the_next_year_in_the_background() {
        let backend = Arc::new(FakeBackend::default());
        let (mut orchestrator, mut rx) = orchestrator(backend.clone());
        let cache = orchestrator.cache.clone();

        orchestrator.request(year(2000), PlaybackContext { playing: true, next_year: Some(2004) });
        settle(&mut orchestrator, &mut rx, true).await;

        for _ in 0..100 {
            if cache.is_warm(&year(2004)) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(cache.is_warm(&year(2004)));
        assert!(rx.try_recv().is_err(), "prefetch must not report to the main loop");

        let resolution = orchestrator.request(year(2004), PlaybackContext::default());
        assert!(matches!(resolution, Resolution::Cached(_)));
    }

    #[tokio::test]
    async fn failed_prefetch_is_silent() {
        let backend = Arc::new(FakeBackend::default());
        backend.fail_year(2004);
        let (mut orchestrator, mut rx) = orchestrator(backend.clone());

        orchestrator.request(year(2000), PlaybackContext { playing: true, next_year: Some(2004) });
        let settled = settle(&mut orchestrator, &mut rx, true).await;
        assert!(matches!(settled, Settled::Applied(_)));

        for _ in 0..100 {
            if backend.count("map 2004") == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(backend.count("map 2004"), 1);
        assert!(!orchestrator.is_loading());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn warm_next_year_is_not_prefetched_again() {
        let backend = Arc::new(FakeBackend::default());
        let (mut orchestrator, mut rx) = orchestrator(backend.clone());

        orchestrator.request(year(2004), PlaybackContext::default());
        settle(&mut orchestrator, &mut rx, false).await;
        orchestrator.request(year(2000), PlaybackContext { playing: true, next_year: Some(2004) });
        settle(&mut orchestrator, &mut rx, true).await;
        tokio::task::yield_now().await;

        assert_eq!(backend.count("map 2004"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn request_joins_a_prefetch_that_is_still_running() {
        let backend = Arc::new(FakeBackend {
            delay: std::time::Duration::from_secs(3),
            ..Default::default()
        });
        let (mut orchestrator, mut rx) = orchestrator(backend.clone());
        orchestrator.cache.put_bundle(&year(2000), Arc::new(SeriesBundle::default()));

        let playing = |next| PlaybackContext { playing: true, next_year: Some(next) };
        assert!(matches!(orchestrator.request(year(2000), playing(2004)), Resolution::Cached(_)));
        // A second look at 2000 must not start another 2004 prefetch.
        assert!(matches!(orchestrator.request(year(2000), playing(2004)), Resolution::Cached(_)));

        // Fast tick plus debounce: the 2004 prefetch is still waiting on the backend.
        tokio::time::advance(std::time::Duration::from_millis(1150)).await;
        let resolution = orchestrator.request(year(2004), playing(2008));
        assert!(matches!(resolution, Resolution::Fetching { generation: 3 }));
        assert!(orchestrator.is_loading());

        let Settled::Applied(bundle) = settle(&mut orchestrator, &mut rx, true).await else {
            panic!("expected the bundle to apply");
        };
        assert_eq!(bundle.map[0].id, "2004");
        assert_eq!(backend.count("map 2004"), 1);
        assert_eq!(backend.count("map 2008"), 1);
        assert!(!orchestrator.is_loading());
    }
}
