use crate::state::orchestrator::SeriesBundle;
use olympics_api::query::{QueryParams, evolution_params, filter_params};
use olympics_api::{EvolutionPoint, FilterState};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::{Duration, Instant};

pub const CACHE_TTL: Duration = Duration::from_secs(30);

/// Key/value store whose entries count as absent once they are `ttl` old.
///
/// Nothing is evicted: a stale entry just reads as a miss until the next
/// `put` for the same key replaces it.
#[derive(Debug)]
pub struct TimedCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V: Clone> TimedCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: HashMap::new() }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let (stored_at, value) = self.entries.get(key)?;
        (now.saturating_duration_since(*stored_at) < self.ttl).then(|| value.clone())
    }

    pub fn put(&mut self, key: K, value: V) {
        self.put_at(key, value, Instant::now());
    }

    pub fn put_at(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(key, (now, value));
    }

    pub fn is_fresh(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Canonical serialization of the filter fields that shape a response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for the year-scoped bundle.
    pub fn series(filters: &FilterState) -> Self {
        Self::from_params("series", filter_params(filters))
    }

    /// Key for the evolution series; the year never takes part.
    pub fn evolution(filters: &FilterState) -> Self {
        Self::from_params("evolution", evolution_params(filters, &[]))
    }

    fn from_params(prefix: &str, mut params: QueryParams) -> Self {
        params.sort();
        let query = params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        Self(format!("{prefix}?{query}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Shared series cache
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct SeriesEntries {
    bundles: TimedCache<CacheKey, Arc<SeriesBundle>>,
    evolution: TimedCache<CacheKey, Arc<Vec<EvolutionPoint>>>,
}

/// Cloneable handle to the dashboard's series cache.
///
/// The foreground request and background prefetches write through the same
/// handle, each under the key of the filters it was issued for.
#[derive(Debug, Clone)]
pub struct SeriesCache {
    inner: Arc<Mutex<SeriesEntries>>,
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::with_ttl(CACHE_TTL)
    }
}

impl SeriesCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SeriesEntries {
                bundles: TimedCache::new(ttl),
                evolution: TimedCache::new(ttl),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SeriesEntries> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn bundle(&self, filters: &FilterState) -> Option<Arc<SeriesBundle>> {
        self.lock().bundles.get(&CacheKey::series(filters))
    }

    pub fn put_bundle(&self, filters: &FilterState, bundle: Arc<SeriesBundle>) {
        self.lock().bundles.put(CacheKey::series(filters), bundle);
    }

    pub fn evolution(&self, filters: &FilterState) -> Option<Arc<Vec<EvolutionPoint>>> {
        self.lock().evolution.get(&CacheKey::evolution(filters))
    }

    pub fn put_evolution(&self, filters: &FilterState, series: Arc<Vec<EvolutionPoint>>) {
        self.lock().evolution.put(CacheKey::evolution(filters), series);
    }

    pub fn is_warm(&self, filters: &FilterState) -> bool {
        self.lock().bundles.is_fresh(&CacheKey::series(filters))
    }
}
