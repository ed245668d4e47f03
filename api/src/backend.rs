use crate::client::ApiResult;
use crate::{
    AthleteProfile, AthleteSearchResult, AthleteStats, BiometricPoint, EvolutionPoint,
    FilterOptions, FilterState, GenderStat, MapStat, MedalStat, TopAthlete,
};
use std::future::Future;

/// Read-only access to the stats backend.
///
/// [`crate::client::OlympicsApi`] is the HTTP implementation. Each call maps to
/// exactly one request (or none, for short search queries) and never caches.
pub trait StatsBackend: Send + Sync + 'static {
    fn filters(&self) -> impl Future<Output = ApiResult<FilterOptions>> + Send;

    fn map_stats(&self, filters: &FilterState) -> impl Future<Output = ApiResult<Vec<MapStat>>> + Send;

    fn biometrics(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = ApiResult<Vec<BiometricPoint>>> + Send;

    /// Year-independent; `countries` narrows the series to specific codes.
    fn evolution(
        &self,
        filters: &FilterState,
        countries: &[String],
    ) -> impl Future<Output = ApiResult<Vec<EvolutionPoint>>> + Send;

    fn medal_table(&self, filters: &FilterState)
    -> impl Future<Output = ApiResult<Vec<MedalStat>>> + Send;

    fn top_athletes(
        &self,
        filters: &FilterState,
        limit: u32,
    ) -> impl Future<Output = ApiResult<Vec<TopAthlete>>> + Send;

    fn gender(&self, filters: &FilterState) -> impl Future<Output = ApiResult<Vec<GenderStat>>> + Send;

    fn search_athletes(
        &self,
        query: &str,
    ) -> impl Future<Output = ApiResult<Vec<AthleteSearchResult>>> + Send;

    fn athlete_profile(&self, id: u64) -> impl Future<Output = ApiResult<AthleteProfile>> + Send;

    fn athlete_stats(&self, id: u64) -> impl Future<Output = ApiResult<AthleteStats>> + Send;
}
