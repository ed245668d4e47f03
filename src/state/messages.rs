use crate::state::network::LoadingState;
use crate::state::orchestrator::SeriesBundle;
use crossterm::event::KeyEvent;
use olympics_api::{AthleteProfile, AthleteSearchResult, AthleteStats, FilterOptions, FilterState};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadFilters,
    SearchAthletes { query: String },
    LoadAthlete { id: u64 },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    FiltersLoaded { options: FilterOptions },
    /// Startup metadata failed; the dashboard cannot offer any years.
    FiltersFailed { message: String },
    /// One orchestration cycle settled. `generation` identifies the request.
    SeriesLoaded {
        generation: u64,
        filters: FilterState,
        result: Result<Arc<SeriesBundle>, String>,
    },
    SearchResults { query: String, results: Vec<AthleteSearchResult> },
    SearchFailed { query: String, message: String },
    AthleteLoaded { profile: AthleteProfile, stats: AthleteStats },
    AthleteFailed { id: u64, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    PlaybackTick { generation: u64 },
}
