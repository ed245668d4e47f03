use crate::i18n::{self, Text};
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, PickerKind, PickerOption};
use crate::state::messages::UiEvent;
use crate::state::orchestrator::{PlaybackContext, SeriesBundle, Settled};
use crate::state::playback::TickOutcome;
use log::{debug, error, warn};
use olympics_api::client::MIN_SEARCH_CHARS;
use olympics_api::{
    AthleteProfile, AthleteSearchResult, AthleteStats, FilterOptions, FilterState, YearSelection,
};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Overview,
    Athletes,
    Biometrics,
    Evolution,
    Search,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(ticks: mpsc::Sender<UiEvent>) -> Self {
        let settings = AppSettings::load();

        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        Self::with_settings(settings, ticks)
    }

    pub fn with_settings(settings: AppSettings, ticks: mpsc::Sender<UiEvent>) -> Self {
        let preferences = settings.preferences;
        Self {
            state: AppState::new(ticks, preferences.playback_speed, preferences.language),
            settings,
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_filters_loaded(&mut self, options: FilterOptions) {
        debug!("filters loaded: {} years", options.years.len());
        self.state.filters.load_options(options);
    }

    pub fn on_filters_failed(&mut self, message: String) {
        error!("filter metadata unavailable: {message}");
        let headline = i18n::t(self.state.language, Text::BackendUnreachable);
        self.state.init_error = Some(format!("{headline}: {message}"));
    }

    /// Apply the outcome of an orchestration cycle. Cached hits arrive here as
    /// [`Settled::Applied`] too.
    pub fn on_series_settled(&mut self, filters: FilterState, settled: Settled) {
        match settled {
            Settled::Applied(bundle) => self.on_series_applied(filters, bundle),
            Settled::Failed(message) => {
                error!("series fetch failed: {message}");
                self.state.last_error = Some(message);
            }
            Settled::Suppressed | Settled::Stale => {}
        }
    }

    fn on_series_applied(&mut self, filters: FilterState, bundle: Arc<SeriesBundle>) {
        self.state.last_error = None;
        self.state.dashboard.apply(filters, bundle);
        let rows = self.top_athletes().len();
        if self.state.top_athlete_selected >= rows {
            self.state.top_athlete_selected = rows.saturating_sub(1);
        }
        let medal_rows = self.medal_rows();
        self.state.medal_table.clamp_scroll(medal_rows);
    }

    pub fn set_series_loading(&mut self, loading: bool) {
        self.state.series_loading = loading;
    }

    pub fn on_search_results(&mut self, query: String, results: Vec<AthleteSearchResult>) {
        if query != self.state.search.input.trim() {
            debug!("discarding results for stale query {query:?}");
            return;
        }
        self.state.search.results = results;
        self.state.search.selected = 0;
        self.state.search.error = None;
    }

    pub fn on_search_failed(&mut self, query: String, message: String) {
        if query != self.state.search.input.trim() {
            return;
        }
        warn!("athlete search failed: {message}");
        self.state.search.error = Some(message);
    }

    pub fn on_athlete_loaded(&mut self, profile: AthleteProfile, stats: AthleteStats) {
        if self.state.athlete.selected != Some(profile.id) {
            return;
        }
        let panel = &mut self.state.athlete;
        panel.loading = false;
        panel.error = None;
        panel.scroll_offset = 0;
        panel.profile = Some(profile);
        panel.stats = Some(stats);
    }

    pub fn on_athlete_failed(&mut self, id: u64, message: String) {
        if self.state.athlete.selected != Some(id) {
            return;
        }
        warn!("athlete {id} failed to load: {message}");
        self.state.athlete.loading = false;
        self.state.athlete.error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Playback
    // -----------------------------------------------------------------------

    pub fn on_playback_tick(&mut self, generation: u64) -> TickOutcome {
        let loading = self.state.series_loading;
        self.state.playback.on_tick(generation, &mut self.state.filters, loading)
    }

    pub fn toggle_playback(&mut self) -> bool {
        let year = self.state.filters.state().year;
        self.state.playback.toggle(year, self.state.series_loading)
    }

    pub fn cycle_playback_speed(&mut self) {
        let speed = self.state.playback.speed().next();
        self.state.playback.set_speed(speed);
        self.settings.preferences.playback_speed = speed;
        self.save_preferences();
    }

    /// What the orchestrator needs to know about playback for `filters`.
    pub fn playback_context(&self, filters: &FilterState) -> PlaybackContext {
        let playing = self.state.playback.is_playing();
        let next_year = match filters.year {
            YearSelection::Specific(year) if playing => self.state.filters.next_year_after(year),
            _ => None,
        };
        PlaybackContext { playing, next_year }
    }

    // -----------------------------------------------------------------------
    // Filters
    // -----------------------------------------------------------------------

    pub fn cycle_season(&mut self) {
        let season = self.state.filters.state().season.next();
        self.state.filters.set_season(season);
    }

    pub fn cycle_sex(&mut self) {
        let sex = self.state.filters.state().sex.next();
        self.state.filters.set_sex(sex);
    }

    pub fn cycle_medal_type(&mut self) {
        let medal_type = self.state.filters.state().medal_type.next();
        self.state.filters.set_medal_type(medal_type);
    }

    pub fn step_year(&mut self, delta: isize) {
        self.state.filters.step_year(delta);
    }

    /// Entering all-years mode stops playback.
    pub fn toggle_all_years(&mut self) {
        self.state.filters.toggle_all_years();
        if self.state.filters.state().year.is_all_years() {
            self.state.playback.pause();
        }
    }

    pub fn open_picker(&mut self, kind: PickerKind) {
        let language = self.state.language;
        let filters = &self.state.filters;
        let (options, current) = match kind {
            PickerKind::Country => (
                filters
                    .countries()
                    .iter()
                    .map(|c| PickerOption {
                        value: c.code.clone(),
                        label: i18n::country_label(language, &c.code, &c.label),
                    })
                    .collect(),
                filters.state().country.clone(),
            ),
            PickerKind::Sport => (
                filters
                    .sports()
                    .iter()
                    .map(|s| PickerOption { value: s.clone(), label: i18n::sport_label(language, s) })
                    .collect(),
                filters.state().sport.clone(),
            ),
        };
        self.state.picker.open(kind, options, &current);
    }

    pub fn confirm_picker(&mut self) {
        if let (Some(kind), Some(value)) = (self.state.picker.kind, self.state.picker.chosen()) {
            match kind {
                PickerKind::Country => self.state.filters.set_country(value),
                PickerKind::Sport => self.state.filters.set_sport(value),
            }
        }
        self.state.picker.close();
    }

    // -----------------------------------------------------------------------
    // Search and athletes
    // -----------------------------------------------------------------------

    pub fn start_search(&mut self) {
        self.update_tab(MenuItem::Search);
        self.state.search.composing = true;
    }

    pub fn search_push(&mut self, c: char) {
        self.state.search.input.push(c);
    }

    pub fn search_pop(&mut self) {
        self.state.search.input.pop();
    }

    /// A debounced query settled. Returns the query to send, or `None` when
    /// it is too short to search (results are cleared instead).
    pub fn on_search_settled(&mut self, query: String) -> Option<String> {
        let query = query.trim().to_string();
        if query != self.state.search.input.trim() {
            return None;
        }
        if query.chars().count() < MIN_SEARCH_CHARS {
            self.state.search.results.clear();
            self.state.search.error = None;
            return None;
        }
        Some(query)
    }

    /// Open the profile for `id`. Returns the id to load, or `None` if it is
    /// already shown.
    pub fn select_athlete(&mut self, id: u64) -> Option<u64> {
        if self.state.athlete.selected == Some(id) && self.state.athlete.profile.is_some() {
            return None;
        }
        self.state.athlete.selected = Some(id);
        self.state.athlete.profile = None;
        self.state.athlete.stats = None;
        self.state.athlete.error = None;
        self.state.athlete.loading = true;
        Some(id)
    }

    pub fn select_search_result(&mut self) -> Option<u64> {
        self.state.search.composing = false;
        let id = self.state.search.selected_result()?.id;
        self.select_athlete(id)
    }

    pub fn select_top_athlete(&mut self) -> Option<u64> {
        let id = self.top_athletes().get(self.state.top_athlete_selected)?.id;
        self.update_tab(MenuItem::Search);
        self.select_athlete(id)
    }

    pub fn top_athlete_down(&mut self) {
        if self.state.top_athlete_selected + 1 < self.top_athletes().len() {
            self.state.top_athlete_selected += 1;
        }
    }

    pub fn top_athlete_up(&mut self) {
        self.state.top_athlete_selected = self.state.top_athlete_selected.saturating_sub(1);
    }

    pub fn medal_table_down(&mut self) {
        let rows = self.medal_rows();
        self.state.medal_table.scroll_down(rows);
    }

    fn medal_rows(&self) -> usize {
        self.state.dashboard.bundle.as_deref().map_or(0, |b| b.medals.len())
    }

    fn top_athletes(&self) -> &[olympics_api::TopAthlete] {
        self.state
            .dashboard
            .bundle
            .as_deref()
            .map(|b| b.top_athletes.as_slice())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Tabs, language and preferences
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn toggle_language(&mut self) {
        self.state.language = self.state.language.next();
        self.settings.preferences.language = self.state.language;
        self.save_preferences();
    }

    pub fn save_preferences(&self) {
        if let Err(e) = self.settings.save_preferences() {
            warn!("could not save preferences: {e:#}");
        }
    }
}
