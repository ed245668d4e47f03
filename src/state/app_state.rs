use crate::app::MenuItem;
use crate::i18n::Language;
use crate::state::filters::FilterManager;
use crate::state::messages::UiEvent;
use crate::state::orchestrator::SeriesBundle;
use crate::state::playback::{PlaybackScheduler, PlaybackSpeed};
use chrono::Local;
use olympics_api::{AthleteProfile, AthleteSearchResult, AthleteStats, FilterState, MedalStat};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Dashboard series
// ---------------------------------------------------------------------------

/// The last bundle applied to the charts and the filters it was fetched for.
#[derive(Debug, Default)]
pub struct DashboardData {
    pub bundle: Option<Arc<SeriesBundle>>,
    pub filters: Option<FilterState>,
    pub updated_at: Option<String>,
}

impl DashboardData {
    pub fn apply(&mut self, filters: FilterState, bundle: Arc<SeriesBundle>) {
        self.bundle = Some(bundle);
        self.filters = Some(filters);
        self.updated_at = Some(Local::now().format("%H:%M:%S").to_string());
    }
}

// ---------------------------------------------------------------------------
// Medal table
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum SortColumn {
    Gold,
    Silver,
    Bronze,
    #[default]
    Total,
    Name,
}

impl SortColumn {
    pub fn next(self) -> Self {
        match self {
            SortColumn::Total => SortColumn::Gold,
            SortColumn::Gold => SortColumn::Silver,
            SortColumn::Silver => SortColumn::Bronze,
            SortColumn::Bronze => SortColumn::Name,
            SortColumn::Name => SortColumn::Total,
        }
    }
}

#[derive(Debug)]
pub struct MedalTableState {
    pub column: SortColumn,
    pub descending: bool,
    pub scroll_offset: u16,
}

impl Default for MedalTableState {
    fn default() -> Self {
        Self { column: SortColumn::Total, descending: true, scroll_offset: 0 }
    }
}

impl MedalTableState {
    pub fn cycle_column(&mut self) {
        self.column = self.column.next();
        self.descending = self.column != SortColumn::Name;
        self.scroll_offset = 0;
    }

    pub fn flip_direction(&mut self) {
        self.descending = !self.descending;
    }

    /// Scroll one row down, stopping at the last of `rows`.
    pub fn scroll_down(&mut self, rows: usize) {
        if (self.scroll_offset as usize) + 1 < rows {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Keep the offset inside a table that may have shrunk.
    pub fn clamp_scroll(&mut self, rows: usize) {
        let last = rows.saturating_sub(1).min(u16::MAX as usize) as u16;
        self.scroll_offset = self.scroll_offset.min(last);
    }

    /// Rows in display order. Equal keys fall back to gold, silver and bronze
    /// (most first) and then the name.
    pub fn sorted<'a>(&self, rows: &'a [MedalStat]) -> Vec<&'a MedalStat> {
        let mut sorted: Vec<&MedalStat> = rows.iter().collect();
        sorted.sort_by(|a, b| {
            let primary = match self.column {
                SortColumn::Gold => a.gold.cmp(&b.gold),
                SortColumn::Silver => a.silver.cmp(&b.silver),
                SortColumn::Bronze => a.bronze.cmp(&b.bronze),
                SortColumn::Total => a.total.cmp(&b.total),
                SortColumn::Name => a.name.cmp(&b.name),
            };
            let primary = if self.descending { primary.reverse() } else { primary };
            primary.then_with(|| medal_tiebreak(a, b))
        });
        sorted
    }
}

fn medal_tiebreak(a: &MedalStat, b: &MedalStat) -> Ordering {
    b.gold
        .cmp(&a.gold)
        .then_with(|| b.silver.cmp(&a.silver))
        .then_with(|| b.bronze.cmp(&a.bronze))
        .then_with(|| a.name.cmp(&b.name))
}

// ---------------------------------------------------------------------------
// Athlete search and profile
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchState {
    pub input: String,
    pub composing: bool,
    pub results: Vec<AthleteSearchResult>,
    pub selected: usize,
    pub error: Option<String>,
}

impl SearchState {
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_result(&self) -> Option<&AthleteSearchResult> {
        self.results.get(self.selected)
    }
}

/// Independent of the filters: its own loading flag and error line.
#[derive(Debug, Default)]
pub struct AthletePanel {
    pub selected: Option<u64>,
    pub profile: Option<AthleteProfile>,
    pub stats: Option<AthleteStats>,
    pub loading: bool,
    pub error: Option<String>,
    pub scroll_offset: u16,
}

// ---------------------------------------------------------------------------
// Country / sport picker
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PickerKind {
    Country,
    Sport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickerOption {
    pub value: String,
    pub label: String,
}

/// Type-to-filter chooser over the backend's country or sport list.
#[derive(Debug, Default)]
pub struct PickerState {
    pub kind: Option<PickerKind>,
    pub options: Vec<PickerOption>,
    pub query: String,
    pub selected: usize,
}

impl PickerState {
    pub fn open(&mut self, kind: PickerKind, options: Vec<PickerOption>, current: &str) {
        self.kind = Some(kind);
        self.options = options;
        self.query.clear();
        self.selected = self.options.iter().position(|o| o.value == current).unwrap_or(0);
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.kind.is_some()
    }

    pub fn matches(&self) -> Vec<&PickerOption> {
        let needle = self.query.to_lowercase();
        self.options
            .iter()
            .filter(|o| {
                needle.is_empty()
                    || o.label.to_lowercase().contains(&needle)
                    || o.value.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    pub fn move_down(&mut self) {
        let len = self.matches().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn chosen(&self) -> Option<String> {
        self.matches().get(self.selected).map(|o| o.value.clone())
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub language: Language,
    /// Series error; cleared by the next applied bundle.
    pub last_error: Option<String>,
    /// Startup metadata failure. Never cleared.
    pub init_error: Option<String>,
    pub filters: FilterManager,
    pub playback: PlaybackScheduler,
    /// Mirrors the orchestrator; playback ticks read it.
    pub series_loading: bool,
    pub dashboard: DashboardData,
    pub medal_table: MedalTableState,
    pub top_athlete_selected: usize,
    pub search: SearchState,
    pub athlete: AthletePanel,
    pub picker: PickerState,
}

impl AppState {
    pub fn new(ticks: mpsc::Sender<UiEvent>, speed: PlaybackSpeed, language: Language) -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_logs: false,
            language,
            last_error: None,
            init_error: None,
            filters: FilterManager::new(),
            playback: PlaybackScheduler::new(ticks, speed),
            series_loading: false,
            dashboard: DashboardData::default(),
            medal_table: MedalTableState::default(),
            top_athlete_selected: 0,
            search: SearchState::default(),
            athlete: AthletePanel::default(),
            picker: PickerState::default(),
        }
    }
}
