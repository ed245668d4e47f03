use log::debug;
use olympics_api::{
    CountryOption, FilterOptions, FilterState, MedalType, Season, Sex, YearSelection,
};
use std::collections::BTreeMap;

/// Owns the live [`FilterState`] and the year list it is allowed to point at.
///
/// The selected year is repaired, never rejected: whenever the valid list
/// changes and no longer contains the year, it moves to the closest valid one.
#[derive(Debug, Default)]
pub struct FilterManager {
    state: FilterState,
    all_years: Vec<u16>,
    year_seasons: BTreeMap<u16, Vec<Season>>,
    sports: Vec<String>,
    countries: Vec<CountryOption>,
    valid_years: Vec<u16>,
    loaded: bool,
}

impl FilterManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn valid_years(&self) -> &[u16] {
        &self.valid_years
    }

    pub fn sports(&self) -> &[String] {
        &self.sports
    }

    pub fn countries(&self) -> &[CountryOption] {
        &self.countries
    }

    pub fn seasons_of(&self, year: u16) -> Option<&[Season]> {
        self.year_seasons.get(&year).map(Vec::as_slice)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Install the metadata from `/filters` and select the most recent year.
    pub fn load_options(&mut self, options: FilterOptions) {
        let mut years = options.years;
        years.sort_unstable();
        years.dedup();

        self.all_years = years;
        self.year_seasons = options.year_season_map;
        self.sports = options.sports;
        self.countries = options.countries;
        self.loaded = true;

        if let Some(&latest) = self.all_years.last() {
            self.state.year = YearSelection::Specific(latest);
        }
        self.refresh_valid_years();
    }

    pub fn set_season(&mut self, season: Season) {
        if self.state.season == season {
            return;
        }
        self.state.season = season;
        self.refresh_valid_years();
    }

    pub fn set_sex(&mut self, sex: Sex) {
        self.state.sex = sex;
    }

    pub fn set_medal_type(&mut self, medal_type: MedalType) {
        self.state.medal_type = medal_type;
    }

    pub fn set_sport(&mut self, sport: impl Into<String>) {
        self.state.sport = sport.into();
    }

    pub fn set_country(&mut self, country: impl Into<String>) {
        self.state.country = country.into();
    }

    /// Select a year; values outside the valid list snap to the closest one.
    pub fn set_year(&mut self, year: YearSelection) {
        self.state.year = match year {
            YearSelection::Specific(y) => closest_year(&self.valid_years, y)
                .map(YearSelection::Specific)
                .unwrap_or(year),
            YearSelection::AllYears => YearSelection::AllYears,
        };
    }

    /// Flip between all-years mode and the most recent valid year.
    pub fn toggle_all_years(&mut self) {
        if self.state.year.is_all_years() {
            if let Some(&latest) = self.valid_years.last() {
                self.state.year = YearSelection::Specific(latest);
            }
        } else {
            self.state.year = YearSelection::AllYears;
        }
    }

    /// Move `delta` editions along the valid list, clamped at either end.
    /// No-op in all-years mode.
    pub fn step_year(&mut self, delta: isize) {
        let YearSelection::Specific(current) = self.state.year else {
            return;
        };
        if self.valid_years.is_empty() {
            return;
        }
        let index = self
            .valid_years
            .iter()
            .position(|&y| y == current)
            .unwrap_or(0);
        let last = self.valid_years.len() - 1;
        let next = index.saturating_add_signed(delta).min(last);
        self.state.year = YearSelection::Specific(self.valid_years[next]);
    }

    /// The edition after `year` in the valid list. An unknown year restarts
    /// from the first edition.
    pub fn next_year_after(&self, year: u16) -> Option<u16> {
        let next = match self.valid_years.iter().position(|&y| y == year) {
            Some(index) => index + 1,
            None => 0,
        };
        self.valid_years.get(next).copied()
    }

    fn refresh_valid_years(&mut self) {
        self.valid_years = compute_valid_years(&self.all_years, &self.year_seasons, self.state.season);

        if let YearSelection::Specific(year) = self.state.year
            && !self.valid_years.contains(&year)
            && let Some(repaired) = closest_year(&self.valid_years, year)
        {
            debug!("year {year} not held in {:?}, moving to {repaired}", self.state.season);
            self.state.year = YearSelection::Specific(repaired);
        }
    }
}

/// Years held in `season`; every known year when the season is `Both`.
pub fn compute_valid_years(
    all_years: &[u16],
    year_seasons: &BTreeMap<u16, Vec<Season>>,
    season: Season,
) -> Vec<u16> {
    if season == Season::Both {
        return all_years.to_vec();
    }
    all_years
        .iter()
        .copied()
        .filter(|year| year_seasons.get(year).is_some_and(|s| s.contains(&season)))
        .collect()
}

/// Closest member of `years` to `target`. On a tie the earlier list entry wins.
pub fn closest_year(years: &[u16], target: u16) -> Option<u16> {
    years.iter().copied().reduce(|best, candidate| {
        if candidate.abs_diff(target) < best.abs_diff(target) {
            candidate
        } else {
            best
        }
    })
}
