pub mod backend;
pub mod client;
pub mod query;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel the backend uses for "no sport / country restriction".
pub const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Filter model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Winter,
    #[default]
    Both,
}

impl Season {
    /// Value sent to the backend, `None` for the `Both` sentinel.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            Season::Summer => Some("Summer"),
            Season::Winter => Some("Winter"),
            Season::Both => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Season::Both => Season::Summer,
            Season::Summer => Season::Winter,
            Season::Winter => Season::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
    #[default]
    Both,
}

impl Sex {
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            Sex::M => Some("M"),
            Sex::F => Some("F"),
            Sex::Both => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Sex::Both => Sex::M,
            Sex::M => Sex::F,
            Sex::F => Sex::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MedalType {
    #[default]
    Total,
    Gold,
    Silver,
    Bronze,
}

impl MedalType {
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            MedalType::Total => None,
            MedalType::Gold => Some("Gold"),
            MedalType::Silver => Some("Silver"),
            MedalType::Bronze => Some("Bronze"),
        }
    }

    pub fn next(self) -> Self {
        match self {
            MedalType::Total => MedalType::Gold,
            MedalType::Gold => MedalType::Silver,
            MedalType::Silver => MedalType::Bronze,
            MedalType::Bronze => MedalType::Total,
        }
    }

    /// Pick the matching count out of a gold/silver/bronze/total tally.
    pub fn count(&self, gold: u32, silver: u32, bronze: u32, total: u32) -> u32 {
        match self {
            MedalType::Total => total,
            MedalType::Gold => gold,
            MedalType::Silver => silver,
            MedalType::Bronze => bronze,
        }
    }
}

/// Which editions a request covers. `AllYears` aggregates across every edition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearSelection {
    #[default]
    AllYears,
    Specific(u16),
}

impl YearSelection {
    pub fn specific(&self) -> Option<u16> {
        match self {
            YearSelection::Specific(year) => Some(*year),
            YearSelection::AllYears => None,
        }
    }

    pub fn is_all_years(&self) -> bool {
        matches!(self, YearSelection::AllYears)
    }
}

impl fmt::Display for YearSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSelection::AllYears => write!(f, "all years"),
            YearSelection::Specific(year) => write!(f, "{year}"),
        }
    }
}

/// The single source of truth for what the dashboard is currently asking for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    pub season: Season,
    pub sex: Sex,
    pub sport: String,
    pub country: String,
    pub medal_type: MedalType,
    pub year: YearSelection,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            season: Season::Both,
            sex: Sex::Both,
            sport: ALL.to_string(),
            country: ALL.to_string(),
            medal_type: MedalType::Total,
            year: YearSelection::AllYears,
        }
    }
}

impl FilterState {
    pub fn with_year(&self, year: YearSelection) -> Self {
        Self { year, ..self.clone() }
    }

    pub fn has_country(&self) -> bool {
        self.country != ALL && !self.country.is_empty()
    }

    pub fn has_sport(&self) -> bool {
        self.sport != ALL && !self.sport.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Filter metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryOption {
    pub code: String,
    pub label: String,
}

/// Response of `GET /filters`. Loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub years: Vec<u16>,
    #[serde(default)]
    pub sports: Vec<String>,
    #[serde(default)]
    pub countries: Vec<CountryOption>,
    /// Edition year → seasons held that year (1924–1992 can list both).
    #[serde(default)]
    pub year_season_map: BTreeMap<u16, Vec<Season>>,
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapStat {
    pub id: String,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub bronze: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiometricPoint {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "Height")]
    pub height: f64,
    #[serde(rename = "Weight")]
    pub weight: f64,
    /// "Gold", "Silver", "Bronze" or "No Medal".
    #[serde(rename = "Medal", default)]
    pub medal: String,
    #[serde(rename = "NOC", default)]
    pub noc: String,
    #[serde(rename = "Sport", default)]
    pub sport: String,
    #[serde(rename = "Year", default)]
    pub year: Option<u16>,
}

impl BiometricPoint {
    pub fn medal(&self) -> Option<MedalType> {
        match self.medal.as_str() {
            "Gold" => Some(MedalType::Gold),
            "Silver" => Some(MedalType::Silver),
            "Bronze" => Some(MedalType::Bronze),
            _ => None,
        }
    }
}

/// One row of the evolution chart: medal counts per country code for a year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    #[serde(rename = "Year")]
    pub year: u16,
    #[serde(flatten)]
    pub counts: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedalStat {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub bronze: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopAthlete {
    pub id: u64,
    pub name: String,
    pub noc: String,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub bronze: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenderStat {
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "Count")]
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Athletes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteSearchResult {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub noc: String,
    #[serde(default)]
    pub sport: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: Option<u8>,
    pub max: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedalCount {
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub bronze: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participation {
    pub year: u16,
    pub season: Season,
    pub city: Option<String>,
    pub sport: String,
    pub event: String,
    /// `None` when the athlete did not medal in this event.
    pub medal: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    pub id: u64,
    pub name: String,
    pub sex: String,
    pub noc: String,
    #[serde(default)]
    pub team: String,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    #[serde(default)]
    pub age_range: AgeRange,
    #[serde(default)]
    pub sports: Vec<String>,
    #[serde(default)]
    pub years: Vec<u16>,
    #[serde(default)]
    pub medals: MedalCount,
    #[serde(default)]
    pub participations: Vec<Participation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteYear {
    #[serde(rename = "Year")]
    pub year: u16,
    #[serde(rename = "Gold", default)]
    pub gold: u32,
    #[serde(rename = "Silver", default)]
    pub silver: u32,
    #[serde(rename = "Bronze", default)]
    pub bronze: u32,
    #[serde(rename = "Total", default)]
    pub total: u32,
    #[serde(rename = "Events", default)]
    pub events: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteBiometrics {
    pub height: Option<f64>,
    pub weight: Option<f64>,
    #[serde(default)]
    pub sex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteStats {
    #[serde(default)]
    pub evolution: Vec<AthleteYear>,
    #[serde(default)]
    pub biometrics: AthleteBiometrics,
    #[serde(default)]
    pub medals_by_sport: Vec<MedalStat>,
}
