use crate::backend::StatsBackend;
use crate::query::{QueryParams, evolution_params, filter_params};
use crate::{
    AthleteProfile, AthleteSearchResult, AthleteStats, BiometricPoint, EvolutionPoint,
    FilterOptions, FilterState, GenderStat, MapStat, MedalStat, TopAthlete,
};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TOP_ATHLETES: u32 = 10;
pub const SEARCH_LIMIT: u32 = 20;
/// Shorter queries are answered locally with an empty list.
pub const MIN_SEARCH_CHARS: usize = 2;

/// Olympic stats backend client.
#[derive(Debug, Clone)]
pub struct OlympicsApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for OlympicsApi {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(&'static str, reqwest::Error),
    Api(&'static str, reqwest::Error),
    Parsing(&'static str, String),
    NotFound(&'static str, String),
    Other(String),
}

impl ApiError {
    /// Name of the operation that failed, e.g. `"map stats"`.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            ApiError::Network(op, _)
            | ApiError::Api(op, _)
            | ApiError::Parsing(op, _)
            | ApiError::NotFound(op, _) => Some(op),
            ApiError::Other(_) => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(op, e) => write!(f, "Failed to fetch {op}: network error: {e}"),
            ApiError::Api(op, e) => write!(f, "Failed to fetch {op}: {e}"),
            ApiError::Parsing(op, msg) => write!(f, "Failed to fetch {op}: invalid response: {msg}"),
            ApiError::NotFound(op, msg) => write!(f, "Failed to fetch {op}: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(_, e) | ApiError::Api(_, e) => Some(e),
            _ => None,
        }
    }
}

impl OlympicsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("olytui/0.1 (terminal olympics dashboard)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, params: &[(&'static str, String)]) -> ApiResult<Url> {
        let raw = format!("{}{path}", self.base_url);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::Other(format!("invalid url {raw}: {e}")))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        params: QueryParams,
    ) -> ApiResult<T> {
        let url = self.endpoint(path, &params)?;
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(operation, e))?;

        let body = response
            .error_for_status()
            .map_err(|e| ApiError::Api(operation, e))?
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Parsing(operation, e.to_string()))?;

        parse_body(operation, body)
    }
}

/// The backend answers unknown athletes with `200 {"error": "..."}`.
fn parse_body<T: DeserializeOwned>(operation: &'static str, body: Value) -> ApiResult<T> {
    if let Some(message) = body.get("error").and_then(Value::as_str) {
        return Err(ApiError::NotFound(operation, message.to_owned()));
    }
    serde_json::from_value(body).map_err(|e| ApiError::Parsing(operation, e.to_string()))
}

impl StatsBackend for OlympicsApi {
    async fn filters(&self) -> ApiResult<FilterOptions> {
        self.get("filters", "/filters", QueryParams::new()).await
    }

    async fn map_stats(&self, filters: &FilterState) -> ApiResult<Vec<MapStat>> {
        self.get("map stats", "/stats/map", filter_params(filters)).await
    }

    async fn biometrics(&self, filters: &FilterState) -> ApiResult<Vec<BiometricPoint>> {
        self.get("biometrics", "/stats/biometrics", filter_params(filters)).await
    }

    async fn evolution(
        &self,
        filters: &FilterState,
        countries: &[String],
    ) -> ApiResult<Vec<EvolutionPoint>> {
        self.get("evolution stats", "/stats/evolution", evolution_params(filters, countries))
            .await
    }

    async fn medal_table(&self, filters: &FilterState) -> ApiResult<Vec<MedalStat>> {
        self.get("medal table", "/stats/medals", filter_params(filters)).await
    }

    async fn top_athletes(&self, filters: &FilterState, limit: u32) -> ApiResult<Vec<TopAthlete>> {
        let mut params = filter_params(filters);
        params.push(("limit", limit.to_string()));
        self.get("top athletes", "/stats/top-athletes", params).await
    }

    async fn gender(&self, filters: &FilterState) -> ApiResult<Vec<GenderStat>> {
        self.get("gender stats", "/stats/gender", filter_params(filters)).await
    }

    async fn search_athletes(&self, query: &str) -> ApiResult<Vec<AthleteSearchResult>> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_CHARS {
            return Ok(Vec::new());
        }
        let params = vec![("query", query.to_string()), ("limit", SEARCH_LIMIT.to_string())];
        self.get("athlete search", "/athletes/search", params).await
    }

    async fn athlete_profile(&self, id: u64) -> ApiResult<AthleteProfile> {
        self.get("athlete profile", &format!("/athletes/{id}"), QueryParams::new())
            .await
    }

    async fn athlete_stats(&self, id: u64) -> ApiResult<AthleteStats> {
        self.get("athlete stats", &format!("/athletes/{id}/stats"), QueryParams::new())
            .await
    }
}
