use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AthleteID, TransportError, session::parse_timestamp};

pub const DEFAULT_METRIC_KEY: &str = "volume_load_kg";
pub const DEFAULT_RUN_LIMIT: u32 = 20;

#[allow(async_fn_in_trait)]
pub trait RunService {
    async fn create_run(
        &self,
        athlete_id: &AthleteID,
        options: &RunOptions,
    ) -> Result<CreatedRun, TransportError>;
    async fn get_runs(
        &self,
        athlete_id: &AthleteID,
        limit: u32,
    ) -> Result<Vec<RunHeader>, TransportError>;
    async fn get_run_summary(&self, run_id: &RunID) -> Result<RunSummary, TransportError>;
}

#[allow(async_fn_in_trait)]
pub trait RunRepository {
    async fn create_run(
        &self,
        athlete_id: &AthleteID,
        options: &RunOptions,
    ) -> Result<CreatedRun, TransportError>;
    async fn read_runs(
        &self,
        athlete_id: &AthleteID,
        limit: u32,
    ) -> Result<Vec<RunHeader>, TransportError>;
    async fn read_run_summary(&self, run_id: &RunID) -> Result<RunSummary, TransportError>;
}

#[derive(Deref, Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunID(String);

impl From<&str> for RunID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub metric_key: String,
    pub use_normalized: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            metric_key: DEFAULT_METRIC_KEY.to_string(),
            use_normalized: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRun {
    pub run_id: RunID,
    #[serde(default)]
    pub summary: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHeader {
    pub run_id: RunID,
    #[serde(deserialize_with = "utc_timestamp")]
    pub generated_at_utc: DateTime<Utc>,
    pub engine_version: String,
    pub metric_key: String,
    pub used_normalized: bool,
    #[serde(default)]
    pub summary: Value,
}

impl RunHeader {
    #[must_use]
    pub fn top_scenario(&self) -> Option<&str> {
        self.summary.get("top_scenario").and_then(Value::as_str)
    }
}

/// The scenarios and uncertainty of one run, as produced by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunID,
    pub athlete_id: AthleteID,
    #[serde(deserialize_with = "utc_timestamp")]
    pub generated_at_utc: DateTime<Utc>,
    pub metric_key: String,
    #[serde(default)]
    pub top3_scenarios: Vec<Scenario>,
    #[serde(default)]
    pub last_latents: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub confidence_last: Option<f64>,
    #[serde(default)]
    pub issues_by_code: BTreeMap<String, u32>,
}

impl RunSummary {
    #[must_use]
    pub fn issue_count(&self) -> u32 {
        self.issues_by_code.values().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tradeoffs: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub levers: Map<String, Value>,
}

impl Scenario {
    #[must_use]
    pub fn probability_percent(&self) -> String {
        percent(self.probability)
    }

    #[must_use]
    pub fn confidence_percent(&self) -> String {
        percent(self.confidence)
    }
}

fn percent(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        // abs() turns -0.0 into 0.0
        Some(v) => format!("{}%", (v.clamp(0.0, 1.0) * 100.0).round().abs()),
        None => "—".to_string(),
    }
}

/// Accepts RFC 3339 timestamps and timestamps without offset, which are taken as UTC.
fn utc_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp \"{value}\"")))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
