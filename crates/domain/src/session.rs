use std::cmp::Reverse;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use strum::Display;

use crate::{AthleteID, Name, SessionDraft, SubmitError, TransportError, ValidationError};

pub const MODALITY_STRENGTH: &str = "strength";
pub const RECENT_SESSIONS_LIMIT: usize = 30;

#[allow(async_fn_in_trait)]
pub trait SessionService {
    async fn get_sessions(&self, athlete_id: &AthleteID)
    -> Result<Vec<StoredSession>, TransportError>;
    async fn ingest_sessions(
        &self,
        sessions: Vec<SessionRecord>,
    ) -> Result<IngestResult, TransportError>;
    async fn ingest_raw_sessions(&self, batch: Value) -> Result<IngestResult, TransportError>;

    async fn get_recent_sessions(
        &self,
        athlete_id: &AthleteID,
    ) -> Result<Vec<StoredSession>, TransportError> {
        Ok(recent_sessions(
            self.get_sessions(athlete_id).await?,
            RECENT_SESSIONS_LIMIT,
        ))
    }

    /// Validates the draft and submits it as a single-element batch.
    ///
    /// The draft itself is left untouched; resetting the form is up to the caller.
    async fn submit_session_draft(
        &self,
        athlete_id: &AthleteID,
        draft: &SessionDraft,
    ) -> Result<IngestResult, SubmitError> {
        let session = draft.to_session_record(athlete_id)?;
        Ok(self.ingest_sessions(vec![session]).await?)
    }

    /// Submits a hand-written batch exactly as typed, so the server sees the original fields,
    /// number representations and timestamp offsets.
    async fn ingest_json(&self, text: &str) -> Result<IngestResult, SubmitError> {
        let batch = parse_batch(text)?;
        Ok(self.ingest_raw_sessions(batch).await?)
    }
}

#[allow(async_fn_in_trait)]
pub trait SessionRepository {
    async fn read_sessions(
        &self,
        athlete_id: &AthleteID,
    ) -> Result<Vec<StoredSession>, TransportError>;
    async fn create_sessions(
        &self,
        sessions: &[SessionRecord],
    ) -> Result<IngestResult, TransportError>;
    async fn create_raw_sessions(&self, batch: &Value) -> Result<IngestResult, TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub reps: u32,
    pub load_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: Name,
    pub sets: Vec<Set>,
}

/// A validated workout session, ready for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub athlete_id: AthleteID,
    pub start_time: DateTime<Utc>,
    pub duration_min: f64,
    pub rpe: f64,
    pub modality: String,
    pub exercises: Vec<ExerciseEntry>,
    pub source: Source,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Manual,
    UI,
}

/// The server's natural key of a session: athlete id and start time as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKey(pub String, pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResult {
    pub inserted: u32,
    pub duplicates: u32,
    pub results: Vec<IngestItemResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestItemResult {
    pub inserted: bool,
    #[serde(default)]
    pub issues: Vec<Value>,
    pub session_key: SessionKey,
}

/// A session as returned by the server.
///
/// Historical records are not guaranteed to be well-formed, so every field that cannot be
/// interpreted is absent instead of failing the whole record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredSession {
    pub athlete_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub duration_min: Option<f64>,
    pub rpe: Option<f64>,
    pub modality: Option<String>,
    pub exercises: Vec<StoredExercise>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredExercise {
    pub name: Option<String>,
    pub sets: Vec<StoredSet>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StoredSet {
    pub reps: Option<f64>,
    pub load_kg: Option<f64>,
}

impl StoredSession {
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        Self {
            athlete_id: value
                .get("athlete_id")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            start_time: value
                .get("start_time")
                .and_then(Value::as_str)
                .and_then(parse_timestamp),
            duration_min: value.get("duration_min").and_then(number),
            rpe: value.get("rpe").and_then(number),
            modality: value
                .get("modality")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            exercises: value
                .get("exercises")
                .and_then(Value::as_array)
                .map(|exercises| {
                    exercises
                        .iter()
                        .map(|exercise| StoredExercise {
                            name: exercise
                                .get("name")
                                .and_then(Value::as_str)
                                .map(ToString::to_string),
                            sets: exercise
                                .get("sets")
                                .and_then(Value::as_array)
                                .map(|sets| {
                                    sets.iter()
                                        .map(|set| StoredSet {
                                            reps: set.get("reps").and_then(number),
                                            load_kg: set.get("load_kg").and_then(number),
                                        })
                                        .collect()
                                })
                                .unwrap_or_default(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Names of all named exercises, in session order.
    #[must_use]
    pub fn exercise_names(&self) -> Vec<&str> {
        self.exercises
            .iter()
            .filter_map(|e| e.name.as_deref())
            .filter(|n| !n.is_empty())
            .collect()
    }
}

/// Reads an RFC 3339 timestamp; a timestamp without offset is taken as UTC.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|t| t.and_utc()))
        .ok()
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(parse_number(s)).filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Reads a numeric form value.
///
/// Surrounding whitespace is ignored and an empty value reads as zero. Anything else that is
/// not a plain decimal number, including a decimal or thousands comma, yields NaN.
#[must_use]
pub fn parse_number(value: &str) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        return 0.0;
    }
    value.parse::<f64>().unwrap_or(f64::NAN)
}

/// Sessions ordered by start time, newest first; sessions without a start time come last.
#[must_use]
pub fn recent_sessions(mut sessions: Vec<StoredSession>, limit: usize) -> Vec<StoredSession> {
    sessions.sort_by_key(|s| Reverse(s.start_time));
    sessions.truncate(limit);
    sessions
}

/// Checks that the text is a JSON array. The items are not validated; the server decides
/// what it accepts.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidBatch`] if the text is not valid JSON or not an array.
pub fn parse_batch(text: &str) -> Result<Value, ValidationError> {
    let batch = serde_json::from_str::<Value>(text)
        .map_err(|err| ValidationError::InvalidBatch(err.to_string()))?;
    if !batch.is_array() {
        return Err(ValidationError::InvalidBatch(
            "expected a JSON array of sessions".to_string(),
        ));
    }
    Ok(batch)
}

/// Two baseline sessions, used to prefill the batch ingest form.
#[must_use]
pub fn sample_batch() -> Value {
    json!([
        {
            "athlete_id": "a1",
            "start_time": "2024-01-01T10:00:00Z",
            "duration_min": 60,
            "rpe": 7.0,
            "modality": MODALITY_STRENGTH,
            "exercises": [
                { "name": "Bench Press", "sets": [
                    { "reps": 8, "load_kg": 60 },
                    { "reps": 8, "load_kg": 60 },
                    { "reps": 8, "load_kg": 60 }
                ] }
            ],
            "source": "manual",
            "meta": { "note": "baseline" }
        },
        {
            "athlete_id": "a1",
            "start_time": "2024-01-03T10:00:00Z",
            "duration_min": 60,
            "rpe": 7.5,
            "modality": MODALITY_STRENGTH,
            "exercises": [
                { "name": "Bench Press", "sets": [
                    { "reps": 8, "load_kg": 65 },
                    { "reps": 8, "load_kg": 65 },
                    { "reps": 8, "load_kg": 65 }
                ] }
            ],
            "source": "manual",
            "meta": { "note": "build" }
        }
    ])
}
