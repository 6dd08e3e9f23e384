#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod athlete;
mod catalog;
mod draft;
mod error;
mod meta;
mod metrics;
mod name;
mod routine;
mod run;
mod service;
mod session;
mod store;

pub use athlete::{AthleteID, CurrentAthlete, DEFAULT_ATHLETE_ID};
pub use catalog::{CatalogItemID, ExerciseCatalog, ExerciseCatalogItem};
pub use draft::{ExerciseDraft, SessionDraft, SetDraft, SetField};
pub use error::{
    CreateError, DeleteError, StorageError, SubmitError, TransportError, ValidationError,
};
pub use meta::{MetaRepository, MetaService, Pong, ServerTime};
pub use metrics::{SessionMetrics, volume_load_kg};
pub use name::{Name, NameError};
pub use routine::{RoutineID, RoutineTemplate, RoutineTemplates, parse_exercise_lines};
pub use run::{
    CreatedRun, DEFAULT_METRIC_KEY, DEFAULT_RUN_LIMIT, RunHeader, RunID, RunOptions,
    RunRepository, RunService, RunSummary, Scenario,
};
pub use service::Service;
pub use session::{
    ExerciseEntry, IngestItemResult, IngestResult, MODALITY_STRENGTH, RECENT_SESSIONS_LIMIT,
    SessionKey, SessionRecord, SessionRepository, SessionService, Set, Source, StoredExercise,
    StoredSession, StoredSet, parse_batch, parse_number, recent_sessions, sample_batch,
};
pub use store::{JsonStore, Key, KeyValueRepository, MemoryRepository};
