use chrono::{DateTime, Utc};
use log::{debug, error};
use serde_json::Value;

use crate::{
    AthleteID, CreatedRun, IngestResult, MetaRepository, MetaService, RunHeader, RunID,
    RunOptions, RunRepository, RunService, RunSummary, SessionRecord, SessionRepository,
    SessionService, StoredSession, TransportError,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                TransportError::NoConnection => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: SessionRepository> SessionService for Service<R> {
    async fn get_sessions(
        &self,
        athlete_id: &AthleteID,
    ) -> Result<Vec<StoredSession>, TransportError> {
        log_on_error!(self.repository.read_sessions(athlete_id), "get", "sessions")
    }

    async fn ingest_sessions(
        &self,
        sessions: Vec<SessionRecord>,
    ) -> Result<IngestResult, TransportError> {
        log_on_error!(
            self.repository.create_sessions(&sessions),
            "ingest",
            "sessions"
        )
    }

    async fn ingest_raw_sessions(&self, batch: Value) -> Result<IngestResult, TransportError> {
        log_on_error!(
            self.repository.create_raw_sessions(&batch),
            "ingest",
            "sessions"
        )
    }
}

impl<R: RunRepository> RunService for Service<R> {
    async fn create_run(
        &self,
        athlete_id: &AthleteID,
        options: &RunOptions,
    ) -> Result<CreatedRun, TransportError> {
        log_on_error!(
            self.repository.create_run(athlete_id, options),
            "create",
            "run"
        )
    }

    async fn get_runs(
        &self,
        athlete_id: &AthleteID,
        limit: u32,
    ) -> Result<Vec<RunHeader>, TransportError> {
        log_on_error!(self.repository.read_runs(athlete_id, limit), "get", "runs")
    }

    async fn get_run_summary(&self, run_id: &RunID) -> Result<RunSummary, TransportError> {
        log_on_error!(
            self.repository.read_run_summary(run_id),
            "get",
            "run summary"
        )
    }
}

impl<R: MetaRepository> MetaService for Service<R> {
    async fn ping(&self) -> Result<bool, TransportError> {
        Ok(log_on_error!(self.repository.read_ping(), "get", "ping")?.pong)
    }

    async fn read_server_time(&self) -> Result<DateTime<Utc>, TransportError> {
        log_on_error!(
            async { self.repository.read_time().await?.timestamp() },
            "get",
            "server time"
        )
    }
}
