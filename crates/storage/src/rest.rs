//! REST
//!
//! Client of the coaching server's `/api/v1` interface. Every operation is a single
//! request/response pair without retries; any non-success status is surfaced verbatim.

use gloo_net::http::{Request, RequestBuilder, Response};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use urlencoding::encode;

use coach_domain::{
    self as domain, AthleteID, CreatedRun, IngestResult, Pong, RunHeader, RunID, RunOptions,
    RunSummary, ServerTime, SessionRecord, StoredSession, TransportError,
};

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error>;
}

#[derive(Clone, Copy)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        request.send().await
    }
}

/// Location of the server. An empty base URL addresses the origin the app was served from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestConfig {
    pub base_url: String,
}

impl RestConfig {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    fn ping_url(&self) -> String {
        self.url("/meta/ping")
    }

    fn time_url(&self) -> String {
        self.url("/meta/time")
    }

    fn sessions_batch_url(&self) -> String {
        self.url("/sessions/batch")
    }

    fn sessions_url(&self, athlete_id: &AthleteID) -> String {
        self.url(&format!("/sessions/{}", encode(athlete_id)))
    }

    fn create_run_url(&self, athlete_id: &AthleteID, options: &RunOptions) -> String {
        self.url(&format!(
            "/runs/{}?metric_key={}&use_normalized={}",
            encode(athlete_id),
            encode(&options.metric_key),
            options.use_normalized
        ))
    }

    fn runs_url(&self, athlete_id: &AthleteID, limit: u32) -> String {
        self.url(&format!(
            "/runs?athlete_id={}&limit={limit}",
            encode(athlete_id)
        ))
    }

    fn run_summary_url(&self, run_id: &RunID) -> String {
        self.url(&format!("/runs/{}/summary", encode(run_id)))
    }
}

#[derive(Clone)]
pub struct REST<S: SendRequest> {
    pub config: RestConfig,
    pub sender: S,
}

impl REST<GlooNetSendRequest> {
    #[must_use]
    pub const fn new(config: RestConfig) -> Self {
        Self {
            config,
            sender: GlooNetSendRequest,
        }
    }
}

impl Default for REST<GlooNetSendRequest> {
    fn default() -> Self {
        Self::new(RestConfig::default())
    }
}

impl<S: SendRequest> REST<S> {
    /// Sends the request with a JSON content type and, if given, a JSON body.
    async fn fetch<T>(
        &self,
        request: RequestBuilder,
        body: Option<&Value>,
    ) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        let request = request.header("Content-Type", "application/json");
        let request = match body {
            Some(body) => request.json(body),
            None => request.build(),
        }
        .map_err(|err| TransportError::Request(err.to_string()))?;
        let url = request.url();
        match self.sender.send_request(request).await {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<T>()
                        .await
                        .map_err(|err| TransportError::Deserialization(err.to_string()))
                } else {
                    let body = response.text().await.unwrap_or_default();
                    Err(TransportError::Status {
                        status: response.status(),
                        status_text: response.status_text(),
                        body,
                    })
                }
            }
            Err(err) => {
                debug!("request to {url} failed: {err}");
                Err(TransportError::NoConnection)
            }
        }
    }
}

impl<S: SendRequest> domain::MetaRepository for REST<S> {
    async fn read_ping(&self) -> Result<Pong, TransportError> {
        self.fetch(Request::get(&self.config.ping_url()), None)
            .await
    }

    async fn read_time(&self) -> Result<ServerTime, TransportError> {
        self.fetch(Request::get(&self.config.time_url()), None)
            .await
    }
}

impl<S: SendRequest> domain::SessionRepository for REST<S> {
    async fn read_sessions(
        &self,
        athlete_id: &AthleteID,
    ) -> Result<Vec<StoredSession>, TransportError> {
        let sessions: Vec<Value> = self
            .fetch(Request::get(&self.config.sessions_url(athlete_id)), None)
            .await?;
        Ok(sessions.iter().map(StoredSession::from_json).collect())
    }

    async fn create_sessions(
        &self,
        sessions: &[SessionRecord],
    ) -> Result<IngestResult, TransportError> {
        let batch = serde_json::to_value(sessions)
            .map_err(|err| TransportError::Request(err.to_string()))?;
        self.fetch(Request::post(&self.config.sessions_batch_url()), Some(&batch))
            .await
    }

    async fn create_raw_sessions(&self, batch: &Value) -> Result<IngestResult, TransportError> {
        self.fetch(Request::post(&self.config.sessions_batch_url()), Some(batch))
            .await
    }
}

impl<S: SendRequest> domain::RunRepository for REST<S> {
    async fn create_run(
        &self,
        athlete_id: &AthleteID,
        options: &RunOptions,
    ) -> Result<CreatedRun, TransportError> {
        self.fetch(
            Request::post(&self.config.create_run_url(athlete_id, options)),
            None,
        )
        .await
    }

    async fn read_runs(
        &self,
        athlete_id: &AthleteID,
        limit: u32,
    ) -> Result<Vec<RunHeader>, TransportError> {
        self.fetch(Request::get(&self.config.runs_url(athlete_id, limit)), None)
            .await
    }

    async fn read_run_summary(&self, run_id: &RunID) -> Result<RunSummary, TransportError> {
        self.fetch(Request::get(&self.config.run_summary_url(run_id)), None)
            .await
    }
}
