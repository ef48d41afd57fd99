use crate::sync::SyncError;
use futures::future::join_all;
use kata_config::Config;
use kata_core::{FetchResponse, LatestSubmission, SkipOutcome, SubmissionRequest, SubmitOutcome};
use kata_infra::net::{ApiTransport, TransportErrorKind};
use reqwest::Client;
use tracing::{debug, info, warn};

#[async_trait::async_trait]
pub trait RemoteExerciseClient: Send + Sync {
    /// One exercise, or the whole track when `exercise` is `None`.
    async fn fetch_one(&self, track: &str, exercise: Option<&str>)
        -> Result<FetchResponse, SyncError>;

    /// Fetch every named exercise at once.
    ///
    /// All requests are in flight before any is awaited and the call returns
    /// only after every one has settled. Results keep the order of
    /// `exercises`; if any request failed the first failure is returned.
    async fn fetch_many(
        &self,
        track: &str,
        exercises: &[String],
    ) -> Result<Vec<FetchResponse>, SyncError> {
        let requests = exercises
            .iter()
            .map(|exercise| self.fetch_one(track, Some(exercise.as_str())));
        join_all(requests).await.into_iter().collect()
    }

    async fn status(&self, track: &str) -> Result<serde_json::Value, SyncError>;

    /// Latest submission, or [`LatestSubmission::absent`] if there is none.
    async fn latest_submission(
        &self,
        track: &str,
        exercise: &str,
    ) -> Result<LatestSubmission, SyncError>;

    async fn skip(&self, track: &str, exercise: &str) -> Result<SkipOutcome, SyncError>;

    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmitOutcome, SyncError>;
}

/// HTTP-backed client for the exercise catalog (`xapi`) and the
/// submission API (`api`).
pub struct HttpExerciseClient {
    transport: ApiTransport,
    api: String,
    xapi: String,
}

impl HttpExerciseClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            transport: ApiTransport::new(client, config.api_key.clone()),
            api: config.api.clone(),
            xapi: config.xapi.clone(),
        }
    }
}

#[async_trait::async_trait]
impl RemoteExerciseClient for HttpExerciseClient {
    async fn fetch_one(
        &self,
        track: &str,
        exercise: Option<&str>,
    ) -> Result<FetchResponse, SyncError> {
        let mut segments = vec!["v2", "exercises", track];
        segments.extend(exercise);
        let url = self.transport.endpoint(&self.xapi, &segments)?;

        info!("Fetching {}/{}", track, exercise.unwrap_or("*"));
        let response: FetchResponse = self.transport.get_json(url).await?;
        debug!("{} exercise(s) received for {}", response.problems.len(), track);
        Ok(response)
    }

    async fn status(&self, track: &str) -> Result<serde_json::Value, SyncError> {
        let url = self
            .transport
            .endpoint(&self.api, &["api", "v1", "tracks", track, "status"])?;
        Ok(self.transport.get_json(url).await?)
    }

    async fn latest_submission(
        &self,
        track: &str,
        exercise: &str,
    ) -> Result<LatestSubmission, SyncError> {
        let url = self
            .transport
            .endpoint(&self.api, &["api", "v1", "submissions", track, exercise])?;
        match self.transport.get_json(url).await {
            Ok(submission) => Ok(submission),
            Err(e) if e.kind() == TransportErrorKind::NotFound => {
                debug!("No submission yet for {}/{}", track, exercise);
                Ok(LatestSubmission::absent(track, exercise))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn skip(&self, track: &str, exercise: &str) -> Result<SkipOutcome, SyncError> {
        let url = self.transport.endpoint(
            &self.api,
            &["api", "v1", "iterations", track, exercise, "skip"],
        )?;
        match self
            .transport
            .post_json::<(), serde_json::Value>(url, None)
            .await
        {
            Ok(_) => Ok(SkipOutcome::skipped(track, exercise)),
            Err(e) if e.kind() == TransportErrorKind::NotFound => {
                let detail = e.detail().unwrap_or_default().to_string();
                warn!("Skip of {}/{} refused: {}", track, exercise, detail);
                Ok(SkipOutcome::Error(detail))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmitOutcome, SyncError> {
        let url = self
            .transport
            .endpoint(&self.api, &["api", "v1", "user", "assignments"])?;
        match self.transport.post_json(url, Some(request)).await {
            Ok(ack) => Ok(SubmitOutcome::Accepted(ack)),
            Err(e) if e.kind() == TransportErrorKind::BadRequest => {
                let error = e.detail().unwrap_or_default().to_string();
                warn!("Submission of {}/{} rejected: {}", request.language, request.problem, error);
                Ok(SubmitOutcome::Rejected { error })
            }
            Err(e) => Err(e.into()),
        }
    }
}
