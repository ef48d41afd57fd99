use camino::{Utf8Path, Utf8PathBuf};
use kata_config::Config;
use kata_core::path_utils::ExercisePath;
use kata_core::{FileSet, SubmissionRequest, SubmitOutcome};
use std::sync::Arc;
use tracing::info;

use crate::sync::{RemoteExerciseClient, SyncError};

/// Turns a solution file in the workspace into a submission.
pub struct SubmissionBuilder {
    remote: Arc<dyn RemoteExerciseClient>,
    root: Utf8PathBuf,
    api_key: String,
}

impl SubmissionBuilder {
    pub fn new(remote: Arc<dyn RemoteExerciseClient>, config: &Config) -> Self {
        Self {
            remote,
            root: config.dir.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Read `file_path` and recover language/exercise from its position under the root.
    pub async fn build(&self, file_path: &Utf8Path) -> Result<SubmissionRequest, SyncError> {
        let meta = ExercisePath::extract_native(file_path, &self.root)?;
        let content = tokio::fs::read_to_string(file_path)
            .await
            .map_err(SyncError::io(file_path))?;

        let mut solution = FileSet::new();
        solution.insert(meta.file_name, content);

        Ok(SubmissionRequest {
            key: self.api_key.clone(),
            dir: self.root.to_string(),
            language: meta.language,
            problem: meta.exercise,
            solution,
            code: String::new(),
        })
    }

    pub async fn build_and_submit(&self, file_path: &Utf8Path) -> Result<SubmitOutcome, SyncError> {
        let request = self.build(file_path).await?;
        info!("Submitting {}/{} ({})", request.language, request.problem, file_path);
        self.remote.submit(&request).await
    }
}
