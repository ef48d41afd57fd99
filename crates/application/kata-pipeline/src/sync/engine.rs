use camino::{Utf8Path, Utf8PathBuf};
use kata_config::Config;
use kata_core::path_utils::ExercisePath;
use kata_core::{Exercise, SaveSummary};
use std::fs;
use std::sync::Arc;
use tracing::{debug, info};

use crate::io_utils::write_if_absent;
use crate::sync::remote::{HttpExerciseClient, RemoteExerciseClient};
use crate::sync::SyncError;

/// Merges fetched exercises into `<root>/<language>/<slug>/`.
///
/// Files already on disk always win: the engine only ever creates files,
/// it never rewrites or deletes them.
pub struct SyncEngine {
    remote: Arc<dyn RemoteExerciseClient>,
    root: Utf8PathBuf,
}

impl SyncEngine {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        let remote = Arc::new(HttpExerciseClient::new(client, config));
        Self::with_components(remote, config.dir.clone())
    }

    pub fn with_components(remote: Arc<dyn RemoteExerciseClient>, root: Utf8PathBuf) -> Self {
        Self { remote, root }
    }

    pub fn remote(&self) -> &Arc<dyn RemoteExerciseClient> {
        &self.remote
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn check_safe(exercise: &Exercise) -> Result<(), SyncError> {
        // language and slug are single directory names.
        for component in [&exercise.language, &exercise.slug] {
            if !ExercisePath::verify_safe(component) || component.contains(['/', '\\']) {
                return Err(SyncError::UnsafePath(component.clone()));
            }
        }
        for name in exercise.files.keys() {
            if !ExercisePath::verify_safe(name) {
                return Err(SyncError::UnsafePath(format!(
                    "{}/{}/{}",
                    exercise.language, exercise.slug, name
                )));
            }
        }
        Ok(())
    }

    /// Write every file that is not yet present and report what happened.
    ///
    /// One summary per exercise, in input order; file names within a summary
    /// follow the exercise's file order. Every exercise is validated before
    /// anything is written.
    pub fn save(exercises: &[Exercise], root: &Utf8Path) -> Result<Vec<SaveSummary>, SyncError> {
        for exercise in exercises {
            Self::check_safe(exercise)?;
        }
        exercises
            .iter()
            .map(|exercise| Self::save_exercise(exercise, root))
            .collect()
    }

    fn save_exercise(exercise: &Exercise, root: &Utf8Path) -> Result<SaveSummary, SyncError> {
        let dir = root.join(&exercise.language).join(&exercise.slug);
        fs::create_dir_all(&dir).map_err(SyncError::io(&dir))?;

        let mut summary = SaveSummary::new(&exercise.slug);
        for (file_name, content) in &exercise.files {
            let path = dir.join(file_name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(SyncError::io(parent))?;
            }

            if write_if_absent(&path, content.as_bytes()).map_err(SyncError::io(&path))? {
                debug!("new: {}", path);
                summary.new.push(file_name.clone());
            } else {
                debug!("kept: {}", path);
                summary.unchanged.push(file_name.clone());
            }
        }

        info!(
            "Saved {}/{}: {} new, {} unchanged",
            exercise.language,
            exercise.slug,
            summary.new.len(),
            summary.unchanged.len()
        );
        Ok(summary)
    }

    /// Fetch every exercise of `track` and merge it into the workspace.
    pub async fn fetch_and_save(&self, track: &str) -> Result<Vec<SaveSummary>, SyncError> {
        let response = self.remote.fetch_one(track, None).await?;
        Self::save(&response.problems, &self.root)
    }

    /// Fetch the named exercises concurrently, then merge them.
    ///
    /// Nothing is written unless every fetch succeeded.
    pub async fn fetch_several_and_save(
        &self,
        track: &str,
        exercises: &[String],
    ) -> Result<Vec<SaveSummary>, SyncError> {
        let responses = self.remote.fetch_many(track, exercises).await?;

        let fetched = responses
            .into_iter()
            .zip(exercises)
            .map(|(response, name)| {
                response
                    .problems
                    .into_iter()
                    .next()
                    .ok_or_else(|| SyncError::EmptyResponse {
                        track: track.to_string(),
                        exercise: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::save(&fetched, &self.root)
    }
}
