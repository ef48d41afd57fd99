use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod path_utils;

/// Exercise files keyed by file name, iterated in the order the server sent them.
pub type FileSet = IndexMap<String, String>;

/// One exercise definition as served by the exercise catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    #[serde(rename = "track_id", alias = "track", default)]
    pub track: String,
    pub language: String,
    pub slug: String,
    #[serde(default)]
    pub files: FileSet,
}

/// Body of `GET /v2/exercises/{track}[/{exercise}]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FetchResponse {
    #[serde(default)]
    pub problems: Vec<Exercise>,
}

/// Report for one exercise merged into the workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SaveSummary {
    pub problem: String,
    pub new: Vec<String>,
    pub unchanged: Vec<String>,
}

impl SaveSummary {
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            ..Default::default()
        }
    }
}

/// An exercise directory found in the local workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalExerciseDir {
    pub name: String,
    pub dir: camino::Utf8PathBuf,
    pub files: Vec<String>,
}

/// JSON body of `POST /api/v1/user/assignments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionRequest {
    pub key: String,
    pub dir: String,
    pub language: String,
    pub problem: String,
    pub solution: FileSet,
    /// Always empty; the server still expects the field.
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatestSubmission {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub track_id: String,
    #[serde(default)]
    pub slug: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LatestSubmission {
    /// Placeholder for an exercise that has never been submitted.
    pub fn absent(track: &str, slug: &str) -> Self {
        Self {
            url: None,
            track_id: track.to_string(),
            slug: slug.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.url.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SkipOutcome {
    Success(String),
    Error(String),
}

impl SkipOutcome {
    pub fn skipped(track: &str, slug: &str) -> Self {
        Self::Success(format!("Skipped {slug} in track {track}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SubmitOutcome {
    Rejected { error: String },
    Accepted(serde_json::Value),
}
