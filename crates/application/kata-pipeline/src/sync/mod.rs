use camino::Utf8PathBuf;
use kata_core::path_utils::PathError;
use kata_infra::net::{TransportError, TransportErrorKind};

pub mod engine;
pub mod remote;

/// High-level error type for sync and submission operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Remote error: {0}")]
    Remote(#[from] TransportError),
    #[error("IO error at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
    #[error("Security: refusing unsafe path {0:?}")]
    UnsafePath(String),
    #[error("Response for {track}/{exercise} contained no exercise")]
    EmptyResponse { track: String, exercise: String },
    #[error(transparent)]
    Path(#[from] PathError),
}

impl SyncError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| SyncError::Io { path, source }
    }

    /// Transport classification when this error came from the network.
    pub fn remote_kind(&self) -> Option<TransportErrorKind> {
        match self {
            SyncError::Remote(e) => Some(e.kind()),
            _ => None,
        }
    }
}

pub use engine::SyncEngine;
pub use remote::{HttpExerciseClient, RemoteExerciseClient};

/// Convenience constructor for the default engine.
pub fn default_engine(client: reqwest::Client, config: &kata_config::Config) -> SyncEngine {
    SyncEngine::new(client, config)
}
