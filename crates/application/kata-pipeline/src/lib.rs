mod io_utils;
pub mod submit;
pub mod sync;

// Re-export core engine components
pub use submit::SubmissionBuilder;
pub use sync::{
    default_engine, HttpExerciseClient, RemoteExerciseClient, SyncEngine, SyncError,
};

// Re-export domain types often needed by consumers
pub use kata_core::{
    Exercise, FetchResponse, LatestSubmission, LocalExerciseDir, SaveSummary, SkipOutcome,
    SubmissionRequest, SubmitOutcome,
};
