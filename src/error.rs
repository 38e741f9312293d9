//! Error types surfaced by the runtime.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by [`Store`](crate::store::Store) and
/// [`ViewModel`](crate::viewmodel::ViewModel) operations.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The runtime was disposed; no operations are valid afterwards.
    #[error("Runtime has been disposed")]
    Disposed,

    /// The processing loop died (a reducer or middleware panicked).
    #[error("Intent processing loop terminated")]
    LoopTerminated,

    /// The runtime was built outside of a tokio runtime.
    #[error("No tokio runtime available to drive the processing loop")]
    NoExecutor,

    /// `time_travel` was asked for a snapshot that is not in the history.
    #[error("History index {index} out of range (history length {len})")]
    HistoryIndexOutOfRange { index: usize, len: usize },

    /// The runtime configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
