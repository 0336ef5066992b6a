use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("tracker task for '{0}' has shut down")]
    TrackerGone(String),
    #[error("coordination round timed out after {0}ms")]
    RoundTimeout(u64),
    #[error("supervisor is in the failed state; reset before issuing new rounds")]
    Failed,
    #[error("backend sync relay unavailable")]
    RelayUnavailable,
}
