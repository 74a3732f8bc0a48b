//! Score recording collaborators

pub mod scores;

pub use scores::{JsonlScoreLog, LogOnlyRecorder, ScoreAck, ScoreRecord, ScoreRecorder};

/// Score store failures. Never fatal for a session.
#[derive(Debug, thiserror::Error)]
pub enum ScoreStoreError {
    #[error("Score log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize score record: {0}")]
    Serialize(#[from] serde_json::Error),
}
