use thiserror::Error;

/// Errors surfaced by the scheduling testbed.
#[derive(Error, Debug)]
pub enum LabError {
    /// A suspended operation observed cooperative cancellation.
    #[error("cancelled while suspended")]
    Cancelled,

    /// The offload target pool refused or lost the submission.
    #[error("pool submission failed: {0}")]
    PoolSubmissionFailed(String),

    /// The serialized unit's exclusion was breached. This is a fatal
    /// harness bug, never a recoverable condition.
    #[error("serialization invariant violated: {0}")]
    InvariantViolation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
