use thiserror::Error;

use crate::kernel::permission::PermissionKind;

/// Failures surfaced by the agent core. None of these are fatal to the
/// process; at worst one feature stays unavailable.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("no foreground activity available to host the permission screen")]
    ActivityUnavailable,

    #[error("permission screen could not be opened: {0}")]
    AuthorityUnavailable(String),

    #[error("failed to show overlay: {0}")]
    WindowAttachFailed(String),

    #[error("failed to hide overlay: {0}")]
    WindowDetachFailed(String),

    #[error("sampler '{sampler}' failed: {source}")]
    SamplerFailed {
        sampler: String,
        #[source]
        source: SamplerError,
    },

    /// The pending request was displaced by a newer request for the same kind.
    #[error("{0} permission request was superseded by a newer request")]
    RequestSuperseded(PermissionKind),

    #[error("a {0} permission request is already pending")]
    RequestPending(PermissionKind),

    #[error("{0} permission request was dropped before a result arrived")]
    RequestAbandoned(PermissionKind),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SamplerError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("source error: {0}")]
    Source(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
