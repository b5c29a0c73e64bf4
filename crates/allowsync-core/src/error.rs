//! Error types for the allow-list synchronization system
//!
//! The variants mirror the failure classes the remote control plane can
//! report. Managers route on these classes, so client implementations must
//! map their wire-level errors onto them faithfully: anything reported as
//! `ControlPlane` is treated as fatal and propagated unmodified.

use thiserror::Error;

/// Result type alias for allow-list operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the allow-list synchronization system
#[derive(Error, Debug)]
pub enum Error {
    /// The rule set already holds an identical ingress permission.
    /// Managers treat this as an idempotent no-op, never as a failure.
    #[error("duplicate ingress permission: {0}")]
    DuplicatePermission(String),

    /// The rule set is at its remote-enforced rule limit
    #[error("rule limit exceeded: {0}")]
    RuleLimitExceeded(String),

    /// The prefix list was mutated concurrently; the version token is stale
    #[error("prefix list version mismatch: {0}")]
    VersionMismatch(String),

    /// The prefix list is temporarily not in a modifiable state
    #[error("prefix list in incorrect state: {0}")]
    IncorrectState(String),

    /// The prefix list is at its remote-enforced entry limit
    #[error("prefix list max entries exceeded: {0}")]
    MaxEntriesExceeded(String),

    /// Any other control-plane error, with the remote error code preserved
    /// so callers can distinguish cause
    #[error("control plane error ({code}): {message}")]
    ControlPlane {
        /// Remote error code (provider-specific)
        code: String,
        /// Error message
        message: String,
    },

    /// IP resolver errors
    #[error("IP resolver error: {0}")]
    Resolver(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Network-related errors
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a duplicate-permission error
    pub fn duplicate_permission(msg: impl Into<String>) -> Self {
        Self::DuplicatePermission(msg.into())
    }

    /// Create a rule-limit-exceeded error
    pub fn rule_limit_exceeded(msg: impl Into<String>) -> Self {
        Self::RuleLimitExceeded(msg.into())
    }

    /// Create a version-mismatch error
    pub fn version_mismatch(msg: impl Into<String>) -> Self {
        Self::VersionMismatch(msg.into())
    }

    /// Create an incorrect-state error
    pub fn incorrect_state(msg: impl Into<String>) -> Self {
        Self::IncorrectState(msg.into())
    }

    /// Create a max-entries-exceeded error
    pub fn max_entries_exceeded(msg: impl Into<String>) -> Self {
        Self::MaxEntriesExceeded(msg.into())
    }

    /// Create a control-plane error with a provider-specific code
    pub fn control_plane(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ControlPlane {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an IP resolver error
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the prefix-list manager may retry after this error.
    ///
    /// Exactly three classes are retryable: a stale version token, a
    /// transient "incorrect state", and the entry limit (which triggers
    /// eviction on the retried attempt). Everything else is fatal.
    pub fn is_prefix_list_retryable(&self) -> bool {
        matches!(
            self,
            Self::VersionMismatch(_) | Self::IncorrectState(_) | Self::MaxEntriesExceeded(_)
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
