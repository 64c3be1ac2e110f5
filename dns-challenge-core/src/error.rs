//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use crate::types::ChallengeOperation;

// Re-export library error types
pub use dns_challenge_provider::{CredentialValidationError, ProviderError};

/// Core layer error type
///
/// None of these are retried inside this crate; the calling workflow decides.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// No owned zone is a suffix of the name. Indicates account misconfiguration
    /// or a domain not delegated to this provider.
    #[error("Domain {fqdn} not known to this account")]
    UnknownDomain { fqdn: String },

    /// The record client failed (network, authentication, malformed response, ...).
    #[error("Failed to {operation}: {source}")]
    ProviderCommunication {
        operation: ChallengeOperation,
        source: ProviderError,
    },

    /// The record did not become visible within the client's wait deadline.
    #[error("Record '{record_name}' in zone {zone} not visible after {waited_secs}s")]
    PropagationTimeout {
        zone: String,
        record_name: String,
        waited_secs: u64,
    },

    /// The wait for visibility was interrupted. The record itself was created.
    #[error("Waiting for record '{record_name}' in zone {zone} was cancelled")]
    Cancelled { zone: String, record_name: String },

    /// Credential or configuration value rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(CredentialValidationError),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CoreError {
    /// Wrap a client error for the given lifecycle step.
    #[must_use]
    pub fn provider(operation: ChallengeOperation, source: ProviderError) -> Self {
        Self::ProviderCommunication { operation, source }
    }

    /// Whether it is expected behavior (misconfiguration, missing records, etc.), used for
    /// log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::UnknownDomain { .. }
            | Self::PropagationTimeout { .. }
            | Self::Cancelled { .. }
            | Self::InvalidConfig(_) => true,
            Self::ProviderCommunication { source, .. } => source.is_expected(),
            Self::ConfigError(_) => false,
        }
    }

    /// Whether the calling workflow may reasonably retry the whole operation.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderCommunication { source, .. } if source.is_retryable())
    }
}

impl From<CredentialValidationError> for CoreError {
    fn from(e: CredentialValidationError) -> Self {
        Self::InvalidConfig(e)
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
