//! # dns-challenge-provider
//!
//! The client seam of the DNS-01 challenge workspace: everything a concrete
//! DNS provider integration has to implement so that the challenge
//! coordinator in `dns-challenge-core` can drive it.
//!
//! The crate deliberately ships no provider transport. A provider integration
//! implements [`RecordClient`] (and usually [`ClientConnector`] to build the
//! client from [`AccountCredentials`]); tests substitute an in-memory double.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dns_challenge_provider::{RecordClient, RecordType, Result};
//!
//! # async fn example(client: std::sync::Arc<dyn RecordClient>) -> Result<()> {
//! let zones = client.fetch_owned_zones().await?;
//! println!("owned zones: {}", zones.join(", "));
//!
//! client
//!     .create_record("example.com", "_acme-challenge.www", RecordType::Txt, "token")
//!     .await?;
//! client
//!     .wait_until_record_visible("example.com", "_acme-challenge.www", RecordType::Txt, "token")
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All client operations return [`Result<T, ProviderError>`](ProviderError).
//!
//! - [`ProviderError::InvalidCredentials`] — authentication failed
//! - [`ProviderError::RecordNotFound`] — record to delete does not exist
//! - [`ProviderError::PropagationTimeout`] — the record never became visible
//! - [`ProviderError::NetworkError`] — network connectivity issue (retryable)
//!
//! Retrying is left to the caller; see [`ProviderError::is_retryable`].

mod error;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export client traits
pub use traits::{ClientConnector, RecordClient};

// Re-export types
pub use types::{AccountCredentials, CredentialValidationError, RecordType};

// Re-export utils modules
pub use utils::{domain, log_sanitizer};
