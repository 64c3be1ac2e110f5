//! DNS Challenge Core Library
//!
//! Automates DNS-01 domain validation against a DNS provider account:
//! - Zone resolution ([`ZoneResolver`]): which owned zone a name belongs to
//! - Record lifecycle ([`ChallengeService`]): create the TXT record, optionally wait
//!   until it is visible, remove it again
//! - Batch workflow ([`DnsAuthenticator`]): perform/cleanup for a set of challenges
//!
//! The provider itself is reached through the
//! [`RecordClient`](dns_challenge_provider::RecordClient) trait, so this crate carries
//! no transport of its own.

pub mod adapters;
pub mod config;
pub mod error;
pub mod observer;
pub mod services;
pub mod types;
pub mod zone;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::ChallengeConfig;
pub use error::{CoreError, CoreResult};
pub use observer::{ChallengeObserver, LogObserver, NoopObserver};
pub use services::{ChallengeService, DnsAuthenticator};
pub use types::{
    ChallengeOperation, ChallengeRecord, CleanupFailure, CleanupReport, DnsChallenge,
    RecordState,
};
pub use zone::{ZoneMatch, ZoneResolver};
