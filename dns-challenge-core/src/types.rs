//! Challenge data types.

use std::fmt;

use dns_challenge_provider::RecordType;
use serde::{Deserialize, Serialize};

/// Label prefixed to a domain to form its DNS-01 validation name.
pub const ACME_CHALLENGE_LABEL: &str = "_acme-challenge";

/// `_acme-challenge.<domain>`, the name at which a DNS-01 TXT record is published.
pub fn validation_domain_name(domain: &str) -> String {
    format!("{ACME_CHALLENGE_LABEL}.{}", domain.trim_end_matches('.'))
}

/// One DNS-01 challenge as handed over by the issuance workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsChallenge {
    /// Domain being validated, e.g. `foo.example.com`.
    pub domain: String,
    /// Full name of the TXT record, usually `_acme-challenge.<domain>`.
    pub validation_name: String,
    /// TXT content (the key authorization digest).
    pub validation: String,
}

impl DnsChallenge {
    /// Challenge published at the standard `_acme-challenge` name.
    #[must_use]
    pub fn new(domain: impl Into<String>, validation: impl Into<String>) -> Self {
        let domain = domain.into();
        Self {
            validation_name: validation_domain_name(&domain),
            domain,
            validation: validation.into(),
        }
    }
}

/// A TXT record as the coordinator addresses it: relative name within an owned zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub zone: String,
    /// Relative to `zone`; empty for the apex.
    pub name: String,
    pub record_type: RecordType,
    pub content: String,
    pub ttl: u32,
}

/// Lifecycle of a challenge record.
///
/// `Absent → PendingVisible → Visible → PendingAbsent → Absent`. `PendingVisible` is
/// only entered while waiting for propagation; `PendingAbsent` is never entered
/// because removal is not awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordState {
    Absent,
    PendingVisible,
    Visible,
    PendingAbsent,
}

/// Step of the challenge lifecycle, used for error context and observer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChallengeOperation {
    Connect,
    FetchZones,
    Resolve,
    CreateRecord,
    DeleteRecord,
    WaitVisible,
}

impl fmt::Display for ChallengeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::FetchZones => "fetch owned zones",
            Self::Resolve => "resolve zone",
            Self::CreateRecord => "create record",
            Self::DeleteRecord => "delete record",
            Self::WaitVisible => "wait for record visibility",
        })
    }
}

/// A challenge whose record could not be removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupFailure {
    pub domain: String,
    pub validation_name: String,
    pub reason: String,
}

/// Outcome of [`DnsAuthenticator::cleanup`](crate::DnsAuthenticator::cleanup).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub success_count: usize,
    pub failed_count: usize,
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed_count == 0
    }
}
