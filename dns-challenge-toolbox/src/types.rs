//! Toolbox type definitions.

use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default interval between two propagation polls, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
/// Default upper bound on a propagation wait, in seconds.
pub const DEFAULT_MAX_WAIT_SECS: u64 = 300;

/// Polling bounds for [`PropagationWaiter`](crate::PropagationWaiter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Seconds to sleep between two lookups.
    pub poll_interval_secs: u64,
    /// Give up after this many seconds.
    pub max_wait_secs: u64,
    /// Resolvers to query. Empty uses the resolver library's default upstreams.
    pub nameservers: Vec<IpAddr>,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_wait_secs: DEFAULT_MAX_WAIT_SECS,
            nameservers: Vec::new(),
        }
    }
}

impl PropagationConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub const fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }
}

/// Result of a single TXT lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxtLookupResult {
    /// Queried name.
    pub fqdn: String,
    /// Resolver(s) used, for display.
    pub nameserver: String,
    /// TXT strings, each record's character-strings concatenated.
    pub values: Vec<String>,
    /// TTL of the first answer, if any answer was returned.
    pub ttl: Option<u32>,
}

/// How a propagation wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The awaited condition was observed.
    Reached {
        /// Number of lookups performed.
        attempts: u32,
        /// Time spent waiting.
        elapsed: Duration,
    },
    /// The deadline passed first.
    TimedOut {
        /// Number of lookups performed.
        attempts: u32,
        /// Time spent waiting.
        elapsed: Duration,
    },
}

impl WaitOutcome {
    #[must_use]
    pub const fn is_reached(&self) -> bool {
        matches!(self, Self::Reached { .. })
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Reached { attempts, .. } | Self::TimedOut { attempts, .. } => *attempts,
        }
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::Reached { elapsed, .. } | Self::TimedOut { elapsed, .. } => *elapsed,
        }
    }
}
