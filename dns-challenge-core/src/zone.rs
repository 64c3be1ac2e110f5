//! Zone resolution: which owned zone a name belongs to.

use std::collections::HashSet;

use dns_challenge_provider::domain::{full_name_to_relative, normalize_domain_name};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A name split at the boundary of its owning zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMatch {
    /// Labels in front of the zone, without the separating dot. Empty when the name is the zone.
    pub host: String,
    /// The owned zone.
    pub zone: String,
}

/// Candidate zones for `fqdn`, most specific first.
///
/// `a.b.example.com` yields `a.b.example.com`, `b.example.com`, `example.com`, `com`.
pub fn zone_candidates(fqdn: &str) -> Vec<String> {
    let fqdn = normalize_domain_name(fqdn);
    if fqdn.is_empty() {
        return Vec::new();
    }
    let labels: Vec<&str> = fqdn.split('.').collect();
    (0..labels.len()).map(|i| labels[i..].join(".")).collect()
}

/// Resolve `fqdn` against a set of owned zones.
///
/// Shorthand for `ZoneResolver::new(owned_zones).resolve(fqdn)`.
pub fn resolve(fqdn: &str, owned_zones: &HashSet<String>) -> CoreResult<ZoneMatch> {
    ZoneResolver::new(owned_zones).resolve(fqdn)
}

/// The zones owned by one account, ready for longest-suffix lookups.
///
/// Zone names are compared case-insensitively and without the trailing root dot.
#[derive(Debug, Clone, Default)]
pub struct ZoneResolver {
    zones: HashSet<String>,
    sorted: Vec<String>,
}

impl ZoneResolver {
    pub fn new<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let zones: HashSet<String> = zones
            .into_iter()
            .map(|z| normalize_domain_name(z.as_ref()))
            .filter(|z| !z.is_empty())
            .collect();
        let mut sorted: Vec<String> = zones.iter().cloned().collect();
        sorted.sort();
        Self { zones, sorted }
    }

    /// Owned zones in lexical order.
    pub fn zones(&self) -> &[String] {
        &self.sorted
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn contains(&self, zone: &str) -> bool {
        self.zones.contains(&normalize_domain_name(zone))
    }

    /// Find the longest owned zone that is a suffix of `fqdn`.
    ///
    /// Fails with [`CoreError::UnknownDomain`] when none is.
    pub fn resolve(&self, fqdn: &str) -> CoreResult<ZoneMatch> {
        zone_candidates(fqdn)
            .into_iter()
            .find(|candidate| self.zones.contains(candidate))
            .and_then(|zone| {
                full_name_to_relative(fqdn, &zone).map(|host| ZoneMatch { host, zone })
            })
            .ok_or_else(|| CoreError::UnknownDomain {
                fqdn: fqdn.to_string(),
            })
    }

    /// `name` relative to `zone`, which must be a suffix of it.
    ///
    /// Fails with [`CoreError::UnknownDomain`] carrying `name` when it lies outside `zone`.
    pub fn relative_name(name: &str, zone: &str) -> CoreResult<String> {
        full_name_to_relative(name, zone).ok_or_else(|| CoreError::UnknownDomain {
            fqdn: name.to_string(),
        })
    }
}
