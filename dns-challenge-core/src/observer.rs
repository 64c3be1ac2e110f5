//! Lifecycle event hooks.
//!
//! The coordinator reports what it does through a [`ChallengeObserver`] handed in at
//! construction, so hosts decide where the events go. [`LogObserver`] forwards them to
//! the `log` facade.

use std::time::Duration;

use dns_challenge_provider::log_sanitizer::truncate_for_log;

use crate::error::CoreError;
use crate::types::{ChallengeOperation, ChallengeRecord, CleanupReport, RecordState};
use crate::zone::ZoneMatch;

/// Receives lifecycle events. Every method defaults to doing nothing.
pub trait ChallengeObserver: Send + Sync {
    /// Owned zones were fetched from the account.
    fn zones_loaded(&self, zones: &[String]) {
        let _ = zones;
    }

    /// A name was matched to one of the owned zones.
    fn zone_matched(&self, fqdn: &str, matched: &ZoneMatch) {
        let _ = (fqdn, matched);
    }

    /// A record entered a new lifecycle state.
    fn state_changed(&self, record: &ChallengeRecord, state: RecordState) {
        let _ = (record, state);
    }

    /// An operation failed; the error is also returned to the caller.
    fn operation_failed(&self, operation: ChallengeOperation, error: &CoreError) {
        let _ = (operation, error);
    }

    /// A batch of adds finished; `failed` of `total` did not publish.
    fn batch_published(&self, total: usize, failed: usize) {
        let _ = (total, failed);
    }

    /// Pausing for `delay` before the published records are handed over.
    fn propagation_pause(&self, delay: Duration) {
        let _ = delay;
    }

    /// A batch of removals finished.
    fn batch_cleaned(&self, report: &CleanupReport) {
        let _ = report;
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ChallengeObserver for NoopObserver {}

/// Writes events through the `log` facade.
///
/// Failures that [`CoreError::is_expected`] are logged at `warn`, everything else at `error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ChallengeObserver for LogObserver {
    fn zones_loaded(&self, zones: &[String]) {
        log::debug!("Account owned domains: {}", zones.join(", "));
    }

    fn zone_matched(&self, fqdn: &str, matched: &ZoneMatch) {
        log::debug!(
            "Matched fqdn {fqdn} to host '{}' in owned domain {}",
            matched.host,
            matched.zone
        );
    }

    fn state_changed(&self, record: &ChallengeRecord, state: RecordState) {
        let name = if record.name.is_empty() {
            "@"
        } else {
            record.name.as_str()
        };
        match state {
            RecordState::Visible | RecordState::Absent => log::info!(
                "{} record {name} in {} ({}) is now {state:?}",
                record.record_type,
                record.zone,
                truncate_for_log(&record.content)
            ),
            RecordState::PendingVisible | RecordState::PendingAbsent => log::debug!(
                "{} record {name} in {} is {state:?}",
                record.record_type,
                record.zone
            ),
        }
    }

    fn operation_failed(&self, operation: ChallengeOperation, error: &CoreError) {
        if error.is_expected() {
            log::warn!("[{operation}] {error}");
        } else {
            log::error!("[{operation}] {error}");
        }
    }

    fn batch_published(&self, total: usize, failed: usize) {
        if failed > 0 {
            log::warn!("{failed} of {total} challenge record(s) could not be published");
        } else {
            log::debug!("Published {total} challenge record(s)");
        }
    }

    fn propagation_pause(&self, delay: Duration) {
        log::info!("Waiting {}s for DNS changes to propagate", delay.as_secs());
    }

    fn batch_cleaned(&self, report: &CleanupReport) {
        if report.is_clean() {
            log::debug!("Removed {} challenge record(s)", report.success_count);
        } else {
            log::warn!(
                "Cleanup finished with {} failure(s), {} record(s) removed",
                report.failed_count,
                report.success_count
            );
        }
    }
}
