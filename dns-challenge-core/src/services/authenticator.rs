//! Batch perform/cleanup over a set of challenges

use std::sync::Arc;
use std::time::Duration;

use crate::config::ChallengeConfig;
use crate::error::CoreResult;
use crate::services::ChallengeService;
use crate::types::{CleanupFailure, CleanupReport, DnsChallenge};

/// Publishes and withdraws the records for a whole issuance attempt.
///
/// Challenges are independent and processed concurrently. The caller runs
/// [`cleanup`](Self::cleanup) for the batch whether or not
/// [`perform`](Self::perform) succeeded.
pub struct DnsAuthenticator {
    service: Arc<ChallengeService>,
    ttl: u32,
    propagation_delay: Duration,
}

impl DnsAuthenticator {
    /// TTL and post-publish pause taken from `config`.
    #[must_use]
    pub fn new(service: Arc<ChallengeService>, config: &ChallengeConfig) -> Self {
        Self::with_settings(
            service,
            config.ttl,
            Duration::from_secs(config.propagation_seconds),
        )
    }

    #[must_use]
    pub fn with_settings(
        service: Arc<ChallengeService>,
        ttl: u32,
        propagation_delay: Duration,
    ) -> Self {
        Self {
            service,
            ttl,
            propagation_delay,
        }
    }

    #[must_use]
    pub fn description() -> &'static str {
        "Obtain certificates using a DNS TXT record (if you are using your provider account for DNS)."
    }

    #[must_use]
    pub fn more_info(&self) -> String {
        format!(
            "This authenticator creates a TXT record at the _acme-challenge name of each domain \
             through the provider account ({} owned zone(s)) and removes it afterwards.",
            self.service.zones().len()
        )
    }

    pub fn service(&self) -> &ChallengeService {
        &self.service
    }

    /// Add the record for every challenge, then pause for `propagation_delay`.
    ///
    /// All adds run to completion. On failure the first error in challenge order
    /// is returned and the pause is skipped.
    pub async fn perform(&self, challenges: &[DnsChallenge]) -> CoreResult<()> {
        let add_futures: Vec<_> = challenges
            .iter()
            .map(|c| {
                self.service.add_challenge_record(
                    &c.domain,
                    &c.validation_name,
                    &c.validation,
                    self.ttl,
                )
            })
            .collect();

        let results = futures::future::join_all(add_futures).await;
        let failed = results.iter().filter(|r| r.is_err()).count();
        self.service.observer().batch_published(challenges.len(), failed);
        if let Some(err) = results.into_iter().find_map(Result::err) {
            return Err(err);
        }

        if !self.propagation_delay.is_zero() {
            self.service.observer().propagation_pause(self.propagation_delay);
            tokio::time::sleep(self.propagation_delay).await;
        }
        Ok(())
    }

    /// Remove the record for every challenge, attempting all of them.
    pub async fn cleanup(&self, challenges: &[DnsChallenge]) -> CleanupReport {
        let remove_futures: Vec<_> = challenges
            .iter()
            .map(|c| async move {
                self.service
                    .remove_challenge_record(
                        &c.domain,
                        &c.validation_name,
                        &c.validation,
                        self.ttl,
                    )
                    .await
                    .map_err(|e| (c, e))
            })
            .collect();

        let results = futures::future::join_all(remove_futures).await;

        let mut report = CleanupReport::default();
        for result in results {
            match result {
                Ok(()) => report.success_count += 1,
                Err((challenge, e)) => {
                    report.failed_count += 1;
                    report.failures.push(CleanupFailure {
                        domain: challenge.domain.clone(),
                        validation_name: challenge.validation_name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.service.observer().batch_cleaned(&report);
        report
    }
}
