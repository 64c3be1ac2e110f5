//! Visibility checks through our own TXT lookups.

use std::sync::Arc;

use async_trait::async_trait;
use dns_challenge_provider::domain::relative_to_full_name;
use dns_challenge_provider::{ProviderError, RecordClient, RecordType, Result};
use dns_challenge_toolbox::{PropagationConfig, PropagationWaiter, WaitOutcome};

/// Wraps a [`RecordClient`] and replaces its propagation waits with polling
/// TXT lookups from a [`PropagationWaiter`].
///
/// Record management is delegated unchanged. Useful for providers whose own wait
/// is missing or unreliable.
pub struct DnsVisibilityClient {
    inner: Arc<dyn RecordClient>,
    waiter: PropagationWaiter,
}

impl DnsVisibilityClient {
    #[must_use]
    pub fn new(inner: Arc<dyn RecordClient>, config: &PropagationConfig) -> Self {
        Self::with_waiter(inner, PropagationWaiter::new(config))
    }

    #[must_use]
    pub fn with_waiter(inner: Arc<dyn RecordClient>, waiter: PropagationWaiter) -> Self {
        Self { inner, waiter }
    }

    fn outcome_to_result(&self, name: &str, outcome: WaitOutcome) -> Result<()> {
        match outcome {
            WaitOutcome::Reached { .. } => Ok(()),
            WaitOutcome::TimedOut { elapsed, .. } => Err(ProviderError::PropagationTimeout {
                provider: self.id().to_string(),
                record_name: name.to_string(),
                waited_secs: elapsed.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl RecordClient for DnsVisibilityClient {
    fn id(&self) -> &'static str {
        self.inner.id()
    }

    async fn fetch_owned_zones(&self) -> Result<Vec<String>> {
        self.inner.fetch_owned_zones().await
    }

    async fn create_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
        content: &str,
    ) -> Result<()> {
        self.inner
            .create_record(zone, name, record_type, content)
            .await
    }

    async fn delete_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
        content: &str,
    ) -> Result<()> {
        self.inner
            .delete_record(zone, name, record_type, content)
            .await
    }

    async fn wait_until_record_visible(
        &self,
        zone: &str,
        name: &str,
        _record_type: RecordType,
        content: &str,
    ) -> Result<()> {
        let fqdn = relative_to_full_name(name, zone);
        let outcome = self.waiter.wait_until_visible(&fqdn, content).await;
        self.outcome_to_result(name, outcome)
    }

    async fn wait_until_record_absent(
        &self,
        zone: &str,
        name: &str,
        _record_type: RecordType,
        content: &str,
    ) -> Result<()> {
        let fqdn = relative_to_full_name(name, zone);
        let outcome = self.waiter.wait_until_absent(&fqdn, content).await;
        self.outcome_to_result(name, outcome)
    }
}
