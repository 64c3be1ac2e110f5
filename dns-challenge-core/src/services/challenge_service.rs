//! TXT record lifecycle for DNS-01 challenges

use std::sync::Arc;

use dns_challenge_provider::{ClientConnector, ProviderError, RecordClient, RecordType};
use dns_challenge_toolbox::PropagationWaiter;
use tokio_util::sync::CancellationToken;

use crate::adapters::DnsVisibilityClient;
use crate::config::ChallengeConfig;
use crate::error::{CoreError, CoreResult};
use crate::observer::ChallengeObserver;
use crate::types::{ChallengeOperation, ChallengeRecord, RecordState};
use crate::zone::{ZoneMatch, ZoneResolver};

/// Creates and removes challenge TXT records in the zones of one account.
///
/// Owned zones are fetched once at construction and are read-only afterwards, so a
/// single service can run challenges for several domains concurrently.
///
/// Adding waits for visibility when `wait_for_propagation` is set. Removing never
/// waits, whatever the flag says.
pub struct ChallengeService {
    client: Arc<dyn RecordClient>,
    resolver: ZoneResolver,
    wait_for_propagation: bool,
    observer: Arc<dyn ChallengeObserver>,
    shutdown: CancellationToken,
}

impl ChallengeService {
    /// Build the service around an authenticated client.
    ///
    /// Fetches the owned zones (one network call).
    pub async fn new(
        client: Arc<dyn RecordClient>,
        wait_for_propagation: bool,
        observer: Arc<dyn ChallengeObserver>,
    ) -> CoreResult<Self> {
        let zones = match client.fetch_owned_zones().await {
            Ok(zones) => zones,
            Err(e) => {
                let err = CoreError::provider(ChallengeOperation::FetchZones, e);
                observer.operation_failed(ChallengeOperation::FetchZones, &err);
                return Err(err);
            }
        };

        let resolver = ZoneResolver::new(&zones);
        observer.zones_loaded(resolver.zones());

        Ok(Self {
            client,
            resolver,
            wait_for_propagation,
            observer,
            shutdown: CancellationToken::new(),
        })
    }

    /// Validate `config`, connect through `connector` and build the service.
    ///
    /// With `dns_check` set, visibility is confirmed by our own TXT lookups
    /// ([`DnsVisibilityClient`]) instead of the client's wait.
    pub async fn connect(
        config: &ChallengeConfig,
        connector: &dyn ClientConnector,
        observer: Arc<dyn ChallengeObserver>,
    ) -> CoreResult<Self> {
        let waiter = PropagationWaiter::new(&config.propagation);
        Self::connect_with_waiter(config, connector, observer, waiter).await
    }

    /// Like [`connect`](Self::connect), with `waiter` doing the lookups when
    /// `dns_check` is set. It is unused otherwise.
    pub async fn connect_with_waiter(
        config: &ChallengeConfig,
        connector: &dyn ClientConnector,
        observer: Arc<dyn ChallengeObserver>,
        waiter: PropagationWaiter,
    ) -> CoreResult<Self> {
        config.validate()?;

        let client = match connector.connect(&config.credentials).await {
            Ok(client) => client,
            Err(e) => {
                let err = CoreError::provider(ChallengeOperation::Connect, e);
                observer.operation_failed(ChallengeOperation::Connect, &err);
                return Err(err);
            }
        };

        let client: Arc<dyn RecordClient> = if config.dns_check {
            Arc::new(DnsVisibilityClient::with_waiter(client, waiter))
        } else {
            client
        };

        Self::new(client, config.wait, observer).await
    }

    /// Interrupt in-flight visibility waits when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Owned zones, normalised and sorted.
    pub fn zones(&self) -> &[String] {
        self.resolver.zones()
    }

    pub fn wait_for_propagation(&self) -> bool {
        self.wait_for_propagation
    }

    /// Observer receiving this service's lifecycle events.
    pub fn observer(&self) -> &dyn ChallengeObserver {
        self.observer.as_ref()
    }

    /// Zone owning `fqdn`, and `validation_name` relative to that zone.
    ///
    /// The host part of the match is not used: the record lives at `validation_name`,
    /// which normally is `_acme-challenge.<fqdn>`.
    pub fn locate(&self, fqdn: &str, validation_name: &str) -> CoreResult<(ZoneMatch, String)> {
        let matched = self.resolver.resolve(fqdn)?;
        self.observer.zone_matched(fqdn, &matched);
        let name = ZoneResolver::relative_name(validation_name, &matched.zone)?;
        Ok((matched, name))
    }

    /// Create the TXT record `validation_name = content`, then wait for it to become
    /// visible if configured to.
    ///
    /// Cancelling the service token interrupts only the wait; the record stays created
    /// and the call fails with [`CoreError::Cancelled`].
    pub async fn add_challenge_record(
        &self,
        fqdn: &str,
        validation_name: &str,
        content: &str,
        ttl: u32,
    ) -> CoreResult<()> {
        let record = self
            .challenge_record(fqdn, validation_name, content, ttl)
            .map_err(|e| self.report(ChallengeOperation::Resolve, e))?;

        self.client
            .create_record(&record.zone, &record.name, record.record_type, &record.content)
            .await
            .map_err(|e| {
                self.report(
                    ChallengeOperation::CreateRecord,
                    CoreError::provider(ChallengeOperation::CreateRecord, e),
                )
            })?;

        if !self.wait_for_propagation {
            self.observer.state_changed(&record, RecordState::Visible);
            return Ok(());
        }

        self.observer.state_changed(&record, RecordState::PendingVisible);

        let wait = self.client.wait_until_record_visible(
            &record.zone,
            &record.name,
            record.record_type,
            &record.content,
        );
        let result = tokio::select! {
            biased;
            () = self.shutdown.cancelled() => Err(CoreError::Cancelled {
                zone: record.zone.clone(),
                record_name: record.name.clone(),
            }),
            r = wait => r.map_err(|e| wait_error(&record, e)),
        };

        match result {
            Ok(()) => {
                self.observer.state_changed(&record, RecordState::Visible);
                Ok(())
            }
            Err(e) => Err(self.report(ChallengeOperation::WaitVisible, e)),
        }
    }

    /// Delete the TXT record `validation_name = content`.
    ///
    /// Returns as soon as the delete request succeeds; removal is never awaited.
    /// Whether deleting an already removed record fails is up to the client.
    pub async fn remove_challenge_record(
        &self,
        fqdn: &str,
        validation_name: &str,
        content: &str,
        ttl: u32,
    ) -> CoreResult<()> {
        let record = self
            .challenge_record(fqdn, validation_name, content, ttl)
            .map_err(|e| self.report(ChallengeOperation::Resolve, e))?;

        self.client
            .delete_record(&record.zone, &record.name, record.record_type, &record.content)
            .await
            .map_err(|e| {
                self.report(
                    ChallengeOperation::DeleteRecord,
                    CoreError::provider(ChallengeOperation::DeleteRecord, e),
                )
            })?;

        // 不等待删除生效
        self.observer.state_changed(&record, RecordState::Absent);
        Ok(())
    }

    fn challenge_record(
        &self,
        fqdn: &str,
        validation_name: &str,
        content: &str,
        ttl: u32,
    ) -> CoreResult<ChallengeRecord> {
        let (matched, name) = self.locate(fqdn, validation_name)?;
        Ok(ChallengeRecord {
            zone: matched.zone,
            name,
            record_type: RecordType::Txt,
            content: content.to_string(),
            ttl,
        })
    }

    fn report(&self, operation: ChallengeOperation, error: CoreError) -> CoreError {
        self.observer.operation_failed(operation, &error);
        error
    }
}

fn wait_error(record: &ChallengeRecord, e: ProviderError) -> CoreError {
    match e {
        ProviderError::PropagationTimeout { waited_secs, .. } => CoreError::PropagationTimeout {
            zone: record.zone.clone(),
            record_name: record.name.clone(),
            waited_secs,
        },
        other => CoreError::provider(ChallengeOperation::WaitVisible, other),
    }
}
