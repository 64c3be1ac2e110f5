//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use dns_challenge_provider::{
    AccountCredentials, ClientConnector, ProviderError, RecordClient, RecordType, Result,
};
use dns_challenge_toolbox::{ToolboxResult, TxtLookupResult, TxtResolver};
use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::observer::ChallengeObserver;
use crate::types::{ChallengeOperation, ChallengeRecord, CleanupReport, RecordState};
use crate::zone::ZoneMatch;

// ===== MockRecordClient =====

/// A call made against [`MockRecordClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchZones,
    Create { zone: String, name: String, content: String },
    Delete { zone: String, name: String, content: String },
    WaitVisible { zone: String, name: String },
    WaitAbsent { zone: String, name: String },
}

type RecordKey = (String, String, String);

/// In-memory record store with switchable failures.
pub struct MockRecordClient {
    zones: Vec<String>,
    records: Mutex<HashSet<RecordKey>>,
    calls: Mutex<Vec<Call>>,
    /// 如果 Some，create 时返回此错误
    create_error: StdMutex<Option<ProviderError>>,
    delete_error: StdMutex<Option<ProviderError>>,
    wait_error: StdMutex<Option<ProviderError>>,
    zones_error: StdMutex<Option<ProviderError>>,
    wait_delay: Duration,
    /// 删除不存在的记录时返回 RecordNotFound
    strict_delete: bool,
}

impl MockRecordClient {
    pub fn new(zones: &[&str]) -> Self {
        Self {
            zones: zones.iter().map(|z| (*z).to_string()).collect(),
            records: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            create_error: StdMutex::new(None),
            delete_error: StdMutex::new(None),
            wait_error: StdMutex::new(None),
            zones_error: StdMutex::new(None),
            wait_delay: Duration::ZERO,
            strict_delete: false,
        }
    }

    pub fn with_create_error(self, e: ProviderError) -> Self {
        *self.create_error.lock().unwrap() = Some(e);
        self
    }

    pub fn with_delete_error(self, e: ProviderError) -> Self {
        *self.delete_error.lock().unwrap() = Some(e);
        self
    }

    pub fn with_wait_error(self, e: ProviderError) -> Self {
        *self.wait_error.lock().unwrap() = Some(e);
        self
    }

    pub fn with_zones_error(self, e: ProviderError) -> Self {
        *self.zones_error.lock().unwrap() = Some(e);
        self
    }

    pub fn with_wait_delay(mut self, delay: Duration) -> Self {
        self.wait_delay = delay;
        self
    }

    pub fn strict_delete(mut self) -> Self {
        self.strict_delete = true;
        self
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn has_record(&self, zone: &str, name: &str, content: &str) -> bool {
        self.records
            .lock()
            .await
            .contains(&(zone.to_string(), name.to_string(), content.to_string()))
    }

    pub async fn record_count(&self) -> usize {
        self.records.lock().await.len()
    }

    async fn log(&self, call: Call) {
        self.calls.lock().await.push(call);
    }
}

pub fn network_error() -> ProviderError {
    ProviderError::NetworkError {
        provider: "mock".to_string(),
        detail: "connection reset".to_string(),
    }
}

#[async_trait]
impl RecordClient for MockRecordClient {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn fetch_owned_zones(&self) -> Result<Vec<String>> {
        self.log(Call::FetchZones).await;
        let injected = self.zones_error.lock().unwrap().clone();
        if let Some(e) = injected {
            return Err(e);
        }
        Ok(self.zones.clone())
    }

    async fn create_record(
        &self,
        zone: &str,
        name: &str,
        _record_type: RecordType,
        content: &str,
    ) -> Result<()> {
        self.log(Call::Create {
            zone: zone.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        })
        .await;
        let injected = self.create_error.lock().unwrap().clone();
        if let Some(e) = injected {
            return Err(e);
        }
        self.records
            .lock()
            .await
            .insert((zone.to_string(), name.to_string(), content.to_string()));
        Ok(())
    }

    async fn delete_record(
        &self,
        zone: &str,
        name: &str,
        _record_type: RecordType,
        content: &str,
    ) -> Result<()> {
        self.log(Call::Delete {
            zone: zone.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        })
        .await;
        let injected = self.delete_error.lock().unwrap().clone();
        if let Some(e) = injected {
            return Err(e);
        }
        let removed = self
            .records
            .lock()
            .await
            .remove(&(zone.to_string(), name.to_string(), content.to_string()));
        if !removed && self.strict_delete {
            return Err(ProviderError::RecordNotFound {
                provider: "mock".to_string(),
                record_name: name.to_string(),
                raw_message: None,
            });
        }
        Ok(())
    }

    async fn wait_until_record_visible(
        &self,
        zone: &str,
        name: &str,
        _record_type: RecordType,
        _content: &str,
    ) -> Result<()> {
        self.log(Call::WaitVisible {
            zone: zone.to_string(),
            name: name.to_string(),
        })
        .await;
        if !self.wait_delay.is_zero() {
            tokio::time::sleep(self.wait_delay).await;
        }
        let injected = self.wait_error.lock().unwrap().clone();
        if let Some(e) = injected {
            return Err(e);
        }
        Ok(())
    }

    async fn wait_until_record_absent(
        &self,
        zone: &str,
        name: &str,
        _record_type: RecordType,
        _content: &str,
    ) -> Result<()> {
        self.log(Call::WaitAbsent {
            zone: zone.to_string(),
            name: name.to_string(),
        })
        .await;
        Ok(())
    }
}

// ===== MockConnector =====

/// Hands out the same client for any credentials.
pub struct MockConnector {
    client: Arc<MockRecordClient>,
}

impl MockConnector {
    pub fn new(client: Arc<MockRecordClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClientConnector for MockConnector {
    async fn connect(&self, _credentials: &AccountCredentials) -> Result<Arc<dyn RecordClient>> {
        Ok(self.client.clone())
    }
}

// ===== FixedResolver =====

/// Answers every TXT lookup with the same values and remembers the queried names.
pub struct FixedResolver {
    values: Vec<String>,
    queried: StdMutex<Vec<String>>,
}

impl FixedResolver {
    pub fn new(values: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            values: values.iter().map(|v| (*v).to_string()).collect(),
            queried: StdMutex::new(Vec::new()),
        })
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl TxtResolver for FixedResolver {
    async fn lookup_txt(&self, fqdn: &str) -> ToolboxResult<TxtLookupResult> {
        self.queried.lock().unwrap().push(fqdn.to_string());
        Ok(TxtLookupResult {
            fqdn: fqdn.to_string(),
            nameserver: "fixed".to_string(),
            values: self.values.clone(),
            ttl: Some(60),
        })
    }
}

// ===== RecordingObserver =====

/// Event captured by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ZonesLoaded(Vec<String>),
    ZoneMatched { fqdn: String, host: String, zone: String },
    StateChanged { name: String, state: RecordState },
    OperationFailed(ChallengeOperation),
    BatchPublished { total: usize, failed: usize },
    PropagationPause(Duration),
    BatchCleaned { removed: usize, failed: usize },
}

#[derive(Default)]
pub struct RecordingObserver {
    events: StdMutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn states(&self) -> Vec<RecordState> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::StateChanged { state, .. } => Some(state),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl ChallengeObserver for RecordingObserver {
    fn zones_loaded(&self, zones: &[String]) {
        self.push(Event::ZonesLoaded(zones.to_vec()));
    }

    fn zone_matched(&self, fqdn: &str, matched: &ZoneMatch) {
        self.push(Event::ZoneMatched {
            fqdn: fqdn.to_string(),
            host: matched.host.clone(),
            zone: matched.zone.clone(),
        });
    }

    fn state_changed(&self, record: &ChallengeRecord, state: RecordState) {
        self.push(Event::StateChanged {
            name: record.name.clone(),
            state,
        });
    }

    fn operation_failed(&self, operation: ChallengeOperation, _error: &CoreError) {
        self.push(Event::OperationFailed(operation));
    }

    fn batch_published(&self, total: usize, failed: usize) {
        self.push(Event::BatchPublished { total, failed });
    }

    fn propagation_pause(&self, delay: Duration) {
        self.push(Event::PropagationPause(delay));
    }

    fn batch_cleaned(&self, report: &CleanupReport) {
        self.push(Event::BatchCleaned {
            removed: report.success_count,
            failed: report.failed_count,
        });
    }
}
