use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AccountCredentials, RecordType};

/// Record-management client for one authenticated provider account.
///
/// This is the capability set the challenge coordinator depends on. Record names are
/// always relative to `zone` (an empty name addresses the zone apex).
///
/// Implementations must be safe to share between tasks: challenges for different
/// domains may run concurrently against the same client.
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// 客户端标识符（用于日志和错误）
    fn id(&self) -> &'static str;

    /// List the zones (domains) owned by the authenticated account.
    async fn fetch_owned_zones(&self) -> Result<Vec<String>>;

    /// Create a record. A single atomic request; it is never partially applied.
    async fn create_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
        content: &str,
    ) -> Result<()>;

    /// Delete the record matching name, type and content.
    ///
    /// What happens when the record is already gone is up to the provider; it may
    /// succeed or fail with [`ProviderError::RecordNotFound`](crate::ProviderError::RecordNotFound).
    async fn delete_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
        content: &str,
    ) -> Result<()>;

    /// Block until the record is visible in DNS.
    ///
    /// Fails with [`ProviderError::PropagationTimeout`](crate::ProviderError::PropagationTimeout)
    /// once the implementation's own deadline passes.
    async fn wait_until_record_visible(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
        content: &str,
    ) -> Result<()>;

    /// Block until the record has disappeared from DNS.
    ///
    /// 默认实现直接返回，不做等待。
    async fn wait_until_record_absent(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
        content: &str,
    ) -> Result<()> {
        let _ = (zone, name, record_type, content);
        Ok(())
    }
}

/// Builds an authenticated [`RecordClient`] from account credentials.
///
/// Provider integrations implement this so that callers can go from a loaded
/// configuration straight to a ready client.
#[async_trait]
pub trait ClientConnector: Send + Sync {
    /// Authenticate and return a shareable client.
    async fn connect(&self, credentials: &AccountCredentials) -> Result<Arc<dyn RecordClient>>;
}
