//! Poll-until-visible / poll-until-absent waiter.

use std::sync::Arc;

use dns_challenge_provider::log_sanitizer::truncate_for_log;
use tokio::time::{Duration, Instant, sleep, timeout};

use crate::types::{PropagationConfig, WaitOutcome};

use super::dns::{HickoryTxtResolver, TxtResolver};

/// Upper bound on a single lookup inside the polling loop, in seconds.
const QUERY_TIMEOUT_SECS: u64 = 5;

/// Polls TXT lookups at a fixed interval until a condition holds or the deadline passes.
///
/// The waiter sleeps between polls and never spins. Dropping the returned future
/// stops the wait immediately; no state is left behind.
#[derive(Clone)]
pub struct PropagationWaiter {
    resolver: Arc<dyn TxtResolver>,
    poll_interval: Duration,
    max_wait: Duration,
}

impl PropagationWaiter {
    /// Waiter backed by [`HickoryTxtResolver`] on the configured nameservers.
    #[must_use]
    pub fn new(config: &PropagationConfig) -> Self {
        Self::with_resolver(
            config,
            Arc::new(HickoryTxtResolver::new(config.nameservers.clone())),
        )
    }

    /// Waiter backed by a custom TXT source.
    #[must_use]
    pub fn with_resolver(config: &PropagationConfig, resolver: Arc<dyn TxtResolver>) -> Self {
        Self {
            resolver,
            poll_interval: config.poll_interval(),
            max_wait: config.max_wait(),
        }
    }

    /// Whether `content` is currently published at `fqdn`.
    ///
    /// Lookup failures count as "not published".
    pub async fn check_once(&self, fqdn: &str, content: &str) -> bool {
        self.lookup_values(fqdn)
            .await
            .is_some_and(|values| values.iter().any(|v| v == content))
    }

    /// Wait until `content` appears among the TXT values at `fqdn`.
    pub async fn wait_until_visible(&self, fqdn: &str, content: &str) -> WaitOutcome {
        log::debug!(
            "Waiting for TXT {fqdn} = {} to become visible",
            truncate_for_log(content)
        );
        self.poll(fqdn, |values| values.iter().any(|v| v == content))
            .await
    }

    /// Wait until `content` is no longer among the TXT values at `fqdn`.
    pub async fn wait_until_absent(&self, fqdn: &str, content: &str) -> WaitOutcome {
        log::debug!(
            "Waiting for TXT {fqdn} = {} to disappear",
            truncate_for_log(content)
        );
        self.poll(fqdn, |values| values.iter().all(|v| v != content))
            .await
    }

    async fn poll<F>(&self, fqdn: &str, done: F) -> WaitOutcome
    where
        F: Fn(&[String]) -> bool,
    {
        let start = Instant::now();
        // 超出 Instant 范围时视为没有截止时间
        let deadline = start.checked_add(self.max_wait);
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            if let Some(values) = self.lookup_values(fqdn).await {
                if done(&values) {
                    let elapsed = start.elapsed();
                    log::debug!(
                        "TXT {fqdn} reached expected state after {attempts} lookup(s), {:.1}s",
                        elapsed.as_secs_f32()
                    );
                    return WaitOutcome::Reached { attempts, elapsed };
                }
            }

            let now = Instant::now();
            let pause = match deadline {
                Some(deadline) if now >= deadline => {
                    let elapsed = now - start;
                    log::warn!(
                        "TXT {fqdn} did not reach expected state within {}s ({attempts} lookups)",
                        self.max_wait.as_secs()
                    );
                    return WaitOutcome::TimedOut { attempts, elapsed };
                }
                Some(deadline) => self.poll_interval.min(deadline - now),
                None => self.poll_interval,
            };
            sleep(pause).await;
        }
    }

    async fn lookup_values(&self, fqdn: &str) -> Option<Vec<String>> {
        match timeout(
            Duration::from_secs(QUERY_TIMEOUT_SECS),
            self.resolver.lookup_txt(fqdn),
        )
        .await
        {
            Ok(Ok(result)) => Some(result.values),
            Ok(Err(e)) => {
                log::warn!("TXT lookup for {fqdn} failed: {e}");
                None
            }
            Err(_) => {
                log::warn!("TXT lookup for {fqdn} timed out ({QUERY_TIMEOUT_SECS}s)");
                None
            }
        }
    }
}
