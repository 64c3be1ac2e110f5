//! TXT 记录查询

use std::net::IpAddr;

use async_trait::async_trait;
use hickory_resolver::{
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
    TokioResolver,
};

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::TxtLookupResult;

/// Source of TXT answers for the propagation waiter.
///
/// [`HickoryTxtResolver`] queries real DNS; tests plug in a scripted source.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// Look up the TXT values currently published at `fqdn`.
    ///
    /// A name without TXT records (or a non-existent name) yields an empty list,
    /// not an error.
    async fn lookup_txt(&self, fqdn: &str) -> ToolboxResult<TxtLookupResult>;
}

/// TXT lookups through `hickory-resolver`.
#[derive(Debug, Clone, Default)]
pub struct HickoryTxtResolver {
    nameservers: Vec<IpAddr>,
}

impl HickoryTxtResolver {
    /// Query the given resolvers; an empty list falls back to `ResolverConfig::default()`.
    #[must_use]
    pub fn new(nameservers: Vec<IpAddr>) -> Self {
        Self { nameservers }
    }

    // A fresh resolver per lookup so that polling never observes a cached answer.
    fn build_resolver(&self) -> (TokioResolver, String) {
        let provider = TokioConnectionProvider::default();
        if self.nameservers.is_empty() {
            let config = ResolverConfig::default();
            let used = describe_nameservers(
                &config
                    .name_servers()
                    .iter()
                    .map(|ns| ns.socket_addr.ip())
                    .collect::<Vec<_>>(),
            );
            let resolver = TokioResolver::builder_with_config(config, provider)
                .with_options(ResolverOpts::default())
                .build();
            (resolver, used)
        } else {
            let config = ResolverConfig::from_parts(
                None,
                vec![],
                NameServerConfigGroup::from_ips_clear(&self.nameservers, 53, true),
            );
            let resolver = TokioResolver::builder_with_config(config, provider)
                .with_options(ResolverOpts::default())
                .build();
            (resolver, describe_nameservers(&self.nameservers))
        }
    }
}

#[async_trait]
impl TxtResolver for HickoryTxtResolver {
    async fn lookup_txt(&self, fqdn: &str) -> ToolboxResult<TxtLookupResult> {
        let (resolver, nameserver) = self.build_resolver();
        // 末尾加点，避免 search domain 拼接
        let absolute = format!("{}.", fqdn.trim_end_matches('.'));

        match resolver.txt_lookup(absolute.as_str()).await {
            Ok(response) => {
                let values = response
                    .iter()
                    .map(|txt| {
                        txt.iter()
                            .map(|data| String::from_utf8_lossy(data).to_string())
                            .collect::<String>()
                    })
                    .collect();
                let ttl = response
                    .as_lookup()
                    .record_iter()
                    .next()
                    .map(hickory_resolver::proto::rr::Record::ttl);
                Ok(TxtLookupResult {
                    fqdn: fqdn.to_string(),
                    nameserver,
                    values,
                    ttl,
                })
            }
            Err(e) if e.is_no_records_found() => Ok(TxtLookupResult {
                fqdn: fqdn.to_string(),
                nameserver,
                values: Vec::new(),
                ttl: None,
            }),
            Err(e) => Err(ToolboxError::LookupFailed {
                fqdn: fqdn.to_string(),
                detail: e.to_string(),
            }),
        }
    }
}

fn describe_nameservers(ips: &[IpAddr]) -> String {
    if ips.is_empty() {
        "system default".to_string()
    } else {
        let mut unique: Vec<String> = Vec::new();
        for ip in ips {
            let ip = ip.to_string();
            if !unique.contains(&ip) {
                unique.push(ip);
            }
        }
        unique.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_empty_is_system_default() {
        assert_eq!(describe_nameservers(&[]), "system default");
    }

    #[test]
    fn describe_dedups_in_order() {
        let ips: Vec<IpAddr> = ["8.8.8.8", "1.1.1.1", "8.8.8.8"]
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        assert_eq!(describe_nameservers(&ips), "8.8.8.8, 1.1.1.1");
    }
}
