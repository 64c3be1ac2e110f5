//! [`RecordClient`](dns_challenge_provider::RecordClient) wrappers.

mod dns_visibility;

pub use dns_visibility::DnsVisibilityClient;
