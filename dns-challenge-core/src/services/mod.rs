//! 业务逻辑服务层

mod authenticator;
mod challenge_service;

pub use authenticator::DnsAuthenticator;
pub use challenge_service::ChallengeService;
