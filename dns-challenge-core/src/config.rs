//! Challenge configuration, loaded from TOML.
//!
//! ```toml
//! wait = true
//! ttl = 60
//! propagation_seconds = 5
//!
//! [credentials]
//! username = "user"
//! password = "secret"
//!
//! [propagation]
//! poll_interval_secs = 5
//! max_wait_secs = 300
//! ```

use std::path::Path;

use dns_challenge_provider::{AccountCredentials, CredentialValidationError};
use dns_challenge_toolbox::PropagationConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// TTL of challenge records, in seconds.
pub const DEFAULT_TTL: u32 = 60;
/// Pause after publishing a batch of challenges, in seconds.
pub const DEFAULT_PROPAGATION_SECONDS: u64 = 5;
/// Upper bound on `propagation.max_wait_secs` (one day).
pub const MAX_WAIT_SECS: u64 = 86_400;

/// Everything needed to run challenges against one provider account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeConfig {
    pub credentials: AccountCredentials,

    /// Block in `add_challenge_record` until the record is visible.
    #[serde(default)]
    pub wait: bool,

    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Fixed pause after a batch of records has been published.
    #[serde(default = "default_propagation_seconds")]
    pub propagation_seconds: u64,

    /// Verify visibility with our own TXT lookups instead of the client's wait.
    #[serde(default)]
    pub dns_check: bool,

    /// Polling bounds for `dns_check`.
    #[serde(default)]
    pub propagation: PropagationConfig,
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_propagation_seconds() -> u64 {
    DEFAULT_PROPAGATION_SECONDS
}

impl ChallengeConfig {
    /// Defaults for everything except the credentials.
    #[must_use]
    pub fn new(credentials: AccountCredentials) -> Self {
        Self {
            credentials,
            wait: false,
            ttl: DEFAULT_TTL,
            propagation_seconds: DEFAULT_PROPAGATION_SECONDS,
            dns_check: false,
            propagation: PropagationConfig::default(),
        }
    }

    /// Parse and validate.
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CoreError::ConfigError(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub async fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CoreError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> CoreResult<()> {
        self.credentials.validate()?;

        // 只有启用 dns_check 时才会用到 propagation
        if !self.dns_check {
            return Ok(());
        }

        let propagation = &self.propagation;
        if propagation.poll_interval_secs == 0 {
            return Err(CredentialValidationError::InvalidFormat {
                field: "propagation.poll_interval_secs".to_string(),
                label: "Poll interval".to_string(),
                reason: "must be at least 1 second".to_string(),
            }
            .into());
        }
        if propagation.max_wait_secs > MAX_WAIT_SECS {
            return Err(CredentialValidationError::InvalidFormat {
                field: "propagation.max_wait_secs".to_string(),
                label: "Maximum wait".to_string(),
                reason: format!("must not exceed {MAX_WAIT_SECS} seconds"),
            }
            .into());
        }
        if propagation.poll_interval_secs > propagation.max_wait_secs {
            return Err(CredentialValidationError::InvalidFormat {
                field: "propagation.poll_interval_secs".to_string(),
                label: "Poll interval".to_string(),
                reason: format!(
                    "must not exceed max_wait_secs ({})",
                    propagation.max_wait_secs
                ),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[credentials]
username = "user"
password = "secret"
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = ChallengeConfig::from_toml_str(MINIMAL).unwrap();
        assert!(!config.wait);
        assert!(!config.dns_check);
        assert_eq!(config.ttl, 60);
        assert_eq!(config.propagation_seconds, 5);
        assert_eq!(config.propagation, PropagationConfig::default());
        assert_eq!(config, ChallengeConfig::new(AccountCredentials::new("user", "secret")));
    }

    #[test]
    fn full_config() {
        let config = ChallengeConfig::from_toml_str(
            r#"
wait = true
ttl = 120
propagation_seconds = 30
dns_check = true

[credentials]
username = "user"
password = "secret"

[propagation]
poll_interval_secs = 2
max_wait_secs = 60
nameservers = ["1.1.1.1"]
"#,
        )
        .unwrap();
        assert!(config.wait);
        assert!(config.dns_check);
        assert_eq!(config.ttl, 120);
        assert_eq!(config.propagation_seconds, 30);
        assert_eq!(config.propagation.poll_interval_secs, 2);
        assert_eq!(config.propagation.max_wait_secs, 60);
        assert_eq!(config.propagation.nameservers.len(), 1);
    }

    #[test]
    fn missing_credentials_section() {
        let err = ChallengeConfig::from_toml_str("wait = true").unwrap_err();
        assert!(matches!(err, CoreError::ConfigError(_)));
    }

    #[test]
    fn empty_password_rejected() {
        let err = ChallengeConfig::from_toml_str(
            r#"
[credentials]
username = "user"
password = ""
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidConfig(CredentialValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn zero_poll_interval_rejected() {
        let mut config = ChallengeConfig::new(AccountCredentials::new("user", "secret"));
        config.dns_check = true;
        config.propagation.poll_interval_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidConfig(
                CredentialValidationError::InvalidFormat { .. }
            ))
        ));
    }

    #[test]
    fn poll_interval_above_max_wait_rejected() {
        let mut config = ChallengeConfig::new(AccountCredentials::new("user", "secret"));
        config.dns_check = true;
        config.propagation.poll_interval_secs = 10;
        config.propagation.max_wait_secs = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn propagation_ignored_without_dns_check() {
        let mut config = ChallengeConfig::new(AccountCredentials::new("user", "secret"));
        config.propagation.poll_interval_secs = 10;
        config.propagation.max_wait_secs = 5;
        assert!(config.validate().is_ok());

        config.propagation.poll_interval_secs = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn oversized_max_wait_rejected() {
        let result = ChallengeConfig::from_toml_str(
            r#"
dns_check = true

[credentials]
username = "user"
password = "secret"

[propagation]
max_wait_secs = 9223372036854775807
"#,
        );

        assert!(matches!(
            result,
            Err(CoreError::InvalidConfig(
                CredentialValidationError::InvalidFormat { ref field, .. }
            )) if field == "propagation.max_wait_secs"
        ));
    }

    #[tokio::test]
    async fn load_missing_file() {
        let err = ChallengeConfig::load("/nonexistent/dns-challenge.toml")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ConfigError(msg) if msg.contains("Failed to read")));
    }
}
