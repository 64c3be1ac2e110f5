use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::log_sanitizer::redact;

/// DNS record type passed to [`RecordClient`](crate::RecordClient) operations.
///
/// Challenge automation only ever manages TXT records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    Txt,
}

impl RecordType {
    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error returned when credential validation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CredentialValidationError {
    /// A required field is missing entirely.
    MissingField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A field is present but empty/whitespace-only.
    EmptyField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A field has an invalid value.
    InvalidFormat {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
        /// Description of what's wrong with the value.
        reason: String,
    },
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
            Self::InvalidFormat { label, reason, .. } => write!(f, "{label}: {reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Account credentials handed to a [`ClientConnector`](crate::ClientConnector).
///
/// The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCredentials {
    /// Account login name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl AccountCredentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build credentials from a key/value map (e.g. a parsed credentials file).
    ///
    /// Keys may carry a plugin prefix such as `dns_provider_`; the first key ending in
    /// `username` / `password` wins.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if a field is missing or empty.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            username: Self::get_required_field(map, "username", "Username")?,
            password: Self::get_required_field(map, "password", "Password")?,
        })
    }

    /// Check that both fields are non-empty.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        for (field, label, value) in [
            ("username", "Username", &self.username),
            ("password", "Password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(CredentialValidationError::EmptyField {
                    field: field.to_string(),
                    label: label.to_string(),
                });
            }
        }
        Ok(())
    }

    fn get_required_field(
        map: &HashMap<String, String>,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        let mut keys: Vec<&String> = map.keys().filter(|k| k.ends_with(key)).collect();
        keys.sort();
        let value = keys
            .first()
            .and_then(|k| map.get(*k))
            .ok_or_else(|| CredentialValidationError::MissingField {
                field: key.to_string(),
                label: label.to_string(),
            })?;

        let value = value.trim();
        if value.is_empty() {
            return Err(CredentialValidationError::EmptyField {
                field: key.to_string(),
                label: label.to_string(),
            });
        }
        Ok(value.to_string())
    }
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    // ---- RecordType ----

    #[test]
    fn record_type_wire_name() {
        assert_eq!(RecordType::Txt.to_string(), "TXT");
        assert_eq!(serde_json::to_string(&RecordType::Txt).unwrap(), r#""TXT""#);
    }

    // ---- AccountCredentials ----

    #[test]
    fn from_map_accepts_prefixed_keys() {
        let creds = AccountCredentials::from_map(&map(&[
            ("dns_provider_username", "user1"),
            ("dns_provider_password", "hunter2"),
        ]))
        .unwrap();
        assert_eq!(creds.username, "user1");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn from_map_missing_password() {
        let err = AccountCredentials::from_map(&map(&[("username", "u")])).unwrap_err();
        assert!(matches!(
            err,
            CredentialValidationError::MissingField { field, .. } if field == "password"
        ));
    }

    #[test]
    fn from_map_blank_username() {
        let err =
            AccountCredentials::from_map(&map(&[("username", "  "), ("password", "p")]))
                .unwrap_err();
        assert!(matches!(
            err,
            CredentialValidationError::EmptyField { field, .. } if field == "username"
        ));
    }

    #[test]
    fn validate_rejects_empty_password() {
        let err = AccountCredentials::new("user", "").validate().unwrap_err();
        assert_eq!(err.to_string(), "Field must not be empty: Password");
    }

    #[test]
    fn debug_hides_password() {
        let creds = AccountCredentials::new("user1", "supersecret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("user1"));
        assert!(!debug.contains("supersecret"));
    }
}
