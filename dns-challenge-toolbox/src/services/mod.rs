//! Stateless service façade exposing the toolbox operations.

mod dns;
mod propagation;

pub use dns::{HickoryTxtResolver, TxtResolver};
pub use propagation::PropagationWaiter;

use std::net::IpAddr;

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::TxtLookupResult;

/// Maximum length of a domain name in presentation format.
const MAX_DOMAIN_LEN: usize = 253;
/// Maximum length of a single label.
const MAX_LABEL_LEN: usize = 63;

/// Validate and normalise a domain name input.
///
/// Trims whitespace and the root dot, lowercases, and rejects empty names,
/// overlong names, empty labels and labels longer than 63 bytes. Underscores are
/// allowed since challenge names start with `_acme-challenge`.
fn validate_domain(domain: &str) -> ToolboxResult<String> {
    let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return Err(ToolboxError::ValidationError(
            "Domain name is required".to_string(),
        ));
    }
    if domain.len() > MAX_DOMAIN_LEN {
        return Err(ToolboxError::ValidationError(format!(
            "Domain name exceeds maximum length of {MAX_DOMAIN_LEN} characters (got {})",
            domain.len()
        )));
    }
    for label in domain.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(ToolboxError::ValidationError(format!(
                "Invalid domain name: {domain}"
            )));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ToolboxError::ValidationError(format!(
                "Invalid domain name: {domain}"
            )));
        }
    }
    Ok(domain)
}

/// Entry point for one-shot DNS operations.
///
/// ```rust,no_run
/// use dns_challenge_toolbox::ToolboxService;
/// # async fn demo() -> dns_challenge_toolbox::ToolboxResult<()> {
/// let txt = ToolboxService::txt_lookup("_acme-challenge.example.com", &[]).await?;
/// println!("{:?}", txt.values);
/// # Ok(())
/// # }
/// ```
pub struct ToolboxService;

impl ToolboxService {
    /// Resolve the TXT records currently published at `domain`.
    ///
    /// Pass an empty `nameservers` slice to use the resolver library defaults.
    pub async fn txt_lookup(
        domain: &str,
        nameservers: &[IpAddr],
    ) -> ToolboxResult<TxtLookupResult> {
        let domain = validate_domain(domain)?;
        HickoryTxtResolver::new(nameservers.to_vec())
            .lookup_txt(&domain)
            .await
    }
}
