// # Authenticator Trait
//
// The narrow capability an ACME client invokes to satisfy DNS-01
// challenges: provision every challenge record, then clean them up.

use async_trait::async_trait;

/// Label prepended to a domain to form its DNS-01 validation record
pub const ACME_CHALLENGE_PREFIX: &str = "_acme-challenge";

/// One DNS-01 challenge handed over by the ACME client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Challenge {
    /// Domain being validated (e.g., "example.com" or "*.example.com")
    pub domain: String,
    /// Validation token to publish as the TXT record value
    pub validation: String,
}

impl Challenge {
    /// Create a new challenge
    pub fn new(domain: impl Into<String>, validation: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            validation: validation.into(),
        }
    }

    /// Domain with any leading wildcard label removed
    ///
    /// `*.example.com` is validated through the same record as `example.com`.
    pub fn base_domain(&self) -> &str {
        self.domain.strip_prefix("*.").unwrap_or(&self.domain)
    }

    /// The validation record FQDN, e.g. `_acme-challenge.example.com`
    pub fn validation_name(&self) -> String {
        format!("{}.{}", ACME_CHALLENGE_PREFIX, self.base_domain())
    }
}

/// Trait for DNS-01 authenticators
///
/// Challenges are processed one at a time, in order.
#[async_trait]
pub trait Authenticator: Send {
    /// Provision a TXT record for every challenge
    ///
    /// The first failure aborts and is returned to the caller.
    async fn perform(&mut self, challenges: &[Challenge]) -> Result<(), crate::Error>;

    /// Remove the records created by [`Authenticator::perform`]
    ///
    /// Best-effort: failures are logged, never returned, so they cannot mask
    /// the outcome of the certificate request.
    async fn cleanup(&mut self, challenges: &[Challenge]) -> Result<(), crate::Error>;
}
