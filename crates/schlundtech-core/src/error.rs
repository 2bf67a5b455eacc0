//! Error types for the SchlundTech authenticator
//!
//! Every variant belongs to the same plugin error family: the challenge
//! framework only needs to know that an operation failed and why.

use thiserror::Error;

/// Result type alias for authenticator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the SchlundTech authenticator
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed XML received from (or produced for) the gateway
    #[error("XML parse error: {0}")]
    Parse(String),

    /// Missing or malformed credentials configuration
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The zone does not exist or is not served by this account
    #[error("Domain not found: unable to resolve zone {domain} for record {record}: {reason}")]
    DomainNotFound {
        /// Record FQDN being provisioned
        record: String,
        /// Zone that was looked up
        domain: String,
        /// Gateway-provided reason
        reason: String,
    },

    /// A resource record with the same short name already exists
    #[error("Record already exists: {record} in zone {domain}")]
    AlreadyExists {
        /// Record FQDN being provisioned
        record: String,
        /// Zone holding the conflicting record
        domain: String,
    },

    /// Transport failure or non-success gateway status
    #[error("Gateway error ({operation}): {message}")]
    Gateway {
        /// Operation that failed (e.g. "zone info", "record add")
        operation: String,
        /// Error message, including gateway status fields when present
        message: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create an XML parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a credentials error
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create a "domain not found" error
    pub fn domain_not_found(
        record: impl Into<String>,
        domain: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DomainNotFound {
            record: record.into(),
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create an "already exists" error
    pub fn already_exists(record: impl Into<String>, domain: impl Into<String>) -> Self {
        Self::AlreadyExists {
            record: record.into(),
            domain: domain.into(),
        }
    }

    /// Create a gateway error
    pub fn gateway(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Gateway {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
