// # schlundtech-core
//
// Core library for the SchlundTech DNS-01 authenticator.
//
// ## Architecture Overview
//
// - **xml**: Codec between the gateway's XML dialect and [`XmlMap`] values
// - **Transport**: Trait for the single network boundary (XML in, XML out)
// - **TxtRecordClient**: Trait for adding/removing TXT records in a zone
// - **Authenticator**: Trait the ACME client invokes (`perform`/`cleanup`)
// - **DnsAuthenticator**: Authenticator built on a record client factory
//
// The gateway client itself lives in `schlundtech-gateway`; this crate has
// no network code.

pub mod traits;
pub mod authenticator;
pub mod config;
pub mod error;
pub mod xml;

// Re-export core types for convenience
pub use traits::{Authenticator, Challenge, Transport, TxtRecordClient, TxtRecordClientFactory};
pub use authenticator::DnsAuthenticator;
pub use config::{AuthenticatorConfig, Credentials, GatewaySettings};
pub use error::{Error, Result};
pub use xml::{XmlMap, XmlValue};
