// # Gateway Client
//
// Adds and removes TXT records through the XML gateway. Each operation
// looks up the zone first: the update task must name the zone's system
// name server, and an add echoes the zone's SOA block back unchanged.

use async_trait::async_trait;
use schlundtech_core::config::Credentials;
use schlundtech_core::traits::{Transport, TxtRecordClient};
use schlundtech_core::xml;
use schlundtech_core::{Error, Result, XmlMap};
use std::fmt;

use crate::response::GatewayResponse;
use crate::zone::ZoneInfo;
use crate::{
    OP_RECORD_ADD, OP_RECORD_REMOVE, OP_ZONE_INFO, RECORD_ADD_CODE, RECORD_REMOVE_CODE,
    REQUEST_TAG, ZONE_INFO_CODE,
};

/// Record type managed by this client
const RECORD_TYPE_TXT: &str = "TXT";

/// XML gateway client
///
/// # Security
///
/// The gateway password is only ever written into request bodies. It never
/// appears in logs or Debug output.
pub struct GatewayClient {
    credentials: Credentials,
    ttl: u32,
    transport: Box<dyn Transport>,
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("credentials", &self.credentials)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    /// Create a new gateway client
    ///
    /// # Parameters
    ///
    /// - `credentials`: Gateway user, password and context
    /// - `ttl`: TTL for records created by this client
    /// - `transport`: Carries encoded requests to the gateway
    pub fn new(credentials: Credentials, ttl: u32, transport: Box<dyn Transport>) -> Self {
        Self {
            credentials,
            ttl,
            transport,
        }
    }

    /// TTL applied to added records
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// The `auth` block sent with every request
    pub fn auth(&self) -> XmlMap {
        XmlMap::new()
            .with("user", self.credentials.user.as_str())
            .with("password", self.credentials.password.as_str())
            .with("context", self.credentials.context)
    }

    /// Look up a zone
    ///
    /// `record_name` only labels the error when the zone cannot be resolved.
    ///
    /// # Errors
    ///
    /// - [`Error::DomainNotFound`] if the gateway reports an error status
    /// - [`Error::Gateway`] if a success reply carries no zone data
    pub async fn zone_info(&self, domain: &str, record_name: &str) -> Result<ZoneInfo> {
        tracing::debug!("Looking up zone {} for record {}", domain, record_name);

        let task = XmlMap::new()
            .with("code", ZONE_INFO_CODE)
            .with("zone", XmlMap::new().with("name", domain));

        let response = self.call(OP_ZONE_INFO, task).await?;
        if !response.status.is_success() {
            return Err(Error::domain_not_found(record_name, domain, response.summary()));
        }

        let zone = response.data_map("zone").ok_or_else(|| {
            Error::gateway(
                OP_ZONE_INFO,
                format!("reply for zone {} carries no zone data", domain),
            )
        })?;

        ZoneInfo::from_map(zone)
    }

    /// Send one task and interpret the reply
    ///
    /// The reply is returned whatever its status; callers decide what a
    /// non-success status means.
    pub async fn call(&self, operation: &str, task: XmlMap) -> Result<GatewayResponse> {
        tracing::debug!(
            "Sending {} task: {}",
            operation,
            serde_json::to_string(&task).unwrap_or_default()
        );

        let request = XmlMap::new().with("auth", self.auth()).with("task", task);
        let body = xml::encode(REQUEST_TAG, &request)?;

        let reply = self.transport.send(body).await?;
        let document = xml::decode(&reply)?;

        let response = GatewayResponse::from_document(operation, &document)?;
        tracing::debug!(
            "Gateway replied to {} with status {}",
            operation,
            response.status.kind
        );
        Ok(response)
    }

    fn txt_record(&self, short_name: &str, content: &str) -> XmlMap {
        XmlMap::new()
            .with("name", short_name)
            .with("type", RECORD_TYPE_TXT)
            .with("value", content)
            .with("ttl", self.ttl)
    }
}

#[async_trait]
impl TxtRecordClient for GatewayClient {
    async fn add_txt_record(&self, domain: &str, record_name: &str, content: &str) -> Result<()> {
        let short_name = short_record_name(domain, record_name)?;
        let zone = self.zone_info(domain, record_name).await?;

        if zone.has_record(&short_name) {
            return Err(Error::already_exists(record_name, domain));
        }

        let soa = zone.soa.clone().ok_or_else(|| {
            Error::gateway(
                OP_RECORD_ADD,
                format!("zone info for {} carries no soa", domain),
            )
        })?;

        let task = XmlMap::new()
            .with("code", RECORD_ADD_CODE)
            .with("zone", zone.update_target(OP_RECORD_ADD)?)
            .with(
                "default",
                XmlMap::new()
                    .with("rr_add", self.txt_record(&short_name, content))
                    .with("soa", soa),
            );

        self.call(OP_RECORD_ADD, task)
            .await?
            .ensure_success(OP_RECORD_ADD)?;

        tracing::info!("Added TXT record {} to zone {}", record_name, domain);
        Ok(())
    }

    async fn del_txt_record(&self, domain: &str, record_name: &str, content: &str) -> Result<()> {
        let short_name = short_record_name(domain, record_name)?;
        let zone = self.zone_info(domain, record_name).await?;

        let task = XmlMap::new()
            .with("code", RECORD_REMOVE_CODE)
            .with("zone", zone.update_target(OP_RECORD_REMOVE)?)
            .with(
                "default",
                XmlMap::new().with("rr_rem", self.txt_record(&short_name, content)),
            );

        self.call(OP_RECORD_REMOVE, task)
            .await?
            .ensure_success(OP_RECORD_REMOVE)?;

        tracing::info!("Removed TXT record {} from zone {}", record_name, domain);
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "schlundtech"
    }
}

/// Strip the zone suffix from a record FQDN
///
/// "_acme-challenge.example.com" in "example.com" becomes "_acme-challenge";
/// the zone apex itself becomes "". Trailing dots and ASCII case are ignored
/// when matching, the returned prefix keeps its original spelling.
fn short_record_name(domain: &str, record_name: &str) -> Result<String> {
    let zone = domain.trim_end_matches('.');
    let record = record_name.trim_end_matches('.');

    if record.eq_ignore_ascii_case(zone) {
        return Ok(String::new());
    }

    let suffix = format!(".{}", zone);
    record
        .len()
        .checked_sub(suffix.len())
        .filter(|&split| split > 0 && record.is_char_boundary(split))
        .filter(|&split| record[split..].eq_ignore_ascii_case(&suffix))
        .map(|split| record[..split].to_string())
        .ok_or_else(|| {
            Error::invalid_input(format!(
                "record {} is not inside zone {}",
                record_name, domain
            ))
        })
}
