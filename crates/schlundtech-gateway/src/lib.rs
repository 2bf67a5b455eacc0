// # SchlundTech XML Gateway Client
//
// This crate provides the gateway client used by the DNS-01 authenticator
// to add and remove challenge TXT records.
//
// ## Protocol
//
// Every operation is one HTTPS POST of an XML document:
//
// ```xml
// <?xml version="1.0" encoding="UTF-8"?>
// <request>
//   <auth><user>..</user><password>..</password><context>10</context></auth>
//   <task>
//     <code>0202001</code>
//     <zone><name>example.com</name><system_ns>ns1.example.com</system_ns></zone>
//     <default>
//       <rr_add><name>_acme-challenge</name><type>TXT</type><value>..</value><ttl>60</ttl></rr_add>
//       <soa>..copied from zone info..</soa>
//     </default>
//   </task>
// </request>
// ```
//
// Adding or removing a record is a zone lookup (`0205`) followed by a zone
// update (`0202001`). The response's `status/type` is either `success` or
// `error`.
//
// ## Constraints
//
// - ✅ One zone lookup per operation, never cached
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Gateway status codes and messages carried into errors
// - ❌ NO retry logic (a failed add/remove is surfaced immediately)
// - ❌ NO record types other than TXT
//
// ## Security
//
// - The gateway password NEVER appears in logs or Debug output

pub mod client;
pub mod response;
pub mod transport;
pub mod zone;

pub use client::GatewayClient;
pub use response::{GatewayResponse, GatewayStatus};
pub use transport::HttpsTransport;
pub use zone::{ResourceRecord, ZoneInfo};

use schlundtech_core::config::GatewaySettings;
use schlundtech_core::traits::{TxtRecordClient, TxtRecordClientFactory};
use schlundtech_core::Result;

/// SchlundTech XML gateway endpoint
pub const GATEWAY_URL: &str = "https://gateway.schlundtech.de/";

/// Root element of every gateway request
pub const REQUEST_TAG: &str = "request";

/// Task code: zone info
pub const ZONE_INFO_CODE: &str = "0205";

/// Task code: zone update
pub const ZONE_UPDATE_CODE: &str = "0202001";

/// Task code used to add a resource record (a zone update with `rr_add`)
pub const RECORD_ADD_CODE: &str = ZONE_UPDATE_CODE;

/// Task code used to remove a resource record (a zone update with `rr_rem`)
pub const RECORD_REMOVE_CODE: &str = ZONE_UPDATE_CODE;

pub(crate) const OP_ZONE_INFO: &str = "zone info";
pub(crate) const OP_RECORD_ADD: &str = "record add";
pub(crate) const OP_RECORD_REMOVE: &str = "record remove";
pub(crate) const OP_TRANSPORT: &str = "transport";

/// Factory for creating gateway clients over HTTPS
pub struct GatewayClientFactory;

impl TxtRecordClientFactory for GatewayClientFactory {
    fn create(&self, settings: &GatewaySettings) -> Result<Box<dyn TxtRecordClient>> {
        settings.validate()?;

        let endpoint = settings.endpoint.as_deref().unwrap_or(GATEWAY_URL);
        let transport = HttpsTransport::new(endpoint)?;

        Ok(Box::new(GatewayClient::new(
            settings.credentials.clone(),
            settings.ttl,
            Box::new(transport),
        )))
    }
}
