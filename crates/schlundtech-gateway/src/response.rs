// # Gateway Responses
//
// A decoded gateway reply looks like:
//
// ```xml
// <response>
//   <result>
//     <data>..</data>
//     <status><code>S0205</code><text>Zone info loaded.</text><type>success</type></status>
//     <msg><code>EF02022</code><text>Zone not found.</text><type>error</type></msg>
//   </result>
// </response>
// ```
//
// Documents without the `result` wrapper are read from the root instead.

use schlundtech_core::{Error, Result, XmlMap, XmlValue};

/// Status type reported for successful tasks
pub const STATUS_SUCCESS: &str = "success";

/// Status type reported for failed tasks
pub const STATUS_ERROR: &str = "error";

/// The `status` block of a gateway reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayStatus {
    /// `success` or `error`
    pub kind: String,
    /// Gateway status code (e.g. "S0205", "E0205")
    pub code: Option<String>,
    /// Human-readable status text
    pub text: Option<String>,
}

impl GatewayStatus {
    /// Check whether the gateway reported success
    pub fn is_success(&self) -> bool {
        self.kind == STATUS_SUCCESS
    }

    fn from_map(operation: &str, map: &XmlMap) -> Result<Self> {
        let kind = map
            .get_text("type")
            .ok_or_else(|| Error::gateway(operation, "response status has no type"))?;

        Ok(Self {
            kind: kind.to_string(),
            code: map.get_text("code").map(str::to_string),
            text: map.get_text("text").map(str::to_string),
        })
    }
}

/// A decoded gateway reply
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    /// Task status
    pub status: GatewayStatus,
    /// Messages attached to the reply, rendered as "code: text"
    pub messages: Vec<String>,
    /// The `data` block, if any
    pub data: Option<XmlValue>,
}

impl GatewayResponse {
    /// Interpret a decoded response document
    ///
    /// `operation` only labels errors.
    pub fn from_document(operation: &str, document: &XmlMap) -> Result<Self> {
        let result = document.get_map("result").unwrap_or(document);

        let status = result
            .get_map("status")
            .ok_or_else(|| Error::gateway(operation, "response carries no status"))?;
        let status = GatewayStatus::from_map(operation, status)?;

        let messages = result
            .get("msg")
            .map(|msg| msg.items().iter().filter_map(render_message).collect())
            .unwrap_or_default();

        Ok(Self {
            status,
            messages,
            data: result.get("data").cloned(),
        })
    }

    /// Borrow a child of the `data` block
    pub fn data_map(&self, key: &str) -> Option<&XmlMap> {
        self.data.as_ref()?.as_map()?.get_map(key)
    }

    /// One-line description of the status and messages, for error reporting
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        match (&self.status.code, &self.status.text) {
            (Some(code), Some(text)) => parts.push(format!("{}: {}", code, text)),
            (Some(code), None) => parts.push(code.clone()),
            (None, Some(text)) => parts.push(text.clone()),
            (None, None) => parts.push(format!("status {}", self.status.kind)),
        }
        parts.extend(self.messages.iter().cloned());

        parts.join("; ")
    }

    /// Turn a non-success status into a gateway error
    pub fn ensure_success(self, operation: &str) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(Error::gateway(operation, self.summary()))
        }
    }
}

fn render_message(msg: &XmlValue) -> Option<String> {
    match msg {
        XmlValue::Text(text) if !text.is_empty() => Some(text.clone()),
        XmlValue::Map(map) => match (map.get_text("code"), map.get_text("text")) {
            (Some(code), Some(text)) => Some(format!("{}: {}", code, text)),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        },
        _ => None,
    }
}
