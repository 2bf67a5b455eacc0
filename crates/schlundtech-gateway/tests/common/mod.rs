//! Test doubles for gateway protocol contract tests
//!
//! The mock transport decodes every request it receives and replays queued
//! replies in order, so tests can assert on the exact task sequence a
//! client sends.

#![allow(dead_code)]

use schlundtech_core::config::Credentials;
use schlundtech_core::error::{Error, Result};
use schlundtech_core::traits::Transport;
use schlundtech_core::xml;
use schlundtech_core::XmlMap;
use schlundtech_gateway::GatewayClient;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const USER: &str = "user";
pub const PASSWORD: &str = "password";
pub const CONTEXT: u32 = 10;
pub const TTL: u32 = 10;
pub const DOMAIN: &str = "example.com";
pub const RECORD_NAME: &str = "_acme-challenge.example.com";
pub const RECORD_PREFIX: &str = "_acme-challenge";
pub const CONTENT: &str = "bar";
pub const SYSTEM_NS: &str = "ns1.example.com";

/// A Transport that records decoded requests and replays queued replies
pub struct MockTransport {
    requests: Arc<Mutex<Vec<XmlMap>>>,
    replies: Arc<Mutex<VecDeque<Result<Vec<u8>>>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            replies: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Queue a reply body
    pub fn reply(self, body: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(body.into().into_bytes()));
        self
    }

    /// Queue a transport failure
    pub fn fail(self, error: Error) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Create a new MockTransport that shares requests and replies with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            requests: Arc::clone(&other.requests),
            replies: Arc::clone(&other.replies),
        }
    }

    /// Every decoded request, in order
    pub fn requests(&self) -> Vec<XmlMap> {
        self.requests.lock().unwrap().clone()
    }

    /// The `task` block of every request, in order
    pub fn tasks(&self) -> Vec<XmlMap> {
        self.requests()
            .iter()
            .map(|request| request.get_map("task").cloned().expect("request has a task"))
            .collect()
    }

    pub fn send_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Vec<u8>) -> Result<Vec<u8>> {
        let decoded = xml::decode(&request).expect("client sends well-formed XML");
        self.requests.lock().unwrap().push(decoded);

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::gateway("transport", "no reply queued")))
    }
}

/// A client over a transport sharing state with `transport`
pub fn client_with(transport: &MockTransport) -> GatewayClient {
    GatewayClient::new(
        Credentials::new(USER, PASSWORD, CONTEXT),
        TTL,
        Box::new(MockTransport::sharing_state_with(transport)),
    )
}

/// A reply with the given status type and optional data
pub fn reply(status: &str, data: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><response><result>{}<status><type>{}</type></status></result></response>",
        if data.is_empty() {
            String::new()
        } else {
            format!("<data>{}</data>", data)
        },
        status
    )
}

/// A plain success reply
pub fn success() -> String {
    reply("success", "")
}

/// An error reply with gateway code and text
pub fn error(code: &str, text: &str) -> String {
    format!(
        "<response><result><status><code>{}</code><text>{}</text><type>error</type></status></result></response>",
        code, text
    )
}

/// A zone info success reply with the given extra zone children
pub fn zone_reply(extra: &str) -> String {
    reply(
        "success",
        &format!(
            "<zone><name>{}</name><system_ns>{}</system_ns><soa><level>1</level></soa>{}</zone>",
            DOMAIN, SYSTEM_NS, extra
        ),
    )
}
