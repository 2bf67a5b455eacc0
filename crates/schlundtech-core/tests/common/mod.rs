//! Test doubles and common utilities for authenticator contract tests
//!
//! The mock record client records every call so tests can assert on the
//! exact sequence of gateway operations an authenticator performs.

#![allow(dead_code)]

use schlundtech_core::config::GatewaySettings;
use schlundtech_core::error::{Error, Result};
use schlundtech_core::traits::{TxtRecordClient, TxtRecordClientFactory};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const USER: &str = "user";
pub const PASSWORD: &str = "password";
pub const CONTEXT: u32 = 10;
pub const DOMAIN: &str = "example.com";

/// One recorded client call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    Add {
        domain: String,
        record_name: String,
        content: String,
    },
    Del {
        domain: String,
        record_name: String,
        content: String,
    },
}

/// A mock TxtRecordClient that tracks calls
pub struct MockRecordClient {
    /// Recorded calls, in order
    calls: Arc<Mutex<Vec<ClientCall>>>,
    /// Fail every add_txt_record call
    fail_on_add: bool,
    /// Fail every del_txt_record call
    fail_on_del: bool,
}

impl MockRecordClient {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on_add: false,
            fail_on_del: false,
        }
    }

    pub fn with_failure_on_add(mut self) -> Self {
        self.fail_on_add = true;
        self
    }

    pub fn with_failure_on_del(mut self) -> Self {
        self.fail_on_del = true;
        self
    }

    /// Create a new MockRecordClient that shares recorded calls with an existing one
    pub fn sharing_calls_with(other: &Self) -> Self {
        Self {
            calls: Arc::clone(&other.calls),
            fail_on_add: other.fail_on_add,
            fail_on_del: other.fail_on_del,
        }
    }

    /// Get the recorded calls
    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TxtRecordClient for MockRecordClient {
    async fn add_txt_record(&self, domain: &str, record_name: &str, content: &str) -> Result<()> {
        self.calls.lock().unwrap().push(ClientCall::Add {
            domain: domain.to_string(),
            record_name: record_name.to_string(),
            content: content.to_string(),
        });

        if self.fail_on_add {
            return Err(Error::already_exists(record_name, domain));
        }
        Ok(())
    }

    async fn del_txt_record(&self, domain: &str, record_name: &str, content: &str) -> Result<()> {
        self.calls.lock().unwrap().push(ClientCall::Del {
            domain: domain.to_string(),
            record_name: record_name.to_string(),
            content: content.to_string(),
        });

        if self.fail_on_del {
            return Err(Error::gateway("record remove", "mock failure"));
        }
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "mock"
    }
}

/// A factory handing out clients that share one call log
pub struct MockClientFactory {
    template: MockRecordClient,
    /// Call counter for create()
    create_call_count: Arc<AtomicUsize>,
    /// Settings passed to create(), in order
    seen_settings: Arc<Mutex<Vec<GatewaySettings>>>,
}

impl MockClientFactory {
    pub fn new(template: MockRecordClient) -> Self {
        Self {
            template,
            create_call_count: Arc::new(AtomicUsize::new(0)),
            seen_settings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a new factory that shares counters and calls with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            template: MockRecordClient::sharing_calls_with(&other.template),
            create_call_count: Arc::clone(&other.create_call_count),
            seen_settings: Arc::clone(&other.seen_settings),
        }
    }

    /// Get the number of times create() was called
    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    /// Get the settings passed to create()
    pub fn seen_settings(&self) -> Vec<GatewaySettings> {
        self.seen_settings.lock().unwrap().clone()
    }

    /// Get the calls made on every client this factory created
    pub fn calls(&self) -> Vec<ClientCall> {
        self.template.calls()
    }
}

impl TxtRecordClientFactory for MockClientFactory {
    fn create(&self, settings: &GatewaySettings) -> Result<Box<dyn TxtRecordClient>> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        self.seen_settings.lock().unwrap().push(settings.clone());
        Ok(Box::new(MockRecordClient::sharing_calls_with(&self.template)))
    }
}

/// Write a credentials file with the standard test values into `dir`
pub fn write_credentials(dir: &Path) -> PathBuf {
    write_credentials_content(
        dir,
        &format!(
            "auth_user = {}\nauth_password = {}\nauth_context = {}\n",
            USER, PASSWORD, CONTEXT
        ),
    )
}

/// Write arbitrary credentials file content into `dir`
pub fn write_credentials_content(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("file.ini");
    std::fs::write(&path, content).expect("credentials file is writable");
    path
}
