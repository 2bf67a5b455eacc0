//! Configuration types for the SchlundTech authenticator
//!
//! The gateway credentials live in a certbot-style INI file:
//!
//! ```ini
//! # SchlundTech XML gateway credentials
//! dns_schlundtech_auth_user = 54321
//! dns_schlundtech_auth_password = PASSWORD
//! dns_schlundtech_auth_context = 10  ; production context
//! ```
//!
//! Keys are accepted bare (`auth_user`), with certbot's namespace prefix
//! (`dns_schlundtech_auth_user`), or in the short prefixed spelling of the
//! certbot plugin docs (`dns_schlundtech_user`, `dns_schlundtech_password`,
//! `dns_schlundtech_context`). Only keys outside any `[section]` are read.
//! A `;` or `#` after a value starts an inline comment; quote the value
//! when it has to contain one.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, ParseOption};
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default TTL (seconds) for challenge TXT records
pub const DEFAULT_TTL: u32 = 60;

/// Default wait for DNS propagation before the CA verifies the record
pub const DEFAULT_PROPAGATION_SECS: u64 = 30;

const KEY_USER: &str = "auth_user";
const KEY_PASSWORD: &str = "auth_password";
const KEY_TTL: &str = "auth_ttl";
const KEY_ENDPOINT: &str = "auth_endpoint";

/// Gateway account credentials
///
/// The Debug implementation never exposes the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Gateway user name
    pub user: String,
    /// Gateway password
    /// ⚠️ NEVER log this value
    pub password: String,
    /// Gateway context id
    pub context: u32,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<REDACTED>")
            .field("context", &self.context)
            .finish()
    }
}

impl Credentials {
    /// Create a new set of credentials
    pub fn new(user: impl Into<String>, password: impl Into<String>, context: u32) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            context,
        }
    }
}

/// Everything a gateway client needs, as read from the credentials file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    /// Account credentials
    pub credentials: Credentials,

    /// TTL for created TXT records
    pub ttl: u32,

    /// Gateway endpoint override (None = registrar default)
    pub endpoint: Option<String>,
}

impl GatewaySettings {
    /// Create settings with the default TTL and endpoint
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ttl: DEFAULT_TTL,
            endpoint: None,
        }
    }

    /// Set the record TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the gateway endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Load and validate settings from a credentials file
    ///
    /// Warns (but continues) when the file is readable by group or others.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = tokio::fs::metadata(path).await.map_err(|e| {
                Error::credentials(format!(
                    "Failed to read credentials file '{}': {}",
                    path.display(),
                    e
                ))
            })?;

            let mode = metadata.permissions().mode() & 0o777;
            if mode & 0o077 != 0 {
                tracing::warn!(
                    path = %path.display(),
                    mode = %format!("{:o}", mode),
                    "Credentials file has overly permissive permissions (should be 0600 or 0400)"
                );
            }
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::credentials(format!(
                "Failed to read credentials file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let settings = Self::parse(&content)?;
        tracing::debug!(
            "Loaded gateway credentials from {} (user: {}, context: {})",
            path.display(),
            settings.credentials.user,
            settings.credentials.context
        );
        Ok(settings)
    }

    /// Parse settings from credentials file content
    pub fn parse(content: &str) -> Result<Self> {
        let file = CredentialsFile::from_ini(content)?;

        let settings = Self {
            credentials: Credentials::new(file.auth_user, file.auth_password, file.auth_context),
            ttl: file.auth_ttl,
            endpoint: file.auth_endpoint,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.credentials.user.is_empty() {
            return Err(Error::credentials(format!("{} cannot be empty", KEY_USER)));
        }
        if self.credentials.password.is_empty() {
            return Err(Error::credentials(format!("{} cannot be empty", KEY_PASSWORD)));
        }
        if self.ttl == 0 {
            return Err(Error::credentials(format!("{} must be > 0", KEY_TTL)));
        }

        if let Some(ref endpoint) = self.endpoint {
            if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                return Err(Error::credentials(format!(
                    "{} must use HTTP or HTTPS scheme. Got: {}",
                    KEY_ENDPOINT, endpoint
                )));
            }
            if endpoint.starts_with("http://") {
                tracing::warn!(
                    "{} uses HTTP (not HTTPS); credentials will travel unencrypted",
                    KEY_ENDPOINT
                );
            }
        }

        Ok(())
    }
}

/// Authenticator configuration supplied by the challenge framework
#[derive(Debug, Clone)]
pub struct AuthenticatorConfig {
    /// Path to the gateway credentials file
    pub credentials_path: PathBuf,

    /// How long to wait for DNS propagation after provisioning
    pub propagation_delay: Duration,
}

impl AuthenticatorConfig {
    /// Create a configuration with the default propagation delay
    pub fn new(credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            propagation_delay: Duration::from_secs(DEFAULT_PROPAGATION_SECS),
        }
    }

    /// Set the propagation delay
    pub fn with_propagation_delay(mut self, delay: Duration) -> Self {
        self.propagation_delay = delay;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.credentials_path.as_os_str().is_empty() {
            return Err(Error::credentials("credentials path cannot be empty"));
        }
        Ok(())
    }
}

/// Raw credentials file contents
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(alias = "dns_schlundtech_auth_user", alias = "dns_schlundtech_user")]
    auth_user: String,

    #[serde(alias = "dns_schlundtech_auth_password", alias = "dns_schlundtech_password")]
    auth_password: String,

    #[serde(
        alias = "dns_schlundtech_auth_context",
        alias = "dns_schlundtech_context",
        deserialize_with = "from_text"
    )]
    auth_context: u32,

    #[serde(
        alias = "dns_schlundtech_auth_ttl",
        default = "default_ttl",
        deserialize_with = "from_text"
    )]
    auth_ttl: u32,

    #[serde(alias = "dns_schlundtech_auth_endpoint", default)]
    auth_endpoint: Option<String>,
}

impl CredentialsFile {
    /// Read the top-level (section-less) keys of an INI document
    fn from_ini(content: &str) -> Result<Self> {
        let options = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, options)
            .map_err(|e| Error::credentials(format!("malformed credentials file: {}", e)))?;

        let mut values = serde_json::Map::new();
        if let Some(general) = ini.section(None::<String>) {
            for (key, value) in general.iter() {
                values.insert(key.to_string(), serde_json::Value::String(value.trim().to_string()));
            }
        }

        for section in ini.sections().flatten() {
            tracing::debug!("Ignoring credentials section [{}]", section);
        }

        serde_json::from_value(serde_json::Value::Object(values))
            .map_err(|e| Error::credentials(format!("invalid credentials file: {}", e)))
    }
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

/// INI values are strings; parse numeric fields from their text
fn from_text<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let text = String::deserialize(deserializer)?;
    text.trim()
        .parse()
        .map_err(|e| de::Error::custom(format!("`{}` is not an unsigned integer: {}", text, e)))
}
