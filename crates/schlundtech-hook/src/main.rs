// # schlundtech-hook - certbot manual hook
//
// Thin integration layer around `schlundtech_core::DnsAuthenticator`:
// 1. Reading configuration from flags or the certbot hook environment
// 2. Initializing logging and the runtime
// 3. Running one perform (auth) or cleanup for the hook's challenge
//
// No gateway or DNS logic lives here.
//
// ## Configuration
//
// - `--domain` / `CERTBOT_DOMAIN`: Domain being validated
// - `--validation` / `CERTBOT_VALIDATION`: Validation token for the TXT record
// - `--credentials` / `SCHLUNDTECH_CREDENTIALS`: Path to the credentials INI file
// - `--propagation-seconds` / `SCHLUNDTECH_PROPAGATION_SECONDS`: Wait after adding (default 30)
// - `--log-level` / `SCHLUNDTECH_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// certbot certonly --manual --preferred-challenges dns \
//   --manual-auth-hook "schlundtech-hook auth --credentials /etc/letsencrypt/schlundtech.ini" \
//   --manual-cleanup-hook "schlundtech-hook cleanup --credentials /etc/letsencrypt/schlundtech.ini" \
//   -d example.com
// ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use schlundtech_core::config::{AuthenticatorConfig, DEFAULT_PROPAGATION_SECS};
use schlundtech_core::{Authenticator, Challenge, DnsAuthenticator};
use schlundtech_gateway::GatewayClientFactory;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Longest accepted propagation wait (one hour)
const MAX_PROPAGATION_SECS: u64 = 3600;

/// Exit codes for different termination scenarios
///
/// - 0: Hook succeeded
/// - 1: Configuration or startup error
/// - 2: Runtime error (gateway or credentials failure)
#[derive(Debug, Clone, Copy)]
enum HookExitCode {
    /// Hook completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<HookExitCode> for ExitCode {
    fn from(code: HookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "schlundtech-hook")]
#[command(about = "certbot manual hook for SchlundTech DNS-01 challenges", long_about = None)]
#[command(version)]
struct Cli {
    /// Domain being validated
    #[arg(long, env = "CERTBOT_DOMAIN", global = true)]
    domain: Option<String>,

    /// Validation token to publish
    #[arg(long, env = "CERTBOT_VALIDATION", global = true)]
    validation: Option<String>,

    /// Path to the SchlundTech credentials INI file
    #[arg(long, env = "SCHLUNDTECH_CREDENTIALS", global = true)]
    credentials: Option<PathBuf>,

    /// Seconds to wait for DNS propagation after adding the record
    #[arg(
        long,
        env = "SCHLUNDTECH_PROPAGATION_SECONDS",
        default_value_t = DEFAULT_PROPAGATION_SECS,
        global = true
    )]
    propagation_seconds: u64,

    /// Log level
    #[arg(long, env = "SCHLUNDTECH_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: HookCommand,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum HookCommand {
    /// Publish the challenge TXT record and wait for propagation
    Auth,
    /// Remove the challenge TXT record
    Cleanup,
}

/// Validated hook configuration
#[derive(Debug)]
struct Config {
    command: HookCommand,
    domain: String,
    validation: String,
    credentials: PathBuf,
    propagation_seconds: u64,
    log_level: String,
}

impl Config {
    /// Build the configuration from parsed arguments
    fn from_cli(cli: Cli) -> Result<Self> {
        Ok(Self {
            command: cli.command,
            domain: cli.domain.context(
                "CERTBOT_DOMAIN is required. Pass --domain or run as a certbot manual hook",
            )?,
            validation: cli.validation.context(
                "CERTBOT_VALIDATION is required. Pass --validation or run as a certbot manual hook",
            )?,
            credentials: cli.credentials.context(
                "SCHLUNDTECH_CREDENTIALS is required. \
                Set it via: export SCHLUNDTECH_CREDENTIALS=/path/to/credentials.ini",
            )?,
            propagation_seconds: cli.propagation_seconds,
            log_level: cli.log_level,
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validate_domain_name(&self.domain)?;

        if self.validation.trim().is_empty() {
            anyhow::bail!("CERTBOT_VALIDATION cannot be empty");
        }

        if self.credentials.as_os_str().is_empty() {
            anyhow::bail!("SCHLUNDTECH_CREDENTIALS cannot be empty");
        }

        if self.propagation_seconds > MAX_PROPAGATION_SECS {
            anyhow::bail!(
                "SCHLUNDTECH_PROPAGATION_SECONDS must be between 0 and {} seconds. Got: {}",
                MAX_PROPAGATION_SECS,
                self.propagation_seconds
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "SCHLUNDTECH_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Validate that a string is a plausible domain name
///
/// Basic RFC 1035 checks; a leading `*.` wildcard label is accepted.
fn validate_domain_name(domain: &str) -> Result<()> {
    let name = domain.strip_prefix("*.").unwrap_or(domain);
    let name = name.strip_suffix('.').unwrap_or(name);

    if name.is_empty() {
        anyhow::bail!("Domain name cannot be empty");
    }

    if name.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            name.len(),
            domain
        );
    }

    for label in name.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric and hyphen only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here
            let _ = e.print();
            return if e.use_stderr() {
                HookExitCode::ConfigError.into()
            } else {
                HookExitCode::Success.into()
            };
        }
    };

    let config = match Config::from_cli(cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return HookExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return HookExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HookExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HookExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_hook(config).await {
            error!("Hook failed: {:#}", e);
            HookExitCode::RuntimeError
        } else {
            HookExitCode::Success
        }
    });

    result.into()
}

/// Run one auth or cleanup step
async fn run_hook(config: Config) -> Result<()> {
    let authenticator_config = AuthenticatorConfig::new(&config.credentials)
        .with_propagation_delay(Duration::from_secs(config.propagation_seconds));
    let mut authenticator =
        DnsAuthenticator::new(authenticator_config, Box::new(GatewayClientFactory))?;

    let challenges = [Challenge::new(&config.domain, &config.validation)];

    match config.command {
        HookCommand::Auth => {
            info!("Provisioning DNS-01 challenge for {}", config.domain);
            authenticator
                .perform(&challenges)
                .await
                .with_context(|| format!("Failed to provision challenge for {}", config.domain))?;

            let delay = authenticator.propagation_delay();
            if !delay.is_zero() {
                info!("Waiting {}s for DNS propagation", delay.as_secs());
                tokio::time::sleep(delay).await;
            }
        }
        HookCommand::Cleanup => {
            info!("Cleaning up DNS-01 challenge for {}", config.domain);
            // The record was added by an earlier auth invocation
            authenticator.assume_provisioned(&challenges);
            authenticator.cleanup(&challenges).await?;
        }
    }

    Ok(())
}
