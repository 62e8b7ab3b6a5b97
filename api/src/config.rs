//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration for the agora API service.
///
/// Can be loaded from a TOML file via [`AppConfig::from_toml_file`] or built
/// programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Data directory for LMDB storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Our receiving account at the payment gateway.
    #[serde(default)]
    pub gateway_account: String,

    /// Shared secret for the gateway checksum.
    #[serde(default)]
    pub gateway_secret: String,

    /// Mailgun messages endpoint, e.g.
    /// `https://api.mailgun.net/v3/<domain>/messages`.
    #[serde(default)]
    pub mailgun_endpoint: String,

    /// Mailgun API key.
    #[serde(default)]
    pub mailgun_api_key: String,

    /// Recipient of payment-proof notifications.
    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    /// Sender address for outbound mail.
    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            data_dir: default_data_dir(),
            gateway_account: String::new(),
            gateway_secret: String::new(),
            mailgun_endpoint: String::new(),
            mailgun_api_key: String::new(),
            admin_email: default_admin_email(),
            mail_from: default_mail_from(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./agora_data")
}

fn default_admin_email() -> String {
    "admin@agora.am".to_string()
}

fn default_mail_from() -> String {
    "noreply@agora.am".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
