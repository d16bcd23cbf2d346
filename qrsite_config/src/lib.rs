use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{File, FileFormat};
use serde::{Deserialize, Deserializer};
use url::Url;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon separated list of config files loaded after the defaults.
pub const EXTRA_CONFIG_ENV: &str = "QRSITE_EXTRA_CONFIG";

/// Environment variables that override individual config keys.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("RESEND_API_KEY", "resend.api_key"),
    ("RESEND_FROM_EMAIL", "contact.from"),
    ("RESEND_TO_EMAIL", "contact.recipients"),
    ("QRSITE_ENVIRONMENT", "environment"),
];

/// Loads the default config, the files listed in [`EXTRA_CONFIG_ENV`] and
/// the [`ENV_OVERRIDES`] from the process environment.
pub fn load() -> anyhow::Result<Config> {
    let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_PATH)];
    if let Ok(extra) = std::env::var(EXTRA_CONFIG_ENV) {
        paths.extend(
            extra
                .split(':')
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        );
    }

    let overrides = ENV_OVERRIDES
        .iter()
        .filter_map(|&(var, key)| {
            std::env::var(var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(|value| (key, value))
        })
        .collect::<Vec<_>>();

    load_with_overrides(paths.as_slice(), &overrides)
}

/// Loads the given config files in order and applies `(key, value)`
/// overrides on top.
pub fn load_with_overrides(
    paths: &[impl AsRef<Path>],
    overrides: &[(&str, String)],
) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?;

    overrides
        .iter()
        .try_fold(builder, |builder, (key, value)| {
            builder
                .set_override(*key, value.as_str())
                .with_context(|| format!("Failed to override {key}"))
        })?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub environment: Environment,
    pub http: HttpConfig,
    pub contact: ContactConfig,
    pub email: EmailConfig,
    pub resend: ResendConfig,
    pub qr: QrConfig,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub from: String,
    #[serde(deserialize_with = "deserialize_recipients")]
    pub recipients: Vec<String>,
    pub subject_prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    pub smtp_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Resend,
    Smtp,
}

#[derive(Deserialize)]
pub struct ResendConfig {
    pub endpoint: Option<Url>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct QrConfig {
    pub default_width: u32,
}

#[derive(Debug, Deserialize)]
pub struct SentryConfig {
    pub dsn: Url,
}

/// Accepts either a list or a single comma separated string.
fn deserialize_recipients<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Recipients {
        List(Vec<String>),
        Joined(String),
    }

    let recipients = match Recipients::deserialize(deserializer)? {
        Recipients::List(list) => list,
        Recipients::Joined(joined) => joined.split(',').map(Into::into).collect(),
    };

    let recipients = recipients
        .iter()
        .map(|recipient| recipient.trim())
        .filter(|recipient| !recipient.is_empty())
        .map(Into::into)
        .collect::<Vec<String>>();

    if recipients.is_empty() {
        return Err(serde::de::Error::custom("At least one recipient is required"));
    }

    Ok(recipients)
}
