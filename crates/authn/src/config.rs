//! Startup configuration for the signing secret and credential lifetimes.
//!
//! Configuration is resolved once, before the
//! [`CredentialAuthority`](crate::CredentialAuthority) is built:
//!
//! 1. If `CONFIG_PATH` is set, the `jwt` section of that YAML file is read.
//! 2. Environment variables override file values when present.
//! 3. A missing or empty secret is a fatal [`AuthError::Configuration`].
//!
//! ```yaml
//! jwt:
//!   secretKey: "change-me"
//!   accessTtl: 15m
//!   refreshTtl: 7days
//! ```
//!
//! Other top-level sections of the file (server, database, logging) belong to
//! other components and are ignored here.

use std::{path::Path, time::Duration};

use serde::Deserialize;

use crate::{
    authority::{ACCESS_CREDENTIAL_TTL, REFRESH_CREDENTIAL_TTL},
    error::{AuthError, Result},
    secret::SigningSecret,
};

/// Environment variable naming the YAML configuration file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Environment variable holding the signing secret.
pub const SECRET_KEY_ENV: &str = "JWT_SECRET_KEY";

/// Environment variable overriding the access credential lifetime (humantime syntax).
pub const ACCESS_TTL_ENV: &str = "JWT_ACCESS_TTL";

/// Environment variable overriding the refresh credential lifetime (humantime syntax).
pub const REFRESH_TTL_ENV: &str = "JWT_REFRESH_TTL";

/// Resolved authentication configuration.
#[derive(Debug, Clone, bon::Builder)]
pub struct AuthConfig {
    /// The HMAC signing secret.
    pub secret: SigningSecret,

    /// Access credential lifetime.
    #[builder(default = ACCESS_CREDENTIAL_TTL)]
    pub access_ttl: Duration,

    /// Refresh credential lifetime.
    #[builder(default = REFRESH_CREDENTIAL_TTL)]
    pub refresh_ttl: Duration,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    jwt: JwtSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct JwtSection {
    #[serde(default)]
    secret_key: Option<String>,

    #[serde(default, with = "humantime_serde::option")]
    access_ttl: Option<Duration>,

    #[serde(default, with = "humantime_serde::option")]
    refresh_ttl: Option<Duration>,
}

impl JwtSection {
    fn resolve(self) -> Result<AuthConfig> {
        let secret = match self.secret_key {
            Some(secret) => SigningSecret::try_from(secret)?,
            None => {
                return Err(AuthError::configuration(format!(
                    "{SECRET_KEY_ENV} environment variable is not set"
                )));
            },
        };

        Ok(AuthConfig {
            secret,
            access_ttl: self.access_ttl.unwrap_or(ACCESS_CREDENTIAL_TTL),
            refresh_ttl: self.refresh_ttl.unwrap_or(REFRESH_CREDENTIAL_TTL),
        })
    }
}

impl AuthConfig {
    /// Resolves configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`AuthConfig::load_with`].
    pub fn from_env() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Resolves configuration using `lookup` in place of the environment.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if:
    /// - the file named by `CONFIG_PATH` cannot be read or parsed
    /// - a lifetime override is not a valid humantime duration
    /// - no secret is configured, or the configured secret is empty
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut section = match lookup(CONFIG_PATH_ENV).filter(|path| !path.is_empty()) {
            Some(path) => read_section(Path::new(&path))?,
            None => JwtSection::default(),
        };

        if let Some(secret) = lookup(SECRET_KEY_ENV) {
            tracing::debug!(var = SECRET_KEY_ENV, "Signing secret taken from environment");
            section.secret_key = Some(secret);
        }
        if let Some(value) = lookup(ACCESS_TTL_ENV) {
            section.access_ttl = Some(parse_duration(ACCESS_TTL_ENV, &value)?);
        }
        if let Some(value) = lookup(REFRESH_TTL_ENV) {
            section.refresh_ttl = Some(parse_duration(REFRESH_TTL_ENV, &value)?);
        }

        section.resolve()
    }

    /// Reads configuration from a YAML file, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the file cannot be read or
    /// parsed, or holds no usable secret.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        read_section(path.as_ref())?.resolve()
    }

    /// Parses configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the YAML is invalid or holds no
    /// usable secret.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        parse_section(yaml)?.resolve()
    }
}

fn read_section(path: &Path) -> Result<JwtSection> {
    tracing::info!(path = %path.display(), "Loading authentication config file");
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AuthError::configuration_with_source(
            format!("failed to read config file {}", path.display()),
            e,
        )
    })?;
    parse_section(&contents)
}

fn parse_section(yaml: &str) -> Result<JwtSection> {
    if yaml.trim().is_empty() {
        return Ok(JwtSection::default());
    }
    let file: ConfigFile = serde_yaml::from_str(yaml)
        .map_err(|e| AuthError::configuration_with_source("failed to parse config file", e))?;
    Ok(file.jwt)
}

fn parse_duration(var: &str, value: &str) -> Result<Duration> {
    humantime::parse_duration(value.trim()).map_err(|e| {
        AuthError::configuration_with_source(format!("{var} is not a valid duration"), e)
    })
}
