//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `BOOTCAMPS_*` environment variables and
//! configuration files, in increasing order of precedence as resolved by
//! `ortho_config`. Unset optional values fall back to the defaults below.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::inbound::http::state::HttpSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_EXPIRE_DAYS: u32 = 30;
const DEFAULT_MAX_FILE_UPLOAD: usize = 1_000_000;
const DEFAULT_UPLOAD_PATH: &str = "./public/uploads";
const DEFAULT_MAIL_FROM: &str = "noreply@devcamper.io";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);

/// Invalid or missing configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("bind_addr `{0}` is not a socket address")]
    BindAddr(String),
    #[error("{field} `{value}` is not a valid URL")]
    Url { field: &'static str, value: String },
    #[error("{0} requires {1}")]
    Incomplete(&'static str, &'static str),
    #[error("jwt_secret must be set outside debug builds")]
    MissingJwtSecret,
}

/// Settings for the HTTP server and its outbound adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOTCAMPS")]
pub struct AppSettings {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Pool size for `database_url`.
    pub db_max_connections: Option<u32>,
    /// HMAC secret for signing tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in days.
    pub jwt_expire_days: Option<u32>,
    /// Cookie lifetime in days.
    pub cookie_expire_days: Option<u32>,
    /// Production mode marks cookies `Secure`.
    #[ortho_config(default = false)]
    pub production: bool,
    /// Accept a random per-process signing secret when none is configured.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
    /// Largest accepted photo in bytes.
    pub max_file_upload: Option<usize>,
    /// Directory photos are written to.
    pub file_upload_path: Option<PathBuf>,
    /// Geocoding provider endpoint.
    pub geocoder_endpoint: Option<String>,
    /// Geocoding provider key.
    pub geocoder_api_key: Option<String>,
    /// Mail relay endpoint.
    pub mail_relay_url: Option<String>,
    /// Bearer key for the mail relay.
    pub mail_api_key: Option<String>,
    /// Sender address on outgoing mail.
    pub mail_from: Option<String>,
}

/// Geocoder endpoint and key, present only when both are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderSettings {
    pub endpoint: Url,
    pub api_key: String,
    pub timeout: Duration,
}

/// Mail relay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub endpoint: Url,
    pub api_key: Option<String>,
    pub from: String,
    pub timeout: Duration,
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|_| SettingsError::Url {
        field,
        value: value.to_owned(),
    })
}

impl AppSettings {
    /// Resolved listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|_| SettingsError::BindAddr(raw.to_owned()))
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn jwt_expire_days(&self) -> u32 {
        self.jwt_expire_days.unwrap_or(DEFAULT_EXPIRE_DAYS)
    }

    pub fn file_upload_path(&self) -> PathBuf {
        self.file_upload_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_PATH))
    }

    /// Adapter knobs for the HTTP layer.
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            cookie_expire_days: self.cookie_expire_days.unwrap_or(DEFAULT_EXPIRE_DAYS),
            cookie_secure: self.production,
            max_file_upload: self.max_file_upload.unwrap_or(DEFAULT_MAX_FILE_UPLOAD),
        }
    }

    /// Signing secret. Without a configured one, debug builds and
    /// `allow_ephemeral_secret` get 32 random bytes; tokens then die with
    /// the process.
    pub fn signing_secret(&self) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        if let Some(secret) = self.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
            return Ok(Zeroizing::new(secret.as_bytes().to_vec()));
        }
        if cfg!(debug_assertions) || self.allow_ephemeral_secret {
            let mut bytes = Zeroizing::new(vec![0_u8; 32]);
            rand::thread_rng().fill_bytes(&mut bytes);
            return Ok(bytes);
        }
        Err(SettingsError::MissingJwtSecret)
    }

    /// Geocoder settings, or `None` when no endpoint is configured.
    pub fn geocoder(&self) -> Result<Option<GeocoderSettings>, SettingsError> {
        let Some(endpoint) = self.geocoder_endpoint.as_deref() else {
            return Ok(None);
        };
        let api_key = self
            .geocoder_api_key
            .clone()
            .ok_or(SettingsError::Incomplete("geocoder_endpoint", "geocoder_api_key"))?;
        Ok(Some(GeocoderSettings {
            endpoint: parse_url("geocoder_endpoint", endpoint)?,
            api_key,
            timeout: OUTBOUND_TIMEOUT,
        }))
    }

    /// Mail relay settings, or `None` when no relay is configured.
    pub fn mail(&self) -> Result<Option<MailSettings>, SettingsError> {
        let Some(endpoint) = self.mail_relay_url.as_deref() else {
            return Ok(None);
        };
        Ok(Some(MailSettings {
            endpoint: parse_url("mail_relay_url", endpoint)?,
            api_key: self.mail_api_key.clone(),
            from: self
                .mail_from
                .clone()
                .unwrap_or_else(|| DEFAULT_MAIL_FROM.to_owned()),
            timeout: OUTBOUND_TIMEOUT,
        }))
    }
}
