//! Environment configuration.
//!
//! Values come from the process environment, after an optional `.env` in
//! the working directory has been loaded with dotenvy. Every reader takes a
//! lookup closure so tests never touch the real environment.

use std::collections::HashMap;
use std::path::Path;

use crate::attrove::DEFAULT_BASE_URL;
use crate::timefmt::DisplayZone;

pub const USER_ID_VAR: &str = "ATTROVE_USER_ID";
/// Per-user `sk_` key, as named by the daily rundown.
pub const SECRET_KEY_VAR: &str = "ATTROVE_SECRET_KEY";
/// Per-user `sk_` key, as named by meeting prep and search.
pub const USER_TOKEN_VAR: &str = "ATTROVE_USER_TOKEN";
pub const BASE_URL_VAR: &str = "ATTROVE_BASE_URL";
pub const TIMEZONE_VAR: &str = "RUNDOWN_TIMEZONE";
pub const RESEND_KEY_VAR: &str = "RESEND_API_KEY";
pub const SEND_TO_VAR: &str = "SEND_TO";
pub const CLIENT_ID_VAR: &str = "ATTROVE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "ATTROVE_CLIENT_SECRET";
pub const DEMO_MODE_VAR: &str = "DEMO_MODE";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {key_var} or {user_var}.")]
    MissingCredentials {
        key_var: &'static str,
        user_var: &'static str,
    },
    #[error("Missing {id_var} or {secret_var}.")]
    MissingPartnerCredentials {
        id_var: &'static str,
        secret_var: &'static str,
    },
    #[error("Set {key_var} and {to_var} in .env to send via email.")]
    MissingDelivery {
        key_var: &'static str,
        to_var: &'static str,
    },
    #[error("Unknown timezone {0:?} in RUNDOWN_TIMEZONE")]
    UnknownTimezone(String),
}

/// Load `.env` from the working directory. A missing file is fine.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            log::warn!("Failed to load .env file: {}", e);
        }
    }
}

/// Read a `.env`-format file into a map without touching the process env.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, dotenvy::Error> {
    dotenvy::from_path_iter(path)?.collect()
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Everything a per-user tool needs to reach the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub user_id: String,
    pub base_url: String,
    pub zone: DisplayZone,
}

impl Config {
    /// Read the config, with the per-user key stored under `key_var`.
    pub fn from_lookup(
        key_var: &'static str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let (Some(api_key), Some(user_id)) =
            (non_empty(&lookup, key_var), non_empty(&lookup, USER_ID_VAR))
        else {
            return Err(ConfigError::MissingCredentials {
                key_var,
                user_var: USER_ID_VAR,
            });
        };

        Ok(Self {
            api_key,
            user_id,
            base_url: non_empty(&lookup, BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            zone: zone_from_lookup(&lookup)?,
        })
    }

    pub fn from_env(key_var: &'static str) -> Result<Self, ConfigError> {
        Self::from_lookup(key_var, |k| std::env::var(k).ok())
    }
}

/// Display zone from `RUNDOWN_TIMEZONE`, defaulting to the local zone.
pub fn zone_from_lookup(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<DisplayZone, ConfigError> {
    match non_empty(lookup, TIMEZONE_VAR) {
        None => Ok(DisplayZone::Local),
        Some(name) => DisplayZone::from_name(&name).ok_or(ConfigError::UnknownTimezone(name)),
    }
}

/// Resend settings for `daily-rundown --send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub api_key: String,
    pub send_to: String,
}

impl DeliveryConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match (
            non_empty(&lookup, RESEND_KEY_VAR),
            non_empty(&lookup, SEND_TO_VAR),
        ) {
            (Some(api_key), Some(send_to)) => Ok(Self { api_key, send_to }),
            _ => Err(ConfigError::MissingDelivery {
                key_var: RESEND_KEY_VAR,
                to_var: SEND_TO_VAR,
            }),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }
}

/// Partner credentials for the quickstart's admin calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerConfig {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
}

impl PartnerConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let (Some(client_id), Some(client_secret)) = (
            non_empty(&lookup, CLIENT_ID_VAR),
            non_empty(&lookup, CLIENT_SECRET_VAR),
        ) else {
            return Err(ConfigError::MissingPartnerCredentials {
                id_var: CLIENT_ID_VAR,
                secret_var: CLIENT_SECRET_VAR,
            });
        };
        Ok(Self {
            client_id,
            client_secret,
            base_url: non_empty(&lookup, BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }
}

/// `DEMO_MODE=true` switches the quickstart to canned output.
pub fn demo_mode_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> bool {
    non_empty(&lookup, DEMO_MODE_VAR).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
