use std::{str::FromStr, time::Duration};

use crate::error::{config::ConfigError, AppError};

const DEFAULT_COMMAND_PREFIX: &str = "!";
const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 45;

/// Pacing delays sized to Discord's per-route burst limits.
const DEFAULT_ROLE_PACING_MS: u64 = 200;
const DEFAULT_CATEGORY_PACING_MS: u64 = 300;
const DEFAULT_CHANNEL_PACING_MS: u64 = 300;

const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    pub command_prefix: String,
    pub http_port: u16,

    pub confirm_timeout: Duration,

    pub role_pacing: Duration,
    pub category_pacing: Duration,
    pub channel_pacing: Duration,

    pub retry_max_attempts: u32,
    pub retry_base_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            command_prefix: std::env::var("COMMAND_PREFIX")
                .unwrap_or_else(|_| DEFAULT_COMMAND_PREFIX.to_string()),
            http_port: optional("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            confirm_timeout: Duration::from_secs(optional(
                "CONFIRM_TIMEOUT_SECS",
                DEFAULT_CONFIRM_TIMEOUT_SECS,
            )?),
            role_pacing: Duration::from_millis(optional(
                "ROLE_PACING_MS",
                DEFAULT_ROLE_PACING_MS,
            )?),
            category_pacing: Duration::from_millis(optional(
                "CATEGORY_PACING_MS",
                DEFAULT_CATEGORY_PACING_MS,
            )?),
            channel_pacing: Duration::from_millis(optional(
                "CHANNEL_PACING_MS",
                DEFAULT_CHANNEL_PACING_MS,
            )?),
            retry_max_attempts: optional("RETRY_MAX_ATTEMPTS", DEFAULT_RETRY_MAX_ATTEMPTS)?,
            retry_base_delay: Duration::from_millis(optional(
                "RETRY_BASE_DELAY_MS",
                DEFAULT_RETRY_BASE_DELAY_MS,
            )?),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_when_unset() {
        let value: u64 = optional("GUILDPRINT_TEST_UNSET_VALUE", 45).unwrap();

        assert_eq!(value, 45);
    }

    #[test]
    fn rejects_unparseable_values() {
        std::env::set_var("GUILDPRINT_TEST_BAD_PORT", "eighty");

        let result: Result<u16, ConfigError> = optional("GUILDPRINT_TEST_BAD_PORT", 8080);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { name, value })
                if name == "GUILDPRINT_TEST_BAD_PORT" && value == "eighty"
        ));
    }

    #[test]
    fn reports_missing_required_variable() {
        let result = required("GUILDPRINT_TEST_MISSING_TOKEN");

        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvVar(name)) if name == "GUILDPRINT_TEST_MISSING_TOKEN"
        ));
    }
}
