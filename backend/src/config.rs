//! Environment-driven application configuration.
//!
//! This module centralises the environment variables the embedding
//! application must supply, so they are validated consistently and can be
//! tested in isolation via [`mockable::Env`].

use mockable::Env;
use tracing::warn;

const DATABASE_URL_ENV: &str = "DATABASE_URL";
const POOL_MAX_SIZE_ENV: &str = "DB_POOL_MAX_SIZE";
const APP_BASE_URL_ENV: &str = "APP_BASE_URL";
const RESEND_API_KEY_ENV: &str = "RESEND_API_KEY";
const RESEND_FROM_ENV: &str = "RESEND_FROM";

/// Errors raised while validating application configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Settings derived from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Pool size override; the pool default applies when unset.
    pub pool_max_size: Option<u32>,
    /// Base URL invite links are built against.
    pub invite_link_base: String,
    /// Resend API key; invite emails are skipped when unset.
    pub resend_api_key: Option<String>,
    /// Sender address for invite emails.
    pub resend_from: Option<String>,
}

/// Build application settings from environment variables.
pub fn app_config_from_env<E: Env>(env: &E) -> Result<AppConfig, ConfigError> {
    let database_url = require(env, DATABASE_URL_ENV)?;
    let invite_link_base = require(env, APP_BASE_URL_ENV)?;
    let pool_max_size = pool_max_size_from_env(env)?;

    let resend_api_key = env.string(RESEND_API_KEY_ENV);
    let resend_from = env.string(RESEND_FROM_ENV);
    if resend_api_key.is_none() {
        warn!("RESEND_API_KEY not set; invite emails will be skipped");
    }

    Ok(AppConfig {
        database_url,
        pool_max_size,
        invite_link_base,
        resend_api_key,
        resend_from,
    })
}

fn require<E: Env>(env: &E, name: &'static str) -> Result<String, ConfigError> {
    match env.string(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv { name }),
    }
}

fn pool_max_size_from_env<E: Env>(env: &E) -> Result<Option<u32>, ConfigError> {
    let Some(value) = env.string(POOL_MAX_SIZE_ENV) else {
        return Ok(None);
    };
    match value.parse::<u32>() {
        Ok(size) if size > 0 => Ok(Some(size)),
        _ => Err(ConfigError::InvalidEnv {
            name: POOL_MAX_SIZE_ENV,
            value,
            expected: "a positive integer",
        }),
    }
}

#[cfg(test)]
mod tests {
    use mockable::MockEnv;
    use rstest::rstest;

    use super::*;

    fn env_with(vars: &[(&'static str, &'static str)]) -> MockEnv {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string().returning(move |name| {
            vars.iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        });
        env
    }

    #[rstest]
    fn full_environment_parses() {
        let env = env_with(&[
            ("DATABASE_URL", "postgres://localhost/coachup"),
            ("DB_POOL_MAX_SIZE", "15"),
            ("APP_BASE_URL", "https://coachup.test"),
            ("RESEND_API_KEY", "re_key"),
            ("RESEND_FROM", "CoachUp <team@coachup.test>"),
        ]);

        let config = app_config_from_env(&env).expect("config parses");

        assert_eq!(config.database_url, "postgres://localhost/coachup");
        assert_eq!(config.pool_max_size, Some(15));
        assert_eq!(config.invite_link_base, "https://coachup.test");
        assert_eq!(config.resend_api_key.as_deref(), Some("re_key"));
    }

    #[rstest]
    fn missing_database_url_is_an_error() {
        let env = env_with(&[("APP_BASE_URL", "https://coachup.test")]);

        let error = app_config_from_env(&env).expect_err("missing url rejected");

        assert!(matches!(
            error,
            ConfigError::MissingEnv {
                name: "DATABASE_URL"
            }
        ));
    }

    #[rstest]
    fn missing_base_url_is_an_error() {
        let env = env_with(&[("DATABASE_URL", "postgres://localhost/coachup")]);

        let error = app_config_from_env(&env).expect_err("missing base url rejected");

        assert!(matches!(
            error,
            ConfigError::MissingEnv {
                name: "APP_BASE_URL"
            }
        ));
    }

    #[rstest]
    #[case("0")]
    #[case("abc")]
    #[case("-3")]
    fn invalid_pool_size_is_an_error(#[case] raw: &'static str) {
        let env = env_with(&[
            ("DATABASE_URL", "postgres://localhost/coachup"),
            ("APP_BASE_URL", "https://coachup.test"),
            ("DB_POOL_MAX_SIZE", raw),
        ]);

        let error = app_config_from_env(&env).expect_err("invalid size rejected");

        assert!(matches!(error, ConfigError::InvalidEnv { .. }));
    }

    #[rstest]
    fn resend_settings_are_optional() {
        let env = env_with(&[
            ("DATABASE_URL", "postgres://localhost/coachup"),
            ("APP_BASE_URL", "https://coachup.test"),
        ]);

        let config = app_config_from_env(&env).expect("config parses");

        assert_eq!(config.resend_api_key, None);
        assert_eq!(config.resend_from, None);
        assert_eq!(config.pool_max_size, None);
    }
}
