use serde::Deserialize;
use std::env;
use thiserror::Error;

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
/// Recency window used by the web widget
pub const SERVICE_DEFAULT_DAYS: u32 = 10;
/// Recency window used by the console report
pub const REPORT_DEFAULT_DAYS: u32 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub github_token: Option<String>,
    pub github_owner: String,
    pub github_repo: String,
    pub graphql_url: String,
    pub days: u32,
    pub refresh_interval_seconds: u64,
    pub page_delay_ms: u64,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration for the long-running service
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_days(SERVICE_DEFAULT_DAYS)
    }

    /// Load configuration, falling back to `default_days` when LEADERBOARD_DAYS is unset
    pub fn from_env_with_days(default_days: u32) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok(), default_days)
    }

    fn from_lookup<F>(lookup: F, default_days: u32) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let days: u32 = parse_number("LEADERBOARD_DAYS", lookup("LEADERBOARD_DAYS"), default_days)?;
        if days == 0 {
            return Err(ConfigError::NotPositive("LEADERBOARD_DAYS"));
        }

        let refresh_interval_seconds: u64 =
            parse_number("REFRESH_INTERVAL_SECONDS", lookup("REFRESH_INTERVAL_SECONDS"), 3600)?;
        if refresh_interval_seconds == 0 {
            return Err(ConfigError::NotPositive("REFRESH_INTERVAL_SECONDS"));
        }

        Ok(Config {
            // An empty token is treated like a missing one
            github_token: lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty()),
            github_owner: var_or("GITHUB_OWNER", "zauberzeug"),
            github_repo: var_or("GITHUB_REPO", "nicegui"),
            graphql_url: var_or("GITHUB_GRAPHQL_URL", DEFAULT_GRAPHQL_URL),
            days,
            refresh_interval_seconds,
            page_delay_ms: parse_number("PAGE_DELAY_MS", lookup("PAGE_DELAY_MS"), 1000)?,
            host: var_or("HOST", "127.0.0.1"),
            port: parse_number("PORT", lookup("PORT"), 8080)?,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)], default_days: u32) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned(), default_days)
    }

    #[test]
    fn test_defaults() {
        let config = load(&[], SERVICE_DEFAULT_DAYS).unwrap();
        assert_eq!(config.github_token, None);
        assert_eq!(config.github_owner, "zauberzeug");
        assert_eq!(config.github_repo, "nicegui");
        assert_eq!(config.graphql_url, DEFAULT_GRAPHQL_URL);
        assert_eq!(config.days, 10);
        assert_eq!(config.refresh_interval_seconds, 3600);
        assert_eq!(config.page_delay_ms, 1000);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_report_default_days() {
        let config = load(&[], REPORT_DEFAULT_DAYS).unwrap();
        assert_eq!(config.days, 30);
    }

    #[test]
    fn test_overrides() {
        let config = load(
            &[
                ("GITHUB_TOKEN", "ghp_test"),
                ("GITHUB_OWNER", "octo"),
                ("GITHUB_REPO", "hello"),
                ("LEADERBOARD_DAYS", "7"),
                ("PORT", "9000"),
            ],
            SERVICE_DEFAULT_DAYS,
        )
        .unwrap();
        assert_eq!(config.github_token.as_deref(), Some("ghp_test"));
        assert_eq!(config.github_owner, "octo");
        assert_eq!(config.github_repo, "hello");
        assert_eq!(config.days, 7);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_blank_token_is_none() {
        let config = load(&[("GITHUB_TOKEN", "  ")], SERVICE_DEFAULT_DAYS).unwrap();
        assert_eq!(config.github_token, None);
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            load(&[("PORT", "http")], SERVICE_DEFAULT_DAYS),
            Err(ConfigError::InvalidNumber { name: "PORT", .. })
        ));
        assert!(matches!(
            load(&[("LEADERBOARD_DAYS", "0")], SERVICE_DEFAULT_DAYS),
            Err(ConfigError::NotPositive("LEADERBOARD_DAYS"))
        ));
        assert!(matches!(
            load(&[("LEADERBOARD_DAYS", "-3")], SERVICE_DEFAULT_DAYS),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }
}
