use crate::{ConfigError, FromEnv, env_or_default, env_parse};
use std::time::Duration;

/// HTTP layer settings shared by the router builder.
#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// Upper bound for a single request before a 408 is returned.
    pub request_timeout_secs: u64,
    /// Origins allowed for cross-origin requests. Empty disables CORS.
    pub cors_allowed_origins: Vec<String>,
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl FromEnv for HttpConfig {
    /// - REQUEST_TIMEOUT_SECS: defaults to 30
    /// - CORS_ALLOWED_ORIGIN: comma-separated list, defaults to none
    fn from_env() -> Result<Self, ConfigError> {
        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", "30")?;
        if request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        let cors_allowed_origins = env_or_default("CORS_ALLOWED_ORIGIN", "")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            request_timeout_secs,
            cors_allowed_origins,
        })
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_defaults() {
        temp_env::with_vars(
            [
                ("REQUEST_TIMEOUT_SECS", None::<&str>),
                ("CORS_ALLOWED_ORIGIN", None::<&str>),
            ],
            || {
                let config = HttpConfig::from_env().unwrap();
                assert_eq!(config.request_timeout(), Duration::from_secs(30));
                assert!(config.cors_allowed_origins.is_empty());
            },
        );
    }

    #[test]
    fn test_http_config_splits_origins() {
        temp_env::with_vars(
            [
                ("REQUEST_TIMEOUT_SECS", Some("5")),
                (
                    "CORS_ALLOWED_ORIGIN",
                    Some("http://localhost:3000, https://planner.example.com,"),
                ),
            ],
            || {
                let config = HttpConfig::from_env().unwrap();
                assert_eq!(config.request_timeout_secs, 5);
                assert_eq!(
                    config.cors_allowed_origins,
                    vec!["http://localhost:3000", "https://planner.example.com"]
                );
            },
        );
    }

    #[test]
    fn test_http_config_rejects_zero_timeout() {
        temp_env::with_var("REQUEST_TIMEOUT_SECS", Some("0"), || {
            let err = HttpConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));
        });
    }
}
