use std::time::Duration;

use crate::error::{ClientError, ClientResult};

const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the console finds `welfare-api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL including the `/api/v1` prefix.
    pub api_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load from the environment (and `.env`, if present).
    ///
    /// | Env Var                    | Default                          |
    /// |----------------------------|----------------------------------|
    /// | `WELFARE_API_URL`          | `http://localhost:3000/api/v1`   |
    /// | `WELFARE_API_TIMEOUT_SECS` | `30`                             |
    pub fn from_env() -> ClientResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_values(
            std::env::var("WELFARE_API_URL").ok(),
            std::env::var("WELFARE_API_TIMEOUT_SECS").ok(),
        )
    }

    pub fn from_values(api_url: Option<String>, timeout_secs: Option<String>) -> ClientResult<Self> {
        let api_url = api_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "WELFARE_API_URL must be an http(s) URL, got '{api_url}'"
            )));
        }

        let timeout_secs = match timeout_secs {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!(
                    "WELFARE_API_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?,
        };
        if timeout_secs == 0 {
            return Err(ClientError::Config(
                "WELFARE_API_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::from_values(None, None).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let config =
            ClientConfig::from_values(Some("https://gov.example/api/v1/".into()), Some("5".into()))
                .unwrap();
        assert_eq!(config.api_url, "https://gov.example/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn malformed_values_are_config_errors() {
        assert_matches!(
            ClientConfig::from_values(Some("ftp://x".into()), None),
            Err(ClientError::Config(_))
        );
        assert_matches!(
            ClientConfig::from_values(None, Some("soon".into())),
            Err(ClientError::Config(_))
        );
        assert_matches!(
            ClientConfig::from_values(None, Some("0".into())),
            Err(ClientError::Config(_))
        );
    }
}
