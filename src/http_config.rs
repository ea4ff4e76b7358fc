//! HTTP client configuration module
//!
//! Centralised settings for the reqwest client used by calendar calls.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Total request timeout. `None` leaves it to the transport default.
    pub timeout: Option<Duration>,
    pub pool_idle_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Some(Duration::from_secs(45)),
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: format!("lexboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    /// Calendar inserts carry no request deadline of their own.
    pub fn calendar_api() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: None,
            ..Self::default()
        }
    }

    /// Build a reqwest client with this configuration
    pub fn build_client(&self) -> Result<Client, reqwest::Error> {
        let mut builder = ClientBuilder::new()
            .connect_timeout(self.connect_timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(2)
            .user_agent(self.user_agent.clone());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_profile_has_no_deadline() {
        let config = HttpConfig::calendar_api();
        assert!(config.timeout.is_none());
        assert!(config.build_client().is_ok());
    }
}
