//! `reqwest`-backed [`CsvTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};

use super::{CsvTransport, TransportBuildError, TransportError};

/// Default user agent for CSV requests.
pub const DEFAULT_USER_AGENT: &str = "csvgeo/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    /// Timeout applied to connection setup and to each whole request.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpTransportConfig {
    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP implementation of [`CsvTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a transport with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, TransportBuildError> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create a transport with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpTransportConfig) -> Result<Self, TransportBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return TransportError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        TransportError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    fn check_status(&self, response: Response, url: &str) -> Result<Response, TransportError> {
        response
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))
    }
}

#[async_trait]
impl CsvTransport for HttpTransport {
    async fn probe(&self, url: &str) -> Result<(), TransportError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        self.check_status(response, url).map(drop)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        let body = self
            .check_status(response, url)?
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpTransportConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[rstest]
    fn defaults_use_crate_user_agent_and_timeout() {
        let transport = HttpTransport::new().expect("client should build");

        assert_eq!(transport.config().user_agent, DEFAULT_USER_AGENT);
        assert_eq!(
            transport.config().timeout,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[rstest]
    fn unreachable_host_is_reported_as_network_or_timeout() {
        let transport = HttpTransport::with_config(
            HttpTransportConfig::default().with_timeout(Duration::from_secs(2)),
        )
        .expect("client should build");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime should build");

        // Port 9 on loopback is the discard service and is closed on test hosts.
        let err = runtime
            .block_on(transport.probe("http://127.0.0.1:9/points.csv"))
            .expect_err("probe should fail");

        assert!(
            matches!(
                err,
                TransportError::Network { .. } | TransportError::Timeout { .. }
            ),
            "unexpected error {err:?}"
        );
    }
}
