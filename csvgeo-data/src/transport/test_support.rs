//! Test utilities for the CSV transport.
//!
//! This module provides [`StubTransport`], a deterministic test double for
//! [`CsvTransport`] that serves pre-configured bodies and statuses without
//! making HTTP requests, and records every request it receives.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{CsvTransport, TransportError};

/// Kind of request observed by [`StubTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMethod {
    /// Existence check issued by [`CsvTransport::probe`].
    Head,
    /// Download issued by [`CsvTransport::fetch`].
    Get,
}

/// Stub [`CsvTransport`] for testing.
///
/// URLs without a registered response fail with
/// [`TransportError::Network`], mirroring an unresolvable host.
///
/// # Example
///
/// ```
/// use csvgeo_data::transport::CsvTransport;
/// use csvgeo_data::transport::test_support::StubTransport;
///
/// let transport = StubTransport::new()
///     .with_csv("https://example.com/a.csv", "id\n1\n")
///     .with_status("https://example.com/gone.csv", 404);
///
/// let runtime = tokio::runtime::Builder::new_current_thread()
///     .build()
///     .expect("runtime");
/// assert!(runtime.block_on(transport.probe("https://example.com/a.csv")).is_ok());
/// assert!(runtime.block_on(transport.probe("https://example.com/gone.csv")).is_err());
/// ```
#[derive(Debug, Default)]
pub struct StubTransport {
    responses: HashMap<String, StubResponse>,
    requests: Mutex<Vec<(StubMethod, String)>>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Body { status: u16, body: Vec<u8> },
    Error(TransportError),
}

impl StubTransport {
    /// Create a transport with no registered URLs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 at `url`.
    #[must_use]
    pub fn with_csv(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.with_response(url, 200, body)
    }

    /// Answer `url` with an empty body and the given status.
    #[must_use]
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.with_response(url, status, Vec::new())
    }

    /// Answer `url` with an explicit status and body.
    #[must_use]
    pub fn with_response(
        mut self,
        url: impl Into<String>,
        status: u16,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        self.responses.insert(
            url.into(),
            StubResponse::Body {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// Fail every request to `url` with `error`.
    #[must_use]
    pub fn with_error(mut self, url: impl Into<String>, error: TransportError) -> Self {
        self.responses.insert(url.into(), StubResponse::Error(error));
        self
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<(StubMethod, String)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// URLs downloaded with [`CsvTransport::fetch`], in order.
    #[must_use]
    pub fn fetched_urls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|(method, _)| *method == StubMethod::Get)
            .map(|(_, url)| url)
            .collect()
    }

    fn respond(&self, method: StubMethod, url: &str) -> Result<Vec<u8>, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((method, url.to_owned()));
        match self.responses.get(url) {
            Some(StubResponse::Body { status, body }) if (200..300).contains(status) => {
                Ok(body.clone())
            }
            Some(StubResponse::Body { status, .. }) => Err(TransportError::Http {
                url: url.to_owned(),
                status: *status,
                message: format!("stub responded with status {status}"),
            }),
            Some(StubResponse::Error(error)) => Err(error.clone()),
            None => Err(TransportError::Network {
                url: url.to_owned(),
                message: "no stub response registered".to_owned(),
            }),
        }
    }
}

#[async_trait]
impl CsvTransport for StubTransport {
    async fn probe(&self, url: &str) -> Result<(), TransportError> {
        self.respond(StubMethod::Head, url).map(drop)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.respond(StubMethod::Get, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime should build")
            .block_on(future)
    }

    #[rstest]
    fn serves_registered_body() {
        let transport = StubTransport::new().with_csv("https://example.com/a.csv", "id\n1\n");

        let body = block_on(transport.fetch("https://example.com/a.csv")).expect("should fetch");

        assert_eq!(body, b"id\n1\n");
        assert_eq!(transport.fetched_urls(), vec!["https://example.com/a.csv"]);
    }

    #[rstest]
    fn non_success_status_is_an_http_error() {
        let transport = StubTransport::new().with_status("https://example.com/a.csv", 404);

        let err = block_on(transport.probe("https://example.com/a.csv")).expect_err("404");

        assert!(matches!(err, TransportError::Http { status: 404, .. }));
    }

    #[rstest]
    fn unknown_url_is_a_network_error() {
        let transport = StubTransport::new();

        let err = block_on(transport.fetch("https://example.com/a.csv")).expect_err("unknown");

        assert!(matches!(err, TransportError::Network { .. }));
        assert_eq!(
            transport.requests(),
            vec![(StubMethod::Get, "https://example.com/a.csv".to_owned())]
        );
    }

    #[rstest]
    fn configured_error_is_returned_verbatim() {
        let timeout = TransportError::Timeout {
            url: "https://example.com/slow.csv".to_owned(),
            timeout_secs: 30,
        };
        let transport =
            StubTransport::new().with_error("https://example.com/slow.csv", timeout.clone());

        let err = block_on(transport.probe("https://example.com/slow.csv")).expect_err("timeout");

        assert_eq!(err, timeout);
    }
}
