//! Fetching CSV documents over the network.
//!
//! [`CsvTransport`] is the seam between the pipeline and the HTTP client. The
//! pipeline only ever needs two operations: a cheap existence check used to
//! filter candidate URLs, and a full fetch of the CSV body. [`HttpTransport`]
//! implements both with `reqwest`; [`test_support::StubTransport`] serves
//! canned responses so the pipeline can be exercised without a network.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use csvgeo_data::transport::{CsvTransport, HttpTransport, HttpTransportConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpTransportConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let transport = HttpTransport::with_config(config)?;
//! transport.probe("https://example.com/points.csv").await?;
//! let body = transport.fetch("https://example.com/points.csv").await?;
//! println!("{} bytes", body.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod http;

#[doc(hidden)]
pub mod test_support;

use std::sync::Arc;

use async_trait::async_trait;

pub use error::{TransportBuildError, TransportError};
pub use http::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpTransport, HttpTransportConfig};

/// Network access used by the ingestion pipeline.
#[async_trait]
pub trait CsvTransport: Send + Sync {
    /// Check that `url` currently answers with a success status.
    async fn probe(&self, url: &str) -> Result<(), TransportError>;

    /// Download the full body served at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl<T> CsvTransport for Arc<T>
where
    T: CsvTransport + ?Sized,
{
    async fn probe(&self, url: &str) -> Result<(), TransportError> {
        (**self).probe(url).await
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        (**self).fetch(url).await
    }
}
