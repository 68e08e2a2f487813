//! The request-level entry point.

use std::error::Error as _;
use std::fmt;

use csvgeo_core::{CoordinateTransform, FeatureCollection, Identity, SourceConfig, translate};
use log::{debug, error};

use super::selection::SourceSelection;
use crate::config::ProviderConfig;
use crate::error::{ProviderError, SourceError};
use crate::generate::{PassThroughGenerator, UrlGenerator, enumerate_candidates, resolve_url_candidates};
use crate::transport::{CsvTransport, HttpTransport, HttpTransportConfig, TransportBuildError};

/// Serves feature collections for the sources in a [`ProviderConfig`].
///
/// The provider holds no per-request state; one instance can serve
/// concurrent requests. Each request runs its steps sequentially.
///
/// # Examples
///
/// ```
/// use csvgeo_core::SourceConfig;
/// use csvgeo_data::transport::test_support::StubTransport;
/// use csvgeo_data::{CsvProvider, ProviderConfig};
///
/// let url = "https://example.com/points.csv";
/// let transport = StubTransport::new().with_csv(url, "id,longitude,latitude\n1,-122,37\n");
/// let config = ProviderConfig::from_sources([("points", SourceConfig::from_url(url))]);
/// let provider = CsvProvider::new(config, transport);
///
/// let runtime = tokio::runtime::Builder::new_current_thread()
///     .enable_all()
///     .build()
///     .expect("runtime");
/// let collection = runtime.block_on(provider.get_data("points")).expect("data");
/// assert_eq!(collection.len(), 1);
/// ```
pub struct CsvProvider {
    config: ProviderConfig,
    transport: Box<dyn CsvTransport>,
    generator: Box<dyn UrlGenerator>,
    transform: Box<dyn CoordinateTransform>,
}

impl fmt::Debug for CsvProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CsvProvider {
    /// Create a provider reading remote sources through `transport`.
    ///
    /// The generator defaults to [`PassThroughGenerator`] and the coordinate
    /// transform to [`Identity`].
    #[must_use]
    pub fn new<T>(config: ProviderConfig, transport: T) -> Self
    where
        T: CsvTransport + 'static,
    {
        Self {
            config,
            transport: Box::new(transport),
            generator: Box::new(PassThroughGenerator),
            transform: Box::new(Identity),
        }
    }

    /// Create a provider backed by [`HttpTransport`] with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportBuildError`] if the HTTP client cannot be built.
    pub fn with_http(config: ProviderConfig) -> Result<Self, TransportBuildError> {
        Self::with_http_config(config, HttpTransportConfig::default())
    }

    /// Create a provider backed by [`HttpTransport`] using `http` settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportBuildError`] if the HTTP client cannot be built.
    pub fn with_http_config(
        config: ProviderConfig,
        http: HttpTransportConfig,
    ) -> Result<Self, TransportBuildError> {
        Ok(Self::new(config, HttpTransport::with_config(http)?))
    }

    /// Replace the URL generator.
    #[must_use]
    pub fn with_generator<G>(mut self, generator: G) -> Self
    where
        G: UrlGenerator + 'static,
    {
        self.generator = Box::new(generator);
        self
    }

    /// Replace the coordinate transform.
    #[must_use]
    pub fn with_transform<C>(mut self, transform: C) -> Self
    where
        C: CoordinateTransform + 'static,
    {
        self.transform = Box::new(transform);
        self
    }

    /// The configuration this provider serves.
    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Produce the feature collection for the source named `source_id`.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::UnknownSource`] when no such source is configured.
    /// - [`ProviderError::MissingSource`] or [`ProviderError::AmbiguousSource`]
    ///   when the source does not resolve to exactly one kind of input.
    /// - [`ProviderError::Unreadable`] for any enumeration, read or parse
    ///   failure; the detail is logged.
    pub async fn get_data(&self, source_id: &str) -> Result<FeatureCollection, ProviderError> {
        let source = self
            .config
            .source(source_id)
            .ok_or_else(|| ProviderError::UnknownSource {
                id: source_id.to_owned(),
            })?;
        debug!("serving source {source_id:?}");
        self.get_source_data(source).await
    }

    /// Produce the feature collection for an ad hoc source configuration.
    ///
    /// # Errors
    ///
    /// As [`CsvProvider::get_data`], minus the unknown-source case.
    pub async fn get_source_data(
        &self,
        source: &SourceConfig,
    ) -> Result<FeatureCollection, ProviderError> {
        let selection = self.select(source).await?;
        let rows = selection
            .read(&*self.transport)
            .await
            .map_err(|err| unreadable(&err))?;
        debug!("translating {} row(s)", rows.len());
        Ok(translate(rows, source, &*self.transform))
    }

    async fn select(&self, source: &SourceConfig) -> Result<SourceSelection, ProviderError> {
        let candidates =
            enumerate_candidates(&*self.generator, source).map_err(|err| unreadable(&err))?;
        let urls = resolve_url_candidates(&*self.transport, &candidates).await;
        SourceSelection::choose(urls, source.path_pattern())
    }
}

fn unreadable(err: &SourceError) -> ProviderError {
    error!("{err}");
    let mut cause = err.source();
    while let Some(inner) = cause {
        error!("  caused by: {inner}");
        cause = inner.source();
    }
    ProviderError::Unreadable
}
