//! Facade crate for csvgeo.
//!
//! This crate re-exports the row and feature types and, behind the `data`
//! feature, the provider that resolves CSV sources into feature collections.

#![forbid(unsafe_code)]

pub use csvgeo_core::{
    CellValue, CollectionMetadata, CoordinateTransform, Feature, FeatureCollection, Geometry,
    GeometryColumns, Identity, Row, SourceConfig, SourceMetadata, translate,
};

#[cfg(feature = "data")]
pub use csvgeo_data::{
    ConfigError, CsvParseError, CsvProvider, GenerateError, PassThroughGenerator, ProviderConfig,
    ProviderError, SourceError, SourceSelection, TemplateGenerator, UrlGenerator, parse_csv,
};

#[cfg(feature = "data")]
pub use csvgeo_data::transport::{CsvTransport, HttpTransport, HttpTransportConfig};
