//! Core domain types for the csvgeo provider.
//!
//! This crate owns the shapes that flow through the ingestion pipeline:
//! source configuration, parsed CSV rows with inferred scalar values, and the
//! GeoJSON feature collection produced by [`translate`]. Nothing here performs
//! I/O; fetching and parsing live in `csvgeo-data`.

#![forbid(unsafe_code)]

pub mod feature;
pub mod row;
pub mod source;
pub mod translate;

pub use feature::{CollectionMetadata, Feature, FeatureCollection, Geometry};
pub use row::{CellValue, Row};
pub use source::{GeometryColumns, SourceConfig, SourceMetadata};
pub use translate::{CoordinateTransform, Identity, translate};
