//! GeoJSON output types.
//!
//! Only the subset the provider emits is modelled: point geometries inside a
//! `FeatureCollection`. The `type` members are produced by serde's internal
//! tagging so the serialised form matches RFC 7946.

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::row::Row;

/// A GeoJSON `FeatureCollection`.
///
/// # Examples
///
/// ```
/// use csvgeo_core::FeatureCollection;
///
/// let collection = FeatureCollection::default();
/// let json = serde_json::to_value(&collection).expect("serialisable");
/// assert_eq!(json["type"], "FeatureCollection");
/// assert!(json["features"].as_array().is_some_and(Vec::is_empty));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    /// One feature per translated row.
    pub features: Vec<Feature>,
    /// Dataset metadata derived from the source configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CollectionMetadata>,
}

impl FeatureCollection {
    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// A single GeoJSON `Feature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    /// Identifier taken from the configured id column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Point geometry built from the coordinate columns.
    pub geometry: Geometry,
    /// Every column of the source row.
    pub properties: Row,
}

/// Geometry of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position, `[x, y]`.
    Point {
        /// Longitude then latitude.
        coordinates: [f64; 2],
    },
}

impl Geometry {
    /// Build a point geometry from a coordinate.
    #[must_use]
    pub const fn point(coord: Coord<f64>) -> Self {
        Self::Point {
            coordinates: [coord.x, coord.y],
        }
    }

    /// The point position as a coordinate.
    #[must_use]
    pub const fn coord(&self) -> Coord<f64> {
        match *self {
            Self::Point {
                coordinates: [x, y],
            } => Coord { x, y },
        }
    }
}

/// Collection-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMetadata {
    /// Dataset name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Dataset description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Property used as the feature identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,
    /// GeoJSON geometry type shared by every feature.
    pub geometry_type: String,
}
