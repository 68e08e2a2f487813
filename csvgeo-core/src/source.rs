//! Operator-supplied description of a single CSV-backed source.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_LONGITUDE_COLUMN: &str = "longitude";
const DEFAULT_LATITUDE_COLUMN: &str = "latitude";

/// Configuration for one named source.
///
/// Exactly one of `url` (after generation and validation) or `path` must
/// resolve to something usable; the pipeline rejects configurations where both
/// or neither do. Fields the crate does not know about are kept in
/// [`SourceConfig::extra`] so URL generators can read them.
///
/// # Examples
///
/// ```
/// use csvgeo_core::SourceConfig;
///
/// let json = r#"{
///     "url": "https://example.com/points.csv",
///     "geometryColumns": { "longitude": "lon", "latitude": "lat" },
///     "regions": ["north", "south"]
/// }"#;
/// let source: SourceConfig = serde_json::from_str(json).expect("valid config");
/// assert_eq!(source.geometry_columns.longitude, "lon");
/// assert!(source.extra.contains_key("regions"));
/// assert_eq!(source.path_pattern(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// A single location, or the input consumed by a URL generator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Filesystem glob pattern selecting one or more CSV files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Columns holding the point coordinates.
    #[serde(default)]
    pub geometry_columns: GeometryColumns,
    /// Descriptive metadata copied onto the feature collection.
    #[serde(default)]
    pub metadata: SourceMetadata,
    /// Any other fields, such as a `regions` list read by a generator.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SourceConfig {
    /// Build a configuration pointing at a single URL or CSV path.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Build a configuration reading files matching a glob pattern.
    #[must_use]
    pub fn from_path(pattern: impl Into<String>) -> Self {
        Self {
            path: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// The glob pattern, if one is configured and non-empty.
    #[must_use]
    pub fn path_pattern(&self) -> Option<&str> {
        self.path.as_deref().filter(|pattern| !pattern.is_empty())
    }

    /// Look up an extra field by name.
    #[must_use]
    pub fn extra_field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// Names of the columns carrying longitude and latitude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryColumns {
    /// Column holding the x coordinate.
    #[serde(default = "default_longitude")]
    pub longitude: String,
    /// Column holding the y coordinate.
    #[serde(default = "default_latitude")]
    pub latitude: String,
}

impl Default for GeometryColumns {
    fn default() -> Self {
        Self {
            longitude: default_longitude(),
            latitude: default_latitude(),
        }
    }
}

impl GeometryColumns {
    /// Use custom column names for the coordinates.
    #[must_use]
    pub fn new(longitude: impl Into<String>, latitude: impl Into<String>) -> Self {
        Self {
            longitude: longitude.into(),
            latitude: latitude.into(),
        }
    }
}

fn default_longitude() -> String {
    DEFAULT_LONGITUDE_COLUMN.to_owned()
}

fn default_latitude() -> String {
    DEFAULT_LATITUDE_COLUMN.to_owned()
}

/// Optional descriptive metadata for a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    /// Column whose integer values become feature identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,
    /// Human readable dataset name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Longer dataset description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_geometry_columns_when_absent() {
        let source: SourceConfig =
            serde_json::from_str(r#"{ "path": "data/*.csv" }"#).expect("config should parse");

        assert_eq!(source.geometry_columns, GeometryColumns::default());
        assert_eq!(source.geometry_columns.longitude, "longitude");
        assert_eq!(source.geometry_columns.latitude, "latitude");
        assert_eq!(source.path_pattern(), Some("data/*.csv"));
    }

    #[rstest]
    fn reads_metadata_in_camel_case() {
        let source: SourceConfig = serde_json::from_str(
            r#"{ "url": "https://example.com/a.csv", "metadata": { "idField": "id", "name": "Trees" } }"#,
        )
        .expect("config should parse");

        assert_eq!(source.metadata.id_field.as_deref(), Some("id"));
        assert_eq!(source.metadata.name.as_deref(), Some("Trees"));
        assert!(source.metadata.description.is_none());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    fn treats_empty_path_as_absent(#[case] path: Option<String>) {
        let source = SourceConfig {
            path,
            ..SourceConfig::default()
        };

        assert_eq!(source.path_pattern(), None);
    }

    #[rstest]
    fn keeps_unknown_fields_for_generators() {
        let source: SourceConfig =
            serde_json::from_str(r#"{ "regions": ["Region1", "Region2"], "tier": 3 }"#)
                .expect("config should parse");

        assert_eq!(
            source.extra_field("regions"),
            Some(&serde_json::json!(["Region1", "Region2"]))
        );
        assert_eq!(source.extra_field("tier"), Some(&serde_json::json!(3)));
        assert!(source.url.is_none());
    }
}
