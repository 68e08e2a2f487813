//! Turn parsed rows into a point feature collection.

use geo::Coord;
use log::warn;

use crate::feature::{CollectionMetadata, Feature, FeatureCollection, Geometry};
use crate::row::Row;
use crate::source::SourceConfig;

const POINT_GEOMETRY: &str = "Point";

/// Maps a coordinate read from a row onto the emitted position.
///
/// Closures of type `Fn(Coord<f64>) -> Coord<f64>` implement this trait, so a
/// projection or offset can be supplied inline.
///
/// # Examples
///
/// ```
/// use csvgeo_core::CoordinateTransform;
/// use geo::Coord;
///
/// let swap = |coord: Coord<f64>| Coord { x: coord.y, y: coord.x };
/// assert_eq!(swap.transform(Coord { x: 1.0, y: 2.0 }), Coord { x: 2.0, y: 1.0 });
/// ```
pub trait CoordinateTransform: Send + Sync {
    /// Transform a `(longitude, latitude)` coordinate.
    fn transform(&self, coord: Coord<f64>) -> Coord<f64>;
}

/// Leaves coordinates untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl CoordinateTransform for Identity {
    fn transform(&self, coord: Coord<f64>) -> Coord<f64> {
        coord
    }
}

impl<F> CoordinateTransform for F
where
    F: Fn(Coord<f64>) -> Coord<f64> + Send + Sync,
{
    fn transform(&self, coord: Coord<f64>) -> Coord<f64> {
        self(coord)
    }
}

/// Build a feature collection from the merged rows of a source.
///
/// Rows whose coordinate columns are missing, non-numeric, or non-finite after
/// the transform are skipped with a warning; every other row yields exactly
/// one point feature carrying all of its columns as properties.
///
/// # Examples
///
/// ```
/// use csvgeo_core::{CellValue, Identity, Row, SourceConfig, translate};
///
/// let row: Row = [
///     ("id", CellValue::infer("1")),
///     ("longitude", CellValue::infer("-122")),
///     ("latitude", CellValue::infer("37")),
/// ]
/// .into_iter()
/// .collect();
/// let collection = translate(vec![row], &SourceConfig::default(), &Identity);
/// assert_eq!(collection.len(), 1);
/// ```
pub fn translate<T>(rows: Vec<Row>, source: &SourceConfig, transform: &T) -> FeatureCollection
where
    T: CoordinateTransform + ?Sized,
{
    let total = rows.len();
    let features: Vec<Feature> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| build_feature(index, row, source, transform))
        .collect();
    if features.len() < total {
        warn!(
            "skipped {} of {total} rows without usable coordinates",
            total.saturating_sub(features.len())
        );
    }
    FeatureCollection {
        features,
        metadata: Some(collection_metadata(source)),
    }
}

fn build_feature<T>(
    index: usize,
    row: Row,
    source: &SourceConfig,
    transform: &T,
) -> Option<Feature>
where
    T: CoordinateTransform + ?Sized,
{
    let columns = &source.geometry_columns;
    let x = row.get(&columns.longitude).and_then(|value| value.as_f64());
    let y = row.get(&columns.latitude).and_then(|value| value.as_f64());
    let (Some(x), Some(y)) = (x, y) else {
        warn!(
            "row {index} has no numeric {}/{} values",
            columns.longitude, columns.latitude
        );
        return None;
    };
    let coord = transform.transform(Coord { x, y });
    if !(coord.x.is_finite() && coord.y.is_finite()) {
        warn!("row {index} produced a non-finite coordinate after transformation");
        return None;
    }
    let id = source
        .metadata
        .id_field
        .as_deref()
        .and_then(|field| row.get(field))
        .and_then(|value| value.as_i64());
    Some(Feature {
        id,
        geometry: Geometry::point(coord),
        properties: row,
    })
}

fn collection_metadata(source: &SourceConfig) -> CollectionMetadata {
    let metadata = &source.metadata;
    CollectionMetadata {
        name: metadata.name.clone(),
        description: metadata.description.clone(),
        id_field: metadata.id_field.clone(),
        geometry_type: POINT_GEOMETRY.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::CellValue;
    use crate::source::{GeometryColumns, SourceMetadata};
    use rstest::{fixture, rstest};

    fn row(cells: &[(&str, &str)]) -> Row {
        cells
            .iter()
            .map(|(column, raw)| (*column, CellValue::infer(raw)))
            .collect()
    }

    #[fixture]
    fn sample_rows() -> Vec<Row> {
        vec![
            row(&[("id", "1"), ("longitude", "-122"), ("latitude", "37")]),
            row(&[("id", "2"), ("longitude", "-121"), ("latitude", "36")]),
        ]
    }

    fn coordinates(collection: &FeatureCollection) -> Vec<Coord<f64>> {
        collection
            .features
            .iter()
            .map(|feature| feature.geometry.coord())
            .collect()
    }

    #[rstest]
    fn builds_one_point_per_row(sample_rows: Vec<Row>) {
        let collection = translate(sample_rows, &SourceConfig::default(), &Identity);

        assert_eq!(
            coordinates(&collection),
            vec![Coord { x: -122.0, y: 37.0 }, Coord { x: -121.0, y: 36.0 }]
        );
        assert_eq!(
            collection.features[0].properties.get("id"),
            Some(&CellValue::Number(1.into()))
        );
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "the transform under test offsets coordinates"
    )]
    fn applies_custom_transform(sample_rows: Vec<Row>) {
        let offset = |coord: Coord<f64>| Coord {
            x: coord.x + 1.0,
            y: coord.y + 1.0,
        };

        let collection = translate(sample_rows, &SourceConfig::default(), &offset);

        assert_eq!(
            collection.features[0].geometry,
            Geometry::Point {
                coordinates: [-121.0, 38.0]
            }
        );
    }

    #[rstest]
    fn honours_custom_geometry_columns() {
        let source = SourceConfig {
            geometry_columns: GeometryColumns::new("x", "y"),
            ..SourceConfig::default()
        };
        let rows = vec![row(&[("x", "5.5"), ("y", "-3"), ("longitude", "99")])];

        let collection = translate(rows, &source, &Identity);

        assert_eq!(coordinates(&collection), vec![Coord { x: 5.5, y: -3.0 }]);
    }

    #[rstest]
    fn skips_rows_without_usable_coordinates() {
        let rows = vec![
            row(&[("longitude", ""), ("latitude", "37")]),
            row(&[("longitude", "east"), ("latitude", "37")]),
            row(&[("latitude", "37")]),
            row(&[("longitude", "-120"), ("latitude", "35")]),
        ];

        let collection = translate(rows, &SourceConfig::default(), &Identity);

        assert_eq!(coordinates(&collection), vec![Coord { x: -120.0, y: 35.0 }]);
    }

    #[rstest]
    fn skips_rows_the_transform_makes_non_finite(sample_rows: Vec<Row>) {
        let broken = |_: Coord<f64>| Coord {
            x: f64::NAN,
            y: 0.0,
        };

        let collection = translate(sample_rows, &SourceConfig::default(), &broken);

        assert!(collection.is_empty());
    }

    #[rstest]
    fn uses_integer_id_field_and_copies_metadata(sample_rows: Vec<Row>) {
        let source = SourceConfig {
            metadata: SourceMetadata {
                id_field: Some("id".to_owned()),
                name: Some("Stations".to_owned()),
                description: None,
            },
            ..SourceConfig::default()
        };

        let collection = translate(sample_rows, &source, &Identity);

        let ids: Vec<Option<i64>> = collection.features.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
        let metadata = collection.metadata.expect("metadata should be present");
        assert_eq!(metadata.name.as_deref(), Some("Stations"));
        assert_eq!(metadata.id_field.as_deref(), Some("id"));
        assert_eq!(metadata.geometry_type, "Point");
    }

    #[rstest]
    fn empty_input_yields_empty_collection() {
        let collection = translate(Vec::new(), &SourceConfig::default(), &Identity);

        assert!(collection.is_empty());
        assert!(collection.metadata.is_some());
    }
}
