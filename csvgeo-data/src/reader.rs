//! Reading rows from resolved locations.
//!
//! Reads are strictly sequential so rows are concatenated in a deterministic
//! order: candidate order for URLs, newest file first for glob matches.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::io::BufReader;
use std::time::SystemTime;

use camino::{Utf8Path, Utf8PathBuf};
use csvgeo_core::Row;
use glob::MatchOptions;
use log::debug;

use crate::blocking::run_blocking;
use crate::classify::{has_csv_extension, is_url_shaped};
use crate::error::SourceError;
use crate::generate::local_csv_exists;
use crate::parse::parse_csv;
use crate::transport::CsvTransport;

/// Read and parse a single URL or local CSV file.
///
/// # Errors
///
/// - [`SourceError::InvalidSource`] when `location` is neither URL-shaped nor
///   a `.csv` path naming an existing file.
/// - [`SourceError::Transport`] when the download fails.
/// - [`SourceError::Io`] when the file cannot be opened or read.
/// - [`SourceError::Parse`] when the content is malformed.
pub async fn read_one<T>(transport: &T, location: &str) -> Result<Vec<Row>, SourceError>
where
    T: CsvTransport + ?Sized,
{
    if is_url_shaped(location) {
        debug!("fetching CSV from {location}");
        let body = transport.fetch(location).await?;
        return parse_csv(body.as_slice()).map_err(|source| SourceError::Parse {
            location: location.to_owned(),
            source,
        });
    }
    if has_csv_extension(location) && local_csv_exists(location).await? {
        return read_file(Utf8PathBuf::from(location)).await;
    }
    Err(SourceError::InvalidSource {
        location: location.to_owned(),
    })
}

/// Read every location in turn and concatenate the rows in input order.
///
/// The first failure aborts the read; later locations are not touched.
///
/// # Errors
///
/// Propagates the first error returned by [`read_one`].
pub async fn read_many<T>(transport: &T, locations: &[String]) -> Result<Vec<Row>, SourceError>
where
    T: CsvTransport + ?Sized,
{
    let mut rows = Vec::new();
    for location in locations {
        rows.extend(read_one(transport, location).await?);
    }
    Ok(rows)
}

/// Read every regular file matching the glob `pattern`, newest first.
///
/// Matches are deduplicated; directories and hidden files (a leading `.`
/// not spelled out in the pattern) are skipped. Files are ordered by
/// creation time, falling back to modification time where the filesystem does
/// not record one; files with identical timestamps keep path order. A pattern
/// matching nothing yields no rows.
///
/// # Errors
///
/// - [`SourceError::Pattern`] when `pattern` is not a valid glob.
/// - [`SourceError::NonUtf8Path`] when a match is not valid UTF-8.
/// - [`SourceError::Io`] when a match cannot be inspected or read.
/// - [`SourceError::Parse`] when a file is malformed.
pub async fn read_from_glob(pattern: &str) -> Result<Vec<Row>, SourceError> {
    let owned = pattern.to_owned();
    let files = run_blocking(move || newest_first(&owned)).await?;
    debug!("glob {pattern:?} matched {} file(s)", files.len());
    let mut rows = Vec::new();
    for file in files {
        rows.extend(read_file(file).await?);
    }
    Ok(rows)
}

async fn read_file(path: Utf8PathBuf) -> Result<Vec<Row>, SourceError> {
    run_blocking(move || {
        let file = csvgeo_fs::open_utf8_file(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        parse_csv(BufReader::new(file)).map_err(|source| SourceError::Parse {
            location: path.to_string(),
            source,
        })
    })
    .await
}

fn newest_first(pattern: &str) -> Result<Vec<Utf8PathBuf>, SourceError> {
    let mut stamped: Vec<(Utf8PathBuf, SystemTime)> = matching_files(pattern)?
        .into_iter()
        .map(|path| {
            let stamp = csvgeo_fs::file_timestamp(&path);
            match stamp {
                Ok(time) => Ok((path, time)),
                Err(source) => Err(SourceError::Io { path, source }),
            }
        })
        .collect::<Result<_, _>>()?;
    stamped.sort_by_key(|(_, time)| Reverse(*time));
    Ok(stamped.into_iter().map(|(path, _)| path).collect())
}

fn matching_files(pattern: &str) -> Result<BTreeSet<Utf8PathBuf>, SourceError> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let paths = glob::glob_with(pattern, options).map_err(|err| SourceError::Pattern {
        pattern: pattern.to_owned(),
        message: err.to_string(),
    })?;
    let mut files = BTreeSet::new();
    for entry in paths {
        let path = entry.map_err(|err| SourceError::Io {
            path: Utf8PathBuf::from(err.path().to_string_lossy().into_owned()),
            source: err.into_error(),
        })?;
        let utf8 = Utf8PathBuf::from_path_buf(path).map_err(|raw| SourceError::NonUtf8Path {
            path: raw.to_string_lossy().into_owned(),
        })?;
        if is_regular_file(&utf8)? {
            files.insert(utf8);
        }
    }
    Ok(files)
}

fn is_regular_file(path: &Utf8Path) -> Result<bool, SourceError> {
    csvgeo_fs::regular_file_exists(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::test_support::StubTransport;
    use csvgeo_core::CellValue;
    use rstest::{fixture, rstest};
    use std::fs;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::TempDir;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime should build")
            .block_on(future)
    }

    fn ids(rows: &[Row]) -> Vec<i64> {
        rows.iter()
            .filter_map(|row| row.get("id").and_then(CellValue::as_i64))
            .collect()
    }

    fn utf8(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_str().expect("utf8 path").to_owned()
    }

    #[fixture]
    fn transport() -> StubTransport {
        StubTransport::new()
            .with_csv(
                "http://example.com/a.csv",
                "id,longitude,latitude\n1,-122,37\n2,-121,36",
            )
            .with_csv("http://example.com/b.csv", "id,longitude,latitude\n3,-120,35\n")
            .with_csv("http://example.com/broken.csv", "id,longitude,latitude\n4,-120\n")
            .with_status("http://example.com/gone.csv", 404)
    }

    #[rstest]
    fn reads_rows_from_url(transport: StubTransport) {
        let rows = block_on(read_one(&transport, "http://example.com/a.csv")).expect("read");

        assert_eq!(ids(&rows), vec![1, 2]);
    }

    #[rstest]
    fn reads_rows_from_local_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = utf8(&dir, "points.CSV");
        fs::write(&path, "id,name\n9,Depot\n").expect("write csv");

        let rows = block_on(read_one(&StubTransport::new(), &path)).expect("read");

        assert_eq!(ids(&rows), vec![9]);
    }

    #[rstest]
    #[case("points.txt")]
    #[case("missing.csv")]
    #[case("ftp://example.com/points.csv")]
    fn rejects_unusable_locations(#[case] location: &str) {
        let err = block_on(read_one(&StubTransport::new(), location)).expect_err("invalid");

        assert!(matches!(err, SourceError::InvalidSource { .. }), "{err}");
    }

    #[rstest]
    fn malformed_download_is_a_parse_error(transport: StubTransport) {
        let err = block_on(read_one(&transport, "http://example.com/broken.csv")).expect_err("parse");

        assert!(
            matches!(&err, SourceError::Parse { location, .. } if location == "http://example.com/broken.csv")
        );
    }

    #[rstest]
    fn failed_download_is_a_transport_error(transport: StubTransport) {
        let err = block_on(read_one(&transport, "http://example.com/gone.csv")).expect_err("404");

        assert!(matches!(err, SourceError::Transport { .. }));
    }

    #[rstest]
    fn read_many_concatenates_in_order(transport: StubTransport) {
        let locations = vec![
            "http://example.com/b.csv".to_owned(),
            "http://example.com/a.csv".to_owned(),
        ];

        let rows = block_on(read_many(&transport, &locations)).expect("read");

        assert_eq!(ids(&rows), vec![3, 1, 2]);
    }

    #[rstest]
    fn read_many_stops_at_first_failure(transport: StubTransport) {
        let locations = vec![
            "http://example.com/a.csv".to_owned(),
            "http://example.com/broken.csv".to_owned(),
            "http://example.com/b.csv".to_owned(),
        ];

        let result = block_on(read_many(&transport, &locations));

        assert!(result.is_err());
        assert_eq!(
            transport.fetched_urls(),
            vec![
                "http://example.com/a.csv".to_owned(),
                "http://example.com/broken.csv".to_owned(),
            ]
        );
    }

    #[rstest]
    fn glob_reads_newest_file_first_and_skips_directories() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("older.csv"), "id\n1\n2\n").expect("write older");
        sleep(Duration::from_millis(50));
        fs::write(dir.path().join("newer.csv"), "id\n3\n").expect("write newer");
        fs::create_dir(dir.path().join("nested.csv")).expect("create dir");
        let pattern = utf8(&dir, "*.csv");

        let rows = block_on(read_from_glob(&pattern)).expect("read");

        assert_eq!(ids(&rows), vec![3, 1, 2]);
    }

    #[rstest]
    fn glob_wildcards_skip_hidden_files() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join(".hidden.csv"), "id\n1\n").expect("write hidden");
        fs::write(dir.path().join(".~lock.b.csv"), "id\n2\n").expect("write lock");
        fs::write(dir.path().join("a.csv"), "id\n3\n").expect("write visible");

        let rows = block_on(read_from_glob(&utf8(&dir, "*.csv"))).expect("read");

        assert_eq!(ids(&rows), vec![3]);
    }

    #[rstest]
    fn glob_reads_hidden_files_named_explicitly() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join(".hidden.csv"), "id\n1\n").expect("write hidden");

        let rows = block_on(read_from_glob(&utf8(&dir, ".*.csv"))).expect("read");

        assert_eq!(ids(&rows), vec![1]);
    }

    #[rstest]
    fn glob_without_matches_yields_no_rows() {
        let dir = TempDir::new().expect("tempdir");

        let rows = block_on(read_from_glob(&utf8(&dir, "*.csv"))).expect("read");

        assert!(rows.is_empty());
    }

    #[rstest]
    fn invalid_glob_pattern_is_reported() {
        let err = block_on(read_from_glob("data/[.csv")).expect_err("pattern");

        assert!(matches!(err, SourceError::Pattern { .. }));
    }

    #[rstest]
    fn malformed_file_in_glob_is_a_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("bad.csv"), "id,name\n1\n").expect("write csv");

        let err = block_on(read_from_glob(&utf8(&dir, "*.csv"))).expect_err("parse");

        assert!(matches!(err, SourceError::Parse { .. }));
    }
}
