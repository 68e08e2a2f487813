//! Classifying candidate locations as network URLs or local CSV files.

use camino::Utf8Path;
use log::warn;
use url::Url;

use crate::transport::CsvTransport;

const CSV_EXTENSION: &str = "csv";

/// Whether `candidate` is an absolute `http`/`https` URL with a host.
///
/// This is a syntactic check; no request is made. Filesystem paths, including
/// Windows drive paths such as `C:\data\points.csv`, are rejected.
///
/// # Examples
///
/// ```
/// use csvgeo_data::is_url_shaped;
///
/// assert!(is_url_shaped("https://example.com/points.csv"));
/// assert!(!is_url_shaped("./fixtures/points.csv"));
/// assert!(!is_url_shaped("C:\\data\\points.csv"));
/// ```
#[must_use]
pub fn is_url_shaped(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
        return false;
    }
    Url::parse(candidate).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|host| !host.is_empty())
    })
}

/// Whether `url` currently answers a HEAD request with a success status.
///
/// Never fails: transport errors, timeouts and non-success statuses are
/// logged and reported as `false`.
pub async fn is_reachable<T>(transport: &T, url: &str) -> bool
where
    T: CsvTransport + ?Sized,
{
    match transport.probe(url).await {
        Ok(()) => true,
        Err(err) => {
            warn!("URL check failed for {url}: {err}");
            false
        }
    }
}

/// Whether `candidate` ends in `.csv`, ignoring case.
///
/// # Examples
///
/// ```
/// use csvgeo_data::has_csv_extension;
///
/// assert!(has_csv_extension("fixtures/points.CSV"));
/// assert!(!has_csv_extension("fixtures/points.tsv"));
/// ```
#[must_use]
pub fn has_csv_extension(candidate: &str) -> bool {
    Utf8Path::new(candidate)
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case(CSV_EXTENSION))
}
