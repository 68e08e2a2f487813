//! Error types produced by the ingestion pipeline.
//!
//! [`SourceError`] carries the full detail of anything that went wrong while
//! enumerating, fetching, or parsing CSV inputs. It is logged, never shown to
//! the caller: [`ProviderError`] is the caller-facing type and only the
//! configuration mistakes an operator must fix keep a specific message.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::generate::GenerateError;
use crate::parse::CsvParseError;
use crate::transport::TransportError;

/// Detailed failure while reading a source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// A location is neither a URL nor an existing CSV file.
    #[error("invalid CSV source {location:?}: not a URL or a CSV file path")]
    InvalidSource {
        /// The rejected location.
        location: String,
    },
    /// The CSV content was structurally malformed.
    #[error("failed to parse CSV from {location}: {source}")]
    Parse {
        /// URL or path the content came from.
        location: String,
        /// First parse error reported.
        #[source]
        source: CsvParseError,
    },
    /// Fetching a remote CSV failed.
    #[error("failed to fetch CSV: {source}")]
    Transport {
        /// Underlying transport failure.
        #[from]
        source: TransportError,
    },
    /// Reading or inspecting a local file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path being read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A glob match was not valid UTF-8.
    #[error("glob match {path:?} is not valid UTF-8")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },
    /// The configured path is not a valid glob pattern.
    #[error("invalid glob pattern {pattern:?}: {message}")]
    Pattern {
        /// Pattern as configured.
        pattern: String,
        /// Parser message.
        message: String,
    },
    /// The URL generator rejected the source configuration.
    #[error("failed to generate candidate URLs: {source}")]
    Generate {
        /// Generator failure.
        #[from]
        source: GenerateError,
    },
    /// A blocking filesystem task could not complete.
    #[error("blocking filesystem task failed: {message}")]
    Worker {
        /// Join failure description.
        message: String,
    },
}

/// Display text of [`ProviderError::Unreadable`].
pub const UNREADABLE_MESSAGE: &str = "Unable to read CSV data";

/// Caller-facing failure of [`CsvProvider::get_data`](crate::CsvProvider::get_data).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// No source is configured under the requested identifier.
    #[error("no CSV source is configured with id {id:?}")]
    UnknownSource {
        /// Requested identifier.
        id: String,
    },
    /// Neither a usable `url` nor a `path` was resolved.
    #[error(
        "No CSV source specified. Either \"url\" or \"path\" must be specified at the source configuration."
    )]
    MissingSource,
    /// Both a usable `url` and a `path` were resolved.
    #[error(
        "Invalid CSV source. Only one of \"url\" or \"path\" may be specified at the source configuration."
    )]
    AmbiguousSource,
    /// Reading the data failed; details are logged, not returned.
    #[error("Unable to read CSV data")]
    Unreadable,
}
