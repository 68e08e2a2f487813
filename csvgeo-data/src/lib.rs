//! Source resolution and CSV ingestion for csvgeo.
//!
//! Responsibilities:
//! - Enumerate candidate locations for a source and validate them.
//! - Fetch remote CSV over HTTP and read local files or glob matches.
//! - Parse CSV with per-cell type inference and hand rows to translation.
//!
//! Boundaries:
//! - Do not encode the row-to-feature mapping (lives in `csvgeo-core`).
//! - Keep blocking I/O off async executors; filesystem work runs on the
//!   blocking pool.
//!
//! Invariants:
//! - Rows are concatenated in candidate order, or newest file first for globs.
//! - Internal failures are logged in full and surfaced as a generic error.
//! - No global mutable state.

#![forbid(unsafe_code)]

mod blocking;
mod classify;
mod config;
mod error;
mod generate;
mod parse;
mod pipeline;
mod reader;
pub mod transport;

pub use classify::{has_csv_extension, is_reachable, is_url_shaped};
pub use config::{ConfigError, PROVIDER_NAMESPACE, ProviderConfig};
pub use error::{ProviderError, SourceError, UNREADABLE_MESSAGE};
pub use generate::{
    DEFAULT_REGION_FIELD, DEFAULT_REGION_PLACEHOLDER, GenerateError, PassThroughGenerator,
    TemplateGenerator, UrlGenerator, enumerate_candidates, filter_valid_urls,
    resolve_url_candidates,
};
pub use parse::{CsvParseError, parse_csv};
pub use pipeline::{CsvProvider, SourceSelection};
pub use reader::{read_from_glob, read_many, read_one};
