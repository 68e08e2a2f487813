//! Candidate enumeration and URL validation.
//!
//! A [`UrlGenerator`] turns a [`SourceConfig`] into the ordered list of
//! locations the pipeline should consider. The default,
//! [`PassThroughGenerator`], yields the configured `url` unchanged;
//! [`TemplateGenerator`] expands a list field such as `regions` into one URL
//! per entry. Generators are plain values held by the provider, so two
//! providers in one process never observe each other's choice.

use camino::Utf8PathBuf;
use csvgeo_core::SourceConfig;
use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

use crate::blocking::run_blocking;
use crate::classify::{has_csv_extension, is_reachable, is_url_shaped};
use crate::error::SourceError;
use crate::transport::CsvTransport;

/// Field read by [`TemplateGenerator`] unless configured otherwise.
pub const DEFAULT_REGION_FIELD: &str = "regions";

/// Placeholder replaced by [`TemplateGenerator`] unless configured otherwise.
pub const DEFAULT_REGION_PLACEHOLDER: &str = "{region}";

/// Failure raised by a [`UrlGenerator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GenerateError {
    /// The field the generator expands is absent from the source.
    #[error("source has no {field:?} field")]
    MissingField {
        /// Field name.
        field: String,
    },
    /// The field exists but does not hold a list of scalars.
    #[error("field {field:?} is invalid: {reason}")]
    InvalidField {
        /// Field name.
        field: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Failure reported by a caller-supplied generator.
    #[error("{message}")]
    Custom {
        /// Description supplied by the generator.
        message: String,
    },
}

/// Produces candidate locations for a source.
///
/// Closures with the signature
/// `Fn(&SourceConfig) -> Result<Vec<String>, GenerateError>` implement this
/// trait.
///
/// # Examples
///
/// ```
/// use csvgeo_core::SourceConfig;
/// use csvgeo_data::{GenerateError, UrlGenerator};
///
/// let mirrors = |source: &SourceConfig| -> Result<Vec<String>, GenerateError> {
///     let url = source.url.clone().unwrap_or_default();
///     Ok(vec![url.clone(), url.replace("://", "://mirror.")])
/// };
/// let source = SourceConfig::from_url("https://example.com/a.csv");
/// assert_eq!(mirrors.generate(&source)?.len(), 2);
/// # Ok::<(), GenerateError>(())
/// ```
pub trait UrlGenerator: Send + Sync {
    /// Candidate locations for `source`, in the order they should be read.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when the source lacks the inputs the
    /// generator needs.
    fn generate(&self, source: &SourceConfig) -> Result<Vec<String>, GenerateError>;
}

impl<F> UrlGenerator for F
where
    F: Fn(&SourceConfig) -> Result<Vec<String>, GenerateError> + Send + Sync,
{
    fn generate(&self, source: &SourceConfig) -> Result<Vec<String>, GenerateError> {
        self(source)
    }
}

/// Yields the configured `url` verbatim, or nothing when it is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassThroughGenerator;

impl UrlGenerator for PassThroughGenerator {
    fn generate(&self, source: &SourceConfig) -> Result<Vec<String>, GenerateError> {
        Ok(source.url.iter().cloned().collect())
    }
}

/// Expands a URL template once per entry of a list field.
///
/// With the defaults, a source carrying `"regions": ["north", "south"]` and
/// the template `https://example.com/data/{region}` yields
/// `https://example.com/data/north` then `https://example.com/data/south`.
/// Numeric entries are rendered with their JSON text.
///
/// # Examples
///
/// ```
/// use csvgeo_core::SourceConfig;
/// use csvgeo_data::{TemplateGenerator, UrlGenerator};
/// use serde_json::json;
///
/// let mut source = SourceConfig::default();
/// source.extra.insert("regions".to_owned(), json!(["Region1", "Region2"]));
/// let generator = TemplateGenerator::new("https://example.com/data/{region}");
/// assert_eq!(
///     generator.generate(&source)?,
///     vec![
///         "https://example.com/data/Region1".to_owned(),
///         "https://example.com/data/Region2".to_owned(),
///     ]
/// );
/// # Ok::<(), csvgeo_data::GenerateError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateGenerator {
    template: String,
    field: String,
    placeholder: String,
}

impl TemplateGenerator {
    /// Expand `template` over the `regions` field, replacing `{region}`.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            field: DEFAULT_REGION_FIELD.to_owned(),
            placeholder: DEFAULT_REGION_PLACEHOLDER.to_owned(),
        }
    }

    /// Read entries from `field` instead of `regions`.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Replace `placeholder` instead of `{region}`.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// The URL template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The list field being expanded.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    fn entry_text(&self, entry: &Value) -> Result<String, GenerateError> {
        match entry {
            Value::String(text) => Ok(text.clone()),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(GenerateError::InvalidField {
                field: self.field.clone(),
                reason: format!("entries must be strings or numbers, found {other}"),
            }),
        }
    }
}

impl UrlGenerator for TemplateGenerator {
    fn generate(&self, source: &SourceConfig) -> Result<Vec<String>, GenerateError> {
        let value = source
            .extra_field(&self.field)
            .ok_or_else(|| GenerateError::MissingField {
                field: self.field.clone(),
            })?;
        let Value::Array(entries) = value else {
            return Err(GenerateError::InvalidField {
                field: self.field.clone(),
                reason: "expected a list".to_owned(),
            });
        };
        entries
            .iter()
            .map(|entry| {
                self.entry_text(entry)
                    .map(|text| self.template.replace(&self.placeholder, &text))
            })
            .collect()
    }
}

/// Apply `generator` to `source`.
///
/// # Errors
///
/// Returns [`SourceError::Generate`] when the generator fails.
pub fn enumerate_candidates<G>(generator: &G, source: &SourceConfig) -> Result<Vec<String>, SourceError>
where
    G: UrlGenerator + ?Sized,
{
    let candidates = generator.generate(source)?;
    debug!("generated {} candidate location(s)", candidates.len());
    Ok(candidates)
}

/// Keep the candidates that are URL-shaped and currently reachable.
///
/// Candidates are probed one at a time and input order is preserved.
/// Unreachable URLs are dropped, not reported as errors.
pub async fn filter_valid_urls<T>(transport: &T, candidates: &[String]) -> Vec<String>
where
    T: CsvTransport + ?Sized,
{
    let mut valid = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if is_url_shaped(candidate) && is_reachable(transport, candidate).await {
            valid.push(candidate.clone());
        }
    }
    valid
}

/// Keep the candidates that can be read: reachable URLs, and paths with a
/// `.csv` extension naming an existing regular file.
///
/// Input order is preserved. Anything else is dropped with a warning,
/// including paths the filesystem refuses to inspect.
pub async fn resolve_url_candidates<T>(transport: &T, candidates: &[String]) -> Vec<String>
where
    T: CsvTransport + ?Sized,
{
    let mut resolved = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let usable = if is_url_shaped(candidate) {
            is_reachable(transport, candidate).await
        } else if has_csv_extension(candidate) {
            local_csv_exists(candidate).await.unwrap_or_else(|err| {
                warn!("cannot inspect {candidate:?}: {err}");
                false
            })
        } else {
            false
        };
        if usable {
            resolved.push(candidate.clone());
        } else {
            warn!("ignoring unusable CSV location {candidate:?}");
        }
    }
    resolved
}

pub(crate) async fn local_csv_exists(candidate: &str) -> Result<bool, SourceError> {
    let path = Utf8PathBuf::from(candidate);
    run_blocking(move || {
        csvgeo_fs::regular_file_exists(&path).map_err(|source| SourceError::Io { path, source })
    })
    .await
}
