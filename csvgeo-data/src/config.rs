//! Provider configuration documents.
//!
//! Settings live under the `koop-provider-csv` key of a larger JSON document
//! so they can share a file with other services:
//!
//! ```json
//! {
//!   "koop-provider-csv": {
//!     "name": "csv",
//!     "sources": {
//!       "points": { "url": "https://example.com/points.csv" }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::io::{self, BufReader, Read};

use camino::{Utf8Path, Utf8PathBuf};
use csvgeo_core::SourceConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Key under which the provider settings are stored.
pub const PROVIDER_NAMESPACE: &str = "koop-provider-csv";

/// Errors raised while loading a [`ProviderConfig`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be opened.
    #[error("failed to open configuration {path}: {source}")]
    Open {
        /// Path that was opened.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The document is not valid JSON or has the wrong shape.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Deserialisation error.
        #[from]
        source: serde_json::Error,
    },
    /// The document has no provider section.
    #[error("configuration has no {namespace:?} section")]
    MissingNamespace {
        /// Expected key.
        namespace: String,
    },
}

/// Named sources served by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name reported to hosts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Source configurations keyed by identifier.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,
}

impl ProviderConfig {
    /// Build a configuration from sources keyed by identifier.
    #[must_use]
    pub fn from_sources<I, K>(sources: I) -> Self
    where
        I: IntoIterator<Item = (K, SourceConfig)>,
        K: Into<String>,
    {
        Self {
            name: None,
            sources: sources.into_iter().map(|(id, source)| (id.into(), source)).collect(),
        }
    }

    /// Extract the provider section from a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingNamespace`] when the section is absent
    /// and [`ConfigError::Parse`] when it has the wrong shape.
    pub fn from_document(mut document: Value) -> Result<Self, ConfigError> {
        let section = document
            .as_object_mut()
            .and_then(|root| root.remove(PROVIDER_NAMESPACE))
            .ok_or_else(|| ConfigError::MissingNamespace {
                namespace: PROVIDER_NAMESPACE.to_owned(),
            })?;
        Ok(serde_json::from_value(section)?)
    }

    /// Parse a JSON document from `reader`.
    ///
    /// # Errors
    ///
    /// See [`ProviderConfig::from_document`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    /// Load the JSON document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Open`] when the file cannot be opened, otherwise
    /// see [`ProviderConfig::from_document`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let file = csvgeo_fs::open_utf8_file(path).map_err(|source| ConfigError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Look up a source by identifier.
    #[must_use]
    pub fn source(&self, id: &str) -> Option<&SourceConfig> {
        self.sources.get(id)
    }
}
