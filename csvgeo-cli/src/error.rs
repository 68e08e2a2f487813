//! Error types emitted by the csvgeo CLI.
//!
//! Keep this error type reasonably small, as CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use csvgeo_data::transport::TransportBuildError;
use csvgeo_data::{ConfigError, ProviderError};
use thiserror::Error;

/// Errors emitted by the csvgeo CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The provider configuration file could not be loaded.
    #[error("failed to load provider configuration from {path:?}: {source}")]
    LoadProviderConfig {
        path: Utf8PathBuf,
        #[source]
        source: ConfigError,
    },
    /// Constructing the HTTP transport failed.
    #[error(transparent)]
    BuildTransport(#[from] TransportBuildError),
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The provider could not serve the requested source.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Serializing the feature collection failed.
    #[error("failed to serialize feature collection: {0}")]
    SerializeCollection(#[source] serde_json::Error),
    /// Writing the feature collection failed.
    #[error("failed to write feature collection: {0}")]
    WriteOutput(#[source] std::io::Error),
}
