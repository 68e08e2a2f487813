//! Get command implementation for the csvgeo CLI.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use csvgeo_core::FeatureCollection;
use csvgeo_data::transport::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpTransportConfig};
use csvgeo_data::{CsvProvider, DEFAULT_REGION_FIELD, ProviderConfig, TemplateGenerator};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_PROVIDER_CONFIG, ARG_SOURCE_ID, CliError, ENV_PROVIDER_CONFIG, ENV_SOURCE_ID,
};

/// CLI arguments for the `get` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve a configured CSV source into a GeoJSON feature \
                 collection and print it to stdout. Remote URLs are checked \
                 with a HEAD request before they are downloaded; glob paths \
                 are read newest file first.",
    about = "Print the feature collection for a configured source"
)]
#[ortho_config(prefix = "CSVGEO")]
pub(crate) struct GetArgs {
    /// Identifier of the source under `sources` in the provider configuration.
    #[arg(value_name = "source-id")]
    #[serde(default)]
    pub(crate) source_id: Option<String>,
    /// Path to the JSON document holding the `koop-provider-csv` section.
    #[arg(long = ARG_PROVIDER_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) provider_config: Option<Utf8PathBuf>,
    /// Request timeout for remote sources, in seconds.
    #[arg(long, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// User-Agent header sent with remote requests.
    #[arg(long, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// URL template expanded once per region, e.g. "https://host/{region}.csv".
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) region_template: Option<String>,
    /// Source field listing the regions to expand (defaults to "regions").
    #[arg(long, value_name = "field")]
    #[serde(default)]
    pub(crate) region_field: Option<String>,
}

impl GetArgs {
    pub(crate) fn into_config(self) -> Result<GetConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        GetConfig::try_from(merged)
    }
}

/// Resolved `get` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GetConfig {
    /// Source to serve.
    pub(crate) source_id: String,
    /// Provider configuration document.
    pub(crate) provider_config: Utf8PathBuf,
    /// HTTP settings for remote sources.
    pub(crate) http: HttpTransportConfig,
    /// Template generator, when regions should be expanded.
    pub(crate) generator: Option<TemplateGenerator>,
}

impl TryFrom<GetArgs> for GetConfig {
    type Error = CliError;

    fn try_from(args: GetArgs) -> Result<Self, Self::Error> {
        let source_id = args.source_id.ok_or(CliError::MissingArgument {
            field: ARG_SOURCE_ID,
            env: ENV_SOURCE_ID,
        })?;
        let provider_config = args.provider_config.ok_or(CliError::MissingArgument {
            field: ARG_PROVIDER_CONFIG,
            env: ENV_PROVIDER_CONFIG,
        })?;
        let http = HttpTransportConfig::default()
            .with_timeout(Duration::from_secs(
                args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))
            .with_user_agent(
                args.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            );
        let generator = args.region_template.map(|template| {
            TemplateGenerator::new(template).with_field(
                args.region_field
                    .unwrap_or_else(|| DEFAULT_REGION_FIELD.to_owned()),
            )
        });
        Ok(Self {
            source_id,
            provider_config,
            http,
            generator,
        })
    }
}

pub(super) fn run_get(args: GetArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_get_with(args, &mut stdout)
}

pub(super) fn run_get_with(args: GetArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let provider = build_provider(&config)?;
    let collection = fetch_collection(&provider, &config.source_id)?;
    write_collection(writer, &collection)
}

/// Load the provider configuration and wire up the HTTP-backed provider.
pub(super) fn build_provider(config: &GetConfig) -> Result<CsvProvider, CliError> {
    let provider_config = ProviderConfig::load(&config.provider_config).map_err(|source| {
        CliError::LoadProviderConfig {
            path: config.provider_config.clone(),
            source,
        }
    })?;
    let provider = CsvProvider::with_http_config(provider_config, config.http.clone())?;
    Ok(match &config.generator {
        Some(generator) => provider.with_generator(generator.clone()),
        None => provider,
    })
}

/// Serve `source_id` on a single-threaded runtime.
pub(super) fn fetch_collection(
    provider: &CsvProvider,
    source_id: &str,
) -> Result<FeatureCollection, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    Ok(runtime.block_on(provider.get_data(source_id))?)
}

pub(super) fn write_collection(
    writer: &mut dyn Write,
    collection: &FeatureCollection,
) -> Result<(), CliError> {
    let payload =
        serde_json::to_string_pretty(collection).map_err(CliError::SerializeCollection)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<GetConfig, CliError> {
    let merged = GetArgs::merge_from_layers(layers).map_err(CliError::from)?;
    GetConfig::try_from(merged)
}
