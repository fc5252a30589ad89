//! Wiring of configuration, platform client and ingestion workflow.

use std::path::Path;
use std::sync::Arc;

use scanbridge_core::{ActivityPoller, IngestionWorkflow, PollPolicy, UploadOrchestrator};
use scanbridge_domain::{Config, GraphSearchQuery, IngestionReport, Result, ScanBridgeError};
use scanbridge_infra::{config, GraphQlClient, HttpClient, PresignedUploader};
use tracing::{debug, info, warn};

use crate::cli::Cli;

/// Page size of the resource lookup.
const RESOURCE_SEARCH_PAGE_SIZE: u32 = 50;

/// Load, merge and validate the configuration; save it when asked to.
///
/// # Errors
/// Returns [`ScanBridgeError::Config`] if nothing can be loaded and no flag
/// was given, if validation fails, or if saving fails.
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match config::load(Some(cli.config.clone())) {
        Ok(config) => config,
        Err(err) if cli.has_overrides() => {
            debug!(error = %err, "no stored configuration, using command-line flags");
            Config::default()
        }
        Err(err) => return Err(err.into()),
    };

    cli.apply(&mut config);
    config.validate()?;

    if cli.save {
        config::save_to_file(&config, &cli.config)?;
        info!(path = %cli.config.display(), "configuration saved");
    }

    Ok(config)
}

/// Authenticate, optionally verify the scanned host, then upload and poll.
pub async fn run(cli: &Cli) -> Result<IngestionReport> {
    let config = resolve_config(cli)?;

    let mut client = GraphQlClient::new(&config)?;
    client.authenticate(&config.credentials()).await?;

    if cli.verify_resource {
        verify_resource(&client, &config).await?;
    }

    let client = Arc::new(client);
    let uploader = Arc::new(PresignedUploader::new(HttpClient::from_settings(&config.retry)?));
    let workflow = IngestionWorkflow::new(
        UploadOrchestrator::new(client.clone(), uploader),
        ActivityPoller::new(client, PollPolicy::from(config.poll)),
    );

    workflow.run(Path::new(&config.upload_file)).await
}

/// Require exactly one resource-graph match for the configured host.
async fn verify_resource(client: &GraphQlClient, config: &Config) -> Result<()> {
    if !config.has_resource_filter() {
        return Err(ScanBridgeError::Precondition(
            "resource verification needs scanCloudType and scanProviderId".into(),
        ));
    }

    let query = GraphSearchQuery {
        cloud_platform: config.scan_cloud_type.clone(),
        external_id: config.scan_provider_id.clone(),
        first: RESOURCE_SEARCH_PAGE_SIZE,
    };
    let result = client.graph_search(&query).await?;
    info!(total_count = result.total_count, "resource lookup completed");

    if result.total_count != 1 {
        warn!(total_count = result.total_count, "scanned host is not uniquely identified");
        return Err(ScanBridgeError::Precondition(format!(
            "expected exactly one matching resource, found {}",
            result.total_count
        )));
    }

    Ok(())
}
