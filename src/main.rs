use anyhow::{Context, Result};
use datapipe::connectors::reddit::config::RedditAppConfig;
use datapipe::registry::get_all_connectors;
use datapipe::{Dataset, MemoryStagingStore, PipeConfig, PipeRunner, StagingStore};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "datapipe=info".into()),
        )
        .init();

    info!("Datapipe connector host starting...");

    let host_base_url =
        std::env::var("DATAPIPE_HOST_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

    for connector in get_all_connectors() {
        let descriptor = connector.descriptor();
        let catalog = connector.list_datasets();
        info!(
            connector = %descriptor.id,
            display_name = %descriptor.display_name,
            datasets = catalog.len(),
            "Connector available"
        );
    }

    // Demo run against the Reddit connector when an access token is
    // provided; otherwise just report and exit.
    let access_token = match std::env::var("DATAPIPE_REDDIT_ACCESS_TOKEN") {
        Ok(token) => token,
        Err(_) => {
            info!("Set DATAPIPE_REDDIT_ACCESS_TOKEN to run a live fetch");
            return Ok(());
        }
    };

    let app = RedditAppConfig::from_env()
        .context("Reddit OAuth app configuration is required for a live fetch")?;

    let connector = datapipe::registry::find_connector("reddit_oauth_only")
        .context("Reddit connector not registered")?;

    let mut pipe = PipeConfig::new("reddit_oauth_only", app.client_id, app.client_secret);
    let strategy = connector.build_strategy(&pipe, &host_base_url)?;
    info!(callback_url = %strategy.callback_url, "OAuth strategy built");

    // The handshake itself is driven by the host's OAuth layer; here
    // the token comes from the environment, so only the verification
    // step runs.
    let profile = strategy
        .verify(access_token, None, serde_json::json!({}))
        .await
        .context("Verification task dropped")?
        .context("Verification failed")?;
    connector.auth_callback(&profile, &mut pipe)?;
    pipe.selected_table = Some(Dataset::all("All data sets"));

    let store = Arc::new(MemoryStagingStore::new());
    let runner = PipeRunner::new(connector, pipe, Arc::clone(&store) as Arc<dyn StagingStore>);
    let summary = runner.run().await?;

    for result in &summary.results {
        let name = result.dataset.name.as_deref().unwrap_or("<all>");
        match result.outcome.message() {
            Some(message) if result.outcome.is_success() => {
                info!(dataset = %name, records = result.records, message = %message, "Data set loaded");
            }
            Some(message) => {
                warn!(dataset = %name, records = result.records, message = %message, "Data set failed");
            }
            None => {
                info!(dataset = %name, records = result.records, "Data set loaded");
            }
        }
    }

    info!(
        run_id = %summary.run_id,
        total_records = summary.total_records(),
        succeeded = summary.succeeded(),
        "Run complete"
    );

    Ok(())
}
