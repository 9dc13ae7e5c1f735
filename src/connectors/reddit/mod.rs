pub mod api;
pub mod config;

use crate::catalog::Dataset;
use crate::connector::Connector;
use crate::outcome::Completion;
use crate::run::{RecordSink, RunContext};
use crate::types::{ConnectorOptions, Descriptor};
use async_trait::async_trait;
use tracing::{debug, warn};

use self::api::RedditClient;
use self::config::{SCOPE, USER_AGENT};

/// Reddit connector — loads listings from the Reddit OAuth API into
/// the staging store, one data set per listing.
pub struct RedditConnector {
    descriptor: Descriptor,
    base_url: String,
}

impl RedditConnector {
    /// Create a connector using the real Reddit API base URL.
    pub fn new() -> Self {
        Self::with_base_url(config::BASE_URL.to_string())
    }

    /// Create a connector with a custom API base URL (for testing).
    pub fn with_base_url(base_url: String) -> Self {
        let options = ConnectorOptions {
            // All staged data is removed prior to each load.
            recreate_target_db: true,
            use_custom_tables: true,
            extra: serde_json::Map::new(),
        };
        Self {
            descriptor: Descriptor::new("reddit_oauth_only", "Reddit OAuth Data Source", options),
            base_url,
        }
    }

    /// Listing path for a data set name.
    fn listing_path(name: &str) -> Option<&'static str> {
        match name {
            "posts" => Some("new"),
            "comments" => Some("comments"),
            _ => None,
        }
    }
}

impl Default for RedditConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for RedditConnector {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn scope(&self) -> &str {
        SCOPE
    }

    fn user_agent(&self) -> &str {
        USER_AGENT
    }

    fn datasets(&self) -> Vec<Dataset> {
        vec![
            Dataset::named("posts", "posts"),
            Dataset::named("comments", "comments"),
            Dataset::all("All data sets"),
        ]
    }

    async fn fetch_records(
        &self,
        dataset: &Dataset,
        sink: RecordSink,
        complete: Completion,
        ctx: RunContext,
    ) {
        let name = match &dataset.name {
            Some(name) => name.clone(),
            None => {
                complete.error("cannot fetch the 'all data sets' entry directly");
                return;
            }
        };

        debug!(dataset = %name, "Fetching data set from cloud data source");

        let access_token = match &ctx.pipe.o_auth {
            Some(bundle) => bundle.access_token.clone(),
            None => {
                complete.error(format!("pipe is not authenticated, cannot load '{}'", name));
                return;
            }
        };

        let path = match Self::listing_path(&name) {
            Some(path) => path,
            None => {
                complete.error(format!("unknown data set '{}'", name));
                return;
            }
        };

        let client = RedditClient::with_base_url(access_token, self.base_url.clone());
        match client.fetch_listing(path).await {
            Ok(children) => {
                let count = children.len();
                for child in children {
                    sink.push(child.data);
                }
                complete.success_with_info(format!("{} {} loaded", count, dataset.label_plural));
            }
            Err(e) => {
                warn!(dataset = %name, error = %e, "Data set fetch failed");
                complete.error(format!("Failed to load '{}': {}", name, e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialBundle;
    use crate::outcome::FetchOutcome;
    use crate::pipe::PipeConfig;
    use crate::run::{RunStats, RunStep};
    use mockito::Server;
    use serde_json::Value;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[test]
    fn test_connector_metadata() {
        let connector = RedditConnector::new();
        let descriptor = connector.descriptor();
        assert_eq!(descriptor.id, "reddit_oauth_only");
        assert_eq!(descriptor.display_name, "Reddit OAuth Data Source");
        assert!(descriptor.options.recreate_target_db);
        assert!(descriptor.options.use_custom_tables);
        assert_eq!(connector.scope(), "identity,read");
    }

    #[test]
    fn test_catalog_has_all_entry_first() {
        let connector = RedditConnector::new();
        let catalog = connector.list_datasets();
        assert_eq!(catalog.len(), 3);
        assert!(catalog[0].is_all());
        assert_eq!(catalog[1].name.as_deref(), Some("comments"));
        assert_eq!(catalog[2].name.as_deref(), Some("posts"));
    }

    fn authenticated_ctx() -> RunContext {
        let mut pipe = PipeConfig::new("reddit_oauth_only", "cid", "secret");
        pipe.o_auth = Some(CredentialBundle {
            access_token: "test_token".to_string(),
            refresh_token: None,
        });
        RunContext {
            pipe: Arc::new(pipe),
            step: Arc::new(RunStep::new("fetch records")),
            stats: Arc::new(RunStats::new()),
        }
    }

    fn sink_pair(
        ctx: &RunContext,
        dataset: &str,
    ) -> (RecordSink, mpsc::UnboundedReceiver<Vec<Value>>) {
        crate::run::RecordSink::test_pair(dataset, Arc::clone(&ctx.stats))
    }

    #[tokio::test]
    async fn test_fetch_records_pushes_listing_children() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/new?limit=25")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "kind": "Listing",
                    "data": {
                        "children": [
                            {"kind": "t3", "data": {"id": "abc", "title": "A post"}}
                        ]
                    }
                }"#,
            )
            .create_async()
            .await;

        let connector = RedditConnector::with_base_url(server.url());
        let ctx = authenticated_ctx();
        let (sink, mut rx) = sink_pair(&ctx, "posts");
        let (complete, outcome_rx) = Completion::channel();

        let dataset = Dataset::named("posts", "posts");
        connector.fetch_records(&dataset, sink, complete, ctx.clone()).await;

        assert_eq!(
            outcome_rx.await.unwrap(),
            FetchOutcome::SuccessWithInfo("1 posts loaded".to_string())
        );
        let batch = rx.recv().await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0]["title"], "A post");
        assert_eq!(ctx.stats.record_count("posts"), 1);
    }

    #[tokio::test]
    async fn test_fetch_records_reports_source_errors() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/new?limit=25")
            .with_status(401)
            .with_body("{}")
            .create_async()
            .await;

        let connector = RedditConnector::with_base_url(server.url());
        let ctx = authenticated_ctx();
        let (sink, _rx) = sink_pair(&ctx, "posts");
        let (complete, outcome_rx) = Completion::channel();

        let dataset = Dataset::named("posts", "posts");
        connector.fetch_records(&dataset, sink, complete, ctx.clone()).await;

        let outcome = outcome_rx.await.unwrap();
        assert!(!outcome.is_success());
        assert!(outcome.message().unwrap().contains("Failed to load 'posts'"));
        assert_eq!(ctx.stats.record_count("posts"), 0);
    }

    #[tokio::test]
    async fn test_fetch_records_requires_authentication() {
        let connector = RedditConnector::new();
        let pipe = PipeConfig::new("reddit_oauth_only", "cid", "secret");
        let ctx = RunContext {
            pipe: Arc::new(pipe),
            step: Arc::new(RunStep::new("fetch records")),
            stats: Arc::new(RunStats::new()),
        };
        let (sink, _rx) = sink_pair(&ctx, "posts");
        let (complete, outcome_rx) = Completion::channel();

        let dataset = Dataset::named("posts", "posts");
        connector.fetch_records(&dataset, sink, complete, ctx).await;

        let outcome = outcome_rx.await.unwrap();
        assert!(!outcome.is_success());
        assert!(outcome.message().unwrap().contains("not authenticated"));
    }

    #[tokio::test]
    async fn test_fetch_records_rejects_unknown_dataset() {
        let connector = RedditConnector::new();
        let ctx = authenticated_ctx();
        let (sink, _rx) = sink_pair(&ctx, "wiki");
        let (complete, outcome_rx) = Completion::channel();

        let dataset = Dataset::named("wiki", "wiki pages");
        connector.fetch_records(&dataset, sink, complete, ctx).await;

        let outcome = outcome_rx.await.unwrap();
        assert_eq!(
            outcome,
            FetchOutcome::Error("unknown data set 'wiki'".to_string())
        );
    }
}
