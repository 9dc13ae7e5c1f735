//! Pipe run harness: drives the record fetch protocol.
//!
//! One pipe run executes `fetch_records` for every selected data set.
//! When the "all data sets" pseudo-entry was selected, each named data
//! set gets its own concurrent invocation — the pseudo-entry itself is
//! never fetched. Each invocation is independent: a failure in one
//! data set never aborts its siblings.
//!
//! Record counting happens here, not in connectors: the sink
//! increments the run statistics on every push, so concurrent fetches
//! cannot corrupt each other's counts.

use crate::catalog::{validate_catalog, Dataset};
use crate::connector::Connector;
use crate::error::ConnectorError;
use crate::outcome::{Completion, FetchOutcome};
use crate::pipe::PipeConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Append-only record counters for one pipe run.
///
/// Owned by the host; connectors may read counts through
/// [`RunContext`] but only the sink increments them.
#[derive(Debug, Default)]
pub struct RunStats {
    records: DashMap<String, u64>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records staged so far for one data set.
    pub fn record_count(&self, dataset_name: &str) -> u64 {
        self.records.get(dataset_name).map(|c| *c).unwrap_or(0)
    }

    /// Records staged so far across all data sets.
    pub fn total_records(&self) -> u64 {
        self.records.iter().map(|entry| *entry.value()).sum()
    }

    fn add_records(&self, dataset_name: &str, count: u64) {
        *self.records.entry(dataset_name.to_string()).or_insert(0) += count;
    }
}

/// The current step of a pipe run, read-only to connectors.
#[derive(Clone, Debug)]
pub struct RunStep {
    pub label: String,
    pub started_at: DateTime<Utc>,
}

impl RunStep {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started_at: Utc::now(),
        }
    }
}

/// Shared run state handed to `fetch_records`.
///
/// Diagnostic logging goes through `tracing`; run state is reachable
/// only through these accessors.
#[derive(Clone)]
pub struct RunContext {
    /// The pipe being run (read-only during a run).
    pub pipe: Arc<PipeConfig>,
    /// The current run step.
    pub step: Arc<RunStep>,
    /// Run statistics, accumulate-only from the connector's side.
    pub stats: Arc<RunStats>,
}

/// Push handle for staging records from one data set.
///
/// May be called any number of times with a single record or a batch.
/// The sink counts records into the run statistics; connectors do not
/// track a running count themselves.
#[derive(Clone)]
pub struct RecordSink {
    dataset_name: String,
    tx: mpsc::UnboundedSender<Vec<Value>>,
    stats: Arc<RunStats>,
}

impl RecordSink {
    fn new(
        dataset_name: String,
        tx: mpsc::UnboundedSender<Vec<Value>>,
        stats: Arc<RunStats>,
    ) -> Self {
        Self {
            dataset_name,
            tx,
            stats,
        }
    }

    /// Builds a free-standing sink plus its receiving end, for tests
    /// that drive `fetch_records` without a full runner.
    #[cfg(test)]
    pub(crate) fn test_pair(
        dataset_name: &str,
        stats: Arc<RunStats>,
    ) -> (Self, mpsc::UnboundedReceiver<Vec<Value>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(dataset_name.to_string(), tx, stats), rx)
    }

    /// Pushes a single record.
    pub fn push(&self, record: Value) {
        self.push_batch(vec![record]);
    }

    /// Pushes an ordered batch of records.
    pub fn push_batch(&self, records: Vec<Value>) {
        if records.is_empty() {
            return;
        }
        self.stats
            .add_records(&self.dataset_name, records.len() as u64);
        // A closed channel means the host stopped draining (run
        // cancelled); records are discarded, which is the defined
        // cancellation behavior.
        let _ = self.tx.send(records);
    }
}

/// Destination for staged records.
///
/// One logical collection per data set; collections are named by the
/// connector's table prefix. The physical engine behind this trait is
/// the host's concern.
#[async_trait]
pub trait StagingStore: Send + Sync {
    /// Appends records to a collection, creating it if needed.
    async fn write(&self, collection: &str, records: Vec<Value>) -> Result<()>;

    /// Removes every collection whose name starts with `prefix`.
    async fn truncate(&self, prefix: &str) -> Result<()>;
}

/// In-memory staging store for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStagingStore {
    collections: DashMap<String, Vec<Value>>,
}

impl MemoryStagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of one collection's records.
    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.collections
            .get(collection)
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Returns all collection names.
    pub fn collection_names(&self) -> Vec<String> {
        self.collections
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }
}

#[async_trait]
impl StagingStore for MemoryStagingStore {
    async fn write(&self, collection: &str, mut records: Vec<Value>) -> Result<()> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .append(&mut records);
        Ok(())
    }

    async fn truncate(&self, prefix: &str) -> Result<()> {
        self.collections.retain(|name, _| !name.starts_with(prefix));
        Ok(())
    }
}

/// Result of fetching one data set.
#[derive(Debug)]
pub struct DatasetRunResult {
    pub dataset: Dataset,
    /// Records counted across all pushes for this data set.
    pub records: u64,
    pub outcome: FetchOutcome,
}

/// Aggregated result of one pipe run.
#[derive(Debug)]
pub struct PipeRunSummary {
    pub run_id: Uuid,
    pub results: Vec<DatasetRunResult>,
}

impl PipeRunSummary {
    /// True when every data set completed without an error outcome.
    pub fn succeeded(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_success())
    }

    /// Records staged across all data sets.
    pub fn total_records(&self) -> u64 {
        self.results.iter().map(|r| r.records).sum()
    }
}

/// Executes pipe runs for one connector instance.
pub struct PipeRunner {
    connector: Arc<dyn Connector>,
    pipe: Arc<PipeConfig>,
    store: Arc<dyn StagingStore>,
}

impl PipeRunner {
    pub fn new(
        connector: Arc<dyn Connector>,
        pipe: PipeConfig,
        store: Arc<dyn StagingStore>,
    ) -> Self {
        Self {
            connector,
            pipe: Arc::new(pipe),
            store,
        }
    }

    /// Runs the record fetch protocol across the selected data sets
    /// and aggregates per-dataset outcomes and record counts.
    pub async fn run(&self) -> Result<PipeRunSummary> {
        let run_id = Uuid::new_v4();
        let descriptor = self.connector.descriptor();
        let datasets = self.selected_datasets()?;

        info!(
            run_id = %run_id,
            connector = %descriptor.id,
            dataset_count = datasets.len(),
            "Starting pipe run"
        );

        if descriptor.options.recreate_target_db {
            self.store
                .truncate(descriptor.table_prefix())
                .await
                .context("Failed to recreate staging storage")?;
            debug!(
                run_id = %run_id,
                prefix = %descriptor.table_prefix(),
                "Recreated staging storage"
            );
        }

        let stats = Arc::new(RunStats::new());
        let step = Arc::new(RunStep::new("fetch records"));

        let mut dataset_futures = Vec::with_capacity(datasets.len());
        for dataset in datasets {
            dataset_futures.push(self.run_dataset(
                run_id,
                dataset,
                Arc::clone(&stats),
                Arc::clone(&step),
            ));
        }

        let results = futures::future::join_all(dataset_futures).await;

        let summary = PipeRunSummary { run_id, results };
        info!(
            run_id = %run_id,
            connector = %descriptor.id,
            total_records = summary.total_records(),
            succeeded = summary.succeeded(),
            "Pipe run finished"
        );

        Ok(summary)
    }

    /// Expands the user's selection into concrete data sets.
    ///
    /// `None` or the "all data sets" pseudo-entry selects every named
    /// entry of the catalog; the pseudo-entry itself is never fetched.
    fn selected_datasets(&self) -> Result<Vec<Dataset>, ConnectorError> {
        let catalog = self.connector.list_datasets();
        validate_catalog(&catalog)?;

        match &self.pipe.selected_table {
            Some(selected) if !selected.is_all() => Ok(vec![selected.clone()]),
            _ => Ok(catalog.into_iter().filter(|d| !d.is_all()).collect()),
        }
    }

    fn collection_name(&self, dataset: &Dataset) -> String {
        let descriptor = self.connector.descriptor();
        let prefix = descriptor.table_prefix();
        match (&descriptor.options.use_custom_tables, &dataset.name) {
            (true, Some(name)) => format!("{}_{}", prefix, name),
            _ => prefix.to_string(),
        }
    }

    /// Fetches one data set: wires up the sink and completion channel,
    /// drains pushed batches into the staging store, and converts the
    /// completion signal into a [`DatasetRunResult`].
    async fn run_dataset(
        &self,
        run_id: Uuid,
        dataset: Dataset,
        stats: Arc<RunStats>,
        step: Arc<RunStep>,
    ) -> DatasetRunResult {
        let dataset_name = dataset.name.clone().unwrap_or_default();
        let collection = self.collection_name(&dataset);

        let (record_tx, mut record_rx) = mpsc::unbounded_channel::<Vec<Value>>();
        let (complete, outcome_rx) = Completion::channel();
        let sink = RecordSink::new(dataset_name.clone(), record_tx, Arc::clone(&stats));
        let ctx = RunContext {
            pipe: Arc::clone(&self.pipe),
            step,
            stats: Arc::clone(&stats),
        };

        // Drain pushed batches into staging as they arrive. Ends when
        // the last sink clone is dropped.
        let store = Arc::clone(&self.store);
        let drain_collection = collection.clone();
        let drain = tokio::spawn(async move {
            while let Some(batch) = record_rx.recv().await {
                if let Err(e) = store.write(&drain_collection, batch).await {
                    warn!(collection = %drain_collection, error = %e, "Failed to stage records");
                }
            }
        });

        let connector = Arc::clone(&self.connector);
        let fetch_dataset = dataset.clone();
        let fetch = tokio::spawn(async move {
            connector
                .fetch_records(&fetch_dataset, sink, complete, ctx)
                .await;
        });

        let outcome = match outcome_rx.await {
            Ok(outcome) => outcome,
            // Completion dropped without reporting — a connector bug or
            // panic. The host still needs a per-dataset outcome.
            Err(_) => FetchOutcome::Error(format!(
                "data set '{}' ended without reporting an outcome",
                dataset_name
            )),
        };

        if let Err(e) = fetch.await {
            warn!(
                run_id = %run_id,
                dataset = %dataset_name,
                error = %e,
                "Fetch task did not complete cleanly"
            );
        }
        let _ = drain.await;

        debug!(
            run_id = %run_id,
            dataset = %dataset_name,
            records = stats.record_count(&dataset_name),
            success = outcome.is_success(),
            "Data set processed"
        );

        DatasetRunResult {
            records: stats.record_count(&dataset_name),
            dataset,
            outcome,
        }
    }
}
