//! Datapipe - pluggable data-source connector framework.
//!
//! A connector authenticates against a remote data source via OAuth,
//! lets the user pick one or more logical data sets, and streams
//! records into a staging store, reporting per-dataset completion back
//! to the pipe runner.
//!
//! # Architecture
//!
//! ```text
//! External API (Reddit, ...)
//!          ↓
//!     OAuth (user authorizes; strategy built from pipe config)
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │     Connector (implements trait)         │
//! │  - descriptor / data set catalog         │
//! │  - auth_callback → pipe configuration    │
//! │  - fetch_records → push + complete       │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │     Pipe Runner                          │
//! │  - expand "all data sets" selection      │
//! │  - drain pushed records into staging     │
//! │  - aggregate outcomes and record counts  │
//! └─────────────────────────────────────────┘
//!          ↓
//!     Staging store
//! ```
//!
//! # Core Types
//!
//! - [`Connector`] - Trait that all connectors implement
//! - [`Descriptor`] - Connector identity and behavioral options
//! - [`Dataset`] - Selectable data set (incl. the "all data sets" entry)
//! - [`OAuthStrategy`] - OAuth handle built from pipe configuration
//! - [`PipeConfig`] - Per-pipe configuration owned by the host
//! - [`FetchOutcome`] / [`Completion`] - Per-dataset terminal outcome
//! - [`PipeRunner`] - Drives the record fetch protocol
//!
//! # Lifecycle
//!
//! 1. Host creates a [`PipeConfig`] with the user's OAuth client
//!    id/secret.
//! 2. [`Connector::build_strategy`] assembles the OAuth handle; the
//!    host runs the handshake and the strategy's verify step yields an
//!    [`AuthProfile`].
//! 3. [`Connector::auth_callback`] attaches the credential bundle and
//!    the ordered data set catalog to the pipe.
//! 4. [`PipeRunner::run`] invokes [`Connector::fetch_records`] once per
//!    selected data set and aggregates the results.

mod auth;
mod catalog;
mod connector;
mod credentials;
mod error;
mod outcome;
mod pipe;
mod run;
mod types;

pub mod connectors;
pub mod registry;

pub use auth::{OAuthStrategy, CALLBACK_PATH};
pub use catalog::{sort_datasets, validate_catalog, Dataset};
pub use connector::Connector;
pub use credentials::{AuthProfile, CredentialBundle};
pub use error::ConnectorError;
pub use outcome::{Completion, FetchOutcome, OutcomeDecodeError};
pub use pipe::PipeConfig;
pub use run::{
    DatasetRunResult, MemoryStagingStore, PipeRunSummary, PipeRunner, RecordSink, RunContext,
    RunStats, RunStep, StagingStore,
};
pub use types::{ConnectorOptions, Descriptor};
