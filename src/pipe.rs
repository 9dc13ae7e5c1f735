//! Pipe configuration: one connector bound to one data source account.
//!
//! Created by the host before authentication, mutated exactly once per
//! successful authentication cycle by
//! [`Connector::auth_callback`](crate::Connector::auth_callback), and
//! persisted by the host afterward. The connector never persists it.

use crate::catalog::Dataset;
use crate::credentials::CredentialBundle;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Configuration for a single pipe.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeConfig {
    /// Pipe id, assigned at creation.
    pub id: Uuid,

    /// Id of the connector this pipe is bound to.
    pub connector_id: String,

    /// OAuth client id, provided by the user.
    pub client_id: String,

    /// OAuth client secret, provided by the user.
    pub client_secret: String,

    /// Credential bundle attached after a successful handshake.
    /// Replaced wholesale on re-authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o_auth: Option<CredentialBundle>,

    /// Ordered data set catalog, attached alongside the credentials.
    #[serde(default)]
    pub tables: Vec<Dataset>,

    /// The data set the user selected for pipe runs. `None` (or the
    /// "all data sets" pseudo-entry) means every named data set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_table: Option<Dataset>,
}

impl PipeConfig {
    /// Creates a fresh, unauthenticated pipe configuration.
    pub fn new(
        connector_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            connector_id: connector_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            o_auth: None,
            tables: Vec::new(),
            selected_table: None,
        }
    }
}
