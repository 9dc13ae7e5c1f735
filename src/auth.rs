//! OAuth strategy construction and token verification.
//!
//! The strategy handle is built from the user-provided client id and
//! secret in the pipe configuration plus an explicitly passed host
//! base URL — nothing is read from ambient process state, so the flow
//! is testable without a live host. The actual provider handshake
//! (authorize redirect, token exchange) is driven by the host's OAuth
//! layer; this module covers the connector's side of the contract.

use crate::credentials::AuthProfile;
use crate::error::ConnectorError;
use crate::pipe::PipeConfig;
use tokio::sync::oneshot;
use tracing::debug;

/// Fixed callback path the host serves for all connectors.
pub const CALLBACK_PATH: &str = "/auth/passport/callback";

/// Handle describing how to authenticate against the data source.
///
/// Construction performs no network I/O; it only validates and
/// assembles configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthStrategy {
    /// OAuth client id from the pipe configuration.
    pub client_id: String,
    /// OAuth client secret from the pipe configuration.
    pub client_secret: String,
    /// Redirect URL: `<host base url>/auth/passport/callback`.
    pub callback_url: String,
    /// Provider-specific scope string, static per connector.
    pub scope: String,
    /// User-Agent header sent to the provider.
    pub user_agent: String,
}

impl OAuthStrategy {
    /// Builds a strategy from a pipe configuration.
    ///
    /// Fails with [`ConnectorError::AuthConfig`] when the client id or
    /// secret is missing, before any network call is made.
    pub fn build(
        pipe: &PipeConfig,
        host_base_url: &str,
        scope: &str,
        user_agent: &str,
    ) -> Result<Self, ConnectorError> {
        if pipe.client_id.trim().is_empty() {
            return Err(ConnectorError::AuthConfig(
                "client id is empty".to_string(),
            ));
        }
        if pipe.client_secret.trim().is_empty() {
            return Err(ConnectorError::AuthConfig(
                "client secret is empty".to_string(),
            ));
        }

        Ok(Self {
            client_id: pipe.client_id.clone(),
            client_secret: pipe.client_secret.clone(),
            callback_url: format!("{}{}", host_base_url.trim_end_matches('/'), CALLBACK_PATH),
            scope: scope.to_string(),
            user_agent: user_agent.to_string(),
        })
    }

    /// Verification step: extends the provider identity with the
    /// obtained tokens.
    ///
    /// Runs asynchronously relative to the caller (the token-exchange
    /// handler must not block) and resolves exactly once. The error
    /// variant is reserved for provider-side failures and is not used
    /// on the happy path.
    pub fn verify(
        &self,
        access_token: String,
        refresh_token: Option<String>,
        identity: serde_json::Value,
    ) -> oneshot::Receiver<Result<AuthProfile, ConnectorError>> {
        let (tx, rx) = oneshot::channel();
        let client_id = self.client_id.clone();

        tokio::spawn(async move {
            debug!(client_id = %client_id, "Completing OAuth verification");
            let profile = AuthProfile {
                oauth_access_token: access_token,
                oauth_refresh_token: refresh_token,
                identity,
            };
            // Host may have abandoned the handshake; ignore a closed channel.
            let _ = tx.send(Ok(profile));
        });

        rx
    }
}
