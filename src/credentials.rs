//! Credential types produced by a successful OAuth handshake.
//!
//! The bundle is attached to the pipe configuration under the `oAuth`
//! key and replaced wholesale on re-authentication, never mutated in
//! place.

use serde::{Deserialize, Serialize};

/// OAuth tokens for accessing the data source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialBundle {
    /// OAuth access token (used for API requests).
    pub access_token: String,

    /// OAuth refresh token, when the provider issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Output of the OAuth verification step.
///
/// The provider's raw identity document, extended with the tokens
/// obtained during the handshake. Handed to
/// [`Connector::auth_callback`](crate::Connector::auth_callback) once
/// the handshake completes.
#[derive(Clone, Debug)]
pub struct AuthProfile {
    /// Access token obtained from the provider.
    pub oauth_access_token: String,
    /// Refresh token, if the provider issued one.
    pub oauth_refresh_token: Option<String>,
    /// Raw provider identity (opaque to the framework).
    pub identity: serde_json::Value,
}

impl AuthProfile {
    /// Extracts the credential bundle carried by this profile.
    pub fn bundle(&self) -> CredentialBundle {
        CredentialBundle {
            access_token: self.oauth_access_token.clone(),
            refresh_token: self.oauth_refresh_token.clone(),
        }
    }
}
