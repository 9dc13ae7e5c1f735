//! Connector error taxonomy.
//!
//! Errors are grouped by where in the pipe lifecycle they surface:
//! before the OAuth handshake, during token exchange, while mutating
//! the pipe configuration, or while fetching a single data set.
//! Per-dataset fetch failures are reported through the completion
//! channel, never raised — see [`crate::outcome`].

/// Errors produced by the connector framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// Missing or invalid OAuth client id/secret — surfaced before any
    /// network call.
    AuthConfig(String),
    /// Token exchange failed on the provider side; propagated unchanged.
    AuthProvider(String),
    /// Sourcing or transforming records for one data set failed.
    DatasetFetch(String),
    /// Authentication succeeded but the returned profile is unusable.
    MalformedProfile(String),
    /// The data set catalog violates its invariants (duplicate names,
    /// more than one "all data sets" entry).
    Catalog(String),
}

impl std::fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectorError::AuthConfig(msg) => write!(f, "OAuth configuration error: {}", msg),
            ConnectorError::AuthProvider(msg) => write!(f, "OAuth provider error: {}", msg),
            ConnectorError::DatasetFetch(msg) => write!(f, "Data set fetch error: {}", msg),
            ConnectorError::MalformedProfile(msg) => write!(f, "Malformed auth profile: {}", msg),
            ConnectorError::Catalog(msg) => write!(f, "Catalog error: {}", msg),
        }
    }
}

impl std::error::Error for ConnectorError {}
