use crate::auth::OAuthStrategy;
use crate::catalog::{sort_datasets, Dataset};
use crate::credentials::AuthProfile;
use crate::error::ConnectorError;
use crate::outcome::Completion;
use crate::pipe::PipeConfig;
use crate::run::{RecordSink, RunContext};
use crate::types::Descriptor;
use async_trait::async_trait;

/// Data-source connector interface.
///
/// Connectors are stateless; everything per-pipe lives in the pipe
/// configuration the host owns. The host holds `Arc<dyn Connector>`
/// and drives the lifecycle:
///
/// 1. `build_strategy` assembles the OAuth handle from the pipe's
///    client id/secret.
/// 2. The host runs the provider handshake; the strategy's verify step
///    produces an [`AuthProfile`].
/// 3. `auth_callback` converts the profile into durable pipe
///    configuration (credential bundle + data set catalog).
/// 4. The host invokes `fetch_records` once per selected data set —
///    once per *named* data set when "all data sets" was chosen.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Static identity and behavioral options.
    fn descriptor(&self) -> &Descriptor;

    /// Provider-specific OAuth scope string, static per connector.
    fn scope(&self) -> &str;

    /// User-Agent header to present to the data source.
    fn user_agent(&self) -> &str {
        concat!("datapipe/", env!("CARGO_PKG_VERSION"))
    }

    /// The data sets this connector can load, in definition order.
    /// Sorting is applied by [`list_datasets`](Connector::list_datasets).
    fn datasets(&self) -> Vec<Dataset>;

    /// Ordered data set catalog shown to the user.
    ///
    /// Pure and callable before authentication completes. The "all
    /// data sets" pseudo-entry, when present, sorts first; named
    /// entries follow in lexicographic name order.
    fn list_datasets(&self) -> Vec<Dataset> {
        let mut datasets = self.datasets();
        sort_datasets(&mut datasets);
        datasets
    }

    /// Builds the OAuth strategy handle for this pipe.
    ///
    /// No network I/O; fails with [`ConnectorError::AuthConfig`] on a
    /// missing client id or secret.
    fn build_strategy(
        &self,
        pipe: &PipeConfig,
        host_base_url: &str,
    ) -> Result<OAuthStrategy, ConnectorError> {
        OAuthStrategy::build(pipe, host_base_url, self.scope(), self.user_agent())
    }

    /// Consumes the verification profile and updates the pipe
    /// configuration: attaches the credential bundle under `oAuth`
    /// (replacing any previous bundle wholesale) and the ordered
    /// catalog under `tables`.
    ///
    /// Errors travel on the `Result` channel so the host can surface
    /// them without unwinding; a profile without an access token is
    /// rejected as [`ConnectorError::MalformedProfile`].
    fn auth_callback(
        &self,
        profile: &AuthProfile,
        pipe: &mut PipeConfig,
    ) -> Result<(), ConnectorError> {
        if profile.oauth_access_token.is_empty() {
            return Err(ConnectorError::MalformedProfile(
                "profile has no access token".to_string(),
            ));
        }

        pipe.o_auth = Some(profile.bundle());
        pipe.tables = self.list_datasets();
        Ok(())
    }

    /// Fetches one data set and pushes its records through `sink`.
    ///
    /// `dataset` is always a concrete (named) catalog entry; the host
    /// expands the "all data sets" selection before calling. The
    /// connector may push any number of records or batches, then must
    /// report exactly one outcome through `complete` — including on
    /// failure, which is the host's only per-dataset error channel.
    /// Records pushed before a failure stand.
    async fn fetch_records(
        &self,
        dataset: &Dataset,
        sink: RecordSink,
        complete: Completion,
        ctx: RunContext,
    );
}
