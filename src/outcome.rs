//! Terminal outcome of a single data set fetch.
//!
//! The host observes exactly one outcome per `fetch_records`
//! invocation, delivered through a [`Completion`] handle. The legacy
//! wire contract accepted four shapes — nothing, `{infoStatus}`,
//! `{errorStatus}`, or a bare string — and [`FetchOutcome::decode`]
//! keeps accepting all four at the boundary.

use tokio::sync::oneshot;

/// Outcome of fetching one data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Completed successfully; no message shown to the user.
    Success,
    /// Completed successfully; the message is shown to the user in the
    /// monitoring view.
    SuccessWithInfo(String),
    /// Fatal failure for this data set; the message is shown to the
    /// user in the monitoring view.
    Error(String),
}

impl FetchOutcome {
    /// Returns true for `Success` and `SuccessWithInfo`.
    pub fn is_success(&self) -> bool {
        !matches!(self, FetchOutcome::Error(_))
    }

    /// Returns the user-visible message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            FetchOutcome::Success => None,
            FetchOutcome::SuccessWithInfo(msg) | FetchOutcome::Error(msg) => Some(msg),
        }
    }

    /// Decodes a legacy completion payload.
    ///
    /// Accepted shapes:
    /// - absent or `null` — plain success
    /// - `{"infoStatus": "..."}` — success with a user-visible message
    /// - `{"errorStatus": "..."}` — fatal failure
    /// - a bare string — deprecated, treated as `errorStatus`
    ///
    /// A payload carrying both `infoStatus` and `errorStatus` is
    /// rejected.
    pub fn decode(raw: Option<&serde_json::Value>) -> Result<Self, OutcomeDecodeError> {
        let value = match raw {
            None | Some(serde_json::Value::Null) => return Ok(FetchOutcome::Success),
            Some(v) => v,
        };

        if let Some(message) = value.as_str() {
            return Ok(FetchOutcome::Error(message.to_string()));
        }

        let object = value.as_object().ok_or(OutcomeDecodeError::InvalidShape)?;
        let info = object.get("infoStatus");
        let error = object.get("errorStatus");

        match (info, error) {
            (Some(_), Some(_)) => Err(OutcomeDecodeError::Ambiguous),
            (Some(info), None) => {
                let msg = info.as_str().ok_or(OutcomeDecodeError::InvalidShape)?;
                Ok(FetchOutcome::SuccessWithInfo(msg.to_string()))
            }
            (None, Some(error)) => {
                let msg = error.as_str().ok_or(OutcomeDecodeError::InvalidShape)?;
                Ok(FetchOutcome::Error(msg.to_string()))
            }
            (None, None) => Err(OutcomeDecodeError::InvalidShape),
        }
    }
}

/// Errors decoding a legacy completion payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeDecodeError {
    /// Payload carries both `infoStatus` and `errorStatus`.
    Ambiguous,
    /// Payload is not one of the four accepted shapes.
    InvalidShape,
}

impl std::fmt::Display for OutcomeDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeDecodeError::Ambiguous => {
                write!(f, "completion payload has both infoStatus and errorStatus")
            }
            OutcomeDecodeError::InvalidShape => {
                write!(f, "completion payload is not a recognized shape")
            }
        }
    }
}

impl std::error::Error for OutcomeDecodeError {}

/// One-shot completion handle passed to `fetch_records`.
///
/// Consuming methods make the exactly-once contract structural: once
/// an outcome is reported the handle is gone. Dropping the handle
/// without reporting is observed by the run harness as a fetch error,
/// so a connector cannot silently hang the run.
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<FetchOutcome>,
}

impl Completion {
    /// Creates a completion handle and the receiver the host awaits.
    pub fn channel() -> (Self, oneshot::Receiver<FetchOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Plain success; no message shown to the user.
    pub fn success(self) {
        self.report(FetchOutcome::Success);
    }

    /// Success with a message shown to the user.
    pub fn success_with_info(self, message: impl Into<String>) {
        self.report(FetchOutcome::SuccessWithInfo(message.into()));
    }

    /// Fatal failure for this data set, with a user-visible message.
    pub fn error(self, message: impl Into<String>) {
        self.report(FetchOutcome::Error(message.into()));
    }

    /// Reports an already-constructed outcome.
    pub fn report(self, outcome: FetchOutcome) {
        // The host may have stopped awaiting (run cancelled); a closed
        // channel is not an error for the connector.
        let _ = self.tx.send(outcome);
    }
}
