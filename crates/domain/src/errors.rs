//! Error types used throughout the application
//!
//! Each protocol stage has its own error enum so callers can tell a transport
//! failure from an API-level rejection. [`ScanBridgeError`] aggregates them
//! for the top level, which reports and halts.

use thiserror::Error;

use crate::constants::{MAX_ERROR_BODY_LEN, RESOURCE_NOT_FOUND_MARKER};

/// Failures of the retrying transport layer.
///
/// Only surfaces after the retry budget is spent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The last attempt could not complete at the connection level.
    #[error("connection failed after {attempts} attempt(s): {message}")]
    Connection { message: String, timed_out: bool, attempts: u32 },

    /// Every attempt came back with a retryable status.
    #[error("max retries reached with status code {status} after {attempts} attempt(s)")]
    RetriesExhausted { status: u16, attempts: u32 },

    /// The request could not be built or re-sent (e.g. a streaming body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Failures of the client-credentials exchange. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("error authenticating to the platform: {0}")]
    Transport(String),

    #[error("authentication failed with status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("error parsing authentication response: {0}")]
    Decode(String),

    #[error("no access token found in the response")]
    MissingToken,
}

/// Failures of a single GraphQL operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("no access token: authenticate before issuing queries")]
    Unauthenticated,

    /// The response carried one or more GraphQL errors. The payload is
    /// unusable even when `data` was present.
    #[error("graphql errors: {}", .0.join("; "))]
    ApiErrors(Vec<String>),

    /// Non-success HTTP status whose body was not a GraphQL response.
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("error decoding response: {0}")]
    Decode(String),
}

impl QueryError {
    /// API-level error messages, empty for every other variant.
    #[must_use]
    pub fn api_messages(&self) -> &[String] {
        match self {
            Self::ApiErrors(messages) => messages,
            _ => &[],
        }
    }

    /// Whether the API reported that the queried resource is not visible yet.
    #[must_use]
    pub fn is_resource_not_found(&self) -> bool {
        self.api_messages().iter().any(|message| message.contains(RESOURCE_NOT_FOUND_MARKER))
    }
}

/// Failures of the object-storage transfer. Abort the workflow before polling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("upload request failed: {0}")]
    Transport(String),

    #[error("upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Failures of the activity polling loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    /// A definitive failure; polling stopped without spending the budget.
    #[error("error querying system activity: {0}")]
    Query(#[from] QueryError),

    /// The activity never became visible within the attempt budget.
    #[error("system activity not available after {attempts} attempt(s){}", last_error_suffix(.last_error))]
    Timeout { attempts: u32, last_error: Option<String> },
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    last_error.as_ref().map(|e| format!(": {e}")).unwrap_or_default()
}

/// Configuration loading and validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} cannot be empty")]
    Missing(&'static str),

    #[error("{field} is not a valid URL: {message}")]
    InvalidUrl { field: &'static str, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("config file error: {0}")]
    Io(String),

    #[error("config parse error: {0}")]
    Parse(String),
}

/// Main error type for ScanBridge runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanBridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Poll(#[from] PollError),

    /// A precondition of the workflow did not hold (e.g. resource count).
    #[error("precondition failed: {0}")]
    Precondition(String),
}

impl From<TransportError> for ScanBridgeError {
    fn from(value: TransportError) -> Self {
        Self::Query(QueryError::Transport(value))
    }
}

impl ScanBridgeError {
    /// Stable label suitable for structured logging.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Auth(_) => "auth",
            Self::Query(QueryError::Transport(_)) => "transport",
            Self::Query(_) => "query",
            Self::Upload(_) => "upload",
            Self::Poll(PollError::Timeout { .. }) => "poll_timeout",
            Self::Poll(_) => "poll",
            Self::Precondition(_) => "precondition",
        }
    }
}

/// Result type alias for ScanBridge operations
pub type Result<T> = std::result::Result<T, ScanBridgeError>;

/// Trim a response body so it can be embedded in an error message.
#[must_use]
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_not_found_matches_substring_of_any_api_message() {
        let err = QueryError::ApiErrors(vec![
            "something else".to_string(),
            "Resource not found: systemActivity".to_string(),
        ]);
        assert!(err.is_resource_not_found());
    }

    #[test]
    fn resource_not_found_ignores_non_api_errors() {
        let err = QueryError::Decode("Resource not found".to_string());
        assert!(!err.is_resource_not_found());

        let err = QueryError::HttpStatus { status: 404, body: "Resource not found".to_string() };
        assert!(!err.is_resource_not_found());
    }

    #[test]
    fn api_errors_display_joins_messages() {
        let err = QueryError::ApiErrors(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "graphql errors: first; second");
    }

    #[test]
    fn poll_timeout_display_includes_last_error() {
        let err = PollError::Timeout { attempts: 5, last_error: Some("boom".into()) };
        assert_eq!(err.to_string(), "system activity not available after 5 attempt(s): boom");

        let err = PollError::Timeout { attempts: 0, last_error: None };
        assert_eq!(err.to_string(), "system activity not available after 0 attempt(s)");
    }

    #[test]
    fn labels_distinguish_transport_from_api_failures() {
        let transport: ScanBridgeError =
            QueryError::Transport(TransportError::RetriesExhausted { status: 503, attempts: 3 })
                .into();
        assert_eq!(transport.label(), "transport");

        let api: ScanBridgeError = QueryError::ApiErrors(vec!["denied".into()]).into();
        assert_eq!(api.label(), "query");

        let timeout: ScanBridgeError = PollError::Timeout { attempts: 5, last_error: None }.into();
        assert_eq!(timeout.label(), "poll_timeout");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let short = "short body";
        assert_eq!(truncate_body(short), short);

        let long = "é".repeat(MAX_ERROR_BODY_LEN);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= MAX_ERROR_BODY_LEN + 3);
    }
}
