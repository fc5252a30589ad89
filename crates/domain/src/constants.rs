//! Protocol constants
//!
//! Centralized location for the defaults of the request/poll protocol. The
//! values can be overridden through [`crate::Config`], these are what a
//! fresh configuration starts from.

// Transport retry
pub const DEFAULT_TRANSPORT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_TRANSPORT_DELAY_MS: u64 = 2_000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// HTTP statuses that are retried by the transport layer: rate limited, bad
/// gateway, service unavailable, gateway timeout.
pub const RETRYABLE_STATUS_CODES: [u16; 4] = [429, 502, 503, 504];

// Activity polling
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Substring of an API error message that signals the system activity has
/// not propagated to the status endpoint yet.
pub const RESOURCE_NOT_FOUND_MARKER: &str = "Resource not found";

// Authentication
pub const DEFAULT_AUDIENCE: &str = "wiz-api";
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

// Upload
pub const DEFAULT_UPLOAD_FILE: &str = "state-current.json";

/// Maximum number of response body bytes kept in error messages.
pub const MAX_ERROR_BODY_LEN: usize = 512;

/// Returns `true` when the transport layer should retry on `status`.
#[must_use]
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status)
}
