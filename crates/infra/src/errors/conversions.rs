//! Conversions from `reqwest` errors into the per-stage domain errors.

use reqwest::Error as HttpError;
use scanbridge_domain::{AuthError, TransportError, UploadError};

/// Extension trait that keeps the `reqwest` classification on the
/// infrastructure side.
pub(crate) trait HttpErrorExt {
    /// Short, stable description of the failure.
    fn describe(&self) -> String;

    /// Connection-level failure seen on attempt number `attempts`.
    fn into_transport(self, attempts: u32) -> TransportError;

    fn into_auth(self) -> AuthError;

    fn into_upload(self) -> UploadError;
}

impl HttpErrorExt for HttpError {
    fn describe(&self) -> String {
        if self.is_timeout() {
            return "HTTP request timed out".into();
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return format!("HTTP connection failure: {self}");
        }

        if self.is_builder() {
            return format!("invalid HTTP request: {self}");
        }

        if let Some(status) = self.status() {
            return format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            );
        }

        self.to_string()
    }

    fn into_transport(self, attempts: u32) -> TransportError {
        if self.is_builder() {
            return TransportError::InvalidRequest(self.to_string());
        }

        TransportError::Connection { message: self.describe(), timed_out: self.is_timeout(), attempts }
    }

    fn into_auth(self) -> AuthError {
        if self.is_decode() {
            return AuthError::Decode(self.to_string());
        }
        AuthError::Transport(self.describe())
    }

    fn into_upload(self) -> UploadError {
        UploadError::Transport(self.describe())
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::Client;

    use super::*;

    async fn refused_error() -> HttpError {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        client.get(format!("http://{addr}")).send().await.unwrap_err()
    }

    #[tokio::test]
    async fn connect_failure_maps_to_connection_error() {
        let mapped = refused_error().await.into_transport(3);
        match mapped {
            TransportError::Connection { message, timed_out, attempts } => {
                assert!(message.contains("connection"));
                assert!(!timed_out);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected connection error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connect_failure_maps_to_auth_and_upload_transport() {
        assert!(matches!(refused_error().await.into_auth(), AuthError::Transport(_)));
        assert!(matches!(refused_error().await.into_upload(), UploadError::Transport(_)));
    }

    #[test]
    fn builder_failure_maps_to_invalid_request() {
        let err = Client::new().get("not a url").build().unwrap_err();
        assert!(matches!(err.into_transport(1), TransportError::InvalidRequest(_)));
    }
}
