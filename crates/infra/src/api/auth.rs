//! Client-credentials authentication
//!
//! Exchanges a client id and secret for a bearer token with a single
//! form-encoded POST. Authentication is never retried: any failure is fatal
//! to the run.

use reqwest::Method;
use scanbridge_domain::constants::CLIENT_CREDENTIALS_GRANT;
use scanbridge_domain::{truncate_body, AccessToken, AuthError, Credentials};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::errors::HttpErrorExt;
use crate::http::HttpClient;

/// Token endpoint client.
#[derive(Clone)]
pub struct Authenticator {
    http: HttpClient,
    auth_url: String,
    audience: String,
}

impl Authenticator {
    pub fn new(http: HttpClient, auth_url: impl Into<String>, audience: impl Into<String>) -> Self {
        Self { http, auth_url: auth_url.into(), audience: audience.into() }
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Request an access token for `credentials`.
    ///
    /// # Errors
    /// - [`AuthError::Transport`] if the request cannot complete
    /// - [`AuthError::BadStatus`] for any non-2xx answer
    /// - [`AuthError::Decode`] if the body is not JSON
    /// - [`AuthError::MissingToken`] if `access_token` is absent or not a
    ///   string
    #[instrument(skip_all, fields(auth_url = %self.auth_url, client_id = %credentials.client_id()))]
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken, AuthError> {
        let form = [
            ("audience", self.audience.as_str()),
            ("grant_type", CLIENT_CREDENTIALS_GRANT),
            ("client_id", credentials.client_id()),
            ("client_secret", credentials.client_secret()),
        ];

        let request = self.http.request(Method::POST, self.auth_url.as_str()).form(&form);
        let response = self.http.send_once(request).await.map_err(HttpErrorExt::into_auth)?;

        let status = response.status();
        let body = response.text().await.map_err(HttpErrorExt::into_auth)?;
        debug!(%status, "token endpoint answered");

        if !status.is_success() {
            return Err(AuthError::BadStatus { status: status.as_u16(), body: truncate_body(&body) });
        }

        let token = parse_access_token(&body)?;
        info!("authenticated");
        Ok(token)
    }
}

fn parse_access_token(body: &str) -> Result<AccessToken, AuthError> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| AuthError::Decode(err.to_string()))?;

    value
        .get("access_token")
        .and_then(Value::as_str)
        .map(AccessToken::new)
        .ok_or(AuthError::MissingToken)
}
