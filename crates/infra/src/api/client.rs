//! GraphQL query executor
//!
//! Owns the session (query endpoint plus bearer token) and runs typed GraphQL
//! operations through the retrying [`HttpClient`]. API-level errors are
//! reported separately from transport failures so the poller can recognise
//! a visibility race.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use scanbridge_domain::{
    truncate_body, AccessToken, AuthError, Config, Credentials, GraphQlRequest, GraphQlResponse,
    QueryError, TransportError,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use super::auth::Authenticator;
use crate::http::HttpClient;

/// Query endpoint and bearer token of the current run.
///
/// The token endpoint belongs to the [`Authenticator`]. The token is written once by [`GraphQlClient::authenticate`] and only
/// read afterwards.
#[derive(Clone)]
pub struct Session {
    query_url: String,
    token: Option<AccessToken>,
}

impl Session {
    pub fn new(query_url: impl Into<String>) -> Self {
        Self { query_url: query_url.into(), token: None }
    }

    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("query_url", &self.query_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

/// GraphQL client for the security platform.
#[derive(Clone)]
pub struct GraphQlClient {
    http: HttpClient,
    authenticator: Authenticator,
    session: Session,
}

impl GraphQlClient {
    /// Build a client from the run configuration.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidRequest`] if the HTTP client cannot
    /// be constructed.
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        Ok(Self::with_http(HttpClient::from_settings(&config.retry)?, config))
    }

    /// Build a client around an existing [`HttpClient`].
    pub fn with_http(http: HttpClient, config: &Config) -> Self {
        let authenticator =
            Authenticator::new(http.clone(), config.auth_url.clone(), config.audience.clone());
        Self { http, authenticator, session: Session::new(&config.query_url) }
    }

    /// Use an already issued token instead of authenticating.
    #[must_use]
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.session.token = Some(token);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn auth_url(&self) -> &str {
        self.authenticator.auth_url()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.token.is_some()
    }

    /// Exchange `credentials` for a token and store it in the session.
    ///
    /// # Errors
    /// Propagates the [`AuthError`] of the token request; the session is left
    /// unchanged on failure.
    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<(), AuthError> {
        let token = self.authenticator.authenticate(credentials).await?;
        self.session.token = Some(token);
        Ok(())
    }

    /// Run `request` and return its decoded `data`.
    ///
    /// # Errors
    /// - [`QueryError::Unauthenticated`] before [`Self::authenticate`]
    /// - [`QueryError::Transport`] once the transport retry budget is spent
    /// - [`QueryError::ApiErrors`] when the response lists any error, even if
    ///   `data` is present
    /// - [`QueryError::HttpStatus`] for a non-2xx answer without GraphQL
    ///   errors
    /// - [`QueryError::Decode`] for a malformed body or missing `data`
    #[instrument(skip_all, fields(query_url = %self.session.query_url))]
    pub async fn execute<T>(&self, request: &GraphQlRequest) -> Result<T, QueryError>
    where
        T: DeserializeOwned,
    {
        let token = self.session.token.as_ref().ok_or(QueryError::Unauthenticated)?;

        let builder = self
            .http
            .request(Method::POST, self.session.query_url.as_str())
            .header(AUTHORIZATION, token.bearer())
            .header(ACCEPT, "application/json")
            .json(request);

        let response = self.http.send(builder).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| QueryError::Decode(format!("failed to read response body: {err}")))?;
        debug!(%status, body_len = body.len(), "graphql response received");

        decode_graphql(status, &body)
    }
}

/// Decode a GraphQL response body.
///
/// Errors are checked before the payload is typed, so a listed error wins
/// over a payload of the wrong shape.
fn decode_graphql<T>(status: StatusCode, body: &str) -> Result<T, QueryError>
where
    T: DeserializeOwned,
{
    let envelope: GraphQlResponse<Value> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(QueryError::HttpStatus { status: status.as_u16(), body: truncate_body(body) });
        }
        Err(err) => return Err(QueryError::Decode(err.to_string())),
    };

    let messages = envelope.error_messages();
    if !messages.is_empty() {
        return Err(QueryError::ApiErrors(messages));
    }

    if !status.is_success() {
        return Err(QueryError::HttpStatus { status: status.as_u16(), body: truncate_body(body) });
    }

    match envelope.data {
        Some(Value::Null) | None => Err(QueryError::Decode("response contained no data".into())),
        Some(data) => serde_json::from_value(data).map_err(|err| QueryError::Decode(err.to_string())),
    }
}
