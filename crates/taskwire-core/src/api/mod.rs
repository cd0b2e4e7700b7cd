use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{SessionManager, TokenRefresher};
use crate::error::CoreError;
use crate::session::Session;

pub mod auth;
pub mod tasks;
pub mod voice;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response envelope used by every endpoint: `data` is the payload, the rest
/// is status metadata. An HTTP 401 anywhere is the authentication-failure
/// signal, handled by the transport before the envelope is inspected.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    #[serde(alias = "statusCode")]
    status_code: Option<u16>,
    data: Option<T>,
}

/// Client for the Taskwire REST API.
///
/// All requests flow through one transport path that attaches the bearer
/// token from the [`SessionManager`] and recovers from an expired access
/// token by running the coalesced refresh and retrying the request exactly
/// once.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    auth: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(base_url: &str, auth: Arc<SessionManager>) -> Result<Self, CoreError> {
        let mut normalized = base_url.trim_end_matches('/').to_string();
        normalized.push('/');
        let base_url = Url::parse(&normalized)
            .map_err(|e| CoreError::InvalidInput(format!("Invalid API URL '{}': {}", base_url, e)))?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("taskwire/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| CoreError::Network {
                retryable: false,
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.auth
    }

    fn endpoint(&self, path: &str) -> Result<Url, CoreError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| CoreError::InvalidInput(format!("Invalid API path '{}': {}", path, e)))
    }

    fn refresher(&self) -> HttpRefresher {
        HttpRefresher {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
        }
    }

    /// Sends a request and returns the envelope's `data` payload.
    ///
    /// `build` is re-invoked on retry so the request body is rebuilt rather
    /// than cloned. `idempotent` marks requests (GETs) whose transport
    /// failures carry a transient-retry hint.
    pub(crate) async fn execute<T, F>(
        &self,
        method: Method,
        path: &str,
        idempotent: bool,
        build: F,
    ) -> Result<T, CoreError>
    where
        T: DeserializeOwned,
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let response = self.send(method, path, idempotent, build).await?;
        let status = response.status();
        let envelope = decode_envelope::<T>(response).await?;
        envelope.data.ok_or_else(|| CoreError::Api {
            status: envelope.status_code.unwrap_or(status.as_u16()),
            message: "Response envelope is missing its data payload".to_string(),
        })
    }

    /// Like [`execute`](Self::execute) for endpoints whose envelope carries
    /// no payload.
    pub(crate) async fn execute_unit<F>(
        &self,
        method: Method,
        path: &str,
        idempotent: bool,
        build: F,
    ) -> Result<(), CoreError>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let response = self.send(method, path, idempotent, build).await?;
        decode_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn send<F>(
        &self,
        method: Method,
        path: &str,
        idempotent: bool,
        build: F,
    ) -> Result<Response, CoreError>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = self.endpoint(path)?;
        let mut retried = false;
        loop {
            let mut request = self.http.request(method.clone(), url.clone());
            if let Some(token) = self.auth.bearer_token() {
                request = request.bearer_auth(token);
            }
            let response = build(request)
                .send()
                .await
                .map_err(|source| CoreError::Network {
                    retryable: idempotent,
                    source,
                })?;

            if response.status() == StatusCode::UNAUTHORIZED && !retried {
                // One coalesced refresh per failure episode; the request is
                // retried at most once with the new token.
                retried = true;
                tracing::debug!(%url, "request unauthorized, refreshing session");
                self.auth.refresh_with(&self.refresher()).await?;
                continue;
            }

            return Ok(response);
        }
    }
}

/// Validates status and envelope metadata, then hands back the envelope.
async fn decode_envelope<T: DeserializeOwned>(
    response: Response,
) -> Result<Envelope<T>, CoreError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        let message = error_message(response).await;
        return Err(CoreError::NotFound(message));
    }
    if !status.is_success() {
        let message = error_message(response).await;
        return Err(CoreError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: Envelope<T> =
        response
            .json()
            .await
            .map_err(|source| CoreError::Network {
                retryable: false,
                source,
            })?;

    if !envelope.success {
        return Err(CoreError::Api {
            status: envelope.status_code.unwrap_or(status.as_u16()),
            message: envelope
                .message
                .unwrap_or_else(|| "Request was not successful".to_string()),
        });
    }

    Ok(envelope)
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    response
        .json::<Envelope<serde_json::Value>>()
        .await
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

/// Production [`TokenRefresher`]: trades the stored refresh token for a new
/// session via `POST /auth/refresh`. Deliberately bypasses the retry loop —
/// a 401 from the refresh endpoint itself is a terminal failure.
struct HttpRefresher {
    http: Client,
    base_url: Url,
}

#[derive(Debug, serde::Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[async_trait]
impl TokenRefresher for HttpRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<Session, CoreError> {
        let url = self
            .base_url
            .join("auth/refresh")
            .map_err(|e| CoreError::InvalidInput(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|source| CoreError::Network {
                retryable: false,
                source,
            })?;

        let status = response.status();
        let envelope = decode_envelope::<TokenPair>(response).await?;
        let pair = envelope.data.ok_or_else(|| CoreError::Api {
            status: status.as_u16(),
            message: "Refresh response is missing its token payload".to_string(),
        })?;

        Ok(Session::new(pair.access_token, pair.refresh_token))
    }
}
