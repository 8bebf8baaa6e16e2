//! Authenticated request dispatch with a single bearer-token refresh.
//!
//! A [`Requester`] owns everything one logical call needs: where it goes, how,
//! with which headers, body and credential. [`Requester::send`] dispatches it
//! and, when the server answers `401 {"message": "Expired Token"}`, exchanges
//! the caller identifier for a new token and dispatches once more:
//!
//! ```text
//! Initial -> Dispatched -> Succeeded | FailedAuth | FailedOther
//! FailedAuth -> RefreshAttempted -> RetryDispatched -> Succeeded | FailedTerminal
//!                                -> FailedTerminal
//! ```

mod builder;
mod endpoint;
mod error;
mod refresh;
mod token;

use log::{debug, error};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::http::{HttpRequest, Method, ReqwestTransport, Transport};

pub use builder::RequesterBuilder;
pub use endpoint::Endpoint;
pub use error::RequestError;
pub use token::AccessToken;

/// Token refreshes a single `send()` may perform before giving up.
pub const MAX_REFRESH_ATTEMPTS: usize = 1;

pub struct Requester<T: Transport = ReqwestTransport> {
    transport: T,
    config: Config,
    endpoint: Endpoint,
    method: Method,
    /// Caller-supplied headers only; the merged set is derived in [`Requester::headers`].
    headers: HeaderMap,
    access_token: Option<AccessToken>,
    /// Set once a refresh has replaced the caller's token.
    refreshed: bool,
    payload: Value,
    identifier: Option<String>,
    query: Option<String>,
}

impl Requester {
    pub fn builder(endpoint: Endpoint, method: Method) -> RequesterBuilder {
        RequesterBuilder::new(endpoint, method)
    }
}

impl<T: Transport> Requester<T> {
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Replaces the stored query string used by subsequent sends.
    pub fn set_query(&mut self, query: Option<String>) {
        self.query = builder::normalize_query(query);
    }

    /// `<base>route/controller`, plus `?<query>` when one is stored.
    pub fn url(&self) -> String {
        let mut url = format!("{}{}", self.config.base_url(), self.endpoint.path());
        if let Some(query) = &self.query {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// Headers as they will be sent, computed from the current token.
    ///
    /// Precedence, lowest first: `Content-Type: application/json`, the bearer
    /// token, caller headers. A token obtained by refresh outranks a caller
    /// `Authorization` header.
    pub fn headers(&self) -> Result<HeaderMap, RequestError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let bearer = self
            .access_token
            .as_ref()
            .map(AccessToken::bearer)
            .transpose()
            .map_err(|e| RequestError::InvalidHeader(format!("'authorization': {}", e)))?;

        if let Some(bearer) = &bearer {
            headers.insert(AUTHORIZATION, bearer.clone());
        }

        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }

        if self.refreshed {
            if let Some(bearer) = bearer {
                headers.insert(AUTHORIZATION, bearer);
            }
        }

        Ok(headers)
    }

    fn request(&self) -> Result<HttpRequest, RequestError> {
        Ok(HttpRequest {
            method: self.method,
            url: self.url(),
            headers: self.headers()?,
            body: (!self.payload.is_null()).then(|| self.payload.clone()),
        })
    }

    /// Dispatches the request and decodes the response body into `R`.
    ///
    /// An expired token triggers at most [`MAX_REFRESH_ATTEMPTS`] refreshes,
    /// each followed by one more dispatch. If no usable token comes back, or
    /// the retried call is rejected as expired again, the server's 401 body is
    /// returned as [`RequestError::AuthExpired`]. Every other failure is
    /// returned as-is without retrying. All failures are logged.
    #[tracing::instrument(skip(self), fields(method = %self.method, endpoint = %self.endpoint))]
    pub async fn send<R: DeserializeOwned>(&mut self) -> Result<R, RequestError> {
        let mut refreshes = 0;

        loop {
            let request = self.request().inspect_err(|e| error!("{}", e))?;

            let body = match self.transport.execute(request).await {
                Ok(response) => return decode(&response.body),
                Err(e) => match RequestError::from(e) {
                    RequestError::AuthExpired { body } => body,
                    err => {
                        error!("{} {} failed: {}", self.method, self.endpoint, err.detail());
                        return Err(err);
                    }
                },
            };

            if refreshes >= MAX_REFRESH_ATTEMPTS {
                error!(
                    "{} {} still rejected as expired after {} refresh(es): {}",
                    self.method, self.endpoint, refreshes, body
                );
                return Err(RequestError::AuthExpired { body });
            }
            refreshes += 1;

            debug!("{} {}: token expired, refreshing...", self.method, self.endpoint);
            if self.refresh().await.is_none() {
                error!("{} {} failed: {}", self.method, self.endpoint, body);
                return Err(RequestError::AuthExpired { body });
            }
        }
    }
}

/// An empty body decodes as JSON `null`, so `()` and `Option<_>` accept `204`.
fn decode<R: DeserializeOwned>(body: &str) -> Result<R, RequestError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| {
        error!("Failed to decode response body: {}", e);
        RequestError::Decode(e.to_string())
    })
}
