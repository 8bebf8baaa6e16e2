//! Exchanging the caller identifier for a fresh bearer token.

use log::{debug, warn};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{AccessToken, Requester};
use crate::http::{HttpRequest, Method, Transport};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: Option<String>,
}

impl<T: Transport> Requester<T> {
    /// `POST <base><token path>` with `{"id": <identifier>}`. The query string
    /// is never forwarded to the token endpoint.
    pub(super) fn refresh_request(&self) -> HttpRequest {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("withcredentials"),
            HeaderValue::from_static("true"),
        );

        let mut body = Map::new();
        if let Some(id) = &self.identifier {
            body.insert("id".to_string(), Value::String(id.clone()));
        }

        HttpRequest {
            method: Method::Post,
            url: self.config.token_url(),
            headers,
            body: Some(Value::Object(body)),
        }
    }

    /// Attempts one token refresh. On success the new token replaces the stored
    /// one and is returned; every failure is logged and reported as `None`.
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub(super) async fn refresh(&mut self) -> Option<AccessToken> {
        let request = self.refresh_request();
        debug!("Refreshing access token at {}...", request.url);

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                return None;
            }
        };

        if response.status != 200 {
            warn!(
                "Token refresh returned HTTP {} instead of 200",
                response.status
            );
            return None;
        }

        let token = match serde_json::from_str::<RefreshResponse>(&response.body) {
            Ok(parsed) => parsed.access_token.and_then(AccessToken::new),
            Err(e) => {
                warn!("Failed to parse token refresh response: {}", e);
                return None;
            }
        };

        let Some(token) = token else {
            warn!("Token refresh response carried no accessToken");
            return None;
        };

        if let Err(e) = token.bearer() {
            warn!("Refreshed token is not a valid header value: {}", e);
            return None;
        }

        debug!("Access token refreshed: {}", token.masked());
        self.access_token = Some(token.clone());
        self.refreshed = true;
        Some(token)
    }
}
