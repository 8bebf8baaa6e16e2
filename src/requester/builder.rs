use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use super::{AccessToken, Endpoint, RequestError, Requester};
use crate::config::Config;
use crate::http::{Method, Transport};

/// Collects the inputs of one logical call. Created by [`Requester::builder`].
#[derive(Debug, Clone)]
pub struct RequesterBuilder {
    endpoint: Endpoint,
    method: Method,
    headers: Vec<(String, String)>,
    access_token: Option<String>,
    payload: Value,
    identifier: Option<String>,
    query: Option<String>,
}

impl RequesterBuilder {
    pub(super) fn new(endpoint: Endpoint, method: Method) -> Self {
        Self {
            endpoint,
            method,
            headers: Vec::new(),
            access_token: None,
            payload: Value::Null,
            identifier: None,
            query: None,
        }
    }

    /// Adds a caller header. Caller headers win over the derived
    /// `Content-Type` and `Authorization` headers; later duplicates win over
    /// earlier ones.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// An empty token is treated as no token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// JSON body. `Value::Null` (the default) sends no body.
    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Identifies the caller to the token endpoint when a refresh is needed.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn build<T: Transport>(
        self,
        config: &Config,
        transport: T,
    ) -> Result<Requester<T>, RequestError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|e| RequestError::InvalidHeader(format!("'{}': {}", name, e)))?;
            let header_value = HeaderValue::from_str(value.trim())
                .map_err(|e| RequestError::InvalidHeader(format!("'{}': {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        let access_token = self.access_token.and_then(AccessToken::new);
        if let Some(token) = &access_token {
            token
                .bearer()
                .map_err(|e| RequestError::InvalidHeader(format!("'authorization': {}", e)))?;
        }

        Ok(Requester {
            transport,
            config: config.clone(),
            endpoint: self.endpoint,
            method: self.method,
            headers,
            access_token,
            refreshed: false,
            payload: self.payload,
            identifier: self.identifier,
            query: normalize_query(self.query),
        })
    }
}

/// Strips a leading `?`; blank queries count as absent.
pub(super) fn normalize_query(query: Option<String>) -> Option<String> {
    query
        .map(|q| q.trim().trim_start_matches('?').to_string())
        .filter(|q| !q.is_empty())
}
