use anyhow::{Context, Result, anyhow};
use log::info;
use serde_json::Value;

use crate::config::Config;
use crate::http::{Method, ReqwestTransport};
use crate::requester::{Endpoint, Requester};
use crate::runtime::Runtime;

/// Everything the `send` subcommand needs besides configuration.
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub endpoint: Endpoint,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub access_token: Option<String>,
    pub identifier: Option<String>,
    pub query: Option<String>,
    pub payload: Value,
}

impl SendOptions {
    pub fn new(endpoint: Endpoint, method: Method) -> Self {
        Self {
            endpoint,
            method,
            headers: Vec::new(),
            access_token: None,
            identifier: None,
            query: None,
            payload: Value::Null,
        }
    }
}

/// Parses a `Name: value` header argument.
pub fn parse_header(s: &str) -> Result<(String, String)> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid header '{}'. Expected 'Name: value'.", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Invalid header '{}': name cannot be empty.", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Parses the `--data` argument as JSON.
pub fn parse_payload(s: &str) -> Result<Value> {
    serde_json::from_str(s).with_context(|| format!("Request body is not valid JSON: {}", s))
}

/// Sends one request and returns the decoded JSON response.
#[tracing::instrument(skip(runtime, options))]
pub async fn send<R: Runtime>(
    runtime: &R,
    options: SendOptions,
    base_url: Option<String>,
    token_path: Option<String>,
) -> Result<Value> {
    let config = Config::load(runtime, base_url, token_path)?;
    let transport = ReqwestTransport::new(config.http_client()?);

    let mut builder = Requester::builder(options.endpoint, options.method)
        .headers(options.headers)
        .payload(options.payload);
    if let Some(token) = options.access_token {
        builder = builder.access_token(token);
    }
    if let Some(identifier) = options.identifier {
        builder = builder.identifier(identifier);
    }
    if let Some(query) = options.query {
        builder = builder.query(query);
    }

    let mut requester = builder.build(&config, transport)?;
    info!("{} {}...", requester.method(), requester.url());

    let response = requester
        .send::<Value>()
        .await
        .with_context(|| format!("{} {} failed", requester.method(), requester.endpoint()))?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::test_utils::configure_mock_runtime_env;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("X-Api-Key: secret").unwrap(),
            ("X-Api-Key".to_string(), "secret".to_string())
        );
        assert_eq!(
            parse_header("Accept:application/json").unwrap(),
            ("Accept".to_string(), "application/json".to_string())
        );
        // Only the first colon separates name from value.
        assert_eq!(
            parse_header("X-Url: http://a:1").unwrap().1,
            "http://a:1".to_string()
        );
    }

    #[test]
    fn test_parse_header_invalid() {
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
        assert!(parse_payload("{not json").is_err());
    }

    #[tokio::test]
    async fn test_send_uses_environment_config() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/items/create")
            .match_query(Matcher::UrlEncoded("dry".into(), "1".into()))
            .match_header("authorization", "Bearer abc")
            .match_header("x-extra", "yes")
            .match_body(Matcher::Json(json!({"name": "n"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 1}"#)
            .create_async()
            .await;

        let mut runtime = MockRuntime::new();
        let url = server.url();
        configure_mock_runtime_env(&mut runtime, Some(&url), None, None);

        let mut options = SendOptions::new(Endpoint::new("items", "create"), Method::Post);
        options.headers = vec![("X-Extra".to_string(), "yes".to_string())];
        options.access_token = Some("abc".to_string());
        options.query = Some("dry=1".to_string());
        options.payload = json!({"name": "n"});

        let response = send(&runtime, options, None, None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response, json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_send_reports_server_error_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/items/list")
            .with_status(400)
            .with_body("missing filter")
            .create_async()
            .await;

        let mut runtime = MockRuntime::new();
        configure_mock_runtime_env(&mut runtime, None, None, None);
        let options = SendOptions::new(Endpoint::new("items", "list"), Method::Get);

        let err = send(&runtime, options, Some(server.url()), Some("token".into()))
            .await
            .unwrap_err();

        mock.assert_async().await;
        let message = format!("{:#}", err);
        assert!(message.contains("GET items/list failed"));
        assert!(message.contains("missing filter"));
    }
}
