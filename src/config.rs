use anyhow::{Context, Result, anyhow};
use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::runtime::{Runtime, env_opt};

pub const BASE_URL_ENV: &str = "REQUESTER_BASE_URL";
pub const TOKEN_PATH_ENV: &str = "REQUESTER_TOKEN_PATH";
pub const TIMEOUT_ENV: &str = "REQUESTER_TIMEOUT_SECS";

/// Token endpoint used when neither a flag nor the environment names one.
pub const DEFAULT_TOKEN_PATH: &str = "token";

const USER_AGENT: &str = "requester-cli";

/// Where requests go: the backend base address and the token endpoint below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_url: String,
    token_path: String,
    timeout: Option<Duration>,
}

impl Config {
    /// The base URL always ends with exactly one `/` and the token path never
    /// starts with one, so plain concatenation yields well-formed URLs.
    pub fn new(base_url: impl Into<String>, token_path: impl Into<String>) -> Self {
        let base_url = format!("{}/", base_url.into().trim().trim_end_matches('/'));
        let token_path = token_path.into().trim().trim_start_matches('/').to_string();
        Self {
            base_url,
            token_path,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolves configuration from explicit values, falling back to
    /// `REQUESTER_BASE_URL`, `REQUESTER_TOKEN_PATH` and `REQUESTER_TIMEOUT_SECS`.
    pub fn load<R: Runtime>(
        runtime: &R,
        base_url: Option<String>,
        token_path: Option<String>,
    ) -> Result<Self> {
        let base_url = base_url
            .filter(|v| !v.trim().is_empty())
            .or_else(|| env_opt(runtime, BASE_URL_ENV))
            .ok_or_else(|| {
                anyhow!(
                    "No base URL configured. Pass --base-url or set {}.",
                    BASE_URL_ENV
                )
            })?;

        let token_path = token_path
            .filter(|v| !v.trim().is_empty())
            .or_else(|| env_opt(runtime, TOKEN_PATH_ENV))
            .unwrap_or_else(|| DEFAULT_TOKEN_PATH.to_string());

        let mut config = Config::new(base_url, token_path);

        if let Some(secs) = env_opt(runtime, TIMEOUT_ENV) {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_ENV))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        debug!(
            "Using base URL {} and token endpoint {}",
            config.base_url,
            config.token_url()
        );

        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_path(&self) -> &str {
        &self.token_path
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn token_url(&self) -> String {
        format!("{}{}", self.base_url, self.token_path)
    }

    /// Builds the reqwest client requests are dispatched through.
    pub fn http_client(&self) -> Result<Client> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().context("Failed to build HTTP client")
    }
}
