pub mod commands;
pub mod config;
pub mod http;
pub mod requester;
pub mod runtime;

pub use config::Config;
pub use http::{Method, ReqwestTransport, Transport};
pub use requester::{Endpoint, RequestError, Requester};

#[cfg(test)]
pub mod test_utils {
    use crate::config::{BASE_URL_ENV, TIMEOUT_ENV, TOKEN_PATH_ENV};
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    /// Configure the environment variables `Config::load` reads.
    /// `None` means the variable is unset.
    pub fn configure_mock_runtime_env(
        runtime: &mut MockRuntime,
        base_url: Option<&str>,
        token_path: Option<&str>,
        timeout_secs: Option<&str>,
    ) {
        for (key, value) in [
            (BASE_URL_ENV, base_url),
            (TOKEN_PATH_ENV, token_path),
            (TIMEOUT_ENV, timeout_secs),
        ] {
            let value = value.map(|v| v.to_string());
            runtime
                .expect_env_var()
                .with(eq(key))
                .returning(move |_| value.clone().ok_or(std::env::VarError::NotPresent));
        }
    }
}
