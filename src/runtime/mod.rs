//! Runtime abstraction for process environment access.
//!
//! Configuration is read through the [`Runtime`] trait rather than `std::env`
//! directly, so tests can inject environment values with `MockRuntime`.

mod env;

use std::env as std_env;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;
}

/// Like [`Runtime::env_var`], but treats unset, non-unicode and blank values
/// uniformly as absent.
pub fn env_opt<R: Runtime + ?Sized>(runtime: &R, key: &str) -> Option<String> {
    runtime
        .env_var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }
}
