//! Environment variable access.

use std::env;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn env_var_impl(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{MockRuntime, RealRuntime, Runtime, env_opt};
    use mockall::predicate::eq;

    #[test]
    fn test_real_runtime_env_var() {
        let runtime = RealRuntime;

        // PATH should exist on all systems
        assert!(runtime.env_var("PATH").is_ok());
        assert!(
            runtime
                .env_var("REQUESTER_TEST_SURELY_UNSET_VARIABLE")
                .is_err()
        );
    }

    #[test]
    fn test_env_opt_treats_blank_as_absent() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("BLANK"))
            .returning(|_| Ok("   ".to_string()));
        runtime
            .expect_env_var()
            .with(eq("MISSING"))
            .returning(|_| Err(std::env::VarError::NotPresent));
        runtime
            .expect_env_var()
            .with(eq("SET"))
            .returning(|_| Ok(" value ".to_string()));

        assert_eq!(env_opt(&runtime, "BLANK"), None);
        assert_eq!(env_opt(&runtime, "MISSING"), None);
        assert_eq!(env_opt(&runtime, "SET"), Some("value".to_string()));
    }
}
