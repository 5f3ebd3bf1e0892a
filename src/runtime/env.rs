//! Environment and clock operations.

use chrono::{DateTime, Local};
use std::env;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn env_var_impl(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }

    pub(crate) fn now_impl(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use chrono::Local;

    #[test]
    fn test_real_runtime_env_and_clock() {
        let runtime = RealRuntime;

        // PATH exists on every platform we run on
        assert!(runtime.env_var("PATH").is_ok());
        assert!(
            runtime
                .env_var("GHCR_PRUNE_SURELY_UNSET_VARIABLE")
                .is_err()
        );

        let before = Local::now();
        let now = runtime.now();
        assert!(now >= before);
    }
}
