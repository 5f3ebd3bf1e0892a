//! Runtime abstraction for process-level inputs.
//!
//! Environment variables and the wall clock sit behind a trait so that the run
//! can be driven with fixed credentials and a fixed "now" in tests.
//!
//! - `env` - environment variables and the local clock

mod env;

use chrono::{DateTime, Local};
use std::env as std_env;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    /// Current time in the local timezone. Expiration day boundaries follow it.
    fn now(&self) -> DateTime<Local>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn now(&self) -> DateTime<Local> {
        self.now_impl()
    }
}
