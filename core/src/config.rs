//! Engine configuration.

use std::time::Duration;

use crate::error::ConfigError;
use crate::types::UserId;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// How long an error stays in the banner before it clears itself.
pub const DEFAULT_ERROR_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub base_url: String,
    pub user_id: UserId,
    pub error_timeout: Duration,
}

impl EngineConfig {
    pub fn new(base_url: impl Into<String>, user_id: UserId) -> Self {
        Self {
            base_url: base_url.into(),
            user_id,
            error_timeout: DEFAULT_ERROR_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_error_timeout(mut self, error_timeout: Duration) -> Self {
        self.error_timeout = error_timeout;
        self
    }

    /// Read `TODO_API_URL` and `TODO_USER_ID` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("TODO_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let raw = lookup("TODO_USER_ID").ok_or(ConfigError::MissingUserId)?;
        let user_id = match raw.trim().parse::<u64>() {
            Ok(id) if id > 0 => UserId::new(id),
            _ => return Err(ConfigError::InvalidUserId(raw)),
        };
        Ok(Self::new(base_url, user_id))
    }
}
