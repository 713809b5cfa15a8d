use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::guard::LockoutPolicy;
use crate::guard::policy::{DEFAULT_LOCKOUT_DURATION, DEFAULT_MAX_ATTEMPTS};

/// Value of `LOGINGUARD_STATE_PATH` that keeps guard state in memory only.
pub const IN_MEMORY_STATE: &str = ":memory:";

#[derive(Clone)]
pub struct Config {
    pub bind_addr: String,
    pub state_path: Option<PathBuf>,
    pub admin: AdminConfig,
    pub guard: GuardConfig,
}

#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct GuardConfig {
    pub max_attempts: u32,
    pub lockout_secs: u64,
    pub allow_reset: bool,
}

impl GuardConfig {
    pub fn policy(&self) -> anyhow::Result<LockoutPolicy> {
        LockoutPolicy::new(self.max_attempts, Duration::from_secs(self.lockout_secs))
            .map_err(|e| anyhow::anyhow!("invalid login guard settings: {}", e))
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let admin_id = std::env::var("LOGINGUARD_ADMIN_ID")
            .map_err(|_| anyhow::anyhow!("LOGINGUARD_ADMIN_ID environment variable is required"))?;
        let admin_password = std::env::var("LOGINGUARD_ADMIN_PASSWORD").map_err(|_| {
            anyhow::anyhow!("LOGINGUARD_ADMIN_PASSWORD environment variable is required")
        })?;

        let state_path = std::env::var("LOGINGUARD_STATE_PATH")
            .unwrap_or_else(|_| "./login_guard.json".to_string());

        Ok(Config {
            bind_addr: {
                let port = std::env::var("LOGINGUARD_PORT").unwrap_or_else(|_| "8080".to_string());
                std::env::var("LOGINGUARD_BIND_ADDR")
                    .unwrap_or_else(|_| format!("0.0.0.0:{}", port))
            },
            state_path: parse_state_path(&state_path),
            admin: AdminConfig {
                username: admin_id,
                password: admin_password,
            },
            guard: GuardConfig {
                max_attempts: parse_setting(
                    "LOGINGUARD_MAX_ATTEMPTS",
                    std::env::var("LOGINGUARD_MAX_ATTEMPTS").ok(),
                    DEFAULT_MAX_ATTEMPTS,
                )?,
                lockout_secs: parse_setting(
                    "LOGINGUARD_LOCKOUT_SECS",
                    std::env::var("LOGINGUARD_LOCKOUT_SECS").ok(),
                    DEFAULT_LOCKOUT_DURATION.as_secs(),
                )?,
                allow_reset: parse_setting(
                    "LOGINGUARD_ALLOW_RESET",
                    std::env::var("LOGINGUARD_ALLOW_RESET").ok(),
                    false,
                )?,
            },
        })
    }
}

fn parse_state_path(raw: &str) -> Option<PathBuf> {
    if raw == IN_MEMORY_STATE {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}

fn parse_setting<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {} value '{}': {}", key, value, e)),
    }
}
