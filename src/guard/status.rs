use std::time::Duration;

use serde::{Serialize, Serializer};

/// What the login form is allowed to do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    Unlocked {
        attempts_used: u32,
        attempts_remaining: u32,
    },
    Locked {
        #[serde(rename = "retry_after_secs", serialize_with = "ceil_secs")]
        remaining: Duration,
    },
}

impl Status {
    pub fn is_locked(&self) -> bool {
        matches!(self, Status::Locked { .. })
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Status::Locked { remaining } => Some(*remaining),
            Status::Unlocked { .. } => None,
        }
    }
}

/// Whole seconds, rounded up so a countdown never shows 0 while still locked.
pub fn ceil_secs_of(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

fn ceil_secs<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(ceil_secs_of(*d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unlocked_json() {
        let status = Status::Unlocked {
            attempts_used: 1,
            attempts_remaining: 4,
        };
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            json!({"state": "unlocked", "attempts_used": 1, "attempts_remaining": 4})
        );
        assert!(!status.is_locked());
        assert_eq!(status.retry_after(), None);
    }

    #[test]
    fn test_locked_json_rounds_up() {
        let status = Status::Locked {
            remaining: Duration::from_millis(1500),
        };
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            json!({"state": "locked", "retry_after_secs": 2})
        );
        assert!(status.is_locked());
    }

    #[test]
    fn test_ceil_secs_of_exact() {
        assert_eq!(ceil_secs_of(Duration::from_secs(60)), 60);
        assert_eq!(ceil_secs_of(Duration::ZERO), 0);
    }
}
