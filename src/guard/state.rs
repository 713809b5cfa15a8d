use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted guard state. The default value is the zero state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardState {
    #[serde(default)]
    pub failure_count: u32,
    #[serde(default)]
    pub locked_until: Option<DateTime<Utc>>,
}

impl GuardState {
    pub fn locked(until: DateTime<Utc>) -> Self {
        GuardState {
            failure_count: 0,
            locked_until: Some(until),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == GuardState::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_locked_until_round_trips() {
        let until = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let state = GuardState::locked(until);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(serde_json::from_str::<GuardState>(&json).unwrap(), state);
    }

    #[test]
    fn test_absent_fields_mean_zero() {
        let state: GuardState = serde_json::from_str("{}").unwrap();
        assert!(state.is_zero());
        let state: GuardState =
            serde_json::from_str(r#"{"failure_count":2,"locked_until":null}"#).unwrap();
        assert_eq!(state.failure_count, 2);
        assert_eq!(state.locked_until, None);
    }
}
