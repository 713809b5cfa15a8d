use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use super::status::Status;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(5 * 60);
pub const MAX_LOCKOUT_DURATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("max attempts must be at least 1")]
    ZeroAttempts,

    #[error("lockout duration must be non-zero")]
    ZeroLockout,

    #[error("lockout duration {0:?} is out of range")]
    LockoutOutOfRange(Duration),
}

/// Failure threshold and lockout length for a login guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutPolicy {
    max_attempts: u32,
    lockout_duration: Duration,
    lockout_delta: TimeDelta,
}

impl LockoutPolicy {
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Result<Self, PolicyError> {
        if max_attempts == 0 {
            return Err(PolicyError::ZeroAttempts);
        }
        if lockout_duration.is_zero() {
            return Err(PolicyError::ZeroLockout);
        }
        if lockout_duration > MAX_LOCKOUT_DURATION {
            return Err(PolicyError::LockoutOutOfRange(lockout_duration));
        }
        let lockout_delta = TimeDelta::from_std(lockout_duration)
            .map_err(|_| PolicyError::LockoutOutOfRange(lockout_duration))?;

        Ok(LockoutPolicy {
            max_attempts,
            lockout_duration,
            lockout_delta,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn lockout_duration(&self) -> Duration {
        self.lockout_duration
    }

    /// Expiry of a lockout starting at `now`. With the lockout capped at
    /// [`MAX_LOCKOUT_DURATION`] this only saturates for a clock within a year
    /// of `DateTime::<Utc>::MAX_UTC`, where the stored expiry falls short of
    /// `now + lockout_duration`.
    pub fn lockout_expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.lockout_delta)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn unlocked_status(&self, failure_count: u32) -> Status {
        Status::Unlocked {
            attempts_used: failure_count.min(self.max_attempts),
            attempts_remaining: self.max_attempts.saturating_sub(failure_count),
        }
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        LockoutPolicy {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lockout_duration: DEFAULT_LOCKOUT_DURATION,
            lockout_delta: TimeDelta::seconds(DEFAULT_LOCKOUT_DURATION.as_secs() as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = LockoutPolicy::default();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.lockout_duration(), Duration::from_secs(300));
        assert_eq!(policy, LockoutPolicy::new(5, Duration::from_secs(300)).unwrap());
    }

    #[test]
    fn test_rejects_zero_values() {
        assert_eq!(
            LockoutPolicy::new(0, Duration::from_secs(60)),
            Err(PolicyError::ZeroAttempts)
        );
        assert_eq!(
            LockoutPolicy::new(3, Duration::ZERO),
            Err(PolicyError::ZeroLockout)
        );
    }

    #[test]
    fn test_rejects_unrepresentable_lockout() {
        let huge = Duration::from_secs(u64::MAX);
        assert_eq!(
            LockoutPolicy::new(3, huge),
            Err(PolicyError::LockoutOutOfRange(huge))
        );
    }

    #[test]
    fn test_lockout_capped_at_one_year() {
        assert!(LockoutPolicy::new(5, MAX_LOCKOUT_DURATION).is_ok());
        let too_long = MAX_LOCKOUT_DURATION + Duration::from_secs(1);
        assert_eq!(
            LockoutPolicy::new(5, too_long),
            Err(PolicyError::LockoutOutOfRange(too_long))
        );
    }

    #[test]
    fn test_lockout_expiry_saturates() {
        let policy = LockoutPolicy::default();
        assert_eq!(
            policy.lockout_expiry(DateTime::<Utc>::MAX_UTC),
            DateTime::<Utc>::MAX_UTC
        );
    }

    #[test]
    fn test_unlocked_status_counts() {
        let policy = LockoutPolicy::default();
        assert_eq!(
            policy.unlocked_status(2),
            Status::Unlocked {
                attempts_used: 2,
                attempts_remaining: 3
            }
        );
    }
}
