//! Consecutive-failure login guard with a persisted temporary lockout.
//!
//! The guard keeps one [`GuardState`] per scope in a [`KeyValueStore`] so a
//! restart (or a browser reload) cannot wipe the failure counter. Lock expiry
//! is observed lazily: nothing runs in the background, the next call that
//! reads the state clears it.

use chrono::{DateTime, Utc};

use super::clock::{Clock, SystemClock};
use super::policy::LockoutPolicy;
use super::report::{ErrorReporter, TracingReporter};
use super::state::GuardState;
use super::status::Status;
use crate::storage::{KeyValueStore, StoreError};

const KEY_PREFIX: &str = "login_guard:";

pub struct LoginAttemptGuard<S, C = SystemClock, R = TracingReporter> {
    key: String,
    policy: LockoutPolicy,
    store: S,
    clock: C,
    reporter: R,
}

impl<S, C, R> LoginAttemptGuard<S, C, R>
where
    S: KeyValueStore,
    C: Clock,
    R: ErrorReporter,
{
    pub fn new(scope: &str, policy: LockoutPolicy, store: S, clock: C, reporter: R) -> Self {
        LoginAttemptGuard {
            key: format!("{}{}", KEY_PREFIX, scope),
            policy,
            store,
            clock,
            reporter,
        }
    }

    pub fn check_status(&self) -> Status {
        let now = self.clock.now();
        let state = self.current(now);
        self.status_of(&state, now)
    }

    /// Counts one rejected authentication. Returns `Locked` with the full
    /// lockout duration on the call that reaches the threshold.
    pub fn record_failure(&self) -> Status {
        let now = self.clock.now();
        let state = self.current(now);

        if state.locked_until.is_some() {
            tracing::debug!(key = %self.key, "failure recorded while locked, ignoring");
            return self.status_of(&state, now);
        }

        let failure_count = state.failure_count.saturating_add(1);
        if failure_count >= self.policy.max_attempts() {
            let until = self.policy.lockout_expiry(now);
            self.persist(&GuardState::locked(until));
            tracing::warn!(
                key = %self.key,
                failures = failure_count,
                %until,
                "login locked after too many failed attempts"
            );
            return Status::Locked {
                remaining: self.policy.lockout_duration(),
            };
        }

        self.persist(&GuardState {
            failure_count,
            locked_until: None,
        });
        self.policy.unlocked_status(failure_count)
    }

    pub fn record_success(&self) {
        tracing::debug!(key = %self.key, "login succeeded, clearing failures");
        self.persist(&GuardState::default());
    }

    /// Operator unlock. Same effect as a successful login.
    pub fn reset(&self) {
        tracing::warn!(key = %self.key, "login guard reset by operator");
        self.persist(&GuardState::default());
    }

    fn current(&self, now: DateTime<Utc>) -> GuardState {
        let state = self.load();
        match state.locked_until {
            Some(until) if until <= now => {
                tracing::debug!(key = %self.key, "lockout expired");
                let cleared = GuardState::default();
                self.persist(&cleared);
                cleared
            }
            _ => state,
        }
    }

    fn status_of(&self, state: &GuardState, now: DateTime<Utc>) -> Status {
        match state.locked_until {
            Some(until) => Status::Locked {
                remaining: (until - now).to_std().unwrap_or_default(),
            },
            None => self.policy.unlocked_status(state.failure_count),
        }
    }

    fn load(&self) -> GuardState {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return GuardState::default(),
            Err(e) => {
                self.reporter.report_warning(&format!(
                    "failed to read login guard state for {}: {}",
                    self.key, e
                ));
                return GuardState::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            self.reporter.report_warning(&format!(
                "discarding malformed login guard state for {}: {}",
                self.key, e
            ));
            GuardState::default()
        })
    }

    fn persist(&self, state: &GuardState) {
        let result = if state.is_zero() {
            self.store.remove(&self.key)
        } else {
            serde_json::to_string(state)
                .map_err(StoreError::from)
                .and_then(|raw| self.store.set(&self.key, &raw))
        };

        if let Err(e) = result {
            self.reporter.report_warning(&format!(
                "failed to persist login guard state for {}: {}",
                self.key, e
            ));
        }
    }
}
