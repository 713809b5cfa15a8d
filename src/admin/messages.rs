use std::time::Duration;

use crate::guard::Status;
use crate::guard::status::ceil_secs_of;

/// `M:SS`, rounded up to the next whole second.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = ceil_secs_of(remaining);
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Banner shown on the login form for a given guard status, if any.
pub fn status_message(status: &Status) -> Option<String> {
    match status {
        Status::Locked { remaining } => Some(format!(
            "Too many failed attempts. Please try again in {}.",
            format_remaining(*remaining)
        )),
        Status::Unlocked { attempts_used: 0, .. } => None,
        Status::Unlocked {
            attempts_remaining, ..
        } => Some(format!(
            "Invalid username or password. {} {} remaining.",
            attempts_remaining,
            if *attempts_remaining == 1 { "attempt" } else { "attempts" }
        )),
    }
}
