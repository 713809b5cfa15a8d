use crate::config::AdminConfig;

pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    /// Reason is for logs only; the login page never shows it.
    Failure(String),
}

/// Decides whether a set of credentials is accepted. The login guard never
/// calls this; the login handler does and reports the outcome to the guard.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, credentials: &Credentials) -> AuthOutcome;

    /// Whether `username` names an account, ignoring case and surrounding
    /// whitespace. Only known accounts get their own failure counter.
    fn is_known_account(&self, username: &str) -> bool;
}

/// Single admin account taken from configuration.
pub struct StaticAuthenticator {
    admin: AdminConfig,
}

impl StaticAuthenticator {
    pub fn new(admin: AdminConfig) -> Self {
        StaticAuthenticator { admin }
    }
}

impl Authenticator for StaticAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> AuthOutcome {
        if credentials.username.trim() != self.admin.username {
            return AuthOutcome::Failure("unknown username".into());
        }
        if credentials.password != self.admin.password {
            return AuthOutcome::Failure("wrong password".into());
        }
        AuthOutcome::Success
    }

    fn is_known_account(&self, username: &str) -> bool {
        username.trim().eq_ignore_ascii_case(&self.admin.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> StaticAuthenticator {
        StaticAuthenticator::new(AdminConfig {
            username: "pastor".into(),
            password: "s3cret".into(),
        })
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_accepts_configured_admin() {
        assert_eq!(
            authenticator().authenticate(&creds("pastor", "s3cret")),
            AuthOutcome::Success
        );
    }

    #[test]
    fn test_rejects_wrong_password() {
        assert_eq!(
            authenticator().authenticate(&creds("pastor", "nope")),
            AuthOutcome::Failure("wrong password".into())
        );
    }

    #[test]
    fn test_known_account_ignores_case() {
        let auth = authenticator();
        assert!(auth.is_known_account(" Pastor "));
        assert!(!auth.is_known_account("deacon"));
    }

    #[test]
    fn test_rejects_unknown_user() {
        assert!(matches!(
            authenticator().authenticate(&creds("deacon", "s3cret")),
            AuthOutcome::Failure(_)
        ));
    }
}
