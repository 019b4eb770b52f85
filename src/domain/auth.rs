//! Demonstration login gate. Four fixed accounts share one mock credential; this decides
//! which views are served and nothing more.
use crate::domain::models::{User, UserRole};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const MOCK_CREDENTIAL: &str = "password123";

/// How long a failed-login banner stays visible unless dismissed first.
pub const ERROR_BANNER_SECS: i64 = 5;

struct SeedAccount<'a> {
    id: &'a str,
    email: &'a str,
    name: &'a str,
    role: UserRole,
    department: &'a str,
}

const ACCOUNTS: [SeedAccount<'static>; 4] = [
    SeedAccount {
        id: "1",
        email: "admin@cognizant.com",
        name: "Dr. Sarah Chen",
        role: UserRole::Admin,
        department: "AI Strategy",
    },
    SeedAccount {
        id: "2",
        email: "manager@cognizant.com",
        name: "Michael Rodriguez",
        role: UserRole::Manager,
        department: "Digital Transformation",
    },
    SeedAccount {
        id: "3",
        email: "analyst@cognizant.com",
        name: "Emma Johnson",
        role: UserRole::Analyst,
        department: "Data Analytics",
    },
    SeedAccount {
        id: "4",
        email: "viewer@cognizant.com",
        name: "David Kim",
        role: UserRole::Viewer,
        department: "Business Intelligence",
    },
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("login already in progress")]
    InProgress,
}

/// Checks the allow-list. On success the returned record carries `now` as its last login.
pub fn authenticate(email: &str, credential: &str, now: DateTime<Utc>) -> Result<User, AuthError> {
    let account = ACCOUNTS
        .iter()
        .find(|a| a.email == email)
        .ok_or(AuthError::InvalidCredentials)?;
    if credential != MOCK_CREDENTIAL {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(User {
        id: account.id.to_string(),
        email: account.email.to_string(),
        name: account.name.to_string(),
        role: account.role,
        department: Some(account.department.to_string()),
        last_login: Some(now),
    })
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    Anonymous,
    Authenticating,
    Authenticated,
}

#[derive(Debug, Clone)]
struct ErrorBanner {
    message: String,
    raised_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    status: AuthStatus,
    user: Option<User>,
    error: Option<ErrorBanner>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub status: AuthStatus,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub user: Option<User>,
    pub error: Option<String>,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthSession {
    pub fn new() -> Self {
        Self {
            status: AuthStatus::Anonymous,
            user: None,
            error: None,
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    /// Enters `authenticating` and clears any previous error. A second attempt while one
    /// is pending is refused.
    pub fn begin_login(&mut self) -> Result<(), AuthError> {
        if self.status == AuthStatus::Authenticating {
            return Err(AuthError::InProgress);
        }
        self.status = AuthStatus::Authenticating;
        self.error = None;
        Ok(())
    }

    /// Settles a pending attempt. Failure leaves the session anonymous with a banner.
    pub fn finish_login(
        &mut self,
        email: &str,
        credential: &str,
        now: DateTime<Utc>,
    ) -> Result<&User, AuthError> {
        match authenticate(email, credential, now) {
            Ok(user) => {
                self.status = AuthStatus::Authenticated;
                self.error = None;
                Ok(&*self.user.insert(user))
            }
            Err(err) => {
                self.status = AuthStatus::Anonymous;
                self.user = None;
                self.error = Some(ErrorBanner {
                    message: err.to_string(),
                    raised_at: now,
                });
                Err(err)
            }
        }
    }

    pub fn logout(&mut self) {
        self.status = AuthStatus::Anonymous;
        self.user = None;
        self.error = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn visible_error(&self, now: DateTime<Utc>) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|b| now - b.raised_at < Duration::seconds(ERROR_BANNER_SECS))
            .map(|b| b.message.as_str())
    }

    /// Drops the banner once it has outlived its display window.
    pub fn expire_error(&mut self, now: DateTime<Utc>) {
        if self.error.is_some() && self.visible_error(now).is_none() {
            self.error = None;
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> AuthSnapshot {
        AuthSnapshot {
            status: self.status(),
            is_authenticated: self.is_authenticated(),
            is_loading: self.status() == AuthStatus::Authenticating,
            user: self.user().cloned(),
            error: self.visible_error(now).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(session: &mut AuthSession, email: &str, credential: &str) -> Result<User, AuthError> {
        session.begin_login()?;
        session.finish_login(email, credential, Utc::now()).cloned()
    }

    #[test]
    fn test_every_account_logs_in_with_mock_credential() {
        for (email, role) in [
            ("admin@cognizant.com", UserRole::Admin),
            ("manager@cognizant.com", UserRole::Manager),
            ("analyst@cognizant.com", UserRole::Analyst),
            ("viewer@cognizant.com", UserRole::Viewer),
        ] {
            let mut session = AuthSession::new();
            let user = login(&mut session, email, MOCK_CREDENTIAL).unwrap();
            assert_eq!(user.email, email);
            assert_eq!(user.role, role);
            assert!(user.last_login.is_some());
            assert_eq!(session.status(), AuthStatus::Authenticated);
            assert_eq!(session.visible_error(Utc::now()), None);
        }
    }

    #[test]
    fn test_bad_credentials_stay_anonymous() {
        let mut session = AuthSession::new();
        let err = login(&mut session, "admin@cognizant.com", "wrongpass").unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(session.status(), AuthStatus::Anonymous);
        assert!(session.user().is_none());
        assert_eq!(
            session.visible_error(Utc::now()),
            Some("Invalid email or password")
        );

        let mut session = AuthSession::new();
        login(&mut session, "nobody@cognizant.com", MOCK_CREDENTIAL).unwrap_err();
        assert!(session.visible_error(Utc::now()).is_some());
    }

    #[test]
    fn test_begin_login_rejects_overlap() {
        let mut session = AuthSession::new();
        session.begin_login().unwrap();
        assert_eq!(session.status(), AuthStatus::Authenticating);
        assert!(session.snapshot(Utc::now()).is_loading);
        assert_eq!(session.begin_login(), Err(AuthError::InProgress));
    }

    #[test]
    fn test_logout_resets_everything() {
        let mut session = AuthSession::new();
        login(&mut session, "viewer@cognizant.com", MOCK_CREDENTIAL).unwrap();
        session.logout();
        assert_eq!(session.status(), AuthStatus::Anonymous);
        assert!(session.user().is_none());

        let mut session = AuthSession::new();
        login(&mut session, "viewer@cognizant.com", "nope").unwrap_err();
        session.logout();
        assert_eq!(session.visible_error(Utc::now()), None);
        assert_eq!(session.status(), AuthStatus::Anonymous);
    }

    #[test]
    fn test_error_banner_lifetime() {
        let mut session = AuthSession::new();
        let raised = Utc::now();
        session.begin_login().unwrap();
        session.finish_login("admin@cognizant.com", "bad", raised).unwrap_err();

        assert!(session.visible_error(raised + Duration::seconds(4)).is_some());
        assert!(session.visible_error(raised + Duration::seconds(5)).is_none());

        session.expire_error(raised + Duration::seconds(6));
        assert!(session.visible_error(raised).is_none());
    }

    #[test]
    fn test_clear_error_keeps_status() {
        let mut session = AuthSession::new();
        login(&mut session, "admin@cognizant.com", "bad").unwrap_err();
        session.clear_error();
        assert_eq!(session.status(), AuthStatus::Anonymous);
        assert!(session.visible_error(Utc::now()).is_none());
    }
}
