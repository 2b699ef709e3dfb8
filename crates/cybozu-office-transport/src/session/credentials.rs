//! Login identity and session credentials

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Which login field identifies the user.
///
/// The upstream accepts either the numeric user id (`_ID`) or the login
/// account name (`_Account`, submitted together with `LoginMethod=2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentity {
    /// Numeric user id, sent as `_ID`
    Id(String),
    /// Login account name, sent as `_Account`
    Account(String),
}

/// Login identity plus password.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Who logs in
    pub identity: LoginIdentity,
    /// Login password
    pub password: SecretString,
}

impl Credentials {
    /// Credentials that log in with the numeric user id.
    pub fn with_id(id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identity: LoginIdentity::Id(id.into()),
            password: SecretString::new(password.into().into_boxed_str()),
        }
    }

    /// Credentials that log in with the account name.
    pub fn with_account(account: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identity: LoginIdentity::Account(account.into()),
            password: SecretString::new(password.into().into_boxed_str()),
        }
    }
}

/// An authenticated session.
///
/// `cookie` is the full `Cookie` header value (`AGSESSID=<token>`). The CSRF
/// ticket belongs to the session that issued it and is dropped whenever the
/// cookie is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredentials {
    /// Session cookie, e.g. `AGSESSID=6e85000b30625dba`
    pub cookie: String,
    /// Anti-forgery ticket for mutating requests, fetched lazily
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_ticket: Option<String>,
}

impl SessionCredentials {
    /// A fresh session with no CSRF ticket yet.
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            csrf_ticket: None,
        }
    }

    /// A session seeded with both cookie and ticket.
    pub fn with_csrf_ticket(cookie: impl Into<String>, ticket: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            csrf_ticket: Some(ticket.into()),
        }
    }

    /// Build the cookie header value from a bare `AGSESSID` token.
    pub fn from_session_id(token: &str) -> Self {
        Self::new(format!("{}={}", super::SESSION_COOKIE_NAME, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_credentials_constructors() {
        let by_id = Credentials::with_id("17", "secret");
        assert_eq!(by_id.identity, LoginIdentity::Id("17".to_string()));
        assert_eq!(by_id.password.expose_secret(), "secret");

        let by_account = Credentials::with_account("takahashi", "secret");
        assert_eq!(
            by_account.identity,
            LoginIdentity::Account("takahashi".to_string())
        );
    }

    #[test]
    fn test_password_is_redacted_in_debug() {
        let credentials = Credentials::with_id("17", "hunter2");
        assert!(!format!("{:?}", credentials).contains("hunter2"));
    }

    #[test]
    fn test_session_from_token() {
        let session = SessionCredentials::from_session_id("abc123");
        assert_eq!(session.cookie, "AGSESSID=abc123");
        assert_eq!(session.csrf_ticket, None);
    }

    #[test]
    fn test_session_serde_round_trip_omits_missing_ticket() {
        let json = serde_json::to_string(&SessionCredentials::new("AGSESSID=x")).unwrap();
        assert_eq!(json, r#"{"cookie":"AGSESSID=x"}"#);

        let seeded: SessionCredentials =
            serde_json::from_str(r#"{"cookie":"AGSESSID=x","csrf_ticket":"t"}"#).unwrap();
        assert_eq!(seeded, SessionCredentials::with_csrf_ticket("AGSESSID=x", "t"));
    }
}
