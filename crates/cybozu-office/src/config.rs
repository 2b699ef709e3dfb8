//! Configuration for the Cybozu Office client

use crate::error::{Error, Result};
use cybozu_office_transport::{AdapterConfig, Credentials, SessionCredentials};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Configuration for the Cybozu Office client.
///
/// Exactly one of `id` and `account` identifies the user; when both are set
/// `id` wins.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint URL, up to and including `ag.cgi`
    pub base_url: Option<String>,

    /// Numeric user id (`_ID` login)
    pub id: Option<String>,

    /// Login account name (`_Account` login)
    pub account: Option<String>,

    /// Login password
    pub password: Option<SecretString>,

    /// Still-valid session to start from instead of logging in
    pub session: Option<SessionCredentials>,

    /// Page fetched for CSRF tickets (defaults to `FileAdd`)
    pub csrf_page: Option<String>,

    /// Request timeout
    pub timeout: Duration,

    /// Accept self-signed TLS certificates
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            id: None,
            account: None,
            password: None,
            session: None,
            csrf_page: None,
            timeout: Duration::from_secs(60),
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    /// Create a configuration that logs in with the numeric user id.
    pub fn with_id(
        base_url: impl Into<String>,
        id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: Some(base_url.into()),
            id: Some(id.into()),
            password: Some(SecretString::new(password.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first, if present.
    /// This will look for:
    /// - `CYBOZU_OFFICE_BASE_URL` for the endpoint URL
    /// - `CYBOZU_OFFICE_ID` or `CYBOZU_OFFICE_ACCOUNT` for the login identity
    /// - `CYBOZU_OFFICE_PASSWORD` for the password
    /// - `CYBOZU_OFFICE_SESSION` for an existing session (`AGSESSID=...` or the bare token)
    /// - `CYBOZU_OFFICE_TIMEOUT` for request timeout (in seconds)
    /// - `CYBOZU_OFFICE_INSECURE` (`1`/`true`) to accept invalid certificates
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(base_url) = env::var("CYBOZU_OFFICE_BASE_URL") {
            config.base_url = Some(base_url);
        }

        // Identity
        if let Ok(id) = env::var("CYBOZU_OFFICE_ID") {
            config.id = Some(id);
        }
        if let Ok(account) = env::var("CYBOZU_OFFICE_ACCOUNT") {
            config.account = Some(account);
        }
        if let Ok(password) = env::var("CYBOZU_OFFICE_PASSWORD") {
            config.password = Some(SecretString::new(password.into_boxed_str()));
        }

        if let Ok(session) = env::var("CYBOZU_OFFICE_SESSION")
            && !session.trim().is_empty()
        {
            config.session = Some(parse_session(session.trim()));
        }

        // Timeout
        if let Ok(timeout_str) = env::var("CYBOZU_OFFICE_TIMEOUT")
            && let Ok(timeout_secs) = timeout_str.parse::<u64>()
        {
            config.timeout = Duration::from_secs(timeout_secs);
        }

        if let Ok(insecure) = env::var("CYBOZU_OFFICE_INSECURE") {
            config.accept_invalid_certs =
                matches!(insecure.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }

    /// Login credentials from the configured identity and password.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] when no identity or no password is set.
    pub fn credentials(&self) -> Result<Credentials> {
        let password = self
            .password
            .as_ref()
            .ok_or_else(|| Error::MissingConfig("password".to_string()))?
            .expose_secret();

        match (&self.id, &self.account) {
            (Some(id), _) => Ok(Credentials::with_id(id.as_str(), password)),
            (None, Some(account)) => Ok(Credentials::with_account(account.as_str(), password)),
            (None, None) => Err(Error::MissingConfig("id or account".to_string())),
        }
    }

    /// Settings for the default HTTP adapter.
    pub fn adapter_config(&self) -> AdapterConfig {
        AdapterConfig {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
            ..AdapterConfig::default()
        }
    }
}

/// Accept either a full cookie (`AGSESSID=...`) or the bare token.
pub(crate) fn parse_session(raw: &str) -> SessionCredentials {
    if raw.contains('=') {
        SessionCredentials::new(raw)
    } else {
        SessionCredentials::from_session_id(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cybozu_office_transport::LoginIdentity;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(!config.accept_invalid_certs);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_credentials_prefer_id() {
        let mut config = ClientConfig::with_id("https://office.example.com/ag.cgi", "17", "pw");
        config.account = Some("takahashi".to_string());

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.identity, LoginIdentity::Id("17".to_string()));
        assert_eq!(credentials.password.expose_secret(), "pw");
    }

    #[test]
    fn test_credentials_with_account() {
        let config = ClientConfig {
            account: Some("takahashi".to_string()),
            password: Some(SecretString::new("pw".into())),
            ..Default::default()
        };
        assert_eq!(
            config.credentials().unwrap().identity,
            LoginIdentity::Account("takahashi".to_string())
        );
    }

    #[test]
    fn test_credentials_require_password_and_identity() {
        let no_password = ClientConfig {
            id: Some("17".to_string()),
            ..Default::default()
        };
        assert!(matches!(no_password.credentials(), Err(Error::MissingConfig(_))));

        let no_identity = ClientConfig {
            password: Some(SecretString::new("pw".into())),
            ..Default::default()
        };
        assert!(matches!(no_identity.credentials(), Err(Error::MissingConfig(_))));
    }

    #[test]
    fn test_parse_session() {
        assert_eq!(parse_session("AGSESSID=abc").cookie, "AGSESSID=abc");
        assert_eq!(parse_session("abc").cookie, "AGSESSID=abc");
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("CYBOZU_OFFICE_BASE_URL", Some("https://office.example.com/ag.cgi")),
                ("CYBOZU_OFFICE_ID", None),
                ("CYBOZU_OFFICE_ACCOUNT", Some("takahashi")),
                ("CYBOZU_OFFICE_PASSWORD", Some("secret")),
                ("CYBOZU_OFFICE_SESSION", Some("6e85000b30625dba")),
                ("CYBOZU_OFFICE_TIMEOUT", Some("15")),
                ("CYBOZU_OFFICE_INSECURE", Some("true")),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert_eq!(
                    config.base_url.as_deref(),
                    Some("https://office.example.com/ag.cgi")
                );
                assert_eq!(config.account.as_deref(), Some("takahashi"));
                assert_eq!(
                    config.session.as_ref().map(|s| s.cookie.as_str()),
                    Some("AGSESSID=6e85000b30625dba")
                );
                assert_eq!(config.timeout, Duration::from_secs(15));
                assert!(config.accept_invalid_certs);
                assert!(config.credentials().is_ok());
            },
        );
    }
}
