//! Main client implementation for Cybozu Office

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use cybozu_office_transport::{HttpAdapter, SessionCredentials, Transport};
use secrecy::SecretString;

use crate::{
    config::{ClientConfig, parse_session},
    error::{Error, Result},
    resources::{Bulletins, Files, Folders, Messages, Users},
};

/// Main client for a Cybozu Office 10 installation.
///
/// All page clients share one [`Transport`], and with it one session:
/// the first call logs in, later calls reuse the cookie, and an expired
/// session is renewed transparently.
///
/// # Example
///
/// ```rust,no_run
/// use cybozu_office::Client;
///
/// # async fn example() -> cybozu_office::Result<()> {
/// let client = Client::builder()
///     .base_url("https://office.example.com/scripts/office10/ag.cgi")
///     .id("17")
///     .password("password")
///     .build()?;
///
/// let members = client.users().group_members(13).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<Transport>,

    // Lazy-initialized resources; each shares the transport, never the client
    messages: OnceLock<Messages>,
    folders: OnceLock<Folders>,
    users: OnceLock<Users>,
    files: OnceLock<Files>,
    bulletins: OnceLock<Bulletins>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.inner.transport)
            .finish()
    }
}

impl Client {
    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client around an existing transport.
    pub fn from_transport(transport: Transport) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport: Arc::new(transport),
                messages: OnceLock::new(),
                folders: OnceLock::new(),
                users: OnceLock::new(),
                files: OnceLock::new(),
                bulletins: OnceLock::new(),
            }),
        }
    }

    /// Create a client from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is missing or invalid, or the login
    /// identity or password is missing.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::from_parts(config, None)
    }

    /// Load configuration from the environment and build a client.
    ///
    /// See [`ClientConfig::from_env`] for the variables read.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    fn from_parts(config: ClientConfig, adapter: Option<Arc<dyn HttpAdapter>>) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| Error::MissingConfig("base_url".to_string()))?;

        let mut builder = Transport::builder()
            .base_url(base_url)
            .credentials(config.credentials()?)
            .adapter_config(config.adapter_config());

        if let Some(session) = config.session {
            builder = builder.session(session);
        }
        if let Some(page) = config.csrf_page {
            builder = builder.csrf_page(page);
        }
        if let Some(adapter) = adapter {
            builder = builder.adapter(adapter);
        }

        Ok(Self::from_transport(builder.build()?))
    }

    /// Access personal folder messages: send, edit, comment, receivers.
    pub fn messages(&self) -> &Messages {
        self.inner
            .messages
            .get_or_init(|| Messages::new(self.inner.transport.clone()))
    }

    /// Access personal folder listings.
    pub fn folders(&self) -> &Folders {
        self.inner
            .folders
            .get_or_init(|| Folders::new(self.inner.transport.clone()))
    }

    /// Access the user directory.
    pub fn users(&self) -> &Users {
        self.inner
            .users
            .get_or_init(|| Users::new(self.inner.transport.clone()))
    }

    /// Access file downloads.
    pub fn files(&self) -> &Files {
        self.inner
            .files
            .get_or_init(|| Files::new(self.inner.transport.clone()))
    }

    /// Access bulletin boards.
    pub fn bulletins(&self) -> &Bulletins {
        self.inner
            .bulletins
            .get_or_init(|| Bulletins::new(self.inner.transport.clone()))
    }

    /// The shared session transport.
    pub fn transport(&self) -> &Transport {
        &self.inner.transport
    }

    /// Snapshot of the current session, e.g. to persist it for a later run.
    pub async fn session_credentials(&self) -> Option<SessionCredentials> {
        self.inner.transport.session_credentials().await
    }
}

/// Builder for creating a configured Client.
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    adapter: Option<Arc<dyn HttpAdapter>>,
}

impl ClientBuilder {
    /// Start from an existing configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the endpoint URL (up to and including `ag.cgi`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Log in with the numeric user id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.config.id = Some(id.into());
        self
    }

    /// Log in with the account name.
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.config.account = Some(account.into());
        self
    }

    /// Set the login password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(SecretString::new(password.into().into_boxed_str()));
        self
    }

    /// Start from a still-valid session.
    pub fn session(mut self, session: SessionCredentials) -> Self {
        self.config.session = Some(session);
        self
    }

    /// Start from a still-valid cookie (`AGSESSID=...` or the bare token).
    pub fn cookie(self, cookie: impl AsRef<str>) -> Self {
        self.session(parse_session(cookie.as_ref()))
    }

    /// Override the page fetched for CSRF tickets.
    pub fn csrf_page(mut self, page: impl Into<String>) -> Self {
        self.config.csrf_page = Some(page.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Accept self-signed TLS certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    /// Use a custom HTTP adapter instead of reqwest.
    pub fn adapter(mut self, adapter: Arc<dyn HttpAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::from_parts(self.config, self.adapter)
    }
}
