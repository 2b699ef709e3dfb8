//! Session-aware transport
//!
//! [`Transport`] is the only way page clients talk to the endpoint. Before a
//! request that needs a session it logs in (once), before a mutating request
//! it fetches a CSRF ticket (once per session), and when the upstream answers
//! with the needs-login marker it logs in again and retries the call exactly
//! once.
//!
//! Within one call the order is strictly sequential:
//!
//! ```text
//! login? -> csrf? -> request -> [needs login] -> login -> csrf? -> request
//! ```
//!
//! Login and CSRF acquisition go through a single async gate, so concurrent
//! callers that find no session wait for the first login instead of racing
//! their own.

use crate::error::{Result, TransportError};
use crate::form::FormParams;
use crate::http::{AdapterConfig, ReqwestAdapter};
use crate::observability::{self, RequestMetadata, RequestPurpose, RequestTimer, ResponseMetadata};
use crate::session::{
    self, CSRF_FIELD, Credentials, LoginIdentity, SessionCredentials,
};
use crate::traits::{HttpAdapter, HttpRequest, HttpResponse};
use http::{Method, StatusCode};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use url::Url;

/// `Content-Type` of every request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Page fetched to obtain a CSRF ticket.
///
/// Any page with a hidden `csrf_ticket` input works; this one is small.
pub const DEFAULT_CSRF_PAGE: &str = "FileAdd";

/// How a GET response body is turned into a string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseType {
    /// Page markup, decoded as UTF-8
    #[default]
    Text,
    /// Downloaded file, decoded with [`GetOptions::encoding`] and trimmed
    File,
}

/// Character encodings used by files stored in the office
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8
    #[default]
    Utf8,
    /// Shift_JIS
    ShiftJis,
}

impl Encoding {
    /// Decode raw bytes, replacing malformed sequences.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::ShiftJis => encoding_rs::SHIFT_JIS.decode(bytes).0.into_owned(),
        }
    }

    /// The encoding's conventional label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::ShiftJis => "Shift_JIS",
        }
    }
}

/// Options for [`Transport::get`]
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Extra path segment appended to the base URL (file downloads)
    pub path: Option<String>,
    /// Query parameters
    pub query: FormParams,
    /// How to decode the body
    pub response_type: ResponseType,
    /// Encoding used when `response_type` is [`ResponseType::File`]
    pub encoding: Encoding,
}

impl GetOptions {
    /// A text GET with the given query.
    pub fn query(query: FormParams) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    /// A file download at `path` with the given query and encoding.
    pub fn file(path: impl Into<String>, query: FormParams, encoding: Encoding) -> Self {
        Self {
            path: Some(path.into()),
            query,
            response_type: ResponseType::File,
            encoding,
        }
    }

    /// Set the extra path segment.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// One logical request, before session details are filled in.
#[derive(Debug, Clone)]
struct RequestIntent {
    method: Method,
    path: Option<String>,
    query: FormParams,
    body: Option<FormParams>,
    ensures_logged_in: bool,
    purpose: RequestPurpose,
}

impl RequestIntent {
    fn get(path: Option<String>, query: FormParams) -> Self {
        Self {
            method: Method::GET,
            path,
            query,
            body: None,
            ensures_logged_in: true,
            purpose: RequestPurpose::Call,
        }
    }

    fn post(body: FormParams) -> Self {
        Self {
            method: Method::POST,
            path: None,
            query: FormParams::new(),
            body: Some(body),
            ensures_logged_in: true,
            purpose: RequestPurpose::Call,
        }
    }

    fn login(form: FormParams) -> Self {
        Self {
            ensures_logged_in: false,
            purpose: RequestPurpose::Login,
            ..Self::post(form)
        }
    }

    fn csrf_page(page: &str) -> Self {
        Self {
            ensures_logged_in: false,
            purpose: RequestPurpose::CsrfTicket,
            ..Self::get(None, FormParams::new().with("page", page))
        }
    }

    fn page(&self) -> Option<&str> {
        self.query
            .get("page")
            .or_else(|| self.body.as_ref().and_then(|b| b.get("page")))
    }
}

/// Result of one pass through the pipeline
enum Attempt {
    /// Final response for this pass
    Done(HttpResponse),
    /// The upstream wants a fresh login; `stale_cookie` is what was sent
    NeedsLogin {
        response: Option<HttpResponse>,
        stale_cookie: Option<String>,
    },
}

/// Session-aware transport for the office CGI endpoint.
///
/// # Example
///
/// ```rust,no_run
/// use cybozu_office_transport::{FormParams, GetOptions, Transport};
///
/// # async fn example() -> cybozu_office_transport::Result<()> {
/// let transport = Transport::builder()
///     .base_url("https://office.example.com/scripts/office10/ag.cgi")
///     .id("17", "password")
///     .build()?;
///
/// let page = transport
///     .get(GetOptions::query(FormParams::new().with("page", "UserListIndex")))
///     .await?;
/// transport
///     .post(FormParams::new().with("page", "AjaxBulletinFollowAdd").with("BID", 3))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Transport {
    base_url: Url,
    credentials: Credentials,
    csrf_page: String,
    adapter: Arc<dyn HttpAdapter>,
    session: RwLock<Option<SessionCredentials>>,
    bootstrap: Mutex<()>,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .field("identity", &self.credentials.identity)
            .field("csrf_page", &self.csrf_page)
            .field("adapter", &self.adapter.adapter_name())
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Create a new builder for configuring the transport.
    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    /// Perform a GET and return the decoded body.
    ///
    /// Logs in first if no session exists yet.
    ///
    /// # Errors
    ///
    /// Returns an office error if the upstream reports one or the session
    /// cannot be established, or an I/O error from the adapter.
    pub async fn get(&self, options: GetOptions) -> Result<String> {
        let GetOptions {
            path,
            query,
            response_type,
            encoding,
        } = options;

        let response = self.send_request(&RequestIntent::get(path, query)).await?;

        Ok(match response_type {
            ResponseType::Text => response.text(),
            ResponseType::File => {
                observability::log_file_decoded(encoding.label(), response.body.len());
                encoding.decode(&response.body).trim().to_string()
            }
        })
    }

    /// Perform a form POST. Success is the absence of an error.
    ///
    /// Logs in and fetches a CSRF ticket first when needed; the ticket is
    /// appended to the body as `csrf_ticket`.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn post(&self, body: FormParams) -> Result<()> {
        self.send_request(&RequestIntent::post(body)).await?;
        Ok(())
    }

    /// Snapshot of the current session, if any.
    pub async fn session_credentials(&self) -> Option<SessionCredentials> {
        self.session.read().await.clone()
    }

    /// Drop the current session; the next call logs in again.
    pub async fn clear_session(&self) {
        let _gate = self.bootstrap.lock().await;
        *self.session.write().await = None;
    }

    /// The endpoint URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Name of the HTTP adapter in use.
    pub fn adapter_name(&self) -> &'static str {
        self.adapter.adapter_name()
    }

    /// Run an intent with at most one transparent re-login.
    async fn send_request(&self, intent: &RequestIntent) -> Result<HttpResponse> {
        let mut refreshed = false;
        loop {
            match self.attempt(intent, !refreshed).await? {
                Attempt::Done(response) => return Ok(response),
                Attempt::NeedsLogin {
                    response,
                    stale_cookie,
                } => {
                    if refreshed {
                        // Only reachable through the main request: the CSRF
                        // step never asks for a refresh once one happened.
                        return response.ok_or(TransportError::CsrfTicket);
                    }
                    observability::log_session_refresh();
                    self.refresh_session(stale_cookie.as_deref()).await?;
                    refreshed = true;
                }
            }
        }
    }

    async fn attempt(&self, intent: &RequestIntent, may_refresh: bool) -> Result<Attempt> {
        if intent.ensures_logged_in {
            self.ensure_session().await?;

            if intent.method == Method::POST
                && let Some(stale_cookie) = self.ensure_csrf_ticket(may_refresh).await?
            {
                return Ok(Attempt::NeedsLogin {
                    response: None,
                    stale_cookie,
                });
            }
        }

        let (request, cookie) = self.build_request(intent).await?;
        let response = self.dispatch(request, intent).await?;

        if intent.ensures_logged_in && session::needs_login(&response) {
            return Ok(Attempt::NeedsLogin {
                response: Some(response),
                stale_cookie: cookie,
            });
        }

        Ok(Attempt::Done(response))
    }

    async fn ensure_session(&self) -> Result<()> {
        if self.session.read().await.is_some() {
            return Ok(());
        }

        let _gate = self.bootstrap.lock().await;
        if self.session.read().await.is_some() {
            return Ok(());
        }
        self.initialize_session().await
    }

    /// Returns `Some(stale_cookie)` when the CSRF page itself reported an
    /// expired session and a refresh is still allowed.
    async fn ensure_csrf_ticket(&self, may_refresh: bool) -> Result<Option<Option<String>>> {
        if self.has_csrf_ticket().await {
            return Ok(None);
        }

        let _gate = self.bootstrap.lock().await;
        if self.has_csrf_ticket().await {
            return Ok(None);
        }
        // Cleared since `ensure_session`
        if self.session.read().await.is_none() {
            self.initialize_session().await?;
        }

        let intent = RequestIntent::csrf_page(&self.csrf_page);
        let (request, cookie) = self.build_request(&intent).await?;
        let response = self.dispatch(request, &intent).await?;

        if may_refresh && session::needs_login(&response) {
            return Ok(Some(cookie));
        }

        let ticket = session::extract_csrf_ticket(&response.text())?;
        let mut guard = self.session.write().await;
        let current = guard.as_mut().ok_or(TransportError::CsrfTicket)?;
        current.csrf_ticket = Some(ticket);
        observability::log_csrf_acquired();
        Ok(None)
    }

    async fn has_csrf_ticket(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.csrf_ticket.is_some())
    }

    /// Log in again unless a concurrent call already replaced `stale_cookie`.
    async fn refresh_session(&self, stale_cookie: Option<&str>) -> Result<()> {
        let _gate = self.bootstrap.lock().await;

        let current = self.session.read().await.as_ref().map(|s| s.cookie.clone());
        if let Some(current) = current
            && Some(current.as_str()) != stale_cookie
        {
            observability::log_session_already_refreshed();
            return Ok(());
        }

        self.initialize_session().await
    }

    /// Submit the login form and store the new session. Caller holds the gate.
    async fn initialize_session(&self) -> Result<()> {
        let identity_kind = match self.credentials.identity {
            LoginIdentity::Id(_) => "id",
            LoginIdentity::Account(_) => "account",
        };
        observability::log_login_started(identity_kind);

        let intent = RequestIntent::login(session::login_form(&self.credentials));
        let (request, _) = self.build_request(&intent).await?;
        let response = self.dispatch(request, &intent).await?;

        let fresh = session::extract_session_cookie(&response)?;
        *self.session.write().await = Some(fresh);
        observability::log_session_established();
        Ok(())
    }

    /// Fill in URL, cookie and body. Returns the cookie that was attached.
    async fn build_request(&self, intent: &RequestIntent) -> Result<(HttpRequest, Option<String>)> {
        let session = self.session.read().await.clone();
        let cookie = session.as_ref().map(|s| s.cookie.clone());

        let mut request = HttpRequest::new(intent.method.clone(), self.request_url(intent)?)
            .with_header("cookie", cookie.as_deref().unwrap_or(""))?;

        if let Some(body) = &intent.body {
            let mut body = body.clone();
            if intent.method == Method::POST
                && let Some(ticket) = session.as_ref().and_then(|s| s.csrf_ticket.as_ref())
            {
                body.push(CSRF_FIELD, ticket);
            }
            request = request
                .with_header("content-type", FORM_CONTENT_TYPE)?
                .with_body(body.encode().into_bytes());
        }

        Ok((request, cookie))
    }

    fn request_url(&self, intent: &RequestIntent) -> Result<Url> {
        let mut url = self.base_url.clone();

        if let Some(path) = &intent.path {
            url.path_segments_mut()
                .map_err(|_| TransportError::InvalidUrl("Base URL cannot take a path".to_string()))?
                .pop_if_empty()
                .push(path);
        }

        if !intent.query.is_empty() {
            url.set_query(Some(&intent.query.encode()));
        }

        Ok(url)
    }

    /// Send through the adapter and validate the response.
    async fn dispatch(&self, request: HttpRequest, intent: &RequestIntent) -> Result<HttpResponse> {
        let mut metadata = RequestMetadata::new(intent.method.as_str(), intent.purpose)
            .with_page(intent.page());
        if let Some(body) = &request.body {
            metadata = metadata.with_body_size(body.len());
        }
        metadata.log_request();

        let timer = RequestTimer::start();
        let response = match self.adapter.send(request).await {
            Ok(response) => response,
            Err(err) => {
                ResponseMetadata::new(0, 0, timer.elapsed()).log_error(&metadata, &err.to_string());
                return Err(err);
            }
        };

        let response_metadata =
            ResponseMetadata::new(response.status.as_u16(), response.body.len(), timer.elapsed());
        if let Err(err) = validate_response(&response) {
            response_metadata.log_error(&metadata, &err.to_string());
            return Err(err);
        }
        response_metadata.log_success(&metadata);

        Ok(response)
    }
}

/// Error header first, then the status check (200 and 302 only).
fn validate_response(response: &HttpResponse) -> Result<()> {
    session::check_error_header(response)?;

    match response.status {
        StatusCode::OK | StatusCode::FOUND => Ok(()),
        status => Err(TransportError::UnexpectedStatus(status.as_u16())),
    }
}

/// Builder for creating a [`Transport`] with custom configuration.
///
/// # Example
///
/// ```rust,no_run
/// use cybozu_office_transport::Transport;
/// use std::time::Duration;
///
/// let transport = Transport::builder()
///     .base_url("https://office.example.com/scripts/office10/ag.cgi")
///     .account("takahashi", "password")
///     .timeout(Duration::from_secs(30))
///     .accept_invalid_certs(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct TransportBuilder {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    session: Option<SessionCredentials>,
    csrf_page: Option<String>,
    adapter_config: AdapterConfig,
    adapter: Option<Arc<dyn HttpAdapter>>,
}

impl TransportBuilder {
    /// Set the endpoint URL (everything up to and including `ag.cgi`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the login credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Log in with the numeric user id.
    pub fn id(self, id: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials(Credentials::with_id(id, password))
    }

    /// Log in with the account name.
    pub fn account(self, account: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials(Credentials::with_account(account, password))
    }

    /// Start from an existing session instead of logging in.
    pub fn session(mut self, session: SessionCredentials) -> Self {
        self.session = Some(session);
        self
    }

    /// Override the page fetched for CSRF tickets.
    ///
    /// Defaults to [`DEFAULT_CSRF_PAGE`].
    pub fn csrf_page(mut self, page: impl Into<String>) -> Self {
        self.csrf_page = Some(page.into());
        self
    }

    /// Set the request timeout of the default adapter.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.adapter_config.timeout = timeout;
        self
    }

    /// Accept invalid TLS certificates in the default adapter.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.adapter_config.accept_invalid_certs = accept;
        self
    }

    /// Replace the whole default adapter configuration.
    pub fn adapter_config(mut self, config: AdapterConfig) -> Self {
        self.adapter_config = config;
        self
    }

    /// Use a custom adapter instead of the reqwest one.
    pub fn adapter(mut self, adapter: Arc<dyn HttpAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The base URL is missing, empty, unparsable or not http(s)
    /// - No credentials were given
    /// - The default HTTP client cannot be created
    pub fn build(self) -> Result<Transport> {
        let base_url = parse_base_url(self.base_url.as_deref().unwrap_or(""))?;

        let credentials = self
            .credentials
            .ok_or_else(|| TransportError::Config("Login credentials are required".to_string()))?;

        let adapter: Arc<dyn HttpAdapter> = match self.adapter {
            Some(adapter) => adapter,
            None => Arc::new(ReqwestAdapter::with_config(self.adapter_config)?),
        };

        Ok(Transport {
            base_url,
            credentials,
            csrf_page: self
                .csrf_page
                .unwrap_or_else(|| DEFAULT_CSRF_PAGE.to_string()),
            adapter,
            session: RwLock::new(self.session),
            bootstrap: Mutex::new(()),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(TransportError::InvalidUrl(
            "Base URL cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(TransportError::InvalidUrl(format!(
            "Invalid URL scheme '{}'. Only 'http' and 'https' are supported.",
            scheme
        ))),
    }
}
