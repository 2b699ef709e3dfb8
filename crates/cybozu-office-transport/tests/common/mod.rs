//! Common test utilities and helpers

use async_trait::async_trait;
use cybozu_office_transport::{HttpAdapter, HttpRequest, HttpResponse, Result, Transport};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use std::fmt;
use std::sync::{Arc, Mutex};

#[allow(dead_code)]
pub const BASE_URL: &str = "https://office.example.com/scripts/office10/ag.cgi";

/// Ticket embedded in the `FileAdd` fixture page
#[allow(dead_code)]
pub const CSRF_TICKET: &str = "9003b2751bdbd00fc31225b9bdc736b8";

type Handler = dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync;

/// In-memory adapter answering from a closure and recording every request
pub struct ScriptedAdapter {
    handler: Box<Handler>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl fmt::Debug for ScriptedAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedAdapter").finish_non_exhaustive()
    }
}

#[allow(dead_code)]
impl ScriptedAdapter {
    pub fn new(handler: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Every request seen so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn login_count(&self) -> usize {
        self.requests().iter().filter(|r| is_login(r)).count()
    }

    pub fn csrf_count(&self) -> usize {
        self.requests().iter().filter(|r| is_csrf_page(r)).count()
    }
}

#[async_trait]
impl HttpAdapter for ScriptedAdapter {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        Ok((self.handler)(&request))
    }

    fn adapter_name(&self) -> &'static str {
        "scripted"
    }
}

/// Build a response from a status, headers and body
#[allow(dead_code)]
pub fn response(status: u16, headers: &[(&str, &str)], body: &str) -> HttpResponse {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(
            HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    HttpResponse::new(StatusCode::from_u16(status).unwrap(), map, body.as_bytes().to_vec())
}

#[allow(dead_code)]
pub fn ok(body: &str) -> HttpResponse {
    response(200, &[], body)
}

/// Successful login answer issuing `token`
#[allow(dead_code)]
pub fn login_redirect(token: &str) -> HttpResponse {
    let cookie = format!("AGSESSID={}; path=/scripts/office10/; secure; HttpOnly", token);
    response(
        302,
        &[
            ("Location", "ag.cgi?"),
            ("Set-Cookie", "AGLOGINID=17; path=/"),
            ("Set-Cookie", cookie.as_str()),
        ],
        "",
    )
}

#[allow(dead_code)]
pub fn needs_login() -> HttpResponse {
    response(200, &[("X-CybozuLogin", "1")], "<html>login</html>")
}

#[allow(dead_code)]
pub fn csrf_page(ticket: &str) -> HttpResponse {
    ok(&format!(
        r#"<html><body><form name="FileAdd" method="post" enctype="multipart/form-data">
<input type="hidden" name="csrf_ticket" value="{}">
<input type="file" name="File">
</form></body></html>"#,
        ticket
    ))
}

#[allow(dead_code)]
pub fn is_login(request: &HttpRequest) -> bool {
    request.form_param("_System").as_deref() == Some("login")
}

#[allow(dead_code)]
pub fn is_csrf_page(request: &HttpRequest) -> bool {
    request.method == http::Method::GET && request.query_param("page").as_deref() == Some("FileAdd")
}

#[allow(dead_code)]
pub fn cookie(request: &HttpRequest) -> &str {
    request.header("cookie").unwrap_or_default()
}

/// Transport logging in as `u`/`p` through `adapter`
#[allow(dead_code)]
pub fn transport(adapter: Arc<ScriptedAdapter>) -> Transport {
    Transport::builder()
        .base_url(BASE_URL)
        .id("u", "p")
        .adapter(adapter)
        .build()
        .unwrap()
}
