//! Session bootstrap: login form, session cookie and CSRF ticket
//!
//! These are the pure pieces of the login flow. The [`crate::Transport`]
//! decides when to run them; this module only knows the wire format.

mod credentials;

pub use credentials::{Credentials, LoginIdentity, SessionCredentials};

use crate::error::{Result, TransportError};
use crate::form::FormParams;
use crate::traits::HttpResponse;
use regex::Regex;
use secrecy::ExposeSecret;
use std::sync::LazyLock;

/// Name of the session cookie issued on login.
pub const SESSION_COOKIE_NAME: &str = "AGSESSID";

/// Form field that carries the CSRF ticket on mutating requests.
pub const CSRF_FIELD: &str = "csrf_ticket";

/// Response header flagging that the session is no longer valid.
pub const NEEDS_LOGIN_HEADER: &str = "x-cybozulogin";

/// Response header carrying an upstream application error code.
pub const ERROR_HEADER: &str = "x-cybozu-error";

static SESSION_COOKIE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[;\s])AGSESSID=([^;\s]*)(?:;|$)").expect("session cookie pattern")
});

static CSRF_TICKET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<input\s+type="hidden"\s+name="csrf_ticket"\s+value="([^"]*)"\s*/?>"#,
    )
    .expect("csrf ticket pattern")
});

/// Build the login submission for the given credentials.
///
/// `_ID` logins send `_ID`, `Password`, `_System=login`, `_Login=1`;
/// account logins send `_Account` instead of `_ID` and add `LoginMethod=2`.
pub fn login_form(credentials: &Credentials) -> FormParams {
    let mut form = FormParams::new();
    match &credentials.identity {
        LoginIdentity::Id(id) => form.push("_ID", id),
        LoginIdentity::Account(account) => form.push("_Account", account),
    }
    form.push("Password", credentials.password.expose_secret());
    form.push("_System", "login");
    form.push("_Login", 1);
    if matches!(credentials.identity, LoginIdentity::Account(_)) {
        form.push("LoginMethod", 2);
    }
    form
}

/// Pull the session cookie out of a login response.
///
/// Every `Set-Cookie` header is inspected in order and the first `AGSESSID`
/// token wins. The returned credentials carry no CSRF ticket.
///
/// # Errors
///
/// Returns [`TransportError::SessionCookie`] when the response has no
/// `Set-Cookie` header at all, or when none of them carries `AGSESSID`.
pub fn extract_session_cookie(response: &HttpResponse) -> Result<SessionCredentials> {
    let set_cookies = response.header_values("set-cookie");
    if set_cookies.is_empty() {
        return Err(TransportError::SessionCookie(
            "Failed to get session cookie".to_string(),
        ));
    }

    set_cookies
        .iter()
        .find_map(|header| SESSION_COOKIE_RE.captures(header))
        .and_then(|caps| caps.get(1))
        .filter(|token| !token.as_str().is_empty())
        .map(|token| SessionCredentials::from_session_id(token.as_str()))
        .ok_or_else(|| TransportError::SessionCookie("Failed to extract AGSESSID".to_string()))
}

/// Find the hidden `csrf_ticket` input in a page.
///
/// # Errors
///
/// Returns [`TransportError::CsrfTicket`] when the page has no such input.
pub fn extract_csrf_ticket(page: &str) -> Result<String> {
    CSRF_TICKET_RE
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|ticket| ticket.as_str().to_string())
        .ok_or(TransportError::CsrfTicket)
}

/// Surface the upstream error header as a typed error.
///
/// # Errors
///
/// Returns [`TransportError::Application`] carrying the header value when the
/// header is present, whatever the status code.
pub fn check_error_header(response: &HttpResponse) -> Result<()> {
    match response.headers.get(ERROR_HEADER) {
        Some(value) => Err(TransportError::Application(
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        )),
        None => Ok(()),
    }
}

/// Whether the response asks for a fresh login.
pub fn needs_login(response: &HttpResponse) -> bool {
    response.header(NEEDS_LOGIN_HEADER) == Some("1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue, StatusCode};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn response_with(headers: &[(&'static str, &'static str)]) -> HttpResponse {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(*name, HeaderValue::from_static(*value));
        }
        HttpResponse::new(StatusCode::FOUND, map, Vec::new())
    }

    #[test]
    fn test_login_form_with_id() {
        let form = login_form(&Credentials::with_id("u", "p"));
        assert_eq!(form.encode(), "_ID=u&Password=p&_System=login&_Login=1");
    }

    #[test]
    fn test_login_form_with_account() {
        let form = login_form(&Credentials::with_account("takahashi", "p@ss word"));
        assert_eq!(
            form.encode(),
            "_Account=takahashi&Password=p%40ss+word&_System=login&_Login=1&LoginMethod=2"
        );
    }

    #[test]
    fn test_extract_session_cookie_from_first_matching_header() {
        let response = response_with(&[
            ("set-cookie", "AGLOGINID=17; expires=Thu, 23-Jan-2025 14:20:07 GMT; path=/"),
            (
                "set-cookie",
                "AGSESSID=6e85000b30625dba981127762ce00c9fb25b0419a8febfda; path=/scripts/office10/; secure; HttpOnly",
            ),
        ]);

        let session = extract_session_cookie(&response).unwrap();
        assert_eq!(
            session.cookie,
            "AGSESSID=6e85000b30625dba981127762ce00c9fb25b0419a8febfda"
        );
        assert_eq!(session.csrf_ticket, None);
    }

    #[rstest]
    #[case("AGSESSID=TOKEN; path=/", "AGSESSID=TOKEN")]
    #[case("agsessid=lower; HttpOnly", "AGSESSID=lower")]
    #[case("AGSESSID=last", "AGSESSID=last")]
    fn test_extract_session_cookie_variants(#[case] header: &'static str, #[case] expected: &str) {
        let response = response_with(&[("set-cookie", header)]);
        assert_eq!(extract_session_cookie(&response).unwrap().cookie, expected);
    }

    #[test]
    fn test_missing_set_cookie_is_fatal() {
        let err = extract_session_cookie(&response_with(&[])).unwrap_err();
        assert_eq!(err.to_string(), "Failed to get session cookie");
        assert!(err.is_office_error());
    }

    #[rstest]
    #[case("AGLOGINID=17; path=/")]
    #[case("XAGSESSID=nope; path=/")]
    #[case("AGSESSID=; path=/")]
    fn test_unmatched_set_cookie_is_fatal(#[case] header: &'static str) {
        let err = extract_session_cookie(&response_with(&[("set-cookie", header)])).unwrap_err();
        assert_eq!(err.to_string(), "Failed to extract AGSESSID");
    }

    #[rstest]
    #[case(r#"<input type="hidden" name="csrf_ticket" value="9003b2751bdbd00fc31225b9bdc736b8">"#)]
    #[case(r#"<INPUT TYPE="hidden" NAME="csrf_ticket" VALUE="9003b2751bdbd00fc31225b9bdc736b8" />"#)]
    fn test_extract_csrf_ticket(#[case] input: &str) {
        let page = format!("<form method=\"post\">{}<input type=\"submit\"></form>", input);
        assert_eq!(
            extract_csrf_ticket(&page).unwrap(),
            "9003b2751bdbd00fc31225b9bdc736b8"
        );
    }

    #[test]
    fn test_missing_csrf_ticket_is_fatal() {
        let err = extract_csrf_ticket("<html><body>login</body></html>").unwrap_err();
        assert!(matches!(err, TransportError::CsrfTicket));
    }

    #[test]
    fn test_error_header_wins_regardless_of_status() {
        let mut headers = HeaderMap::new();
        headers.insert("x-cybozu-error", HeaderValue::from_static("10101"));
        let response = HttpResponse::new(StatusCode::OK, headers, Vec::new());

        let err = check_error_header(&response).unwrap_err();
        assert_eq!(err.error_code(), Some("10101"));
        assert!(check_error_header(&response_with(&[])).is_ok());
    }

    #[rstest]
    #[case(&[("x-cybozulogin", "1")], true)]
    #[case(&[("x-cybozulogin", "0")], false)]
    #[case(&[], false)]
    fn test_needs_login(#[case] headers: &[(&'static str, &'static str)], #[case] expected: bool) {
        assert_eq!(needs_login(&response_with(headers)), expected);
    }
}
