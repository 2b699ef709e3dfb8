//! Common test utilities and helpers

use cybozu_office::Client;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const AG_PATH: &str = "/scripts/office10/ag.cgi";

pub const SESSION: &str = "AGSESSID=6e85000b30625dba";

#[allow(dead_code)]
pub const CSRF_TICKET: &str = "9003b2751bdbd00fc31225b9bdc736b8";

/// Load an HTML fixture from `tests/fixtures`
#[allow(dead_code)]
pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {}: {}", path, e))
}

pub fn base_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), AG_PATH)
}

/// Install a test subscriber once; `RUST_LOG` controls the output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Client logging in with id `17` against the mock server
pub fn client(server: &MockServer) -> Client {
    init_tracing();
    Client::builder()
        .base_url(base_url(server))
        .id("17")
        .password("password")
        .build()
        .unwrap()
}

/// Answer logins with the test session cookie
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(AG_PATH))
        .and(body_string_contains("_System=login"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "ag.cgi?")
                .append_header(
                    "set-cookie",
                    format!("{}; path=/scripts/office10/; secure; HttpOnly", SESSION).as_str(),
                ),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Serve the CSRF ticket page to the logged-in session
#[allow(dead_code)]
pub async fn mount_csrf_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(AG_PATH))
        .and(query_param("page", "FileAdd"))
        .and(header("cookie", SESSION))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("csrf_page.html")))
        .expect(1)
        .mount(server)
        .await;
}

/// Serve `body` for GET `page=<page>` to the logged-in session
#[allow(dead_code)]
pub async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(AG_PATH))
        .and(query_param("page", page))
        .and(header("cookie", SESSION))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}
