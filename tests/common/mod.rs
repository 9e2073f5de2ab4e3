//! Shared helpers for probe tests against wiremock stub servers
#![allow(dead_code)]

use secprobe::http_client::{ProbeTarget, Session};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A session whose base and API URL both point at the stub server.
pub fn session_for(server: &MockServer) -> Session {
    let target = ProbeTarget::new(&server.uri(), &server.uri()).expect("valid stub URL");
    Session::new(target, 10, false).expect("client builds")
}

pub fn session_with_token(server: &MockServer, token: &str) -> Session {
    let mut session = session_for(server);
    session.set_bearer_token(token);
    session
}

/// Answer every login attempt with 429 so the rate-limit probe stays quiet.
pub async fn throttle_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(429))
        .mount(server)
        .await;
}

/// Number of recorded requests that hit `p`.
pub async fn hits(server: &MockServer, p: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == p)
        .count()
}
