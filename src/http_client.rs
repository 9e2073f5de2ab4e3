use crate::error::ProbeError;
use anyhow::Context;
use reqwest::cookie::Jar;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Base URL + API URL of the application under test.
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    base_url: Url,
    api_url: Url,
}

impl ProbeTarget {
    pub fn new(base_url: &str, api_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("invalid base URL: {}", base_url))?;
        let api_url = Url::parse(api_url).with_context(|| format!("invalid API URL: {}", api_url))?;
        Ok(Self { base_url, api_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Resolve `path` against the API URL. An absolute path replaces the API URL's path.
    pub fn endpoint(&self, path: &str) -> Result<Url, ProbeError> {
        self.api_url.join(path).map_err(|source| ProbeError::Endpoint {
            path: path.to_string(),
            source,
        })
    }
}

/// Status and body of a completed probe request.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

impl ProbeResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// 200 or 201
    pub fn is_accepted(&self) -> bool {
        matches!(self.status, 200 | 201)
    }
}

/// A file sent as the `file` field of a multipart upload.
#[derive(Debug, Clone, Copy)]
pub struct UploadFile {
    pub file_name: &'static str,
    pub content: &'static str,
    pub mime: &'static str,
}

/// Shared HTTP state for all probes.
///
/// `client` carries the operator's cookies and bearer token; `bare` is a
/// cookie-less client for requests that must go out unauthenticated.
/// Setup methods take `&mut self`, probes only ever borrow it immutably.
pub struct Session {
    target: ProbeTarget,
    jar: Arc<Jar>,
    client: Client,
    bare: Client,
    bearer: Option<String>,
    cookies_set: usize,
}

impl Session {
    pub fn new(target: ProbeTarget, timeout_secs: u64, insecure: bool) -> anyhow::Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = builder(timeout_secs, insecure)
            .cookie_provider(jar.clone())
            .build()
            .context("failed to build session HTTP client")?;
        let bare = builder(timeout_secs, insecure)
            .build()
            .context("failed to build unauthenticated HTTP client")?;

        Ok(Self { target, jar, client, bare, bearer: None, cookies_set: 0 })
    }

    pub fn target(&self) -> &ProbeTarget {
        &self.target
    }

    /// Merge `name=value` cookies into the jar for both the base and API origins.
    pub fn set_cookies<I, K, V>(&mut self, cookies: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in cookies {
            let cookie = format!("{}={}", name.as_ref(), value.as_ref());
            self.jar.add_cookie_str(&cookie, &self.target.api_url);
            if self.target.base_url.origin() != self.target.api_url.origin() {
                self.jar.add_cookie_str(&cookie, &self.target.base_url);
            }
            self.cookies_set += 1;
            tracing::debug!(name = name.as_ref(), "session cookie set");
        }
    }

    pub fn has_cookies(&self) -> bool {
        self.cookies_set > 0
    }

    /// Accepts the raw token or a full `Bearer <token>` value.
    pub fn set_bearer_token(&mut self, token: &str) {
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        self.bearer = if token.is_empty() { None } else { Some(token.to_string()) };
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ProbeError> {
        self.target.endpoint(path)
    }

    /// Handle to the cookie-less client, for requests issued from spawned tasks.
    pub fn unauthenticated_client(&self) -> Client {
        self.bare.clone()
    }

    pub async fn get(&self, url: &Url) -> Result<ProbeResponse, ProbeError> {
        execute(self.authenticated(self.client.get(url.clone())), url).await
    }

    pub async fn post_json(&self, url: &Url, body: &Value) -> Result<ProbeResponse, ProbeError> {
        execute(self.authenticated(self.client.post(url.clone()).json(body)), url).await
    }

    pub async fn post_file(&self, url: &Url, file: &UploadFile) -> Result<ProbeResponse, ProbeError> {
        let part = reqwest::multipart::Part::text(file.content)
            .file_name(file.file_name)
            .mime_str(file.mime)
            .map_err(ProbeError::Payload)?;
        let form = reqwest::multipart::Form::new().part("file", part);
        execute(self.authenticated(self.client.post(url.clone()).multipart(form)), url).await
    }

    /// GET without cookies, presenting `token` as the bearer credential.
    pub async fn get_with_token(&self, url: &Url, token: &str) -> Result<ProbeResponse, ProbeError> {
        execute(self.bare.get(url.clone()).bearer_auth(token), url).await
    }

    /// Unauthenticated JSON POST, optionally with one extra header.
    pub async fn post_json_unauthenticated(
        &self,
        url: &Url,
        body: &Value,
        header: Option<(&str, &str)>,
    ) -> Result<ProbeResponse, ProbeError> {
        let mut request = self.bare.post(url.clone()).json(body);
        if let Some((name, value)) = header {
            request = request.header(name, value);
        }
        execute(request, url).await
    }

    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn builder(timeout_secs: u64, insecure: bool) -> ClientBuilder {
    ClientBuilder::new()
        .pool_max_idle_per_host(64)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_nodelay(true)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(5))
        .gzip(true)
        .brotli(true)
        .use_rustls_tls()
        .redirect(reqwest::redirect::Policy::limited(5))
        .user_agent(USER_AGENT)
        .danger_accept_invalid_certs(insecure)
}

/// Send a prepared request and read the whole body.
pub async fn execute(request: RequestBuilder, url: &Url) -> Result<ProbeResponse, ProbeError> {
    let transport = |source: reqwest::Error| ProbeError::Transport { url: url.to_string(), source };

    let response = request.send().await.map_err(transport)?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(transport)?;
    tracing::debug!(url = %url, status, bytes = body.len(), "probe response");

    Ok(ProbeResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::cookie::CookieStore;

    #[test]
    fn endpoint_replaces_api_path() {
        let target = ProbeTarget::new("https://app.example.com", "https://api.example.com/v1/").unwrap();
        let url = target.endpoint("/api/organizations/2").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/organizations/2");
    }

    #[test]
    fn invalid_urls_are_rejected() {
        assert!(ProbeTarget::new("not a url", "https://api.example.com").is_err());
        assert!(ProbeTarget::new("https://app.example.com", "").is_err());
    }

    #[test]
    fn cookies_land_in_jar_for_both_origins() {
        let target = ProbeTarget::new("https://app.example.com", "https://api.example.com").unwrap();
        let mut session = Session::new(target, 10, false).unwrap();
        assert!(!session.has_cookies());

        session.set_cookies([("sessionid", "abc123")]);
        assert!(session.has_cookies());

        let api = Url::parse("https://api.example.com/api/users/1").unwrap();
        let app = Url::parse("https://app.example.com/").unwrap();
        let header = session.jar.cookies(&api).unwrap();
        assert_eq!(header.to_str().unwrap(), "sessionid=abc123");
        assert!(session.jar.cookies(&app).is_some());
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        let target = ProbeTarget::new("https://app.example.com", "https://api.example.com").unwrap();
        let mut session = Session::new(target, 10, false).unwrap();

        session.set_bearer_token("Bearer abc.def.ghi");
        assert_eq!(session.bearer_token(), Some("abc.def.ghi"));

        session.set_bearer_token("   ");
        assert_eq!(session.bearer_token(), None);
    }
}
