//! Shared harness: a router over temporary directories plus a cookie-carrying client.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use axum_extra::extract::cookie::Key;
use tempfile::TempDir;
use tower::ServiceExt;

use folio::credentials::{hash_password, CredentialStore, Credentials};
use folio::file_store::FileStore;
use folio::http_server;
use folio::ServiceState;

pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "secret";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

pub struct TestSite {
    _dir: TempDir,
    pub data_dir: PathBuf,
    pub credentials_path: PathBuf,
    state: ServiceState,
    router: Router,
    cookie: Option<String>,
}

impl TestSite {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();

        let credentials_path = dir.path().join("users.toml");
        let mut users = Credentials::new();
        users.insert(ADMIN.to_string(), hash_password(ADMIN_PASSWORD).unwrap());
        std::fs::write(&credentials_path, toml::to_string(&users).unwrap()).unwrap();

        let state = ServiceState::new(
            FileStore::new(&data_dir),
            CredentialStore::new(&credentials_path),
            Key::generate(),
        );

        Self {
            _dir: dir,
            data_dir,
            credentials_path,
            router: http_server::router(state.clone()),
            state,
            cookie: None,
        }
    }

    pub fn create_document(&self, name: &str, content: &str) {
        std::fs::write(self.data_dir.join(name), content).unwrap();
    }

    pub fn document_exists(&self, name: &str) -> bool {
        self.data_dir.join(name).exists()
    }

    /// Number of sessions the server is holding.
    pub fn session_count(&self) -> usize {
        self.state.sessions().len()
    }

    /// Forget the session cookie, as a fresh client would.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    pub fn cookie(&self) -> Option<String> {
        self.cookie.clone()
    }

    pub fn set_cookie(&mut self, cookie: Option<String>) {
        self.cookie = cookie;
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(form)))
            .unwrap();
        self.send(request).await
    }

    pub async fn sign_in_as_admin(&mut self) {
        let response = self
            .post(
                "/users/signin",
                &[("username", ADMIN), ("password", ADMIN_PASSWORD)],
            )
            .await;
        assert_eq!(response.status, StatusCode::FOUND);
        // consume the welcome flash
        self.get("/").await;
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

fn encode_form(form: &[(&str, &str)]) -> String {
    form.iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(value: &str) -> String {
    let mut encoded = String::new();
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
