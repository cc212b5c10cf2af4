#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;
use tower::ServiceExt;
use training_hub::config::Config;
use training_hub::error::{Error, Result};
use training_hub::models::browser::{Cookie, LaunchOptions};
use training_hub::services::browser_service::BrowserDriver;
use training_hub::services::video_service::VideoRenderer;
use training_hub::{routes, AppState};

pub const PAGE_HTML: &str = r#"<html><head><title>Rust Docs</title>
<style>body { color: red; }</style></head>
<body><h1>Ownership</h1><p>Each value has an owner &amp; one owner only.</p>
<a href="/book/ch04">Chapter 4</a>
<script>console.log("tracking")</script></body></html>"#;

/// In-memory stand-in for a WebDriver server.
#[derive(Default)]
pub struct FakeDriver {
    sessions: AtomicUsize,
    visited: Mutex<Vec<String>>,
    closed: Mutex<Vec<String>>,
}

impl FakeDriver {
    pub fn opened(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    pub fn closed(&self) -> Vec<String> {
        self.closed.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn open(&self, _options: &LaunchOptions) -> Result<String> {
        let n = self.sessions.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("session-{}", n))
    }

    async fn goto(&self, _session: &str, url: &str) -> Result<()> {
        self.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn refresh(&self, _session: &str) -> Result<()> {
        Ok(())
    }

    async fn title(&self, _session: &str) -> Result<String> {
        Ok("Rust Docs".to_string())
    }

    async fn current_url(&self, _session: &str) -> Result<String> {
        self.visited
            .lock()
            .unwrap()
            .last()
            .cloned()
            .ok_or_else(|| Error::Browser("about:blank".to_string()))
    }

    async fn page_source(&self, _session: &str) -> Result<String> {
        Ok(PAGE_HTML.to_string())
    }

    async fn screenshot(&self, _session: &str) -> Result<Vec<u8>> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn cookies(&self, _session: &str) -> Result<Vec<Cookie>> {
        Ok(vec![Cookie {
            name: "sid".to_string(),
            value: "secret".to_string(),
            path: Some("/".to_string()),
            domain: Some(".example.com".to_string()),
            secure: Some(true),
            http_only: Some(true),
            expiry: None,
            same_site: None,
        }])
    }

    async fn add_cookie(&self, _session: &str, _cookie: &Cookie) -> Result<()> {
        Ok(())
    }

    async fn close(&self, session: &str) -> Result<()> {
        self.closed.lock().unwrap().push(session.to_string());
        Ok(())
    }
}

/// Writes the narration script where the video would go.
pub struct FakeRenderer;

#[async_trait]
impl VideoRenderer for FakeRenderer {
    async fn render(&self, _title: &str, script: &str, output: &Path) -> Result<()> {
        tokio::fs::write(output, script).await?;
        Ok(())
    }
}

/// A chat-completions endpoint that answers every request with one fixed reply.
#[derive(Clone)]
pub struct LlmStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<(Option<String>, JsonValue)>>>,
}

impl LlmStub {
    /// Authorization header and JSON body of each request received so far.
    pub fn requests(&self) -> Vec<(Option<String>, JsonValue)> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn completion(content: &str) -> JsonValue {
    json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
}

pub async fn spawn_llm_stub(status: StatusCode, reply: JsonValue) -> LlmStub {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();
    let app = Router::new().route(
        "/chat/completions",
        post(move |headers: HeaderMap, Json(payload): Json<JsonValue>| {
            let recorded = recorded.clone();
            let reply = reply.clone();
            async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                recorded.lock().unwrap().push((auth, payload));
                (status, Json(reply))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    LlmStub {
        base_url: format!("http://{}", addr),
        requests,
    }
}

pub fn test_app_with_llm(root: &Path, llm_base_url: &str) -> (Router, AppState) {
    let mut config = Config::local(root);
    config.llm_api_key = Some("test-key".to_string());
    config.llm_base_url = llm_base_url.to_string();
    let state = AppState::with_parts(
        config,
        reqwest::Client::new(),
        Arc::new(FakeDriver::default()),
        Arc::new(FakeRenderer),
    );
    (routes::router(state.clone()), state)
}

pub fn test_state(root: &Path, driver: Arc<FakeDriver>) -> AppState {
    AppState::with_parts(
        Config::local(root),
        reqwest::Client::new(),
        driver,
        Arc::new(FakeRenderer),
    )
}

pub fn test_app(root: &Path) -> (Router, AppState, Arc<FakeDriver>) {
    let driver = Arc::new(FakeDriver::default());
    let state = test_state(root, driver.clone());
    (routes::router(state.clone()), state, driver)
}

pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(req.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, json)
}
