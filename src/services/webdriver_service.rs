use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::browser::{
    Cookie, LaunchOptions, PAGE_LOAD_TIMEOUT_MS, USER_AGENT, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
use crate::services::browser_service::BrowserDriver;

/// Drives a Chrome instance through a W3C WebDriver server (chromedriver).
#[derive(Clone)]
pub struct WebDriverService {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSession {
    session_id: String,
}

impl WebDriverService {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn capabilities(options: &LaunchOptions) -> JsonValue {
        let mut args = vec![
            format!("--window-size={},{}", VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            format!("--user-agent={}", USER_AGENT),
        ];
        if options.headless {
            args.push("--headless=new".to_string());
        }
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "timeouts": { "pageLoad": PAGE_LOAD_TIMEOUT_MS },
                    "goog:chromeOptions": { "args": args }
                }
            }
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .client
            .request(method.clone(), &url)
            .timeout(Duration::from_millis(PAGE_LOAD_TIMEOUT_MS + 15_000));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req.send().await?;
        let status = res.status();

        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<WireResponse<WireError>>(&text)
                .map(|w| format!("{}: {}", w.value.error, w.value.message))
                .unwrap_or(text);
            tracing::error!(%method, path, %status, "WebDriver command failed: {}", detail);
            return Err(Error::Browser(detail));
        }

        let wire: WireResponse<T> = res.json().await?;
        Ok(wire.value)
    }
}

#[async_trait]
impl BrowserDriver for WebDriverService {
    async fn open(&self, options: &LaunchOptions) -> Result<String> {
        let session: NewSession = self
            .call(Method::POST, "/session", Some(Self::capabilities(options)))
            .await?;
        tracing::info!(session = %session.session_id, headless = options.headless, "WebDriver session created");
        Ok(session.session_id)
    }

    async fn goto(&self, session: &str, url: &str) -> Result<()> {
        let _: JsonValue = self
            .call(
                Method::POST,
                &format!("/session/{}/url", session),
                Some(json!({ "url": url })),
            )
            .await?;
        Ok(())
    }

    async fn refresh(&self, session: &str) -> Result<()> {
        let _: JsonValue = self
            .call(
                Method::POST,
                &format!("/session/{}/refresh", session),
                Some(json!({})),
            )
            .await?;
        Ok(())
    }

    async fn title(&self, session: &str) -> Result<String> {
        self.call(Method::GET, &format!("/session/{}/title", session), None)
            .await
    }

    async fn current_url(&self, session: &str) -> Result<String> {
        self.call(Method::GET, &format!("/session/{}/url", session), None)
            .await
    }

    async fn page_source(&self, session: &str) -> Result<String> {
        self.call(Method::GET, &format!("/session/{}/source", session), None)
            .await
    }

    async fn screenshot(&self, session: &str) -> Result<Vec<u8>> {
        let encoded: String = self
            .call(Method::GET, &format!("/session/{}/screenshot", session), None)
            .await?;
        BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| Error::Browser(format!("Invalid screenshot payload: {}", e)))
    }

    async fn cookies(&self, session: &str) -> Result<Vec<Cookie>> {
        self.call(Method::GET, &format!("/session/{}/cookie", session), None)
            .await
    }

    async fn add_cookie(&self, session: &str, cookie: &Cookie) -> Result<()> {
        let _: JsonValue = self
            .call(
                Method::POST,
                &format!("/session/{}/cookie", session),
                Some(json!({ "cookie": cookie })),
            )
            .await?;
        Ok(())
    }

    async fn close(&self, session: &str) -> Result<()> {
        let _: JsonValue = self
            .call(Method::DELETE, &format!("/session/{}", session), None)
            .await?;
        Ok(())
    }
}
