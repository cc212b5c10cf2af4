use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::browser::{Cookie, LaunchOptions};
use crate::models::scrape::ScrapedPage;
use crate::services::auth_service::AuthService;
use crate::services::extractor_service::ContentExtractor;
use crate::services::workspace_service::WorkspaceService;
use crate::utils::{time, url};

/// Low-level browser commands, addressed by driver session id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn open(&self, options: &LaunchOptions) -> Result<String>;
    async fn goto(&self, session: &str, url: &str) -> Result<()>;
    async fn refresh(&self, session: &str) -> Result<()>;
    async fn title(&self, session: &str) -> Result<String>;
    async fn current_url(&self, session: &str) -> Result<String>;
    async fn page_source(&self, session: &str) -> Result<String>;
    async fn screenshot(&self, session: &str) -> Result<Vec<u8>>;
    async fn cookies(&self, session: &str) -> Result<Vec<Cookie>>;
    async fn add_cookie(&self, session: &str, cookie: &Cookie) -> Result<()>;
    async fn close(&self, session: &str) -> Result<()>;
}

struct ActiveBrowser {
    session_id: String,
    pending_cookies: Vec<Cookie>,
    applied_hosts: HashSet<String>,
}

/// The one remote browser the builder controls at a time.
#[derive(Clone)]
pub struct BrowserService {
    driver: Arc<dyn BrowserDriver>,
    auth: AuthService,
    extractor: ContentExtractor,
    active: Arc<Mutex<Option<ActiveBrowser>>>,
}

impl BrowserService {
    pub fn new(driver: Arc<dyn BrowserDriver>, auth: AuthService) -> Self {
        Self {
            driver,
            auth,
            extractor: ContentExtractor::new(),
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Starts a new browser, replacing any running one. Returns whether saved auth was loaded.
    pub async fn launch(&self, options: LaunchOptions) -> Result<bool> {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            self.close_session(&previous.session_id).await;
        }

        let saved = if options.use_auth {
            self.auth.load_state().await?
        } else {
            None
        };
        let auth_loaded = saved.is_some();
        let pending_cookies = saved.map(|state| state.cookies).unwrap_or_default();

        tracing::info!(
            headless = options.headless,
            use_auth = options.use_auth,
            auth_loaded,
            "Launching browser"
        );
        let session_id = self.driver.open(&options).await?;

        *active = Some(ActiveBrowser {
            session_id,
            pending_cookies,
            applied_hosts: HashSet::new(),
        });
        Ok(auth_loaded)
    }

    /// Opens `raw_url` in the running browser and returns the normalised address.
    pub async fn navigate(&self, raw_url: &str) -> Result<String> {
        let mut guard = self.active.lock().await;
        let active = guard
            .as_mut()
            .ok_or_else(|| Error::BadRequest("Browser not started".to_string()))?;

        let target = url::normalize_url(raw_url);
        tracing::info!("Navigating to {}", target);
        self.driver.goto(&active.session_id, &target).await?;

        if let Some(host) = url::host_of(&target) {
            self.apply_saved_cookies(active, &host).await?;
        }
        Ok(target)
    }

    /// Captures the current page and stores it as the latest scrape.
    pub async fn scrape(&self, workspace: &WorkspaceService) -> Result<(ScrapedPage, PathBuf)> {
        let guard = self.active.lock().await;
        let active = guard
            .as_ref()
            .ok_or_else(|| Error::BadRequest("Browser not started".to_string()))?;
        let session = active.session_id.as_str();

        tracing::info!("Scraping page...");
        let title = self.driver.title(session).await?;
        let current_url = self.driver.current_url(session).await?;
        let html = self.driver.page_source(session).await?;

        let screenshot = match self.driver.screenshot(session).await {
            Ok(png) => {
                workspace.ensure_dir().await?;
                let path = workspace.screenshot_path(time::unix_timestamp());
                fs::write(&path, png).await?;
                Some(path.to_string_lossy().into_owned())
            }
            Err(e) => {
                tracing::warn!("Screenshot failed, continuing without it: {}", e);
                None
            }
        };

        let page = self
            .extractor
            .extract(&title, &current_url, &html, screenshot);
        let saved_to = workspace.save_scrape(&page).await?;
        Ok((page, saved_to))
    }

    /// Writes the browser's cookies to the auth file.
    pub async fn save_auth(&self) -> Result<PathBuf> {
        let guard = self.active.lock().await;
        let active = guard
            .as_ref()
            .ok_or_else(|| Error::BadRequest("Browser context not available".to_string()))?;
        let cookies = self.driver.cookies(&active.session_id).await?;
        self.auth.save_state(cookies).await
    }

    pub async fn close(&self) {
        if let Some(active) = self.active.lock().await.take() {
            self.close_session(&active.session_id).await;
        }
    }

    async fn close_session(&self, session_id: &str) {
        if let Err(e) = self.driver.close(session_id).await {
            tracing::warn!(session = session_id, "Failed to close browser session: {}", e);
        }
    }

    async fn apply_saved_cookies(&self, active: &mut ActiveBrowser, host: &str) -> Result<()> {
        if active.applied_hosts.contains(host) {
            return Ok(());
        }
        let matching: Vec<&Cookie> = active
            .pending_cookies
            .iter()
            .filter(|c| c.matches_host(host))
            .collect();
        if matching.is_empty() {
            return Ok(());
        }

        for cookie in &matching {
            self.driver.add_cookie(&active.session_id, cookie).await?;
        }
        tracing::info!(host, count = matching.len(), "Restored saved cookies");
        self.driver.refresh(&active.session_id).await?;
        active.applied_hosts.insert(host.to_string());
        Ok(())
    }
}
