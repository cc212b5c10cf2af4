pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod utils;

use crate::config::Config;
use crate::services::{
    auth_service::AuthService,
    browser_service::{BrowserDriver, BrowserService},
    planner_service::{LlmSettings, PlannerService},
    video_service::{FfmpegRenderer, VideoRenderer, VideoService},
    webdriver_service::WebDriverService,
    workspace_service::WorkspaceService,
};
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub workspace: WorkspaceService,
    pub browser: BrowserService,
    pub planner: PlannerService,
    pub video: VideoService,
}

impl AppState {
    pub fn new(config: Config) -> crate::error::Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        let driver = Arc::new(WebDriverService::new(
            config.webdriver_url.clone(),
            http_client.clone(),
        ));
        Ok(Self::with_parts(
            config,
            http_client,
            driver,
            Arc::new(FfmpegRenderer::default()),
        ))
    }

    /// Builds state around caller-supplied browser and video backends.
    pub fn with_parts(
        config: Config,
        http_client: Client,
        driver: Arc<dyn BrowserDriver>,
        renderer: Arc<dyn VideoRenderer>,
    ) -> Self {
        let llm = config.llm_api_key.clone().map(|api_key| LlmSettings {
            api_key,
            base_url: config.llm_base_url.clone(),
            model: config.llm_model.clone(),
        });

        let workspace = WorkspaceService::new(config.data_dir.clone());
        let browser = BrowserService::new(driver, AuthService::new(config.auth_state_path.clone()));
        let planner = PlannerService::new(llm, http_client);
        let video = VideoService::new(renderer, config.media_dir.clone());

        Self {
            config: Arc::new(config),
            workspace,
            browser,
            planner,
            video,
        }
    }
}
