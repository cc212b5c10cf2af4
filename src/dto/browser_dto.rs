use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::scrape::ScrapedPage;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NavigateRequest {
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchResponse {
    pub status: String,
    pub auth_loaded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateResponse {
    pub status: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub status: String,
    pub data: ScrapedPage,
    pub saved_to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAuthResponse {
    pub status: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}
