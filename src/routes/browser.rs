use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::browser_dto::{
    LaunchResponse, NavigateRequest, NavigateResponse, SaveAuthResponse, ScrapeResponse,
    StatusResponse,
};
use crate::error::Result;
use crate::models::browser::LaunchOptions;
use crate::AppState;

#[axum::debug_handler]
pub async fn launch_browser(
    State(state): State<AppState>,
    Json(options): Json<LaunchOptions>,
) -> Result<Json<LaunchResponse>> {
    let auth_loaded = state.browser.launch(options).await?;
    Ok(Json(LaunchResponse {
        status: "launched".to_string(),
        auth_loaded,
    }))
}

#[axum::debug_handler]
pub async fn navigate(
    State(state): State<AppState>,
    Json(req): Json<NavigateRequest>,
) -> Result<Json<NavigateResponse>> {
    req.validate()?;
    let url = state.browser.navigate(&req.url).await?;
    Ok(Json(NavigateResponse {
        status: "navigated".to_string(),
        url,
    }))
}

#[axum::debug_handler]
pub async fn scrape_page(State(state): State<AppState>) -> Result<Json<ScrapeResponse>> {
    let (data, saved_to) = state.browser.scrape(&state.workspace).await?;
    Ok(Json(ScrapeResponse {
        status: "scraped".to_string(),
        data,
        saved_to: saved_to.to_string_lossy().into_owned(),
    }))
}

#[axum::debug_handler]
pub async fn save_auth(State(state): State<AppState>) -> Result<Json<SaveAuthResponse>> {
    let path = state.browser.save_auth().await?;
    Ok(Json(SaveAuthResponse {
        status: "saved".to_string(),
        path: path.to_string_lossy().into_owned(),
    }))
}

#[axum::debug_handler]
pub async fn close_browser(State(state): State<AppState>) -> Json<StatusResponse> {
    state.browser.close().await;
    Json(StatusResponse {
        status: "closed".to_string(),
    })
}
