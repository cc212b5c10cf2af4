pub mod ai;
pub mod browser;
pub mod course;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    cors::api_cors,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::AppState;

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let base_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health));

    let browser_api = Router::new()
        .route("/api/browser/launch", post(browser::launch_browser))
        .route("/api/browser/navigate", post(browser::navigate))
        .route("/api/browser/scrape", post(browser::scrape_page))
        .route("/api/browser/save-auth", post(browser::save_auth))
        .route("/api/browser/close", post(browser::close_browser));

    let ai_api = Router::new()
        .route("/api/ai/plan", post(ai::generate_plan))
        .route("/api/ai/lesson", post(ai::generate_lesson))
        .route("/api/ai/quiz", post(ai::generate_quiz))
        .route("/api/ai/video", post(ai::create_lesson_video))
        .layer(from_fn_with_state(
            RateLimiter::new(state.config.ai_rps),
            rps_middleware,
        ));

    let course_api = Router::new().route("/api/course/current", get(course::get_current_course));

    let media_dir = state.config.media_dir.clone();

    base_routes
        .merge(browser_api)
        .merge(ai_api)
        .merge(course_api)
        .nest_service("/media", ServeDir::new(media_dir))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
}
