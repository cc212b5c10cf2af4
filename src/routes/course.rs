use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::models::course::CoursePlan;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_current_course(State(state): State<AppState>) -> Result<Json<CoursePlan>> {
    state
        .workspace
        .load_plan()
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound("No course plan found".to_string()))
}
