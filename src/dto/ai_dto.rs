use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::course::CoursePlan;
use crate::models::question::Question;

fn default_module_title() -> String {
    "General".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LessonRequest {
    #[validate(length(min = 1, message = "lesson_title must not be empty"))]
    pub lesson_title: String,
    #[serde(default = "default_module_title")]
    pub module_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonResponse {
    pub status: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuizRequest {
    #[validate(length(min = 1, message = "lesson_content must not be empty"))]
    pub lesson_content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VideoRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "text_content must not be empty"))]
    pub text_content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResponse {
    pub status: String,
    pub video_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub status: String,
    pub plan: CoursePlan,
}
