use std::time::Duration;

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;
use url::Url;

use crate::client::browser_session::BrowserSession;
use crate::dto::ai_dto::{
    LessonRequest, LessonResponse, PlanResponse, QuizRequest, QuizResponse, VideoRequest,
    VideoResponse,
};
use crate::dto::browser_dto::{
    LaunchResponse, NavigateRequest, NavigateResponse, SaveAuthResponse, ScrapeResponse,
    StatusResponse,
};
use crate::models::browser::LaunchOptions;
use crate::models::course::CoursePlan;
use crate::models::question::Question;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Typed access to the builder's HTTP API.
#[derive(Clone, Debug)]
pub struct HubClient {
    http: Client,
    base_url: Url,
}

impl HubClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: &str, http: Client) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute address for a server-relative media path such as `/media/video_ab.mp4`.
    pub fn media_url(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", path, e)))
    }

    pub async fn health(&self) -> ClientResult<String> {
        let body: JsonValue = self.send(Method::GET, "/health", None::<&()>).await?;
        Ok(body
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or_default()
            .to_string())
    }

    /// Starts a server-side browser and returns a handle for driving it.
    pub async fn launch(&self, options: LaunchOptions) -> ClientResult<BrowserSession<'_>> {
        let res: LaunchResponse = self
            .send(Method::POST, "/api/browser/launch", Some(&options))
            .await?;
        tracing::debug!(auth_loaded = res.auth_loaded, "Browser launched");
        Ok(BrowserSession::new(self, res.auth_loaded))
    }

    pub(crate) async fn navigate(&self, url: &str) -> ClientResult<String> {
        let req = NavigateRequest {
            url: url.to_string(),
        };
        let res: NavigateResponse = self
            .send(Method::POST, "/api/browser/navigate", Some(&req))
            .await?;
        Ok(res.url)
    }

    pub(crate) async fn scrape(&self) -> ClientResult<ScrapeResponse> {
        self.send(Method::POST, "/api/browser/scrape", None::<&()>)
            .await
    }

    pub(crate) async fn save_auth(&self) -> ClientResult<String> {
        let res: SaveAuthResponse = self
            .send(Method::POST, "/api/browser/save-auth", None::<&()>)
            .await?;
        Ok(res.path)
    }

    pub(crate) async fn close_browser(&self) -> ClientResult<()> {
        let _: StatusResponse = self
            .send(Method::POST, "/api/browser/close", None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn generate_plan(&self) -> ClientResult<CoursePlan> {
        let res: PlanResponse = self
            .send(Method::POST, "/api/ai/plan", None::<&()>)
            .await?;
        Ok(res.plan)
    }

    pub async fn current_course(&self) -> ClientResult<CoursePlan> {
        self.send(Method::GET, "/api/course/current", None::<&()>)
            .await
    }

    /// Module title of `lesson_title` in the current course plan.
    ///
    /// `None` when there is no plan yet or the plan has no such lesson.
    pub async fn lesson_module(&self, lesson_title: &str) -> ClientResult<Option<String>> {
        let plan = match self.current_course().await {
            Ok(plan) => plan,
            Err(ClientError::Api { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(plan
            .find_lesson(lesson_title)
            .map(|(module, _)| module.title.clone()))
    }

    pub async fn generate_lesson(
        &self,
        lesson_title: &str,
        module_title: &str,
    ) -> ClientResult<String> {
        let req = LessonRequest {
            lesson_title: lesson_title.to_string(),
            module_title: module_title.to_string(),
        };
        let res: LessonResponse = self
            .send(Method::POST, "/api/ai/lesson", Some(&req))
            .await?;
        Ok(res.content)
    }

    /// Questions for `lesson_content`; empty when the server returned none.
    pub async fn generate_quiz(&self, lesson_content: &str) -> ClientResult<Vec<Question>> {
        let req = QuizRequest {
            lesson_content: lesson_content.to_string(),
        };
        let res: QuizResponse = self.send(Method::POST, "/api/ai/quiz", Some(&req)).await?;
        Ok(res.questions)
    }

    /// Returns the server-relative video path.
    pub async fn create_video(&self, title: &str, text_content: &str) -> ClientResult<String> {
        let req = VideoRequest {
            title: title.to_string(),
            text_content: text_content.to_string(),
        };
        let res: VideoResponse = self
            .send(Method::POST, "/api/ai/video", Some(&req))
            .await?;
        Ok(res.video_url)
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", path, e)))?;

        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req.send().await?;
        Self::decode(res).await
    }

    async fn decode<T: DeserializeOwned>(res: Response) -> ClientResult<T> {
        let status = res.status();
        if status.is_success() {
            return Ok(res.json().await?);
        }

        let text = res.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<JsonValue>(&text) {
            Ok(body) => match body.get("detail") {
                Some(JsonValue::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => text,
            },
            Err(_) => text,
        };
        tracing::debug!(status = status.as_u16(), "API error: {}", detail);
        Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        })
    }
}
