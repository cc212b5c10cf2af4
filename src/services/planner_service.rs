use crate::error::{Error, Result};
use crate::models::course::{CourseModule, CoursePlan, Lesson};
use crate::models::question::Question;
use crate::models::scrape::ScrapedPage;
use crate::utils::text::{ensure_proper_punctuation, truncate_chars};
use rand::seq::SliceRandom;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

const OUTLINE_CONTEXT_CHARS: usize = 15_000;
const LESSON_CONTEXT_CHARS: usize = 8_000;
const QUIZ_CONTEXT_CHARS: usize = 4_000;

#[derive(Clone, Debug)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Generates course outlines, lessons and quizzes with a chat-completions model.
///
/// Without an API key every call returns fixed placeholder content so the rest
/// of the pipeline can be exercised offline.
#[derive(Clone)]
pub struct PlannerService {
    client: Client,
    llm: Option<LlmSettings>,
}

impl PlannerService {
    pub fn new(llm: Option<LlmSettings>, client: Client) -> Self {
        if llm.is_none() {
            tracing::warn!("Planner initialized without an API key; using mock responses");
        }
        Self { client, llm }
    }

    pub fn is_mock(&self) -> bool {
        self.llm.is_none()
    }

    pub async fn generate_outline(&self, scrape: &ScrapedPage) -> Result<CoursePlan> {
        let Some(llm) = &self.llm else {
            return Ok(mock_plan());
        };

        let title = if scrape.title.trim().is_empty() {
            "Untitled Course"
        } else {
            scrape.title.as_str()
        };
        let snippet = truncate_chars(&scrape.text_content, OUTLINE_CONTEXT_CHARS);

        let prompt = format!(
            r#"You are an expert curriculum designer.
Create a structured training course based on the following website content.

Website Title: {title}
Content Snippet: {snippet}...

Output a JSON structure with the following schema:
{{
    "course_title": "String",
    "description": "String",
    "modules": [
        {{
            "title": "String",
            "lessons": [
                {{
                    "title": "String",
                    "description": "Brief summary of what this lesson covers"
                }}
            ]
        }}
    ]
}}"#
        );

        let payload = serde_json::json!({
            "model": llm.model,
            "messages": [
                {"role": "system", "content": "You are a helpful assistant that generates JSON curriculum. Return ONLY valid JSON."},
                {"role": "user", "content": prompt}
            ],
            "response_format": { "type": "json_object" }
        });

        let content = self.chat(llm, payload).await?;
        let plan: CoursePlan = serde_json::from_str(&content).map_err(|e| {
            tracing::error!("Unusable course outline from LLM: {}", e);
            Error::Internal(format!("LLM returned an invalid course plan: {}", e))
        })?;
        tracing::info!(
            modules = plan.modules.len(),
            lessons = plan.lesson_count(),
            "Course outline generated"
        );
        Ok(plan)
    }

    pub async fn generate_lesson(
        &self,
        lesson_title: &str,
        module_title: &str,
        context: &str,
    ) -> Result<String> {
        let Some(llm) = &self.llm else {
            return Ok(mock_lesson(lesson_title));
        };

        let context = truncate_chars(context, LESSON_CONTEXT_CHARS);
        let prompt = format!(
            r#"You are an expert technical instructor.
Write a comprehensive, engaging lesson for the topic: "{lesson_title}" (part of the module "{module_title}").

Use the following background context from the website:
{context}

CRITICAL FORMATTING REQUIREMENTS:
- EVERY sentence MUST end with proper punctuation (. ! or ?)
- Write in complete, grammatically correct sentences
- Use markdown formatting for headers (##), bold (**text**), and lists

Format the output in clean Markdown.
Include:
- A clear introduction
- Step-by-step concepts or instructions
- Code snippets if relevant (use ```blocks)
- A "Key Takeaways" summary at the end.

Do NOT output JSON. Output pure Markdown with proper punctuation."#
        );

        let payload = serde_json::json!({
            "model": llm.model,
            "messages": [
                {"role": "system", "content": "You are a helpful technical writer who always uses proper punctuation."},
                {"role": "user", "content": prompt}
            ]
        });

        let content = self.chat(llm, payload).await?;
        Ok(ensure_proper_punctuation(&content))
    }

    /// Returns an empty list when the model's answer cannot be used.
    pub async fn generate_quiz(&self, lesson_content: &str) -> Result<Vec<Question>> {
        let Some(llm) = &self.llm else {
            return Ok(mock_quiz());
        };

        let content = truncate_chars(lesson_content, QUIZ_CONTEXT_CHARS);
        let prompt = format!(
            r#"Create a short quiz based on the following lesson content:
{content}

Output a JSON OBJECT with a key "questions" containing an array of 3 objects:
{{
    "questions": [
        {{
            "question": "String",
            "options": ["String", "String", "String", "String"],
            "correct_index": Integer (0-3)
        }}
    ]
}}"#
        );

        tracing::info!("Generating quiz for content length: {}", lesson_content.len());

        let payload = serde_json::json!({
            "model": llm.model,
            "messages": [
                {"role": "system", "content": "You are a quiz generator. Return only valid JSON."},
                {"role": "user", "content": prompt}
            ],
            "response_format": { "type": "json_object" }
        });

        let raw = self.chat(llm, payload).await?;
        tracing::debug!(
            "Quiz raw response: {}...",
            truncate_chars(&raw, 200)
        );
        Ok(parse_quiz_response(&raw))
    }

    async fn chat(&self, llm: &LlmSettings, payload: JsonValue) -> Result<String> {
        let url = format!("{}/chat/completions", llm.base_url.trim_end_matches('/'));
        let res = self
            .client
            .post(url)
            .bearer_auth(&llm.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("LLM API Error {}: {}", status, text).into());
        }

        let body: JsonValue = res.json().await?;
        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("Invalid LLM response format").into())
    }
}

/// Extracts usable questions from a model reply.
///
/// Accepts `{"questions": [...]}` or a bare array; anything else yields no
/// questions. Options are shuffled so the correct answer is not always first.
pub fn parse_quiz_response(raw: &str) -> Vec<Question> {
    let parsed: JsonValue = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Quiz JSON parse error: {}", e);
            return vec![];
        }
    };

    let items = if let Some(arr) = parsed.get("questions").and_then(|a| a.as_array()) {
        arr.clone()
    } else if let Some(arr) = parsed.as_array() {
        arr.clone()
    } else {
        tracing::warn!("Parsed quiz JSON but found no questions list");
        vec![]
    };

    let mut rng = rand::thread_rng();
    items
        .iter()
        .filter_map(|item| coerce_question(item, &mut rng))
        .collect()
}

fn coerce_question(v: &JsonValue, rng: &mut impl rand::Rng) -> Option<Question> {
    let prompt = v.get("question").and_then(|s| s.as_str())?.trim().to_string();
    if prompt.is_empty() {
        return None;
    }

    let mut options: Vec<String> = v
        .get("options")
        .and_then(|o| o.as_array())?
        .iter()
        .filter_map(|x| x.as_str().map(|s| s.trim().to_string()))
        .collect();
    if options.len() < 2 {
        return None;
    }

    let correct = usize::try_from(v.get("correct_index").and_then(|i| i.as_i64())?).ok()?;
    let correct_option = options.get(correct)?.clone();
    options.shuffle(rng);
    let correct_option_index = options.iter().position(|o| *o == correct_option)?;

    Some(Question::new(prompt, options, correct_option_index))
}

pub fn mock_plan() -> CoursePlan {
    CoursePlan {
        course_title: "Mock Generated Course".to_string(),
        description: "This is a placeholder because no API key was found.".to_string(),
        modules: vec![CourseModule {
            title: "Module 1: Getting Started".to_string(),
            lessons: vec![Lesson {
                title: "Welcome".to_string(),
                description: "Intro".to_string(),
            }],
        }],
    }
}

pub fn mock_lesson(lesson_title: &str) -> String {
    format!(
        "# {title}\n\n*Mock Content (No API Key)*\n\nThis is a placeholder for **{title}**.",
        title = lesson_title
    )
}

pub fn mock_quiz() -> Vec<Question> {
    vec![Question::new(
        "What is the main topic? (Mock)",
        vec!["A".into(), "B".into(), "C".into(), "D".into()],
        0,
    )]
}
