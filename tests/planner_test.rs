mod common;

use axum::http::StatusCode;
use common::{completion, spawn_llm_stub};
use serde_json::json;
use training_hub::config::DEFAULT_LLM_MODEL;
use training_hub::error::Error;
use training_hub::models::scrape::ScrapedPage;
use training_hub::services::planner_service::{LlmSettings, PlannerService};

fn planner(base_url: &str) -> PlannerService {
    PlannerService::new(
        Some(LlmSettings {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
        }),
        reqwest::Client::new(),
    )
}

fn page() -> ScrapedPage {
    ScrapedPage {
        title: "Rust Docs".into(),
        url: "https://doc.rust-lang.org".into(),
        text_content: "Ownership is a set of rules.".into(),
        screenshot: None,
        links: vec![],
    }
}

#[tokio::test]
async fn outline_is_requested_in_json_mode_and_parsed() {
    let plan = json!({
        "course_title": "Rust Basics",
        "description": "Learn ownership",
        "modules": [
            { "title": "Ownership", "lessons": [ { "title": "Moves", "description": "What moves do" } ] }
        ]
    });
    let stub = spawn_llm_stub(StatusCode::OK, completion(&plan.to_string())).await;
    let planner = planner(&stub.base_url);
    assert!(!planner.is_mock());

    let outline = planner.generate_outline(&page()).await.unwrap();
    assert_eq!(outline.course_title, "Rust Basics");
    assert_eq!(outline.modules[0].lessons[0].title, "Moves");

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer test-key"));
    assert_eq!(body["model"], DEFAULT_LLM_MODEL);
    assert_eq!(body["response_format"]["type"], "json_object");
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("Website Title: Rust Docs"));
    assert!(prompt.contains("Ownership is a set of rules."));
}

#[tokio::test]
async fn invalid_outline_is_an_internal_error() {
    let stub = spawn_llm_stub(StatusCode::OK, completion("not json at all")).await;

    match planner(&stub.base_url).generate_outline(&page()).await {
        Err(Error::Internal(msg)) => {
            assert!(msg.starts_with("LLM returned an invalid course plan"))
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn lesson_reply_gets_punctuation_fixed() {
    let reply = "## Intro\nRust is fast\n- Safe code\n```\nlet x = 1\n```";
    let stub = spawn_llm_stub(StatusCode::OK, completion(reply)).await;

    let lesson = planner(&stub.base_url)
        .generate_lesson("Moves", "Ownership", "context text")
        .await
        .unwrap();
    assert_eq!(
        lesson,
        "## Intro\nRust is fast.\n- Safe code.\n```\nlet x = 1\n```"
    );

    let (_, body) = &stub.requests()[0];
    assert!(body.get("response_format").is_none());
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("\"Moves\" (part of the module \"Ownership\")"));
}

#[tokio::test]
async fn quiz_reply_is_sanitised() {
    let quiz = json!({
        "questions": [
            { "question": "Which moves?", "options": ["i32", "bool", "String", "char"], "correct_index": 2 },
            { "question": "Broken", "options": ["only one"], "correct_index": 0 }
        ]
    });
    let stub = spawn_llm_stub(StatusCode::OK, completion(&quiz.to_string())).await;

    let questions = planner(&stub.base_url)
        .generate_quiz("Strings move, integers copy.")
        .await
        .unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].correct_option(), Some("String"));

    let (_, body) = &stub.requests()[0];
    assert_eq!(body["response_format"]["type"], "json_object");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("Strings move, integers copy."));
}

#[tokio::test]
async fn unusable_quiz_reply_yields_no_questions() {
    let stub = spawn_llm_stub(StatusCode::OK, completion("sorry, no quiz today")).await;
    let questions = planner(&stub.base_url).generate_quiz("text").await.unwrap();
    assert!(questions.is_empty());
}

#[tokio::test]
async fn llm_error_status_is_reported() {
    let stub = spawn_llm_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "model overloaded" }),
    )
    .await;

    match planner(&stub.base_url).generate_lesson("Moves", "Ownership", "").await {
        Err(Error::Anyhow(e)) => {
            let msg = e.to_string();
            assert!(msg.contains("LLM API Error 500"));
            assert!(msg.contains("model overloaded"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn reply_without_choices_is_rejected() {
    let stub = spawn_llm_stub(StatusCode::OK, json!({ "id": "chatcmpl-1" })).await;

    match planner(&stub.base_url).generate_quiz("text").await {
        Err(Error::Anyhow(e)) => assert_eq!(e.to_string(), "Invalid LLM response format"),
        other => panic!("unexpected result: {:?}", other),
    }
}
