mod common;

use axum::http::StatusCode;
use common::{call, test_app};
use serde_json::json;

#[tokio::test]
async fn commands_before_launch_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _, _) = test_app(dir.path());

    let (status, body) = call(
        &app,
        "POST",
        "/api/browser/navigate",
        Some(json!({ "url": "example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Browser not started");

    let (status, body) = call(&app, "POST", "/api/browser/scrape", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Browser not started");

    let (status, body) = call(&app, "POST", "/api/browser/save-auth", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Browser context not available");

    let (status, body) = call(&app, "POST", "/api/browser/close", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "closed");
}

#[tokio::test]
async fn learn_then_scrape_flow() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state, driver) = test_app(dir.path());

    let (status, body) = call(
        &app,
        "POST",
        "/api/browser/launch",
        Some(json!({ "headless": false, "use_auth": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "launched", "auth_loaded": false }));

    let (status, body) = call(
        &app,
        "POST",
        "/api/browser/navigate",
        Some(json!({ "url": "learn.example.com/course" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "navigated");
    assert_eq!(body["url"], "https://learn.example.com/course");

    let (status, body) = call(&app, "POST", "/api/browser/save-auth", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "saved");
    assert!(std::path::Path::new(body["path"].as_str().unwrap()).exists());

    let (status, body) = call(
        &app,
        "POST",
        "/api/browser/launch",
        Some(json!({ "headless": true, "use_auth": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["auth_loaded"], true);
    assert_eq!(driver.closed(), vec!["session-1".to_string()]);

    call(
        &app,
        "POST",
        "/api/browser/navigate",
        Some(json!({ "url": "http://learn.example.com/course" })),
    )
    .await;

    let (status, body) = call(&app, "POST", "/api/browser/scrape", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "scraped");
    assert_eq!(body["data"]["title"], "Rust Docs");
    assert_eq!(body["data"]["url"], "http://learn.example.com/course");
    let text = body["data"]["text_content"].as_str().unwrap();
    assert!(text.contains("Each value has an owner & one owner only."));
    assert!(!text.contains("tracking"));
    assert!(!text.contains("color: red"));
    assert_eq!(body["data"]["links"][0]["href"], "/book/ch04");
    assert!(body["data"]["screenshot"]
        .as_str()
        .unwrap()
        .ends_with(".png"));

    let saved = state.workspace.load_scrape().await.unwrap().unwrap();
    assert_eq!(saved.title, "Rust Docs");
    assert_eq!(
        body["saved_to"].as_str().unwrap(),
        state.workspace.scrape_path().to_string_lossy()
    );

    let (status, _) = call(&app, "POST", "/api/browser/close", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        driver.closed(),
        vec!["session-1".to_string(), "session-2".to_string()]
    );
    assert_eq!(
        driver.visited(),
        vec![
            "https://learn.example.com/course".to_string(),
            "http://learn.example.com/course".to_string()
        ]
    );
}

#[tokio::test]
async fn unreadable_auth_state_fails_launch_without_opening_a_browser() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state, driver) = test_app(dir.path());
    std::fs::write(&state.config.auth_state_path, "garbage").unwrap();

    let (status, body) = call(
        &app,
        "POST",
        "/api/browser/launch",
        Some(json!({ "headless": true, "use_auth": true })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("corrupt auth state file"));
    assert_eq!(driver.opened(), 0);

    let (status, _) = call(
        &app,
        "POST",
        "/api/browser/navigate",
        Some(json!({ "url": "example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        "POST",
        "/api/browser/launch",
        Some(json!({ "headless": true, "use_auth": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(driver.opened(), 1);
    call(&app, "POST", "/api/browser/close", None).await;
    assert_eq!(driver.closed(), vec!["session-1".to_string()]);
}
