use reqwest::StatusCode;
use serde_json::json;

use super::common;

#[tokio::test]
async fn e2e_malformed_body_is_400() {
    let base = common::spawn_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/runs/wait", base))
        .header("content-type", "application/json")
        .body("not valid json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn e2e_wrong_shape_is_422() {
    let base = common::spawn_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/runs/wait", base))
        .json(&json!({"assistant_id": "email_assistant"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn e2e_unknown_role_is_422_and_unknown_assistant_is_404() {
    let base = common::spawn_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/runs/wait", base))
        .json(&json!({
            "assistant_id": "email_assistant",
            "input": {"messages": [{"role": "tool", "content": "x"}]}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = client
        .post(format!("{}/runs/wait", base))
        .json(&json!({
            "assistant_id": "spreadsheet",
            "input": {"messages": [{"role": "user", "content": "x"}]}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
