use reqwest::StatusCode;
use serde_json::{json, Value};

use super::common;

#[tokio::test]
async fn e2e_thread_state_is_saved_after_run() {
    let base = common::spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client.post(format!("{}/threads", base)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    let thread_id = created["thread_id"].as_str().unwrap().to_string();

    let resp = client
        .get(format!("{}/threads/{}/state", base, thread_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    client
        .post(format!("{}/runs/wait", base))
        .json(&json!({
            "assistant_id": "music_store",
            "thread_id": thread_id,
            "input": {"messages": [{"role": "user", "content": "my customer id is 1"}]}
        }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    let saved: Value = client
        .get(format!("{}/threads/{}/state", base, thread_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(saved["thread_id"], thread_id);
    assert_eq!(saved["values"]["customer_id"], "1");
}
