use serde_json::{json, Value};

use super::common;

#[tokio::test]
async fn e2e_email_assistant_run_returns_reply_and_state() {
    common::load_dotenv();
    let base = common::spawn_server().await;
    let body: Value = reqwest::Client::new()
        .post(format!("{}/runs/wait", base))
        .json(&json!({
            "assistant_id": "email_assistant",
            "input": {"messages": [{"role": "user", "content": "Weekly newsletter from shop@example.com"}]}
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body["thread_id"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["reply"], "Ignored: newsletter.");
    let messages = body["state"]["messages"].as_array().unwrap();
    assert!(messages.iter().any(|m| m["User"]
        .as_str()
        .is_some_and(|s| s == "Tool triage_email returned: Email triaged as 'ignore'")));
}

#[tokio::test]
async fn e2e_music_store_asks_unverified_customer_to_identify() {
    let base = common::spawn_server().await;
    let body: Value = reqwest::Client::new()
        .post(format!("{}/runs/wait", base))
        .json(&json!({
            "assistant_id": "music_store",
            "input": {"messages": [{"role": "user", "content": "What did I buy last?"}]}
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["reply"]
        .as_str()
        .unwrap()
        .contains("customer ID, email address, or phone number"));
    assert!(body["state"]["customer_id"].is_null());
}

#[tokio::test]
async fn e2e_music_store_with_customer_id_reaches_supervisor() {
    let base = common::spawn_server().await;
    let body: Value = reqwest::Client::new()
        .post(format!("{}/runs/wait", base))
        .json(&json!({
            "assistant_id": "music_store",
            "customer_id": "2",
            "input": {"messages": [{"role": "user", "content": "Hello"}]}
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["state"]["customer_id"], "2");
    assert_eq!(body["reply"], "ok");
}

#[tokio::test]
async fn e2e_music_store_unknown_customer_id_is_rejected() {
    let base = common::spawn_server().await;
    let body: Value = reqwest::Client::new()
        .post(format!("{}/runs/wait", base))
        .json(&json!({
            "assistant_id": "music_store",
            "customer_id": "999",
            "input": {"messages": [{"role": "user", "content": "show my invoices"}]}
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["state"]["customer_id"].is_null());
    assert!(body["reply"]
        .as_str()
        .unwrap()
        .starts_with("I could not find"));
}
