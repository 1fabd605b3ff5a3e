use super::common;

#[tokio::test]
async fn e2e_ok() {
    common::load_dotenv();
    let base = common::spawn_server().await;
    let body: serde_json::Value = reqwest::get(format!("{}/ok", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, serde_json::json!({"ok": true}));
}

#[tokio::test]
async fn e2e_assistants_lists_configured_graphs() {
    let base = common::spawn_server().await;
    let body: serde_json::Value = reqwest::get(format!("{}/assistants", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        serde_json::json!([
            {"assistant_id": "email_assistant", "graph": "email_assistant"},
            {"assistant_id": "music_store", "graph": "music_store"}
        ])
    );
}
