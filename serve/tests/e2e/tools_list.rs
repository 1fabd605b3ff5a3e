use super::common;

#[tokio::test]
async fn e2e_tools_for_supervisor_are_sub_agents() {
    let base = common::spawn_server().await;
    let body: serde_json::Value = reqwest::get(format!("{}/assistants/music_store/tools", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec!["invoice_information_subagent", "music_catalog_subagent"]
    );
}

#[tokio::test]
async fn e2e_tools_for_unknown_assistant_is_404() {
    let base = common::spawn_server().await;
    let resp = reqwest::get(format!("{}/assistants/nope/tools", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}
