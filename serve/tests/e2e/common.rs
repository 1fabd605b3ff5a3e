//! Shared helpers for e2e tests.

use std::sync::Arc;

use concierge::demo::chinook::ChinookDb;
use concierge::{
    GraphDeps, GraphRegistry, GraphsConfig, LlmClient, LlmFactory, LlmResponse, MockLlm, ToolCall,
    ToolChoiceMode, ToolSpec, DONE_TOOL,
};
use serve::AppState;
use tokio::net::TcpListener;

/// Loads .env so a developer's settings are visible the same way the CLI sees them.
pub fn load_dotenv() {
    let _ = dotenv::dotenv();
}

/// Email assistant: triage, then Done. Every other agent answers "ok".
fn mock_factory() -> LlmFactory {
    Arc::new(|tools: &[ToolSpec], _mode: ToolChoiceMode| {
        let llm: Arc<dyn LlmClient> = if tools.iter().any(|t| t.name == DONE_TOOL) {
            Arc::new(MockLlm::scripted(vec![
                LlmResponse::tools(vec![ToolCall::new(
                    "triage_email",
                    r#"{"category": "ignore"}"#,
                )]),
                LlmResponse {
                    content: "Ignored: newsletter.".into(),
                    tool_calls: vec![ToolCall::new(DONE_TOOL, r#"{"done": true}"#)],
                    usage: None,
                },
            ]))
        } else {
            Arc::new(MockLlm::with_no_tool_calls("ok"))
        };
        llm
    })
}

pub fn registry() -> Arc<GraphRegistry> {
    let db = ChinookDb::from_script(include_str!(
        "../../../concierge/tests/fixtures/chinook_min.sql"
    ))
    .unwrap();
    let deps = GraphDeps::new(mock_factory()).with_chinook(db);
    Arc::new(GraphRegistry::build(&GraphsConfig::default_graphs(), &deps).unwrap())
}

/// Binds a random port and spawns the server. Returns the base URL.
pub async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState::new(registry()));
    tokio::spawn(serve::run_serve_on_listener(listener, state));
    format!("http://{}", addr)
}
