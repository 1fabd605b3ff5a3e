//! Integration tests: the music-store graph end to end over the fixture database.

mod init_logging;

use std::sync::Arc;

use concierge::demo::chinook::memory::{memory_namespace, MEMORY_KEY};
use concierge::demo::chinook::supervisor::{INVOICE_AGENT, MUSIC_CATALOG_AGENT};
use concierge::demo::chinook::verify::VERIFY_REQUEST;
use concierge::demo::chinook::{build_music_store, ChinookDb};
use concierge::{
    InMemoryStore, LlmClient, LlmFactory, LlmResponse, MemorySaver, Message, MockLlm,
    RunnableConfig, Store, ToolCall, ToolChoiceMode, ToolSpec,
};
use serde_json::json;

fn fixture_db() -> ChinookDb {
    ChinookDb::from_script(include_str!("fixtures/chinook_min.sql")).unwrap()
}

/// One scripted model per agent, picked by the tools the agent is bound to.
struct Models {
    supervisor: Arc<MockLlm>,
    catalog: Arc<MockLlm>,
    invoice: Arc<MockLlm>,
    memory: Arc<MockLlm>,
}

impl Models {
    fn factory(&self) -> LlmFactory {
        let supervisor = Arc::clone(&self.supervisor);
        let catalog = Arc::clone(&self.catalog);
        let invoice = Arc::clone(&self.invoice);
        let memory = Arc::clone(&self.memory);
        Arc::new(move |tools: &[ToolSpec], _mode: ToolChoiceMode| {
            let has = |name: &str| tools.iter().any(|t| t.name == name);
            let llm: Arc<dyn LlmClient> = if has(MUSIC_CATALOG_AGENT) {
                supervisor.clone()
            } else if has("get_albums_by_artist") {
                catalog.clone()
            } else if has("get_invoices_by_customer_sorted_by_date") {
                invoice.clone()
            } else {
                memory.clone()
            };
            llm
        })
    }
}

#[tokio::test]
async fn unverified_customer_is_asked_for_identifier() {
    let models = Models {
        supervisor: Arc::new(MockLlm::with_no_tool_calls("unused")),
        catalog: Arc::new(MockLlm::with_no_tool_calls("unused")),
        invoice: Arc::new(MockLlm::with_no_tool_calls("unused")),
        memory: Arc::new(MockLlm::with_no_tool_calls("{}")),
    };
    let graph = build_music_store(
        &models.factory(),
        &fixture_db(),
        Arc::new(InMemoryStore::new()),
        None,
    )
    .unwrap();

    let state = graph.invoke("What did I buy?").await.unwrap();
    assert_eq!(state.last_assistant_reply().as_deref(), Some(VERIFY_REQUEST));
    assert_eq!(models.supervisor.call_count(), 0);
    assert_eq!(models.memory.call_count(), 0);
}

#[tokio::test]
async fn unknown_customer_from_config_never_reaches_supervisor() {
    let models = Models {
        supervisor: Arc::new(MockLlm::with_no_tool_calls("unused")),
        catalog: Arc::new(MockLlm::with_no_tool_calls("unused")),
        invoice: Arc::new(MockLlm::with_no_tool_calls("unused")),
        memory: Arc::new(MockLlm::with_no_tool_calls("{}")),
    };
    let graph = build_music_store(
        &models.factory(),
        &fixture_db(),
        Arc::new(InMemoryStore::new()),
        None,
    )
    .unwrap();

    let config = RunnableConfig {
        customer_id: Some("999".into()),
        ..RunnableConfig::default()
    };
    let state = graph
        .invoke_with_config("show my invoices", Some(config))
        .await
        .unwrap();
    assert!(state.customer_id.is_none());
    assert!(state
        .last_assistant_reply()
        .unwrap()
        .starts_with("I could not find"));
    assert_eq!(models.supervisor.call_count(), 0);
}

#[tokio::test]
async fn verified_customer_gets_invoice_answer_and_memory_is_saved() {
    let models = Models {
        supervisor: Arc::new(MockLlm::scripted(vec![
            LlmResponse::tools(vec![ToolCall::new(
                INVOICE_AGENT,
                r#"{"task": "Find the customer's most recent invoice"}"#,
            )]),
            LlmResponse::text("Your most recent invoice is #2 from June 2021."),
        ])),
        catalog: Arc::new(MockLlm::with_no_tool_calls("unused")),
        invoice: Arc::new(MockLlm::scripted(vec![
            LlmResponse::tools(vec![ToolCall::new(
                "get_invoices_by_customer_sorted_by_date",
                "{}",
            )]),
            LlmResponse::text("Invoice #2 on 2021-06-01 is the most recent."),
        ])),
        memory: Arc::new(MockLlm::with_no_tool_calls(
            r#"{"music_preferences": ["Alanis Morissette"]}"#,
        )),
    };
    let store = Arc::new(InMemoryStore::new());
    let saver = Arc::new(MemorySaver::new());
    let graph = build_music_store(
        &models.factory(),
        &fixture_db(),
        store.clone(),
        Some(saver),
    )
    .unwrap();

    let config = RunnableConfig::for_thread("music-1");
    let state = graph
        .invoke_with_config(
            "My email is luisg@embraer.com.br. What was my most recent purchase?",
            Some(config.clone()),
        )
        .await
        .unwrap();

    assert_eq!(state.customer_id.as_deref(), Some("1"));
    assert_eq!(
        state.last_nonempty_reply().as_deref(),
        Some("Your most recent invoice is #2 from June 2021.")
    );

    // The invoice tool ran for the verified customer without being told the id.
    let invoice_seen = models.invoice.seen_messages();
    assert!(invoice_seen[1]
        .iter()
        .any(|m| matches!(m, Message::User(s) if s.contains("\"InvoiceId\":2"))));

    let saved = store
        .get(&memory_namespace("1"), MEMORY_KEY)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved, json!({"music_preferences": ["Alanis Morissette"]}));

    // Second turn on the same thread: already verified, memory is in the prompt.
    graph
        .invoke_with_config("Thanks!", Some(config))
        .await
        .unwrap();
    let supervisor_seen = models.supervisor.seen_messages();
    let Message::System(prompt) = &supervisor_seen.last().unwrap()[0] else {
        panic!("supervisor prompt should come first");
    };
    assert!(prompt.contains("Alanis Morissette"), "{}", prompt);
    assert!(prompt.contains("customer id is 1"), "{}", prompt);
}
