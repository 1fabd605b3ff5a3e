//! Integration tests: a supervisor loop delegating to a sub-agent through `AgentTool`.

mod init_logging;

use std::sync::Arc;

use concierge::agent::react::NO_REPLY;
use concierge::{
    AggregateToolSource, LlmResponse, MockLlm, MockToolSource, ReactRunner, ToolCall,
};

fn sub_agent(reply: &str, tools: Arc<MockToolSource>) -> ReactRunner {
    let llm = Arc::new(MockLlm::first_tools_then_end(
        vec![ToolCall::new("lookup_invoices", "{}")],
        reply,
    ));
    ReactRunner::builder(llm, tools)
        .name("invoice agent")
        .description("Looks up invoices.")
        .build()
        .unwrap()
}

#[tokio::test]
async fn supervisor_forwards_customer_and_receives_reply() {
    let leaf = Arc::new(MockToolSource::new().with_tool("lookup_invoices", "[{\"InvoiceId\": 2}]"));
    let agent_tool = sub_agent("Your latest invoice is #2.", leaf.clone()).as_tool();
    let tools = AggregateToolSource::new().with_tool(Box::new(agent_tool));
    assert_eq!(tools.tool_names(), vec!["invoice_agent"]);

    let supervisor_llm = Arc::new(MockLlm::first_tools_then_end(
        vec![ToolCall::new(
            "invoice_agent",
            r#"{"task": "Find the customer's latest invoice"}"#,
        )],
        "Your latest invoice is #2.",
    ));
    let supervisor = ReactRunner::builder(supervisor_llm.clone(), Arc::new(tools))
        .build()
        .unwrap();

    let state = supervisor
        .invoke_with_customer("What was my last purchase?", Some("1".into()))
        .await
        .unwrap();

    assert_eq!(leaf.calls().len(), 1);
    assert_eq!(leaf.calls()[0].2.as_deref(), Some("1"));
    let observed = &supervisor_llm.seen_messages()[1];
    assert!(observed.iter().any(|m| m
        .content()
        .contains("Tool invoice_agent returned: Your latest invoice is #2.")));
    assert_eq!(
        state.last_assistant_reply().as_deref(),
        Some("Your latest invoice is #2.")
    );
}

#[tokio::test]
async fn silent_sub_agent_reports_no_reply() {
    let llm = Arc::new(MockLlm::scripted(vec![LlmResponse::text("")]));
    let runner = ReactRunner::builder(llm, Arc::new(MockToolSource::new()))
        .name("quiet")
        .build()
        .unwrap();
    let tool = runner.as_tool();
    let out = concierge::Tool::call(&tool, serde_json::json!({"task": "anything"}), None)
        .await
        .unwrap();
    assert_eq!(out.text, NO_REPLY);
}

#[tokio::test]
async fn missing_task_is_invalid_input() {
    let llm = Arc::new(MockLlm::with_no_tool_calls("x"));
    let tool = ReactRunner::builder(llm, Arc::new(MockToolSource::new()))
        .build()
        .unwrap()
        .as_tool();
    let err = concierge::Tool::call(&tool, serde_json::json!({}), None)
        .await
        .unwrap_err();
    assert!(matches!(err, concierge::ToolSourceError::InvalidInput(_)));
}
