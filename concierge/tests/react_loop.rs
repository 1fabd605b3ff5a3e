//! Integration tests: the tool-calling loop, the Done exit and the email assistant.

mod init_logging;

use std::sync::Arc;

use concierge::demo::email::{build_email_assistant, TOOL_TRIAGE_EMAIL, TOOL_WRITE_EMAIL};
use concierge::{
    HandleToolErrors, LlmClient, LlmFactory, LlmResponse, LoopExit, Message, MockLlm,
    MockToolSource, ReactRunner, ToolCall, ToolChoiceMode, ToolSpec, DONE_TOOL,
};

#[tokio::test]
async fn loop_runs_tool_then_answers() {
    let llm = Arc::new(MockLlm::first_tools_then_end(
        vec![ToolCall::new("get_time", "{}").with_id("c1")],
        "It is noon.",
    ));
    let tools = Arc::new(MockToolSource::new().with_tool("get_time", "12:00"));
    let runner = ReactRunner::builder(llm.clone(), tools).build().unwrap();

    let state = runner.invoke("What time is it?").await.unwrap();
    assert_eq!(state.last_assistant_reply().as_deref(), Some("It is noon."));
    assert!(state
        .messages
        .iter()
        .any(|m| matches!(m, Message::User(s) if s == "Tool get_time returned: 12:00")));
    assert_eq!(state.turn_count, 1);
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn done_tool_ends_loop_without_running_batch() {
    let llm = Arc::new(MockLlm::scripted(vec![LlmResponse::tools(vec![
        ToolCall::new("send", "{}"),
        ToolCall::new(DONE_TOOL, r#"{"done": true}"#),
    ])]));
    let tools = Arc::new(MockToolSource::new().with_tool("send", "sent"));
    let runner = ReactRunner::builder(llm, tools.clone())
        .exit(LoopExit::DoneTool)
        .build()
        .unwrap();

    let state = runner.invoke("go").await.unwrap();
    assert!(tools.calls().is_empty());
    assert_eq!(state.tool_calls.len(), 2);
}

#[tokio::test]
async fn tool_errors_become_observations_when_handled() {
    let llm = Arc::new(MockLlm::first_tools_then_end(
        vec![ToolCall::new("flaky", "{}")],
        "Sorry, that failed.",
    ));
    let tools = Arc::new(MockToolSource::new().with_failing_tool("flaky", "boom"));
    let runner = ReactRunner::builder(llm, tools)
        .handle_tool_errors(HandleToolErrors::Always(None))
        .build()
        .unwrap();
    let state = runner.invoke("try").await.unwrap();
    assert!(state
        .messages
        .iter()
        .any(|m| matches!(m, Message::User(s) if s.contains("boom"))));
    assert_eq!(state.last_assistant_reply().as_deref(), Some("Sorry, that failed."));
}

#[tokio::test]
async fn unhandled_tool_error_fails_run() {
    let llm = Arc::new(MockLlm::first_tools_then_end(
        vec![ToolCall::new("flaky", "{}")],
        "unreachable",
    ));
    let tools = Arc::new(MockToolSource::new().with_failing_tool("flaky", "boom"));
    let runner = ReactRunner::builder(llm, tools).build().unwrap();
    assert!(runner.invoke("try").await.is_err());
}

#[tokio::test]
async fn max_turns_ends_a_model_that_never_stops() {
    let llm = Arc::new(MockLlm::new("again", vec![ToolCall::new("noop", "{}")]));
    let tools = Arc::new(MockToolSource::new().with_tool("noop", "ok"));
    let runner = ReactRunner::builder(llm, tools)
        .max_turns(3)
        .build()
        .unwrap();
    let state = runner.invoke("loop").await.unwrap();
    assert_eq!(state.turn_count, 3);
}

fn scripted_factory(script: Vec<LlmResponse>) -> (LlmFactory, Arc<MockLlm>) {
    let llm = Arc::new(MockLlm::scripted(script));
    let shared = Arc::clone(&llm);
    let factory: LlmFactory = Arc::new(move |_tools: &[ToolSpec], _mode: ToolChoiceMode| {
        Arc::clone(&shared) as Arc<dyn LlmClient>
    });
    (factory, llm)
}

#[tokio::test]
async fn email_assistant_triages_replies_and_finishes() {
    let (factory, llm) = scripted_factory(vec![
        LlmResponse::tools(vec![ToolCall::new(
            TOOL_TRIAGE_EMAIL,
            r#"{"category": "respond"}"#,
        )]),
        LlmResponse::tools(vec![ToolCall::new(
            TOOL_WRITE_EMAIL,
            r#"{"to": "alice@example.com", "subject": "Re: lunch", "content": "Tuesday works."}"#,
        )]),
        LlmResponse::tools(vec![ToolCall::new(DONE_TOOL, r#"{"done": true}"#)]),
    ]);
    let runner = build_email_assistant(&factory).unwrap();

    let state = runner
        .invoke("From alice@example.com: lunch on Tuesday?")
        .await
        .unwrap();
    let observations: Vec<&str> = state
        .messages
        .iter()
        .filter_map(|m| match m {
            Message::User(s) if s.starts_with("Tool ") => Some(s.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        observations,
        vec![
            "Tool triage_email returned: Email triaged as 'respond'",
            "Tool write_email returned: Email sent to alice@example.com with subject 'Re: lunch' and content: Tuesday works.",
        ]
    );
    assert_eq!(llm.call_count(), 3);
    let Message::System(prompt) = &llm.seen_messages()[0][0] else {
        panic!("email assistant should send its system prompt");
    };
    assert!(prompt.contains("Done"));
}
