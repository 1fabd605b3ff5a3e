//! Email and calendar assistant.
//!
//! The tools are placeholders: they validate their arguments and return a fixed
//! confirmation string. The loop ends when the model calls `Done`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agent::react::{HandleToolErrors, LoopExit, ReactRunner, ReactRunnerBuilder, DONE_TOOL};
use crate::graph::CompilationError;
use crate::llm::{LlmFactory, ToolChoiceMode};
use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError, ToolSpec};
use crate::tools::{required_str, AggregateToolSource, Tool};

pub const TOOL_WRITE_EMAIL: &str = "write_email";
pub const TOOL_SCHEDULE_MEETING: &str = "schedule_meeting";
pub const TOOL_CHECK_CALENDAR: &str = "check_calendar_availability";
pub const TOOL_TRIAGE_EMAIL: &str = "triage_email";

/// Triage categories accepted by `triage_email`.
pub const TRIAGE_CATEGORIES: [&str; 3] = ["ignore", "notify", "respond"];

pub const EMAIL_ASSISTANT_PROMPT: &str = "You are an executive assistant. Triage each incoming \
email, then use the tools to write replies, check calendar availability and schedule \
meetings as needed. Call the Done tool once the email has been fully handled.";

fn spec(name: &str, description: &str, input_schema: Value) -> ToolSpec {
    ToolSpec {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
    }
}

/// Sends an email (placeholder).
pub struct WriteEmailTool;

#[async_trait]
impl Tool for WriteEmailTool {
    fn name(&self) -> &str {
        TOOL_WRITE_EMAIL
    }

    fn spec(&self) -> ToolSpec {
        spec(
            TOOL_WRITE_EMAIL,
            "Write and send an email.",
            json!({
                "type": "object",
                "properties": {
                    "to": {"type": "string", "description": "Recipient email address"},
                    "subject": {"type": "string"},
                    "content": {"type": "string", "description": "Email body"}
                },
                "required": ["to", "subject", "content"]
            }),
        )
    }

    async fn call(
        &self,
        args: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let to = required_str(&args, "to")?;
        let subject = required_str(&args, "subject")?;
        let content = required_str(&args, "content")?;
        Ok(ToolCallContent::text(format!(
            "Email sent to {} with subject '{}' and content: {}",
            to, subject, content
        )))
    }
}

/// Schedules a meeting (placeholder).
pub struct ScheduleMeetingTool;

#[async_trait]
impl Tool for ScheduleMeetingTool {
    fn name(&self) -> &str {
        TOOL_SCHEDULE_MEETING
    }

    fn spec(&self) -> ToolSpec {
        spec(
            TOOL_SCHEDULE_MEETING,
            "Schedule a calendar meeting.",
            json!({
                "type": "object",
                "properties": {
                    "attendees": {"type": "array", "items": {"type": "string"}},
                    "subject": {"type": "string"},
                    "duration_minutes": {"type": "integer"},
                    "preferred_day": {"type": "string", "description": "Day, e.g. 2025-05-01"},
                    "start_time": {"type": "integer", "description": "Start hour, 24h clock"}
                },
                "required": ["attendees", "subject", "duration_minutes", "preferred_day", "start_time"]
            }),
        )
    }

    async fn call(
        &self,
        args: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let attendees = args
            .get("attendees")
            .and_then(Value::as_array)
            .ok_or_else(|| ToolSourceError::InvalidInput("missing attendees".into()))?;
        let subject = required_str(&args, "subject")?;
        let duration = args
            .get("duration_minutes")
            .and_then(Value::as_i64)
            .ok_or_else(|| ToolSourceError::InvalidInput("missing duration_minutes".into()))?;
        let day = required_str(&args, "preferred_day")?;
        let start = args
            .get("start_time")
            .filter(|v| !v.is_null())
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .ok_or_else(|| ToolSourceError::InvalidInput("missing start_time".into()))?;
        Ok(ToolCallContent::text(format!(
            "Meeting '{}' scheduled on {} at {} for {} minutes with {} attendees",
            subject,
            day,
            start,
            duration,
            attendees.len()
        )))
    }
}

/// Lists free slots for a day (placeholder).
pub struct CheckCalendarTool;

#[async_trait]
impl Tool for CheckCalendarTool {
    fn name(&self) -> &str {
        TOOL_CHECK_CALENDAR
    }

    fn spec(&self) -> ToolSpec {
        spec(
            TOOL_CHECK_CALENDAR,
            "Check calendar availability for a given day.",
            json!({
                "type": "object",
                "properties": {"day": {"type": "string"}},
                "required": ["day"]
            }),
        )
    }

    async fn call(
        &self,
        args: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let day = required_str(&args, "day")?;
        Ok(ToolCallContent::text(format!(
            "Available times on {}: 9:00 AM, 2:00 PM, 4:00 PM",
            day
        )))
    }
}

/// Records how an email should be handled.
pub struct TriageEmailTool;

#[async_trait]
impl Tool for TriageEmailTool {
    fn name(&self) -> &str {
        TOOL_TRIAGE_EMAIL
    }

    fn spec(&self) -> ToolSpec {
        spec(
            TOOL_TRIAGE_EMAIL,
            "Classify the email: ignore it, notify the user, or respond to it.",
            json!({
                "type": "object",
                "properties": {
                    "category": {"type": "string", "enum": TRIAGE_CATEGORIES}
                },
                "required": ["category"]
            }),
        )
    }

    async fn call(
        &self,
        args: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let category = required_str(&args, "category")?;
        if !TRIAGE_CATEGORIES.contains(&category) {
            return Err(ToolSourceError::InvalidInput(format!(
                "unknown category: {} (use ignore, notify, or respond)",
                category
            )));
        }
        Ok(ToolCallContent::text(format!(
            "Email triaged as '{}'",
            category
        )))
    }
}

/// Signals that the task is finished. The loop ends before this runs.
pub struct DoneTool;

#[async_trait]
impl Tool for DoneTool {
    fn name(&self) -> &str {
        DONE_TOOL
    }

    fn spec(&self) -> ToolSpec {
        spec(
            DONE_TOOL,
            "Call when the email has been fully handled.",
            json!({
                "type": "object",
                "properties": {"done": {"type": "boolean"}},
                "required": ["done"]
            }),
        )
    }

    async fn call(
        &self,
        _args: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        Ok(ToolCallContent::text(DONE_TOOL))
    }
}

/// Tool source with every email assistant tool.
pub fn email_tools() -> AggregateToolSource {
    AggregateToolSource::new()
        .with_tool(Box::new(WriteEmailTool))
        .with_tool(Box::new(ScheduleMeetingTool))
        .with_tool(Box::new(CheckCalendarTool))
        .with_tool(Box::new(TriageEmailTool))
        .with_tool(Box::new(DoneTool))
}

/// Email assistant loop: email tools, required tool choice, ended by `Done`.
/// Returned unbuilt so callers can attach a checkpointer.
pub fn email_assistant_builder(llm: &LlmFactory) -> ReactRunnerBuilder {
    let tools = email_tools();
    let client = llm(&tools.specs(), ToolChoiceMode::Required);
    ReactRunner::builder(client, Arc::new(tools))
        .system_prompt(EMAIL_ASSISTANT_PROMPT)
        .exit(LoopExit::DoneTool)
        .handle_tool_errors(HandleToolErrors::Always(None))
        .name("email_assistant")
        .description("Triages emails and handles replies and meetings.")
}

pub fn build_email_assistant(llm: &LlmFactory) -> Result<ReactRunner, CompilationError> {
    email_assistant_builder(llm).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_tools_return_literal_strings() {
        let out = WriteEmailTool
            .call(
                json!({"to": "a@b.com", "subject": "Hi", "content": "Body"}),
                None,
            )
            .await
            .unwrap();
        assert_eq!(
            out.text,
            "Email sent to a@b.com with subject 'Hi' and content: Body"
        );

        let out = ScheduleMeetingTool
            .call(
                json!({
                    "attendees": ["a@b.com", "c@d.com"],
                    "subject": "Sync",
                    "duration_minutes": 30,
                    "preferred_day": "2025-05-01",
                    "start_time": 14
                }),
                None,
            )
            .await
            .unwrap();
        assert_eq!(
            out.text,
            "Meeting 'Sync' scheduled on 2025-05-01 at 14 for 30 minutes with 2 attendees"
        );

        let out = CheckCalendarTool
            .call(json!({"day": "Monday"}), None)
            .await
            .unwrap();
        assert_eq!(out.text, "Available times on Monday: 9:00 AM, 2:00 PM, 4:00 PM");
    }

    #[tokio::test]
    async fn triage_rejects_unknown_category() {
        let ok = TriageEmailTool
            .call(json!({"category": "notify"}), None)
            .await
            .unwrap();
        assert!(ok.text.contains("notify"));
        let err = TriageEmailTool
            .call(json!({"category": "archive"}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolSourceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_argument_is_invalid_input() {
        let err = WriteEmailTool
            .call(json!({"to": "a@b.com"}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolSourceError::InvalidInput(m) if m.contains("subject")));
    }

    #[test]
    fn email_tools_registers_all_five() {
        assert_eq!(
            email_tools().tool_names(),
            vec![
                "Done",
                "check_calendar_availability",
                "schedule_meeting",
                "triage_email",
                "write_email"
            ]
        );
    }
}
