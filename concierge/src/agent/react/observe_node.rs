//! Observe node: merge tool_results into messages, clear tool_calls and tool_results.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::message::Message;
use crate::state::AgentState;

/// Default maximum number of loop rounds. Three nodes run per round, so eight rounds
/// fit inside `DEFAULT_RECURSION_LIMIT`.
pub const DEFAULT_MAX_TURNS: u32 = 8;

pub struct ObserveNode {
    max_turns: u32,
}

impl ObserveNode {
    pub fn new() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(max_turns: u32) -> Self {
        Self { max_turns }
    }
}

impl Default for ObserveNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node<AgentState> for ObserveNode {
    fn id(&self) -> &str {
        "observe"
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let mut state = state;
        for tr in &state.tool_results {
            let name = tr
                .name
                .as_deref()
                .or(tr.call_id.as_deref())
                .unwrap_or("tool");
            state
                .messages
                .push(Message::user(format!("Tool {} returned: {}", name, tr.content)));
        }
        state.reset_round();
        state.turn_count = state.turn_count.saturating_add(1);
        let next = if state.turn_count >= self.max_turns {
            tracing::warn!(turns = state.turn_count, "max turns reached, ending loop");
            Next::End
        } else {
            Next::Continue
        };
        Ok((state, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ToolCall, ToolResult};

    #[tokio::test]
    async fn merges_results_and_clears_round() {
        let mut state = AgentState::from_user("q");
        state.tool_calls = vec![ToolCall::new("lookup", "{}")];
        state.tool_results = vec![ToolResult {
            call_id: None,
            name: Some("lookup".into()),
            content: "42".into(),
            is_error: false,
        }];
        let (out, next) = ObserveNode::new().run(state).await.unwrap();
        assert_eq!(next, Next::Continue);
        assert_eq!(
            out.messages.last(),
            Some(&Message::user("Tool lookup returned: 42"))
        );
        assert!(out.tool_calls.is_empty() && out.tool_results.is_empty());
        assert_eq!(out.turn_count, 1);
    }

    #[tokio::test]
    async fn ends_after_max_turns() {
        let mut state = AgentState::from_user("q");
        state.turn_count = 1;
        let (_, next) = ObserveNode::with_max_turns(2).run(state).await.unwrap();
        assert_eq!(next, Next::End);
    }
}
