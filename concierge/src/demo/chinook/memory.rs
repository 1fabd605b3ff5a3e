//! Long-term customer memory: music preferences kept in a [`Store`] across threads.
//!
//! Layout: namespace `["memory_profile", <customer_id>]`, key `user_memory`, value
//! `{"music_preferences": ["rock", ...]}`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::memory::{Namespace, Store};
use crate::message::Message;
use crate::state::AgentState;

pub const MEMORY_NAMESPACE: &str = "memory_profile";
pub const MEMORY_KEY: &str = "user_memory";

pub const CREATE_MEMORY_PROMPT: &str = "You are an expert analyst that observes a conversation \
between a customer and a music store assistant and updates the customer's memory profile. \
Record only music preferences the customer stated or clearly implied (artists, genres, songs). \
Reply with JSON only, in the form {\"music_preferences\": [\"...\"]}. Return an empty list when \
the conversation reveals no new preferences.";

/// Stored profile for one customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub music_preferences: Vec<String>,
}

impl UserProfile {
    /// Text handed to the supervisor prompt; `None` when there is nothing to say.
    pub fn format(&self) -> Option<String> {
        if self.music_preferences.is_empty() {
            return None;
        }
        Some(format!(
            "Music Preferences: {}",
            self.music_preferences.join(", ")
        ))
    }

    /// Appends preferences not already present (case-insensitive), keeping order.
    pub fn merge(&mut self, new: impl IntoIterator<Item = String>) {
        for pref in new {
            let pref = pref.trim().to_string();
            if pref.is_empty() {
                continue;
            }
            let known = self
                .music_preferences
                .iter()
                .any(|p| p.eq_ignore_ascii_case(&pref));
            if !known {
                self.music_preferences.push(pref);
            }
        }
    }
}

pub fn memory_namespace(customer_id: &str) -> Namespace {
    vec![MEMORY_NAMESPACE.to_string(), customer_id.to_string()]
}

async fn read_profile(store: &dyn Store, customer_id: &str) -> Option<UserProfile> {
    match store.get(&memory_namespace(customer_id), MEMORY_KEY).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(customer_id = %customer_id, error = %e, "stored profile is malformed");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(customer_id = %customer_id, error = %e, "reading memory failed");
            None
        }
    }
}

/// Parses the first JSON object in an LLM reply (tolerates prose or code fences around it).
pub fn parse_profile(reply: &str) -> Option<UserProfile> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&reply[start..=end]).ok()
}

/// Fills `loaded_memory` from the store for the verified customer.
pub struct LoadMemoryNode {
    store: Arc<dyn Store>,
}

impl LoadMemoryNode {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Node<AgentState> for LoadMemoryNode {
    fn id(&self) -> &str {
        "load_memory"
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let mut state = state;
        if let Some(id) = state.customer_id.clone() {
            state.loaded_memory = read_profile(self.store.as_ref(), &id)
                .await
                .and_then(|p| p.format());
        }
        Ok((state, Next::Continue))
    }
}

/// Extracts preferences from the conversation and merges them into the stored profile.
///
/// LLM failures and unparseable replies are logged and leave the profile unchanged; the
/// customer already has their answer at this point.
pub struct CreateMemoryNode {
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn Store>,
}

impl CreateMemoryNode {
    pub fn new(llm: Arc<dyn LlmClient>, store: Arc<dyn Store>) -> Self {
        Self { llm, store }
    }

    fn request(state: &AgentState, existing: &UserProfile) -> Vec<Message> {
        let transcript = state
            .messages
            .iter()
            .filter(|m| !matches!(m, Message::System(_)))
            .filter(|m| !m.content().trim().is_empty())
            .map(|m| format!("{}: {}", m.role(), m.content()))
            .collect::<Vec<_>>()
            .join("\n");
        let existing = serde_json::to_string(existing).unwrap_or_else(|_| "{}".into());
        vec![
            Message::system(format!(
                "{}\n\nExisting memory profile: {}",
                CREATE_MEMORY_PROMPT, existing
            )),
            Message::user(transcript),
        ]
    }
}

#[async_trait]
impl Node<AgentState> for CreateMemoryNode {
    fn id(&self) -> &str {
        "create_memory"
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let Some(id) = state.customer_id.clone() else {
            return Ok((state, Next::Continue));
        };
        let mut profile = read_profile(self.store.as_ref(), &id)
            .await
            .unwrap_or_default();

        let reply = match self.llm.invoke(&Self::request(&state, &profile)).await {
            Ok(r) => r.content,
            Err(e) => {
                tracing::warn!(customer_id = %id, error = %e, "memory extraction failed");
                return Ok((state, Next::Continue));
            }
        };
        let Some(extracted) = parse_profile(&reply) else {
            tracing::warn!(customer_id = %id, reply = %reply, "memory reply is not valid JSON");
            return Ok((state, Next::Continue));
        };

        profile.merge(extracted.music_preferences);
        let value = serde_json::to_value(&profile)
            .map_err(|e| AgentError::ExecutionFailed(e.to_string()))?;
        if let Err(e) = self.store.put(&memory_namespace(&id), MEMORY_KEY, &value).await {
            tracing::warn!(customer_id = %id, error = %e, "saving memory failed");
            return Ok((state, Next::Continue));
        }
        tracing::debug!(customer_id = %id, preferences = profile.music_preferences.len(), "memory saved");
        let mut state = state;
        state.loaded_memory = profile.format();
        Ok((state, Next::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::memory::InMemoryStore;
    use serde_json::json;

    fn verified(message: &str) -> AgentState {
        let mut s = AgentState::from_user(message);
        s.customer_id = Some("1".into());
        s
    }

    #[test]
    fn parse_profile_tolerates_surrounding_text() {
        let p = parse_profile("Sure:\n```json\n{\"music_preferences\": [\"Rock\"]}\n```").unwrap();
        assert_eq!(p.music_preferences, vec!["Rock"]);
        assert!(parse_profile("no json here").is_none());
    }

    #[test]
    fn merge_dedupes_case_insensitively() {
        let mut p = UserProfile {
            music_preferences: vec!["Rock".into()],
        };
        p.merge(vec!["rock".into(), "Jazz".into(), " ".into()]);
        assert_eq!(p.music_preferences, vec!["Rock", "Jazz"]);
    }

    #[tokio::test]
    async fn load_memory_formats_stored_profile() {
        let store = Arc::new(InMemoryStore::new());
        store
            .put(
                &memory_namespace("1"),
                MEMORY_KEY,
                &json!({"music_preferences": ["AC/DC", "Rock"]}),
            )
            .await
            .unwrap();
        let (out, _) = LoadMemoryNode::new(store).run(verified("hi")).await.unwrap();
        assert_eq!(out.loaded_memory.as_deref(), Some("Music Preferences: AC/DC, Rock"));
    }

    #[tokio::test]
    async fn create_memory_merges_and_saves() {
        let store = Arc::new(InMemoryStore::new());
        store
            .put(&memory_namespace("1"), MEMORY_KEY, &json!({"music_preferences": ["Rock"]}))
            .await
            .unwrap();
        let llm = Arc::new(MockLlm::with_no_tool_calls(
            r#"{"music_preferences": ["rock", "Alanis Morissette"]}"#,
        ));
        let node = CreateMemoryNode::new(llm, store.clone());
        let (out, _) = node.run(verified("I love Alanis Morissette")).await.unwrap();

        let saved = store
            .get(&memory_namespace("1"), MEMORY_KEY)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved, json!({"music_preferences": ["Rock", "Alanis Morissette"]}));
        assert!(out.loaded_memory.unwrap().contains("Alanis"));
    }

    #[tokio::test]
    async fn unparseable_reply_leaves_memory_unchanged() {
        let store = Arc::new(InMemoryStore::new());
        let llm = Arc::new(MockLlm::with_no_tool_calls("I could not tell."));
        let node = CreateMemoryNode::new(llm, store.clone());
        node.run(verified("hello")).await.unwrap();
        assert!(store
            .get(&memory_namespace("1"), MEMORY_KEY)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unverified_state_is_skipped() {
        let store = Arc::new(InMemoryStore::new());
        let llm = Arc::new(MockLlm::with_no_tool_calls("{}"));
        let node = CreateMemoryNode::new(llm.clone(), store);
        node.run(AgentState::from_user("hi")).await.unwrap();
        assert_eq!(llm.call_count(), 0);
    }
}
