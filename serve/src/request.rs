//! Request bodies.

use concierge::Message;
use serde::Deserialize;

use super::ApiError;

/// `POST /runs/wait` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RunRequest {
    /// Configured graph name.
    pub assistant_id: String,
    pub input: RunInput,
    /// Continue this thread; a new id is generated when absent.
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Customer id, looked up before the run counts it as verified.
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub recursion_limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunInput {
    pub messages: Vec<InputMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputMessage {
    pub role: String,
    pub content: String,
}

impl RunInput {
    /// Converts wire messages; an empty list or unknown role is a 422.
    pub fn into_messages(self) -> Result<Vec<Message>, ApiError> {
        if self.messages.is_empty() {
            return Err(ApiError::Unprocessable("input.messages is empty".into()));
        }
        self.messages
            .into_iter()
            .map(|m| {
                Message::from_role(&m.role, m.content)
                    .ok_or_else(|| ApiError::Unprocessable(format!("unknown role: {}", m.role)))
            })
            .collect()
    }
}
