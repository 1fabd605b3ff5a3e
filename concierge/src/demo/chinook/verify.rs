//! Customer verification: the first step of the music-store graph.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node, RunContext};
use crate::message::Message;
use crate::state::AgentState;

use super::db::{ChinookDb, CustomerIdentifier};

/// Reply sent when no customer could be identified.
pub const VERIFY_REQUEST: &str = "Before I can help with your account or purchases, I need to \
verify who you are. Please provide your customer ID, email address, or phone number.";

/// Sets `customer_id` once a customer is found in the database, either from the run
/// config's `customer_id` or from an identifier in the latest user message.
///
/// On failure it appends [`VERIFY_REQUEST`] (or a not-found reply) as an assistant message and
/// leaves `customer_id` unset; the graph routes unverified states to END.
pub struct VerifyInfoNode {
    db: ChinookDb,
}

impl VerifyInfoNode {
    pub fn new(db: ChinookDb) -> Self {
        Self { db }
    }

    async fn lookup(&self, identifier: &CustomerIdentifier) -> Result<Option<String>, AgentError> {
        self.db
            .lookup_customer(identifier)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("customer lookup: {}", e)))
    }

    async fn verify(&self, mut state: AgentState, preset: Option<&str>) -> Result<AgentState, AgentError> {
        if state.customer_id.is_some() {
            return Ok(state);
        }

        if let Some(raw) = preset {
            let found = match CustomerIdentifier::parse(raw) {
                Some(identifier) => self.lookup(&identifier).await?,
                None => None,
            };
            match found {
                Some(id) => {
                    tracing::debug!(customer_id = %id, "customer from run config verified");
                    state.customer_id = Some(id);
                }
                None => {
                    tracing::info!(preset = %raw, "run config customer not found");
                    push_not_found(&mut state);
                }
            }
            return Ok(state);
        }

        let Some(identifier) = state.last_user_message().and_then(CustomerIdentifier::find_in)
        else {
            state.messages.push(Message::assistant(VERIFY_REQUEST));
            return Ok(state);
        };
        match self.lookup(&identifier).await? {
            Some(id) => {
                tracing::info!(customer_id = %id, "customer verified");
                state.messages.push(Message::system(format!(
                    "Thank you for providing your information! I was able to verify your \
                     account with customer id {}.",
                    id
                )));
                state.customer_id = Some(id);
            }
            None => {
                tracing::info!(identifier = ?identifier, "no customer matched");
                push_not_found(&mut state);
            }
        }
        Ok(state)
    }
}

fn push_not_found(state: &mut AgentState) {
    state.messages.push(Message::assistant(format!(
        "I could not find a customer matching that information. {}",
        VERIFY_REQUEST
    )));
}

#[async_trait]
impl Node<AgentState> for VerifyInfoNode {
    fn id(&self) -> &str {
        "verify_info"
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        Ok((self.verify(state, None).await?, Next::Continue))
    }

    async fn run_with_context(
        &self,
        state: AgentState,
        ctx: &RunContext,
    ) -> Result<(AgentState, Next), AgentError> {
        let state = self
            .verify(state, ctx.config.customer_id.as_deref())
            .await?;
        Ok((state, Next::Continue))
    }
}
