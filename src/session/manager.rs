use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::{Session, TurnInput, TurnOutcome};
use crate::agent::ReasoningEngine;
use crate::{Result, TravelPlannerError};

/// Conversation used by callers that do not name one
pub const DEFAULT_CONVERSATION: &str = "default";

/// Sessions keyed by conversation id.
///
/// Turns within one conversation run one at a time; separate conversations
/// never share state.
pub struct SessionManager {
    engine: Arc<dyn ReasoningEngine>,
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionManager {
    pub fn new(engine: Arc<dyn ReasoningEngine>) -> Self {
        Self {
            engine,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    async fn existing(&self, conversation_id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(conversation_id).cloned()
    }

    /// Only a trip brief may create a conversation; follow-ups must find one.
    async fn session_for(
        &self,
        conversation_id: &str,
        input: &TurnInput,
    ) -> Result<Arc<Mutex<Session>>> {
        if let Some(session) = self.existing(conversation_id).await {
            return Ok(session);
        }
        match input {
            TurnInput::Trip(_) => Ok(self
                .sessions
                .write()
                .await
                .entry(conversation_id.to_string())
                .or_default()
                .clone()),
            TurnInput::FollowUp(_) => Err(TravelPlannerError::validation(
                "no trip is being planned yet; provide departure, arrival, check_in and check_out first",
            )),
        }
    }

    #[instrument(skip(self, input, cancel))]
    pub async fn handle(
        &self,
        conversation_id: &str,
        input: TurnInput,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome> {
        let session = self.session_for(conversation_id, &input).await?;
        let mut session = session.lock().await;
        session.take_turn(input, self.engine.as_ref(), cancel).await
    }

    /// Copy of a conversation's current state
    pub async fn snapshot(&self, conversation_id: &str) -> Option<Session> {
        let session = self.existing(conversation_id).await?;
        let session = session.lock().await;
        Some(session.clone())
    }

    pub async fn conversation_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
