//! Shared helpers for unit tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::llm::{ChatModel, Message, ModelReply};
use crate::tools::ToolDefinition;
use crate::travel_data::TravelDataService;
use crate::{Result, TravelPlannerError, api};

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn spawn_data_service() -> String {
    spawn_router(api::router(TravelDataService::default())).await
}

/// Chat model that replays canned replies and records what it was sent
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ModelReply>>,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<ModelReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Plain text answers, no tool calls
    pub fn answering(answers: &[&str]) -> Self {
        Self::new(
            answers
                .iter()
                .map(|answer| ModelReply {
                    content: (*answer).to_string(),
                    tool_calls: Vec::new(),
                })
                .collect(),
        )
    }

    pub fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        messages: &[Message],
        _tools: &[ToolDefinition],
        cancel: &CancellationToken,
    ) -> Result<ModelReply> {
        if cancel.is_cancelled() {
            return Err(TravelPlannerError::cancelled("llm"));
        }
        self.seen.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TravelPlannerError::upstream("llm", "script exhausted"))
    }
}
