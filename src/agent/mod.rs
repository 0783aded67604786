//! Reasoning engine
//!
//! [`ReasoningEngine`] is the seam the session talks to: hand it new messages
//! for a thread, get the whole thread back. [`ToolCallingAgent`] implements
//! it with a chat model and a tool registry, keeping each thread's history
//! in memory between calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::llm::{ChatModel, Message};
use crate::tools::{ToolContext, ToolRegistry};

#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Append `messages` to the thread, run until the model answers and
    /// return the full thread. The last message is the answer.
    async fn invoke(
        &self,
        thread_id: &str,
        messages: Vec<Message>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Message>>;

    /// Drop any state kept for the thread.
    async fn forget(&self, _thread_id: &str) {}
}

pub struct ToolCallingAgent {
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    threads: RwLock<HashMap<String, Vec<Message>>>,
    max_tool_rounds: u32,
    tool_timeout: Duration,
}

impl ToolCallingAgent {
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolRegistry) -> Self {
        Self {
            model,
            tools,
            threads: RwLock::new(HashMap::new()),
            max_tool_rounds: 10,
            tool_timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.max_tool_rounds = max;
        self
    }

    #[must_use]
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Saved history of a thread
    pub async fn thread(&self, thread_id: &str) -> Option<Vec<Message>> {
        self.threads.read().await.get(thread_id).cloned()
    }
}

#[async_trait]
impl ReasoningEngine for ToolCallingAgent {
    #[instrument(skip(self, messages, cancel), fields(new_messages = messages.len()))]
    async fn invoke(
        &self,
        thread_id: &str,
        messages: Vec<Message>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Message>> {
        let mut thread = self.thread(thread_id).await.unwrap_or_default();
        thread.extend(messages);

        let definitions = self.tools.definitions();
        let ctx = ToolContext::new(thread_id, self.tool_timeout).with_cancellation(cancel.clone());
        let mut rounds = 0;

        loop {
            let reply = self.model.complete(&thread, &definitions, cancel).await?;

            if reply.tool_calls.is_empty() {
                thread.push(Message::assistant(reply.content));
                break;
            }

            rounds += 1;
            if rounds > self.max_tool_rounds {
                warn!(rounds, "Max tool rounds reached, returning partial response");
                thread.push(Message::assistant(reply.content));
                break;
            }

            let calls = reply.tool_calls.clone();
            thread.push(Message::assistant_with_tools(reply.content, reply.tool_calls));

            for call in calls {
                debug!(tool = %call.name, id = %call.id, "Executing tool call");
                let output = self.tools.execute(&call.name, call.arguments, &ctx).await?;
                thread.push(Message::tool(call.id, output.to_string()));
            }
        }

        info!(rounds, messages = thread.len(), "Agent turn finished");
        self.threads
            .write()
            .await
            .insert(thread_id.to_string(), thread.clone());
        Ok(thread)
    }

    async fn forget(&self, thread_id: &str) {
        self.threads.write().await.remove(thread_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TravelPlannerError;
    use crate::config::TravelApiConfig;
    use crate::llm::{ModelReply, Role, ToolCall};
    use crate::test_support::{ScriptedModel, spawn_data_service};
    use crate::tools::TravelApiClient;
    use serde_json::json;

    async fn travel_tools() -> ToolRegistry {
        let client = TravelApiClient::new(&TravelApiConfig {
            base_url: spawn_data_service().await,
            ..TravelApiConfig::default()
        })
        .unwrap();
        ToolRegistry::travel(client)
    }

    fn call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        }
    }

    #[tokio::test]
    async fn test_runs_tools_then_answers() {
        let model = Arc::new(ScriptedModel::new(vec![
            ModelReply {
                content: String::new(),
                tool_calls: vec![
                    call("c1", "get_weather", json!({"destination": "London"})),
                    call("c2", "get_activities", json!({"destination": "London"})),
                ],
            },
            ModelReply {
                content: "Pack an umbrella.".to_string(),
                tool_calls: vec![],
            },
        ]));
        let agent = ToolCallingAgent::new(model.clone(), travel_tools().await);

        let thread = agent
            .invoke("t1", vec![Message::user("London?")], &CancellationToken::new())
            .await
            .unwrap();

        let roles: Vec<Role> = thread.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::Tool, Role::Tool, Role::Assistant]
        );
        assert!(thread[2].content.contains("Drizzle"));
        assert_eq!(thread[2].tool_call_id.as_deref(), Some("c1"));
        assert!(thread[3].content.contains("Ride the London Eye"));
        assert_eq!(thread.last().unwrap().content, "Pack an umbrella.");

        // The second model call saw the tool results.
        let seen = model.seen();
        assert_eq!(seen[1].len(), 4);
    }

    #[tokio::test]
    async fn test_thread_memory_carries_across_calls() {
        let model = Arc::new(ScriptedModel::answering(&["first", "second"]));
        let agent = ToolCallingAgent::new(model.clone(), ToolRegistry::new());
        let cancel = CancellationToken::new();

        agent.invoke("t1", vec![Message::user("a")], &cancel).await.unwrap();
        let thread = agent
            .invoke("t1", vec![Message::user("b")], &cancel)
            .await
            .unwrap();

        assert_eq!(thread.len(), 4);
        assert_eq!(thread.last().unwrap().content, "second");
        assert_eq!(model.seen()[1].len(), 3);

        agent.forget("t1").await;
        assert!(agent.thread("t1").await.is_none());
    }

    #[tokio::test]
    async fn test_tool_failure_propagates() {
        let model = Arc::new(ScriptedModel::new(vec![ModelReply {
            content: String::new(),
            tool_calls: vec![call("c1", "get_weather", json!({"destination": "Atlantis"}))],
        }]));
        let agent = ToolCallingAgent::new(model, travel_tools().await);

        let err = agent
            .invoke("t1", vec![Message::user("Atlantis?")], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TravelPlannerError::Upstream { .. }));
        assert!(agent.thread("t1").await.is_none());
    }

    #[tokio::test]
    async fn test_stops_after_max_tool_rounds() {
        let looping = ModelReply {
            content: "still thinking".to_string(),
            tool_calls: vec![call("c", "get_activities", json!({"destination": "Miami"}))],
        };
        let model = Arc::new(ScriptedModel::new(vec![looping.clone(), looping.clone(), looping]));
        let agent = ToolCallingAgent::new(model, travel_tools().await).with_max_tool_rounds(2);

        let thread = agent
            .invoke("t1", vec![Message::user("loop")], &CancellationToken::new())
            .await
            .unwrap();
        let last = thread.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "still thinking");
        assert!(last.tool_calls.is_empty());
    }
}
