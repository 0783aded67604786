//! OpenAI compatible chat-completion client with function tools

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::{ChatModel, Message, ModelReply, Role, ToolCall};
use crate::config::LlmConfig;
use crate::deadline::with_deadline;
use crate::tools::ToolDefinition;
use crate::{Result, TravelPlannerError};

const SERVICE: &str = "llm";

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: Role,
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON encoded as a string, as the API expects
    arguments: String,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolDefinition,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

fn function_type() -> String {
    "function".to_string()
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        let content = if message.content.is_empty() && !message.tool_calls.is_empty() {
            None
        } else {
            Some(message.content.clone())
        };
        Self {
            role: message.role,
            content,
            tool_calls: message
                .tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: call.id.clone(),
                    kind: function_type(),
                    function: WireFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.to_string(),
                    },
                })
                .collect(),
            tool_call_id: message.tool_call_id.clone(),
        }
    }
}

impl TryFrom<WireToolCall> for ToolCall {
    type Error = TravelPlannerError;

    fn try_from(call: WireToolCall) -> Result<Self> {
        let arguments: Value = serde_json::from_str(&call.function.arguments).map_err(|e| {
            TravelPlannerError::upstream(
                SERVICE,
                format!("arguments for {} are not JSON: {e}", call.function.name),
            )
        })?;
        Ok(ToolCall {
            id: call.id,
            name: call.function.name,
            arguments,
        })
    }
}

pub struct OpenAiChatModel {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    timeout: Duration,
}

impl OpenAiChatModel {
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TravelPlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout: config.timeout(),
        })
    }

    fn build_request_body<'a>(
        &'a self,
        messages: &[Message],
        tools: &'a [ToolDefinition],
    ) -> RequestBody<'a> {
        RequestBody {
            model: &self.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: tools
                .iter()
                .map(|function| WireTool {
                    kind: "function",
                    function,
                })
                .collect(),
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    #[instrument(skip_all, fields(model = %self.model, messages = messages.len()))]
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        cancel: &CancellationToken,
    ) -> Result<ModelReply> {
        let body = self.build_request_body(messages, tools);
        let request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);

        let response: ResponseBody = with_deadline(SERVICE, self.timeout, cancel, async {
            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    TravelPlannerError::timeout(SERVICE, self.timeout)
                } else {
                    TravelPlannerError::upstream(SERVICE, e.to_string())
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let text = text.chars().take(200).collect::<String>();
                return Err(TravelPlannerError::upstream(
                    SERVICE,
                    format!("HTTP {status}: {text}"),
                ));
            }

            response
                .json::<ResponseBody>()
                .await
                .map_err(|e| TravelPlannerError::upstream(SERVICE, format!("invalid response: {e}")))
        })
        .await?;

        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion usage"
            );
        }

        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TravelPlannerError::upstream(SERVICE, "response has no choices"))?
            .message;

        let tool_calls = message
            .tool_calls
            .into_iter()
            .map(ToolCall::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(ModelReply {
            content: message.content.unwrap_or_default(),
            tool_calls,
        })
    }
}
