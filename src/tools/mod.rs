//! Tools the reasoning engine can call
//!
//! - `Tool`: name, description, parameter schema and an async `invoke`
//! - `ToolRegistry`: fixed set of tools, argument checks and dispatch by name
//! - `travel`: the four HTTP-backed travel lookups

pub mod client;
pub mod travel;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::{Result, TravelPlannerError};

pub use client::TravelApiClient;
pub use travel::{ActivitiesTool, FlightTicketsTool, HotelBookingsTool, WeatherTool};

/// What the model sees of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Per-call context handed to every tool
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Conversation the call belongs to
    pub session_id: String,
    /// Deadline for a single tool call
    pub timeout: Duration,
    pub cancellation: CancellationToken,
}

impl ToolContext {
    pub fn new(session_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            session_id: session_id.into(),
            timeout,
            cancellation: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used for dispatch
    fn name(&self) -> &str;

    /// Tells the model when to use the tool
    fn description(&self) -> &str;

    /// JSON schema of the arguments (`type`, `properties`, `required`)
    fn parameters_schema(&self) -> Value;

    async fn invoke(&self, args: Value, ctx: &ToolContext) -> Result<Value>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Fixed, ordered set of tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// The four travel lookups backed by one client
    pub fn travel(client: TravelApiClient) -> Self {
        let client = std::sync::Arc::new(client);
        let mut registry = Self::new();
        registry.register(Box::new(FlightTicketsTool::new(client.clone())));
        registry.register(Box::new(HotelBookingsTool::new(client.clone())));
        registry.register(Box::new(WeatherTool::new(client.clone())));
        registry.register(Box::new(ActivitiesTool::new(client)));
        registry
    }

    /// Register a tool; a tool with the same name is replaced.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.retain(|existing| existing.name() != tool.name());
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(AsRef::as_ref)
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Check required arguments, then invoke the named tool.
    #[instrument(skip(self, args, ctx), fields(session_id = %ctx.session_id))]
    pub async fn execute(&self, name: &str, args: Value, ctx: &ToolContext) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| TravelPlannerError::tool(format!("tool not found: {name}")))?;
        validate_args(name, &tool.parameters_schema(), &args)?;
        debug!(tool = name, %args, "Invoking tool");
        tool.invoke(args, ctx).await
    }
}

/// Arguments must be an object holding every `required` key as a string.
fn validate_args(name: &str, schema: &Value, args: &Value) -> Result<()> {
    let object = args
        .as_object()
        .ok_or_else(|| TravelPlannerError::tool(format!("arguments for {name} must be an object")))?;

    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for key in required.iter().filter_map(Value::as_str) {
        match object.get(key) {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(TravelPlannerError::tool(format!(
                    "argument '{key}' for {name} must be a string"
                )));
            }
            None => {
                return Err(TravelPlannerError::tool(format!(
                    "missing required argument '{key}' for {name}"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the text back."
        }

        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            })
        }

        async fn invoke(&self, args: Value, ctx: &ToolContext) -> Result<Value> {
            Ok(json!({"text": args["text"], "session": ctx.session_id}))
        }
    }

    fn ctx() -> ToolContext {
        ToolContext::new("s-1", Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_registry_dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Echo));

        let out = registry
            .execute("echo", json!({"text": "hi"}), &ctx())
            .await
            .unwrap();
        assert_eq!(out, json!({"text": "hi", "session": "s-1"}));
    }

    #[tokio::test]
    async fn test_registry_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.execute("nope", json!({}), &ctx()).await.unwrap_err();
        assert!(matches!(err, TravelPlannerError::Tool { .. }));
    }

    #[tokio::test]
    async fn test_registry_rejects_missing_and_mistyped_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Echo));

        let err = registry.execute("echo", json!({}), &ctx()).await.unwrap_err();
        assert!(err.to_string().contains("missing required argument 'text'"));

        let err = registry
            .execute("echo", json!({"text": 3}), &ctx())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must be a string"));

        let err = registry.execute("echo", json!("text"), &ctx()).await.unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Echo));
        registry.register(Box::new(Echo));
        assert_eq!(registry.names(), vec!["echo"]);
        assert_eq!(registry.definitions()[0].description, "Echo the text back.");
    }

    #[test]
    fn test_travel_registry_has_four_tools_in_order() {
        let client = TravelApiClient::new(&crate::config::TravelApiConfig::default()).unwrap();
        let registry = ToolRegistry::travel(client);
        assert_eq!(
            registry.names(),
            vec![
                "get_flight_tickets",
                "get_hotel_bookings",
                "get_weather",
                "get_activities"
            ]
        );
        for definition in registry.definitions() {
            assert_eq!(definition.parameters["type"], "object");
            assert!(!definition.description.is_empty());
        }
    }
}
