//! Travel planner
//!
//! A mock travel data service (flights, hotels, weather, activities) served
//! over HTTP, and a conversational planning agent that reaches it through
//! tool calls.

pub mod agent;
pub mod api;
pub mod config;
pub mod deadline;
pub mod error;
pub mod llm;
pub mod models;
pub mod session;
pub mod telemetry;
pub mod tools;
pub mod travel_data;
pub mod web;

#[cfg(test)]
mod test_support;

// Re-export core types for public API
pub use agent::{ReasoningEngine, ToolCallingAgent};
pub use config::TravelPlannerConfig;
pub use error::TravelPlannerError;
pub use llm::{ChatModel, openai::OpenAiChatModel};
pub use session::{Session, SessionManager, TripRequest, TurnInput, TurnOutcome};
pub use tools::{Tool, ToolRegistry, TravelApiClient};
pub use travel_data::TravelDataService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelPlannerError>;
