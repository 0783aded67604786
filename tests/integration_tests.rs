//! End-to-end tests: data service and planning endpoint over real sockets

use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use travel_planner::api::query::QueryResponse;
use travel_planner::config::TravelApiConfig;
use travel_planner::llm::{ChatModel, Message, ModelReply, Role, ToolCall};
use travel_planner::tools::ToolDefinition;
use travel_planner::{
    SessionManager, ToolCallingAgent, ToolRegistry, TravelApiClient, TravelDataService, web,
};

/// Books a hotel on the first turn of a thread and echoes follow-ups.
struct HotelPlanner;

#[async_trait]
impl ChatModel for HotelPlanner {
    async fn complete(
        &self,
        messages: &[Message],
        _tools: &[ToolDefinition],
        _cancel: &CancellationToken,
    ) -> travel_planner::Result<ModelReply> {
        let last = messages.last().expect("model called without messages");
        let reply = match last.role {
            Role::Tool => ModelReply {
                content: format!("Your hotel: {}", last.content),
                tool_calls: vec![],
            },
            Role::User if messages.len() == 2 => ModelReply {
                content: String::new(),
                tool_calls: vec![ToolCall {
                    id: "call_1".to_string(),
                    name: "get_hotel_bookings".to_string(),
                    arguments: json!({
                        "destination": "new york",
                        "check_in_date": "08/10/2025",
                        "check_out_date": "08/15/2025"
                    }),
                }],
            },
            _ => ModelReply {
                content: format!("You asked: {}", last.content),
                tool_calls: vec![],
            },
        };
        Ok(reply)
    }
}

async fn spawn(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_stack() -> String {
    let timeout = Duration::from_secs(10);
    let data_url = spawn(web::data_app(TravelDataService::default(), timeout)).await;

    let client = TravelApiClient::new(&TravelApiConfig {
        base_url: data_url,
        ..TravelApiConfig::default()
    })
    .unwrap();
    let agent = ToolCallingAgent::new(Arc::new(HotelPlanner), ToolRegistry::travel(client));
    let manager = Arc::new(SessionManager::new(Arc::new(agent)));
    spawn(web::agent_app(manager, timeout)).await
}

async fn query(agent_url: &str, params: &[(&str, &str)]) -> reqwest::Response {
    let url = reqwest::Url::parse_with_params(&format!("{agent_url}/query"), params).unwrap();
    reqwest::get(url).await.unwrap()
}

const TRIP: [(&str, &str); 4] = [
    ("departure", "Chicago"),
    ("arrival", "New York"),
    ("check_in", "08/10/2025"),
    ("check_out", "08/15/2025"),
];

#[tokio::test]
async fn test_plan_follow_up_and_reset() {
    let agent_url = spawn_stack().await;

    let first: QueryResponse = query(&agent_url, &TRIP).await.json().await.unwrap();
    assert_eq!(first.turn_count, 1);
    assert!(first.response.starts_with("Your hotel: "));
    let booking: Value =
        serde_json::from_str(first.response.trim_start_matches("Your hotel: ")).unwrap();
    assert_eq!(booking["hotel_name"], "The Plaza Hotel");
    assert_eq!(booking["total_price"], 1000.0);

    let second: QueryResponse = query(&agent_url, &[("query", "Is breakfast included?")])
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(second.session_id, first.session_id);
    assert_eq!(second.turn_count, 2);
    assert_eq!(second.response, "You asked: Is breakfast included?");

    let third: QueryResponse = query(&agent_url, &TRIP).await.json().await.unwrap();
    assert_ne!(third.session_id, first.session_id);
    assert_eq!(third.turn_count, 1);
}

#[tokio::test]
async fn test_conversations_do_not_share_sessions() {
    let agent_url = spawn_stack().await;

    let mut alice_params = TRIP.to_vec();
    alice_params.push(("conversation_id", "alice"));
    let alice: QueryResponse = query(&agent_url, &alice_params).await.json().await.unwrap();
    assert_eq!(alice.conversation_id, "alice");

    let response = query(
        &agent_url,
        &[("query", "what about weather?"), ("conversation_id", "bob")],
    )
    .await;
    assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_data_service_over_http() {
    let data_url = spawn(web::data_app(
        TravelDataService::default(),
        Duration::from_secs(10),
    ))
    .await;

    let weather: Value = reqwest::get(format!("{data_url}/get-weather?location=tokyo"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(weather["condition"], "Sunny");
    assert_eq!(weather["temperature"], "27°C");

    let missing = reqwest::get(format!("{data_url}/get-weather?location=Atlantis"))
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[test]
fn test_cli_help_lists_subcommands() {
    let output = Command::new(env!("CARGO_BIN_EXE_travel-planner"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["data-server", "agent-server", "serve", "plan"] {
        assert!(stdout.contains(subcommand), "missing {subcommand}");
    }
}
