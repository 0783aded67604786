use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use travel_planner::config::TravelPlannerConfig;
use travel_planner::session::{Session, TripRequest, TurnInput};
use travel_planner::{
    OpenAiChatModel, SessionManager, ToolCallingAgent, ToolRegistry, TravelApiClient,
    TravelDataService, telemetry, web,
};

#[derive(Parser)]
#[command(name = "travel-planner", version, about = "Mock travel data service and trip planning agent")]
struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, env = "TRAVEL_PLANNER_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the travel data service
    DataServer,
    /// Run the conversational planning endpoint
    AgentServer,
    /// Run both services in one process
    Serve,
    /// Plan a single trip and print the answer
    Plan {
        #[arg(long)]
        departure: String,
        #[arg(long)]
        arrival: String,
        /// MM/DD/YYYY
        #[arg(long)]
        check_in: String,
        /// MM/DD/YYYY
        #[arg(long)]
        check_out: String,
        /// Serve the travel data in-process instead of calling `travel_api.base_url`
        #[arg(long)]
        embedded: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config = TravelPlannerConfig::load_from_path(args.config)?;
    let _telemetry = telemetry::init(&config.logging, &config.telemetry, args.verbose)?;

    match args.command {
        Command::DataServer => run_data_server(&config).await,
        Command::AgentServer => run_agent_server(&config).await,
        Command::Serve => {
            tokio::try_join!(run_data_server(&config), run_agent_server(&config))?;
            Ok(())
        }
        Command::Plan {
            departure,
            arrival,
            check_in,
            check_out,
            embedded,
        } => {
            if embedded {
                config.travel_api.base_url = spawn_embedded_data_service(&config).await?;
            }
            let trip = TripRequest {
                departure,
                arrival,
                check_in,
                check_out,
            };
            plan(&config, trip).await
        }
    }
}

async fn run_data_server(config: &TravelPlannerConfig) -> Result<()> {
    let service = TravelDataService::new(config.lookups.clone());
    tracing::info!(policies = ?service.policies(), "Unknown city policies");
    let app = web::data_app(service, config.server.request_timeout());
    web::serve("Travel data service", &config.server.data_addr(), app).await
}

async fn run_agent_server(config: &TravelPlannerConfig) -> Result<()> {
    let manager = Arc::new(SessionManager::new(Arc::new(build_agent(config)?)));
    let app = web::agent_app(manager, config.server.request_timeout());
    web::serve("Planning agent", &config.server.agent_addr(), app).await
}

fn build_agent(config: &TravelPlannerConfig) -> Result<ToolCallingAgent> {
    let api_key = config.llm.require_api_key()?;
    let model = OpenAiChatModel::new(&config.llm, api_key)
        .context("Failed to create chat model client")?;
    let client = TravelApiClient::new(&config.travel_api)
        .context("Failed to create travel API client")?;
    tracing::info!(travel_api = %client.base_url(), model = %config.llm.model, "Agent configured");

    Ok(ToolCallingAgent::new(Arc::new(model), ToolRegistry::travel(client))
        .with_max_tool_rounds(config.llm.max_tool_rounds)
        .with_tool_timeout(config.travel_api.timeout()))
}

async fn spawn_embedded_data_service(config: &TravelPlannerConfig) -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind embedded data service")?;
    let addr = listener.local_addr()?;
    let app = web::data_app(
        TravelDataService::new(config.lookups.clone()),
        config.server.request_timeout(),
    );
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Embedded data service failed: {}", e);
        }
    });
    tracing::debug!(%addr, "Embedded data service started");
    Ok(format!("http://{addr}"))
}

async fn plan(config: &TravelPlannerConfig, trip: TripRequest) -> Result<()> {
    let agent = build_agent(config)?;
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let mut session = Session::new();
    let outcome = tokio::select! {
        outcome = session.take_turn(TurnInput::Trip(trip), &agent, &cancel) => outcome?,
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            anyhow::bail!("Interrupted");
        }
    };

    println!("{}", outcome.response);
    Ok(())
}
