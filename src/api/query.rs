//! HTTP entry point of the conversational planner

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::Result;
use crate::session::{DEFAULT_CONVERSATION, SessionManager, TurnInput};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QueryParams {
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub query: Option<String>,
    /// Omitted by single-user clients, which then share one conversation
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    pub session_id: String,
    pub turn_count: u32,
    pub conversation_id: String,
}

pub fn router(manager: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/query", get(query))
        .route("/health", get(super::health))
        .with_state(manager)
}

#[instrument(skip(manager))]
async fn query(
    State(manager): State<Arc<SessionManager>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QueryResponse>> {
    let conversation_id = params
        .conversation_id
        .unwrap_or_else(|| DEFAULT_CONVERSATION.to_string());
    let input = TurnInput::from_params(
        params.departure,
        params.arrival,
        params.check_in,
        params.check_out,
        params.query,
    )?;

    // Dropping the handler (client went away) cancels outstanding calls.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let outcome = manager.handle(&conversation_id, input, &cancel).await?;
    Ok(Json(QueryResponse {
        response: outcome.response,
        session_id: outcome.session_id,
        turn_count: outcome.turn_count,
        conversation_id,
    }))
}
