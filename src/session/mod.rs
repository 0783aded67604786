//! Trip planning conversations
//!
//! A [`Session`] moves through three phases:
//!
//! - `Idle`: nothing planned yet
//! - `Fresh`: a trip brief arrived, a new session id is allocated and the
//!   system instruction plus the brief go to the reasoning engine
//! - `Active`: follow-up questions are forwarded alone under the same id
//!
//! A full set of trip parameters always starts over from `Fresh`.

pub mod manager;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::agent::ReasoningEngine;
use crate::llm::Message;
use crate::{Result, TravelPlannerError};

pub use manager::{DEFAULT_CONVERSATION, SessionManager};

pub const SYSTEM_PROMPT: &str = "You are a smart travel assistant. The user will only provide:\n\
- departure location\n\
- arrival location\n\
- departure date\n\
- return date\n\
Based on this, you must:\n\
1. Get round trip flight tickets.\n\
2. Get hotel bookings in the arrival city from arrival to return date.\n\
3. Get weather info in the arrival city for the duration.\n\
4. Get popular tourist activities in the arrival city.\n\
Use the available tools to fetch each of these items.\n\
Present the response in a structured and friendly manner, as a travel planner would, including headings and bullet points for clarity.\n\
Also include emojis for each heading to make it more engaging.";

/// The four parameters that start a new plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub departure: String,
    pub arrival: String,
    pub check_in: String,
    pub check_out: String,
}

impl TripRequest {
    /// The structured first user message
    #[must_use]
    pub fn brief(&self) -> String {
        format!(
            "I am planning a trip from {} to {}. I will be checking in on {} and checking out on {}.",
            self.departure, self.arrival, self.check_in, self.check_out
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnInput {
    Trip(TripRequest),
    FollowUp(String),
}

impl TurnInput {
    /// A complete parameter set wins over `query`; otherwise `query` is a follow-up.
    pub fn from_params(
        departure: Option<String>,
        arrival: Option<String>,
        check_in: Option<String>,
        check_out: Option<String>,
        query: Option<String>,
    ) -> Result<Self> {
        if let (Some(departure), Some(arrival), Some(check_in), Some(check_out)) =
            (departure, arrival, check_in, check_out)
        {
            return Ok(TurnInput::Trip(TripRequest {
                departure,
                arrival,
                check_in,
                check_out,
            }));
        }

        match query {
            Some(query) if !query.trim().is_empty() => Ok(TurnInput::FollowUp(query)),
            _ => Err(TravelPlannerError::validation(
                "provide departure, arrival, check_in and check_out to plan a trip, or a query to follow up",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Fresh,
    Active,
}

/// Result of one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub response: String,
    pub session_id: String,
    pub turn_count: u32,
}

/// One trip planning conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    session_id: Option<String>,
    turn_count: u32,
    transcript: Vec<Message>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    #[must_use]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match (&self.session_id, self.turn_count) {
            (None, _) => SessionPhase::Idle,
            (Some(_), 0) => SessionPhase::Fresh,
            (Some(_), _) => SessionPhase::Active,
        }
    }

    /// Run one turn against `engine`. The turn counter only moves once the
    /// engine has answered; failures leave the session as it was after the
    /// reset (if any).
    pub async fn take_turn(
        &mut self,
        input: TurnInput,
        engine: &dyn ReasoningEngine,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome> {
        let (session_id, messages) = match input {
            TurnInput::Trip(trip) => {
                self.reset(engine).await;
                let session_id = Uuid::new_v4().to_string();
                info!(%session_id, departure = %trip.departure, arrival = %trip.arrival, "Starting new trip session");
                self.session_id = Some(session_id.clone());
                (
                    session_id,
                    vec![Message::system(SYSTEM_PROMPT), Message::user(trip.brief())],
                )
            }
            TurnInput::FollowUp(query) => match (&self.session_id, self.phase()) {
                (Some(session_id), SessionPhase::Active) => {
                    debug!(%session_id, "Forwarding follow-up");
                    (session_id.clone(), vec![Message::user(query)])
                }
                _ => {
                    return Err(TravelPlannerError::validation(
                        "no trip is being planned yet; provide departure, arrival, check_in and check_out first",
                    ));
                }
            },
        };

        let thread = engine.invoke(&session_id, messages.clone(), cancel).await?;
        let response = thread
            .last()
            .map(|message| message.content.clone())
            .unwrap_or_default();

        self.transcript.extend(messages);
        self.transcript.push(Message::assistant(response.clone()));
        self.turn_count += 1;

        Ok(TurnOutcome {
            response,
            session_id,
            turn_count: self.turn_count,
        })
    }

    async fn reset(&mut self, engine: &dyn ReasoningEngine) {
        if let Some(previous) = self.session_id.take() {
            debug!(%previous, turns = self.turn_count, "Discarding previous session");
            engine.forget(&previous).await;
        }
        self.turn_count = 0;
        self.transcript.clear();
    }
}
