//! The four travel lookup tools
//!
//! Each tool is a thin wrapper around one travel data endpoint. Failures are
//! returned to the caller as they are; nothing is retried or rewritten here.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{Tool, ToolContext, TravelApiClient};
use crate::{Result, TravelPlannerError};

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| TravelPlannerError::tool(format!("invalid arguments for {tool}: {e}")))
}

fn destination_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "destination": {"type": "string", "description": "city destination"}
        },
        "required": ["destination"]
    })
}

#[derive(Debug, Deserialize)]
struct FlightArgs {
    departure: String,
    arrival: String,
    departure_date: String,
    return_date: String,
}

#[derive(Debug, Deserialize)]
struct HotelArgs {
    destination: String,
    check_in_date: String,
    check_out_date: String,
}

#[derive(Debug, Deserialize)]
struct DestinationArgs {
    destination: String,
}

pub struct FlightTicketsTool {
    client: Arc<TravelApiClient>,
}

impl FlightTicketsTool {
    pub fn new(client: Arc<TravelApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for FlightTicketsTool {
    fn name(&self) -> &str {
        "get_flight_tickets"
    }

    fn description(&self) -> &str {
        "Fetch round trip flight tickets based on departure and arrival destinations and departure and return dates."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "departure": {"type": "string", "description": "departure city"},
                "arrival": {"type": "string", "description": "arrival city"},
                "departure_date": {"type": "string", "description": "outbound flight date"},
                "return_date": {"type": "string", "description": "return flight date"}
            },
            "required": ["departure", "arrival", "departure_date", "return_date"]
        })
    }

    async fn invoke(&self, args: Value, ctx: &ToolContext) -> Result<Value> {
        let args: FlightArgs = parse_args(self.name(), args)?;
        self.client
            .get_json(
                "/flight-tickets",
                &[
                    ("departure", args.departure.as_str()),
                    ("arrival", args.arrival.as_str()),
                    ("departure_date", args.departure_date.as_str()),
                    ("return_date", args.return_date.as_str()),
                ],
                ctx,
            )
            .await
    }
}

pub struct HotelBookingsTool {
    client: Arc<TravelApiClient>,
}

impl HotelBookingsTool {
    pub fn new(client: Arc<TravelApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for HotelBookingsTool {
    fn name(&self) -> &str {
        "get_hotel_bookings"
    }

    fn description(&self) -> &str {
        "Fetch hotel bookings info based on destination and check in and check out date"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination": {"type": "string", "description": "city destination"},
                "check_in_date": {"type": "string", "description": "Check-in date in the form mm/dd/yyyy"},
                "check_out_date": {"type": "string", "description": "Check-out date in the form mm/dd/yyyy"}
            },
            "required": ["destination", "check_in_date", "check_out_date"]
        })
    }

    async fn invoke(&self, args: Value, ctx: &ToolContext) -> Result<Value> {
        let args: HotelArgs = parse_args(self.name(), args)?;
        self.client
            .get_json(
                "/hotel-bookings",
                &[
                    ("destination", args.destination.as_str()),
                    ("check_in_date", args.check_in_date.as_str()),
                    ("check_out_date", args.check_out_date.as_str()),
                ],
                ctx,
            )
            .await
    }
}

pub struct WeatherTool {
    client: Arc<TravelApiClient>,
}

impl WeatherTool {
    pub fn new(client: Arc<TravelApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the weather details for a given destination."
    }

    fn parameters_schema(&self) -> Value {
        destination_schema()
    }

    async fn invoke(&self, args: Value, ctx: &ToolContext) -> Result<Value> {
        let args: DestinationArgs = parse_args(self.name(), args)?;
        self.client
            .get_json("/get-weather", &[("location", args.destination.as_str())], ctx)
            .await
    }
}

pub struct ActivitiesTool {
    client: Arc<TravelApiClient>,
}

impl ActivitiesTool {
    pub fn new(client: Arc<TravelApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ActivitiesTool {
    fn name(&self) -> &str {
        "get_activities"
    }

    fn description(&self) -> &str {
        "Fetch tourist activities for a given destination."
    }

    fn parameters_schema(&self) -> Value {
        destination_schema()
    }

    async fn invoke(&self, args: Value, ctx: &ToolContext) -> Result<Value> {
        let args: DestinationArgs = parse_args(self.name(), args)?;
        self.client
            .get_json("/get-activities", &[("location", args.destination.as_str())], ctx)
            .await
    }
}
