//! Answers produced by the travel data service

use serde::{Deserialize, Serialize};

/// One leg of a round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightTicket {
    pub flight_number: String,
    pub airline: String,
    pub price: f64,
    /// `"<date> T10:00:00"`, the date is passed through unparsed
    pub departure_time: String,
    pub arrival_time: String,
    pub departure_airport: String,
    pub arrival_airport: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTrip {
    pub outbound_flight: FlightTicket,
    pub return_flight: FlightTicket,
}

/// Hotel stay quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelBooking {
    pub hotel_name: String,
    pub price_per_night: f64,
    /// `price_per_night` times the night count, which may be zero or negative
    pub total_price: f64,
    pub check_in_date: String,
    pub check_out_date: String,
}

/// Fixed weather figures for a city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind_speed: String,
}

impl WeatherSnapshot {
    /// Snapshot returned for unknown cities when weather is configured to fall back
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            temperature: "N/A".to_string(),
            condition: "N/A".to_string(),
            humidity: "N/A".to_string(),
            wind_speed: "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityList {
    pub activities: Vec<String>,
}
