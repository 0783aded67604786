//! Data models for the travel planner
//!
//! This module contains the core domain models organized by concern:
//! - City: normalized lookup key shared by every table
//! - Travel: flight, hotel, weather and activity answers

pub mod city;
pub mod travel;

// Re-export all public types for convenient access
pub use city::City;
pub use travel::{ActivityList, FlightTicket, HotelBooking, RoundTrip, WeatherSnapshot};
