//! Travel data service
//!
//! Deterministic flight, hotel, weather and activity lookups over static
//! tables for ten cities. Nothing here performs I/O or holds mutable state.

pub mod service;
pub mod tables;

pub use service::TravelDataService;
