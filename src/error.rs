//! Error types and handling for the travel planner

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the travel planner
#[derive(Error, Debug)]
pub enum TravelPlannerError {
    /// Malformed input (hotel dates, missing trip parameters, empty query)
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Lookup miss for a city that is not in the static tables
    #[error("Unknown location: {location}")]
    UnknownLocation { location: String },

    /// Non-success answer from a tool endpoint or the chat model
    #[error("Upstream error from {service}: {message}")]
    Upstream { service: String, message: String },

    /// An outbound call ran past its deadline
    #[error("Timed out after {after:?} calling {service}")]
    Timeout { service: String, after: Duration },

    /// An outbound call was cancelled by its caller
    #[error("Call to {service} was cancelled")]
    Cancelled { service: String },

    /// Tool lookup or argument errors
    #[error("Tool error: {message}")]
    Tool { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl TravelPlannerError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new unknown location error
    pub fn unknown_location<S: Into<String>>(location: S) -> Self {
        Self::UnknownLocation {
            location: location.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn timeout<S: Into<String>>(service: S, after: Duration) -> Self {
        Self::Timeout {
            service: service.into(),
            after,
        }
    }

    pub fn cancelled<S: Into<String>>(service: S) -> Self {
        Self::Cancelled {
            service: service.into(),
        }
    }

    /// Create a new tool error
    pub fn tool<S: Into<String>>(message: S) -> Self {
        Self::Tool {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status used when the error reaches a handler
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            TravelPlannerError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            TravelPlannerError::UnknownLocation { .. } => StatusCode::NOT_FOUND,
            TravelPlannerError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            TravelPlannerError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            TravelPlannerError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
            TravelPlannerError::Tool { .. } | TravelPlannerError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to HTTP clients; upstream bodies and internals stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelPlannerError::Validation { message } => format!("Invalid input: {message}"),
            TravelPlannerError::UnknownLocation { location } => {
                format!("No travel data for '{location}'.")
            }
            TravelPlannerError::Upstream { service, .. } => {
                format!("The {service} service returned an error. Please try again later.")
            }
            TravelPlannerError::Timeout { service, .. } => {
                format!("The {service} service did not answer in time.")
            }
            TravelPlannerError::Cancelled { .. } => "The request was cancelled.".to_string(),
            TravelPlannerError::Tool { message } => message.clone(),
            TravelPlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
        }
    }
}

impl IntoResponse for TravelPlannerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "Request failed");
        } else {
            tracing::debug!(error = %self, %status, "Request rejected");
        }
        (status, self.user_message()).into_response()
    }
}
