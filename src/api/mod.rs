//! HTTP surface of the travel data service

pub mod query;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::models::{ActivityList, HotelBooking, RoundTrip, WeatherSnapshot};
use crate::travel_data::TravelDataService;
use crate::{Result, VERSION};

#[derive(Debug, Serialize, Deserialize)]
pub struct FlightQuery {
    pub departure: String,
    pub arrival: String,
    pub departure_date: String,
    pub return_date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HotelQuery {
    pub destination: String,
    pub check_in_date: String,
    pub check_out_date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationQuery {
    pub location: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CitiesResponse {
    pub cities: Vec<String>,
}

pub fn router(service: TravelDataService) -> Router {
    Router::new()
        .route("/flight-tickets", get(get_flight_tickets))
        .route("/hotel-bookings", get(get_hotel_bookings))
        .route("/get-weather", get(get_weather))
        .route("/get-activities", get(get_activities))
        .route("/cities", get(get_cities))
        .route("/health", get(health))
        .with_state(service)
}

#[instrument(skip(service))]
async fn get_flight_tickets(
    State(service): State<TravelDataService>,
    Query(query): Query<FlightQuery>,
) -> Result<Json<RoundTrip>> {
    let trip = service.flight_tickets(
        &query.departure,
        &query.arrival,
        &query.departure_date,
        &query.return_date,
    )?;
    Ok(Json(trip))
}

#[instrument(skip(service))]
async fn get_hotel_bookings(
    State(service): State<TravelDataService>,
    Query(query): Query<HotelQuery>,
) -> Result<Json<HotelBooking>> {
    let booking =
        service.hotel_booking(&query.destination, &query.check_in_date, &query.check_out_date)?;
    Ok(Json(booking))
}

#[instrument(skip(service))]
async fn get_weather(
    State(service): State<TravelDataService>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<WeatherSnapshot>> {
    Ok(Json(service.weather(&query.location)?))
}

#[instrument(skip(service))]
async fn get_activities(
    State(service): State<TravelDataService>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<ActivityList>> {
    Ok(Json(service.activities(&query.location)?))
}

async fn get_cities(State(service): State<TravelDataService>) -> Json<CitiesResponse> {
    let cities = service
        .known_cities()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(CitiesResponse { cities })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router(TravelDataService::default())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_flight_tickets_endpoint() {
        let (status, body) = get(
            "/flight-tickets?departure=Los%20Angeles&arrival=Tokyo&departure_date=08/10/2025&return_date=08/15/2025",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["outbound_flight"]["airline"], "American Airlines");
        assert_eq!(json["outbound_flight"]["arrival_airport"], "HND");
        assert_eq!(json["return_flight"]["airline"], "Japan Airlines");
        assert_eq!(json["return_flight"]["departure_time"], "08/15/2025 T10:00:00");
    }

    #[tokio::test]
    async fn test_hotel_bookings_endpoint() {
        let (status, body) = get(
            "/hotel-bookings?destination=new%20york&check_in_date=08/10/2025&check_out_date=08/15/2025",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let booking: HotelBooking = serde_json::from_slice(&body).unwrap();
        assert_eq!(booking.total_price, 1000.0);
    }

    #[tokio::test]
    async fn test_hotel_bookings_bad_date_is_unprocessable() {
        let (status, _) = get(
            "/hotel-bookings?destination=paris&check_in_date=2025-08-10&check_out_date=08/15/2025",
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_weather_endpoint() {
        let (status, body) = get("/get-weather?location=Dubai").await;
        assert_eq!(status, StatusCode::OK);
        let weather: WeatherSnapshot = serde_json::from_slice(&body).unwrap();
        assert_eq!(weather.condition, "Hot");

        let (status, _) = get("/get-weather?location=Unknown%20City").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_activities_endpoint_falls_back() {
        let (status, body) = get("/get-activities?location=Unknown%20City").await;
        assert_eq!(status, StatusCode::OK);
        let list: ActivityList = serde_json::from_slice(&body).unwrap();
        assert_eq!(list.activities, vec!["No activities found for this location."]);
    }

    #[tokio::test]
    async fn test_missing_parameter_is_bad_request() {
        let (status, _) = get("/get-weather").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cities_and_health() {
        let (status, body) = get("/cities").await;
        assert_eq!(status, StatusCode::OK);
        let cities: CitiesResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(cities.cities.len(), 10);

        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "healthy");
    }
}
