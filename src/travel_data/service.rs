use chrono::NaiveDate;
use tracing::{debug, instrument};

use super::tables::{
    self, CityRecord, FALLBACK_ACTIVITY, FALLBACK_AIRLINE, FALLBACK_AIRPORT, FALLBACK_HOTEL,
};
use crate::config::{LookupPolicies, MissPolicy};
use crate::models::{ActivityList, City, FlightTicket, HotelBooking, RoundTrip, WeatherSnapshot};
use crate::{Result, TravelPlannerError};

pub const TICKET_PRICE: f64 = 150.0;
pub const PRICE_PER_NIGHT: f64 = 200.0;
pub const HOTEL_DATE_FORMAT: &str = "%m/%d/%Y";

/// Read-only lookups over the static city tables
#[derive(Debug, Clone, Default)]
pub struct TravelDataService {
    policies: LookupPolicies,
}

impl TravelDataService {
    #[must_use]
    pub fn new(policies: LookupPolicies) -> Self {
        Self { policies }
    }

    #[must_use]
    pub fn policies(&self) -> &LookupPolicies {
        &self.policies
    }

    /// Canonical names of every city the tables know about
    #[must_use]
    pub fn known_cities(&self) -> Vec<&'static str> {
        tables::CITIES.iter().map(|record| record.name).collect()
    }

    /// Round trip tickets; dates are copied into the timestamps unparsed.
    #[instrument(skip(self))]
    pub fn flight_tickets(
        &self,
        departure: &str,
        arrival: &str,
        departure_date: &str,
        return_date: &str,
    ) -> Result<RoundTrip> {
        let from = lookup(&City::new(departure), self.policies.flights)?;
        let to = lookup(&City::new(arrival), self.policies.flights)?;

        let from_airline = from.map_or(FALLBACK_AIRLINE, |r| r.airline);
        let from_airport = from.map_or(FALLBACK_AIRPORT, |r| r.airport);
        let to_airline = to.map_or(FALLBACK_AIRLINE, |r| r.airline);
        let to_airport = to.map_or(FALLBACK_AIRPORT, |r| r.airport);

        Ok(RoundTrip {
            outbound_flight: ticket("AI101", from_airline, departure_date, from_airport, to_airport),
            return_flight: ticket("AI102", to_airline, return_date, to_airport, from_airport),
        })
    }

    /// Hotel quote for a stay; dates must be `mm/dd/yyyy`.
    ///
    /// Stays where check-out is not after check-in are priced at zero or
    /// below rather than rejected.
    #[instrument(skip(self))]
    pub fn hotel_booking(
        &self,
        destination: &str,
        check_in_date: &str,
        check_out_date: &str,
    ) -> Result<HotelBooking> {
        let record = lookup(&City::new(destination), self.policies.hotels)?;
        let hotel_name = record.map_or(FALLBACK_HOTEL, |r| r.hotel);

        let check_in = parse_hotel_date("check_in_date", check_in_date)?;
        let check_out = parse_hotel_date("check_out_date", check_out_date)?;
        let nights = (check_out - check_in).num_days();
        debug!(nights, "Computed stay duration");

        Ok(HotelBooking {
            hotel_name: hotel_name.to_string(),
            price_per_night: PRICE_PER_NIGHT,
            total_price: PRICE_PER_NIGHT * nights as f64,
            check_in_date: check_in_date.to_string(),
            check_out_date: check_out_date.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub fn weather(&self, location: &str) -> Result<WeatherSnapshot> {
        let snapshot = lookup(&City::new(location), self.policies.weather)?.map_or_else(
            WeatherSnapshot::unavailable,
            |record| WeatherSnapshot {
                temperature: record.weather.temperature.to_string(),
                condition: record.weather.condition.to_string(),
                humidity: record.weather.humidity.to_string(),
                wind_speed: record.weather.wind_speed.to_string(),
            },
        );
        Ok(snapshot)
    }

    #[instrument(skip(self))]
    pub fn activities(&self, location: &str) -> Result<ActivityList> {
        let activities = match lookup(&City::new(location), self.policies.activities)? {
            Some(record) => record.activities.iter().map(ToString::to_string).collect(),
            None => vec![FALLBACK_ACTIVITY.to_string()],
        };
        Ok(ActivityList { activities })
    }
}

/// `Ok(None)` means the caller should substitute its sentinel.
fn lookup(city: &City, policy: MissPolicy) -> Result<Option<&'static CityRecord>> {
    match (tables::find(city), policy) {
        (Some(record), _) => Ok(Some(record)),
        (None, MissPolicy::Fallback) => {
            debug!(city = %city, "City not in tables, using fallback");
            Ok(None)
        }
        (None, MissPolicy::Fail) => Err(TravelPlannerError::unknown_location(city.as_str())),
    }
}

fn ticket(
    flight_number: &str,
    airline: &str,
    date: &str,
    departure_airport: &str,
    arrival_airport: &str,
) -> FlightTicket {
    FlightTicket {
        flight_number: flight_number.to_string(),
        airline: airline.to_string(),
        price: TICKET_PRICE,
        departure_time: format!("{date} T10:00:00"),
        arrival_time: format!("{date} T12:00:00"),
        departure_airport: departure_airport.to_string(),
        arrival_airport: arrival_airport.to_string(),
    }
}

/// `mm/dd/yyyy` with a four digit year and nothing around it. chrono alone
/// accepts short years and leading whitespace.
fn is_hotel_date_shape(value: &str) -> bool {
    let parts: Vec<&str> = value.split('/').collect();
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    match parts.as_slice() {
        [month, day, year] => {
            (1..=2).contains(&month.len())
                && (1..=2).contains(&day.len())
                && year.len() == 4
                && parts.iter().all(|part| digits(*part))
        }
        _ => false,
    }
}

fn parse_hotel_date(field: &str, value: &str) -> Result<NaiveDate> {
    if !is_hotel_date_shape(value) {
        return Err(TravelPlannerError::validation(format!(
            "{field} '{value}' does not match format mm/dd/yyyy"
        )));
    }
    NaiveDate::parse_from_str(value, HOTEL_DATE_FORMAT).map_err(|e| {
        TravelPlannerError::validation(format!(
            "{field} '{value}' does not match format mm/dd/yyyy: {e}"
        ))
    })
}
