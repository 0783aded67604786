//! Static city tables backing every lookup
//!
//! All lookups share one record per city so the four tables can never
//! disagree on which cities are known.

use crate::models::City;

pub const FALLBACK_AIRLINE: &str = "Generic Airlines";
pub const FALLBACK_AIRPORT: &str = "Unknown Airport";
pub const FALLBACK_HOTEL: &str = "Generic Hotel";
pub const FALLBACK_ACTIVITY: &str = "No activities found for this location.";

#[derive(Debug)]
pub struct WeatherRow {
    pub temperature: &'static str,
    pub condition: &'static str,
    pub humidity: &'static str,
    pub wind_speed: &'static str,
}

#[derive(Debug)]
pub struct CityRecord {
    pub name: &'static str,
    pub airline: &'static str,
    pub airport: &'static str,
    pub hotel: &'static str,
    pub weather: WeatherRow,
    pub activities: [&'static str; 3],
}

pub static CITIES: [CityRecord; 10] = [
    CityRecord {
        name: "new york",
        airline: "Delta Airlines",
        airport: "JFK",
        hotel: "The Plaza Hotel",
        weather: WeatherRow {
            temperature: "25°C",
            condition: "Sunny",
            humidity: "60%",
            wind_speed: "15 km/h",
        },
        activities: [
            "Visit Times Square",
            "Explore Central Park",
            "See a Broadway Show",
        ],
    },
    CityRecord {
        name: "los angeles",
        airline: "American Airlines",
        airport: "LAX",
        hotel: "The Beverly Hills Hotel",
        weather: WeatherRow {
            temperature: "30°C",
            condition: "Clear",
            humidity: "50%",
            wind_speed: "10 km/h",
        },
        activities: [
            "Walk along Hollywood Boulevard",
            "Relax at Santa Monica Beach",
            "Visit Universal Studios",
        ],
    },
    CityRecord {
        name: "chicago",
        airline: "United Airlines",
        airport: "ORD",
        hotel: "The Langham",
        weather: WeatherRow {
            temperature: "20°C",
            condition: "Cloudy",
            humidity: "70%",
            wind_speed: "20 km/h",
        },
        activities: [
            "Admire the Art Institute of Chicago",
            "Walk along Navy Pier",
            "Take a river architecture tour",
        ],
    },
    CityRecord {
        name: "san francisco",
        airline: "Southwest Airlines",
        airport: "SFO",
        hotel: "Fairmont San Francisco",
        weather: WeatherRow {
            temperature: "18°C",
            condition: "Foggy",
            humidity: "80%",
            wind_speed: "5 km/h",
        },
        activities: [
            "Walk across the Golden Gate Bridge",
            "Visit Alcatraz Island",
            "Explore Fisherman's Wharf",
        ],
    },
    CityRecord {
        name: "miami",
        airline: "JetBlue Airways",
        airport: "MIA",
        hotel: "Fontainebleau Miami Beach",
        weather: WeatherRow {
            temperature: "28°C",
            condition: "Rainy",
            humidity: "85%",
            wind_speed: "25 km/h",
        },
        activities: [
            "Relax on South Beach",
            "Visit the Art Deco District",
            "Explore the Everglades",
        ],
    },
    CityRecord {
        name: "paris",
        airline: "Air France",
        airport: "CDG",
        hotel: "Hotel Ritz Paris",
        weather: WeatherRow {
            temperature: "22°C",
            condition: "Partly Cloudy",
            humidity: "65%",
            wind_speed: "12 km/h",
        },
        activities: [
            "Climb the Eiffel Tower",
            "Visit the Louvre Museum",
            "Stroll along the Seine River",
        ],
    },
    CityRecord {
        name: "tokyo",
        airline: "Japan Airlines",
        airport: "HND",
        hotel: "Park Hyatt Tokyo",
        weather: WeatherRow {
            temperature: "27°C",
            condition: "Sunny",
            humidity: "55%",
            wind_speed: "18 km/h",
        },
        activities: [
            "Explore the Meiji Shrine",
            "Visit the Tokyo Skytree",
            "Shop in Shibuya",
        ],
    },
    CityRecord {
        name: "sydney",
        airline: "Qantas",
        airport: "SYD",
        hotel: "Shangri-La Sydney",
        weather: WeatherRow {
            temperature: "24°C",
            condition: "Windy",
            humidity: "60%",
            wind_speed: "30 km/h",
        },
        activities: [
            "Climb the Sydney Harbour Bridge",
            "Visit the Sydney Opera House",
            "Relax at Bondi Beach",
        ],
    },
    CityRecord {
        name: "dubai",
        airline: "Emirates",
        airport: "DXB",
        hotel: "Burj Al Arab",
        weather: WeatherRow {
            temperature: "35°C",
            condition: "Hot",
            humidity: "40%",
            wind_speed: "8 km/h",
        },
        activities: [
            "Visit the Burj Khalifa",
            "Shop at the Dubai Mall",
            "Explore the Dubai Desert",
        ],
    },
    CityRecord {
        name: "london",
        airline: "British Airways",
        airport: "LHR",
        hotel: "The Savoy",
        weather: WeatherRow {
            temperature: "19°C",
            condition: "Drizzle",
            humidity: "75%",
            wind_speed: "10 km/h",
        },
        activities: [
            "See the Tower of London",
            "Ride the London Eye",
            "Visit the British Museum",
        ],
    },
];

/// Find the record for an already normalized city
#[must_use]
pub fn find(city: &City) -> Option<&'static CityRecord> {
    CITIES.iter().find(|record| record.name == city.as_str())
}
