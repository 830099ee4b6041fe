//! Weatherstack client.
//!
//! `GET {base}?access_key={key}&query={location}`. Only the fields the
//! node uses are decoded:
//!
//! ```json
//! { "location": { "name": "Rabat" },
//!   "current":  { "temperature": 24, "humidity": 50,
//!                 "weather_descriptions": ["Sunny"] } }
//! ```
//!
//! The provider reports quota and key problems as HTTP 200 with an
//! `error` object and no `current` block; that is a failed fetch.

use serde::Deserialize;

use super::utils::escape_query;
use crate::app::ports::{HttpClient, WeatherPort};
use crate::app::weather::WeatherSnapshot;
use crate::error::CommsError;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize)]
struct WeatherWire {
    current: Option<CurrentWire>,
    #[serde(default)]
    location: Option<LocationWire>,
}

#[derive(Debug, Deserialize)]
struct CurrentWire {
    temperature: Option<f32>,
    humidity: Option<f32>,
    #[serde(default)]
    weather_descriptions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LocationWire {
    name: Option<String>,
}

/// Decode a 200 response body into a snapshot.
pub fn parse_weather(body: &[u8]) -> Result<WeatherSnapshot, CommsError> {
    let wire: WeatherWire = serde_json::from_slice(body).map_err(|_| CommsError::MalformedPayload)?;
    let current = wire.current.ok_or(CommsError::MalformedPayload)?;
    let (Some(temperature), Some(humidity)) = (current.temperature, current.humidity) else {
        return Err(CommsError::MalformedPayload);
    };
    let location_name = wire
        .location
        .and_then(|l| l.name)
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned());
    let condition_text = current
        .weather_descriptions
        .into_iter()
        .next()
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned());
    Ok(WeatherSnapshot {
        location_name,
        temperature,
        humidity,
        condition_text,
    })
}

pub struct WeatherstackClient<H> {
    http: H,
    url: String,
}

impl<H: HttpClient> WeatherstackClient<H> {
    pub fn new(http: H, base_url: &str, api_key: &str, location: &str) -> Self {
        Self {
            http,
            url: format!(
                "{}?access_key={}&query={}",
                base_url,
                escape_query(api_key),
                escape_query(location)
            ),
        }
    }
}

impl<H: HttpClient> WeatherPort for WeatherstackClient<H> {
    fn fetch_weather(&mut self) -> Result<WeatherSnapshot, CommsError> {
        let response = self.http.get(&self.url, &[])?;
        if response.status != 200 {
            return Err(CommsError::HttpStatus(response.status));
        }
        parse_weather(&response.body)
    }
}
