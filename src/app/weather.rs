//! Cached weather observation.

use core::fmt;

/// Last-known-good reading from the weather provider. Replaced wholesale
/// on every successful fetch and never cleared on failure.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location_name: String,
    /// Air temperature in °C.
    pub temperature: f32,
    /// Relative humidity in %.
    pub humidity: f32,
    pub condition_text: String,
}

impl fmt::Display for WeatherSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.0}\u{00b0}C {:.0}% {}",
            self.location_name, self.temperature, self.humidity, self.condition_text
        )
    }
}

/// Fold a fetch result into the cache. Returns `true` if the cache was
/// replaced.
pub fn refresh<E>(
    cache: &mut Option<WeatherSnapshot>,
    fetched: Result<WeatherSnapshot, E>,
) -> bool {
    match fetched {
        Ok(snapshot) => {
            *cache = Some(snapshot);
            true
        }
        Err(_) => false,
    }
}
