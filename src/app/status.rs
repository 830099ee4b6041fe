//! Status composition for the chat report and the LCD.
//!
//! Every component is optional; a missing reading renders as "N/A" and
//! never aborts the report. Distance 0 cm is a real reading (full tank).

use core::fmt::Write as _;

use super::ports::{ClimateReading, SensorPort};
use super::weather::WeatherSnapshot;

const NOT_AVAILABLE: &str = "N/A";

/// Fill level of the reservoir, clamped to 0–100 %.
pub fn reservoir_percent(distance_cm: Option<f32>, tank_height_cm: f32) -> Option<f32> {
    let distance = distance_cm?;
    if !distance.is_finite() || tank_height_cm <= 0.0 {
        return None;
    }
    Some(((tank_height_cm - distance) / tank_height_cm * 100.0).clamp(0.0, 100.0))
}

/// Everything the `/status` reply reports.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub weather: Option<WeatherSnapshot>,
    pub local: Option<ClimateReading>,
    pub reservoir_pct: Option<f32>,
}

impl StatusReport {
    /// Sample the local sensors and pair them with the cached weather.
    pub fn collect<S: SensorPort>(
        sensors: &mut S,
        weather: Option<&WeatherSnapshot>,
        tank_height_cm: f32,
    ) -> Self {
        Self {
            weather: weather.cloned(),
            local: sensors.read_climate(),
            reservoir_pct: reservoir_percent(sensors.measure_distance_cm(), tank_height_cm),
        }
    }

    pub fn to_chat_text(&self) -> String {
        let w = self.weather.as_ref();
        let location = w.map_or(NOT_AVAILABLE, |w| w.location_name.as_str());
        let conditions = w.map_or(NOT_AVAILABLE, |w| w.condition_text.as_str());
        let weather_t = or_na(w.map(|w| w.temperature), 0);
        let weather_h = or_na(w.map(|w| w.humidity), 0);
        let local_t = or_na(self.local.map(|c| c.temperature_c), 1);
        let local_h = or_na(self.local.map(|c| c.humidity_pct), 1);
        let water = or_na(self.reservoir_pct, 0);

        let mut text = String::with_capacity(320);
        let _ = write!(
            text,
            "GARDEN STATUS\n\n\
             Weather:\n\
             Location: {location}\n\
             Temperature: {weather_t}\u{00b0}C\n\
             Humidity: {weather_h}%\n\
             Conditions: {conditions}\n\n\
             Local:\n\
             Temperature: {local_t}\u{00b0}C\n\
             Humidity: {local_h}%\n\n\
             Reservoir:\n\
             Water level: {water}%\n"
        );
        text
    }
}

fn or_na(value: Option<f32>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => NOT_AVAILABLE.to_owned(),
    }
}

/// One LCD row.
pub type DisplayLine = heapless::String<32>;

/// The two idle-screen rows.
pub fn display_lines(
    local: Option<ClimateReading>,
    reservoir_pct: Option<f32>,
) -> (DisplayLine, DisplayLine) {
    let mut line1 = DisplayLine::new();
    let mut line2 = DisplayLine::new();
    // Both rows stay well under capacity; a failed write only truncates.
    let _ = match local {
        Some(c) => write!(line1, "T:{:.0}C H:{:.0}%", c.temperature_c, c.humidity_pct),
        None => write!(line1, "Sensors..."),
    };
    let _ = match reservoir_pct {
        Some(pct) => write!(line2, "Water: {}%", pct as u32),
        None => write!(line2, "Water: {NOT_AVAILABLE}"),
    };
    (line1, line2)
}
