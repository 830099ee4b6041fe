//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ controllers / Scheduler (domain)
//! ```
//!
//! Driven adapters (sensor hub, actuator bank, LCD, WiFi, HTTP services,
//! event sinks) implement these traits. The controllers consume them via
//! the [`Platform`](super::platform::Platform) bundle, so the domain core
//! never touches hardware directly.
//!
//! ## Failure contract
//!
//! - Sensor reads return `Option`: absence is distinct from zero.
//! - Actuator and display calls are infallible at this boundary; the
//!   adapters log driver errors themselves.
//! - Remote calls return typed [`CommsError`]s which the controllers fold
//!   into degraded outcomes.

use std::net::Ipv4Addr;

use crate::app::access::Verdict;
use crate::app::commands::ChatMessage;
use crate::app::weather::WeatherSnapshot;
use crate::error::{CommsError, ConnectivityError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Local climate sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// `true` once per rising edge of the doorbell input.
    fn doorbell_pressed(&mut self) -> bool;

    /// Current level of the motion sensor.
    fn motion_detected(&mut self) -> bool;

    /// Reservoir ranger distance in centimetres, `None` on echo timeout.
    fn measure_distance_cm(&mut self) -> Option<f32>;

    /// Local temperature and humidity, `None` if the sensor failed.
    fn read_climate(&mut self) -> Option<ClimateReading>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoChannel {
    Door,
    Valve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Granted,
    Denied,
}

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Position a servo (0–180°, clamped).
    fn set_servo_angle(&mut self, channel: ServoChannel, angle: u8);

    fn set_indicator(&mut self, indicator: Indicator, on: bool);

    fn set_pump(&mut self, on: bool);

    /// Pump and both indicators off. Servos are left where they are.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// Two-line character surface.
pub trait DisplayPort {
    fn clear(&mut self);

    /// Write at the cursor, truncated to `max_columns` characters.
    fn write_text(&mut self, text: &str, max_columns: usize);

    fn move_cursor(&mut self, col: u8, row: u8);

    /// Visible width in characters.
    fn columns(&self) -> usize {
        16
    }

    /// Clear and render both rows.
    fn show(&mut self, line1: &str, line2: &str) {
        let cols = self.columns();
        self.clear();
        self.write_text(line1, cols);
        self.move_cursor(0, 1);
        self.write_text(line2, cols);
    }
}

// ───────────────────────────────────────────────────────────────
// Connectivity port
// ───────────────────────────────────────────────────────────────

pub trait ConnectivityPort {
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    fn ip_address(&self) -> Option<Ipv4Addr>;
}

// ───────────────────────────────────────────────────────────────
// Remote service ports
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Blocking HTTP GET. The service adapters are layered on this.
pub trait HttpClient {
    fn get(&mut self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, CommsError>;
}

/// Remote face verification.
pub trait BiometricPort {
    fn request_verdict(&mut self) -> Result<Verdict, CommsError>;
}

/// Remote weather provider.
pub trait WeatherPort {
    fn fetch_weather(&mut self) -> Result<WeatherSnapshot, CommsError>;
}

/// Chat gateway: operator commands in, notifications out.
pub trait ChatPort {
    /// Messages with `update_id >= offset`, oldest first.
    fn fetch_messages(&mut self, offset: i64) -> Result<Vec<ChatMessage>, CommsError>;

    fn send_message(&mut self, text: &str) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time since boot.
pub trait Clock {
    fn now_us(&self) -> u64;

    fn now_ms(&self) -> u64 {
        self.now_us() / 1_000
    }
}
