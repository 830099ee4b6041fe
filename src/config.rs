//! Node configuration parameters.
//!
//! Every tunable of the GardenGate node lives here. Secrets and site
//! specific values (WiFi, bot token, API keys, server URL) are baked in at
//! build time through `GARDENGATE_*` environment variables; see
//! [`NodeConfig::from_build_env`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The door mechanism travels between locked (0°) and fully open (90°).
pub const MAX_DOOR_ANGLE: u8 = 90;

/// Core node configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Network ---
    pub wifi_ssid: String,
    pub wifi_password: String,
    /// Outbound HTTP timeout. `None` blocks until the remote answers.
    pub http_timeout_ms: Option<u32>,

    // --- Remote services ---
    /// Base URL of the face verification server (`{base}/recognize`).
    pub verdict_base_url: String,
    pub weather_base_url: String,
    pub weather_api_key: String,
    pub weather_location: String,
    pub chat_base_url: String,
    pub bot_token: String,
    pub chat_id: String,

    // --- Access ---
    /// Door servo angle when unlocked (degrees, at most [`MAX_DOOR_ANGLE`]).
    pub door_open_angle: u8,
    /// Servo ramp step (degrees).
    pub ramp_step_deg: u8,
    /// Delay between ramp steps (milliseconds).
    pub ramp_step_delay_ms: u32,
    /// How long the door stays open (milliseconds).
    pub door_dwell_ms: u32,
    /// Number of red indicator blinks on a denied cycle.
    pub deny_blink_count: u8,
    /// Half-period of a deny blink (milliseconds).
    pub deny_blink_period_ms: u32,
    /// Doorbell debounce delay (milliseconds).
    pub doorbell_debounce_ms: u32,
    /// Pause before the display returns to "Waiting..." (milliseconds).
    pub access_settle_ms: u32,

    // --- Irrigation ---
    /// Above this relative humidity (%) the pump is never started.
    pub humidity_high_pct: f32,
    /// Above this temperature (°C) the pump runs.
    pub temperature_hot_c: f32,
    /// Pump run time (milliseconds).
    pub pump_duration_ms: u32,
    /// Valve servo angle while watering (degrees).
    pub valve_open_angle: u8,
    /// Reservoir depth from the ranger to the bottom (centimetres).
    pub tank_height_cm: f32,

    // --- Timing ---
    pub command_poll_interval_ms: u64,
    pub weather_interval_ms: u64,
    pub display_refresh_interval_ms: u64,
    /// Sleep after a motion alert to suppress repeats (milliseconds).
    pub motion_cooldown_ms: u32,
    /// Yield at the end of every loop iteration (milliseconds).
    pub loop_sleep_ms: u32,
    /// Bound on each echo wait phase of the ranger (microseconds).
    pub echo_timeout_us: u32,

    // --- Display ---
    /// 7-bit I²C address of the PCF8574 backpack.
    pub lcd_address: u8,
    pub lcd_columns: u8,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            // Network
            wifi_ssid: String::from("Wokwi-GUEST"),
            wifi_password: String::new(),
            http_timeout_ms: None,

            // Remote services
            verdict_base_url: String::from("http://192.168.1.50:5000"),
            weather_base_url: String::from("http://api.weatherstack.com/current"),
            weather_api_key: String::new(),
            weather_location: String::from("Rabat"),
            chat_base_url: String::from("https://api.telegram.org"),
            bot_token: String::new(),
            chat_id: String::new(),

            // Access
            door_open_angle: 90,
            ramp_step_deg: 3,
            ramp_step_delay_ms: 15,
            door_dwell_ms: 3_000,
            deny_blink_count: 5,
            deny_blink_period_ms: 200,
            doorbell_debounce_ms: 100,
            access_settle_ms: 1_000,

            // Irrigation
            humidity_high_pct: 75.0,
            temperature_hot_c: 28.0,
            pump_duration_ms: 10_000,
            valve_open_angle: 90,
            tank_height_cm: 100.0,

            // Timing
            command_poll_interval_ms: 5_000,     // 0.2 Hz
            weather_interval_ms: 180_000,        // 3 min
            display_refresh_interval_ms: 10_000, // 0.1 Hz
            motion_cooldown_ms: 10_000,
            loop_sleep_ms: 100,
            echo_timeout_us: 100_000,

            // Display
            lcd_address: 0x27,
            lcd_columns: 16,
        }
    }
}

impl NodeConfig {
    /// Defaults overlaid with the `GARDENGATE_*` variables present at build
    /// time.
    pub fn from_build_env() -> Self {
        let mut c = Self::default();
        let overlay = |slot: &mut String, value: Option<&'static str>| {
            if let Some(v) = value {
                *slot = v.to_owned();
            }
        };
        overlay(&mut c.wifi_ssid, option_env!("GARDENGATE_WIFI_SSID"));
        overlay(&mut c.wifi_password, option_env!("GARDENGATE_WIFI_PASSWORD"));
        overlay(&mut c.verdict_base_url, option_env!("GARDENGATE_VERDICT_URL"));
        overlay(&mut c.weather_api_key, option_env!("GARDENGATE_WEATHER_KEY"));
        overlay(&mut c.weather_location, option_env!("GARDENGATE_WEATHER_LOCATION"));
        overlay(&mut c.bot_token, option_env!("GARDENGATE_BOT_TOKEN"));
        overlay(&mut c.chat_id, option_env!("GARDENGATE_CHAT_ID"));
        if let Some(ms) = option_env!("GARDENGATE_HTTP_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            c.http_timeout_ms = Some(ms);
        }
        c
    }

    /// Reject values that would make the node misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.door_open_angle == 0 || self.door_open_angle > MAX_DOOR_ANGLE {
            return Err(ConfigError::ValidationFailed("door_open_angle must be 1-90"));
        }
        if self.valve_open_angle > 180 {
            return Err(ConfigError::ValidationFailed("valve_open_angle must be 0-180"));
        }
        if self.ramp_step_deg == 0 {
            return Err(ConfigError::ValidationFailed("ramp_step_deg must be non-zero"));
        }
        if self.tank_height_cm <= 0.0 || !self.tank_height_cm.is_finite() {
            return Err(ConfigError::ValidationFailed("tank_height_cm must be positive"));
        }
        if !(0.0..=100.0).contains(&self.humidity_high_pct) {
            return Err(ConfigError::ValidationFailed("humidity_high_pct must be 0-100"));
        }
        if self.command_poll_interval_ms == 0
            || self.weather_interval_ms == 0
            || self.display_refresh_interval_ms == 0
        {
            return Err(ConfigError::ValidationFailed("loop intervals must be non-zero"));
        }
        if self.echo_timeout_us == 0 {
            return Err(ConfigError::ValidationFailed("echo_timeout_us must be non-zero"));
        }
        if self.lcd_address > 0x77 || self.lcd_address < 0x08 {
            return Err(ConfigError::ValidationFailed("lcd_address outside 7-bit range"));
        }
        if self.lcd_columns == 0 || self.lcd_columns > 40 {
            return Err(ConfigError::ValidationFailed("lcd_columns must be 1-40"));
        }
        if self.http_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationFailed("http_timeout_ms must be non-zero"));
        }
        Ok(())
    }
}
