//! Doorbell access control.
//!
//! ```text
//!   Idle ──doorbell──▶ Verifying ──recognized──▶ Granted ──┐
//!                          │                                ├──▶ Idle
//!                          └──anything else──▶ Denied ─────┘
//! ```
//!
//! One cycle runs to completion inside [`AccessController::handle_doorbell`]
//! and blocks the loop for its full duration (ramps, dwell, blinks).
//! Further doorbell presses during a cycle are not observed.
//!
//! Every failure while verifying collapses to `recognized = false` with a
//! reason; nothing escapes this module as an error. The remote verdict is
//! trusted as-is, with no local confidence threshold.

use core::fmt;

use log::{info, warn};

use super::events::AppEvent;
use super::platform::{NodeIo, Platform};
use super::ports::{
    ActuatorPort, BiometricPort, ConnectivityPort, DisplayPort, Indicator, ServoChannel,
};
use crate::config::NodeConfig;
use crate::drivers::servo::ramp;
use crate::error::CommsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Idle,
    Verifying,
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessReason {
    Ok,
    WifiDown,
    ServerError,
    ConnectionError,
    NoFace,
}

impl fmt::Display for AccessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "unknown face"),
            Self::WifiDown => write!(f, "WiFi down"),
            Self::ServerError => write!(f, "server error"),
            Self::ConnectionError => write!(f, "connection error"),
            Self::NoFace => write!(f, "no face detected"),
        }
    }
}

/// Body of a successful verification response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub recognized: bool,
    pub name: String,
    pub confidence: i32,
    /// Diagnostic the server attaches to negative verdicts.
    pub error: Option<String>,
}

/// Result of one verification round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
    pub recognized: bool,
    pub name: String,
    pub confidence: i32,
    pub reason: AccessReason,
}

impl AccessEvent {
    pub fn rejected(reason: AccessReason) -> Self {
        Self {
            recognized: false,
            name: String::new(),
            confidence: 0,
            reason,
        }
    }

    pub fn from_verdict(verdict: Verdict) -> Self {
        let reason = match (&verdict.error, verdict.recognized) {
            (_, true) | (None, false) => AccessReason::Ok,
            (Some(msg), false) if msg.to_ascii_lowercase().contains("no face") => {
                AccessReason::NoFace
            }
            (Some(_), false) => AccessReason::ServerError,
        };
        Self {
            recognized: verdict.recognized,
            name: verdict.name,
            confidence: verdict.confidence,
            reason,
        }
    }

    pub fn from_comms_error(err: CommsError) -> Self {
        let reason = match err {
            CommsError::NotConnected => AccessReason::WifiDown,
            CommsError::HttpStatus(_) | CommsError::MalformedPayload => AccessReason::ServerError,
            CommsError::RequestFailed | CommsError::Timeout => AccessReason::ConnectionError,
        };
        Self::rejected(reason)
    }
}

/// Name as shown on a display row: names wider than the row keep their
/// first `columns - 3` characters followed by "...".
pub fn display_name(name: &str, columns: usize) -> String {
    if name.chars().count() <= columns {
        return name.to_owned();
    }
    let mut shown: String = name.chars().take(columns.saturating_sub(3)).collect();
    shown.push_str("...");
    shown
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessTimings {
    pub door_open_angle: u8,
    pub ramp_step_deg: u8,
    pub ramp_step_delay_ms: u32,
    pub door_dwell_ms: u32,
    pub deny_blink_count: u8,
    pub deny_blink_period_ms: u32,
    pub debounce_ms: u32,
    pub settle_ms: u32,
}

impl AccessTimings {
    pub fn from_config(config: &NodeConfig) -> Self {
        Self {
            door_open_angle: config.door_open_angle,
            ramp_step_deg: config.ramp_step_deg,
            ramp_step_delay_ms: config.ramp_step_delay_ms,
            door_dwell_ms: config.door_dwell_ms,
            deny_blink_count: config.deny_blink_count,
            deny_blink_period_ms: config.deny_blink_period_ms,
            debounce_ms: config.doorbell_debounce_ms,
            settle_ms: config.access_settle_ms,
        }
    }
}

pub struct AccessController {
    state: AccessState,
    timings: AccessTimings,
    cycles: u32,
}

impl AccessController {
    pub fn new(timings: AccessTimings) -> Self {
        Self {
            state: AccessState::Idle,
            timings,
            cycles: 0,
        }
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    /// Completed access cycles since boot.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Run one full cycle for a doorbell edge and return its verdict.
    pub fn handle_doorbell<P: Platform>(&mut self, io: &mut NodeIo<P>) -> AccessEvent {
        info!("Access: doorbell pressed");
        io.emit(&AppEvent::DoorbellPressed);
        io.sleep_ms(self.timings.debounce_ms);

        self.transition(AccessState::Verifying, io);
        let event = self.verify(io);
        info!(
            "Access: recognized={} name='{}' confidence={} reason={:?}",
            event.recognized, event.name, event.confidence, event.reason
        );
        io.emit(&AppEvent::AccessDecided(event.clone()));

        if event.recognized {
            self.transition(AccessState::Granted, io);
            self.grant(&event.name, io);
        } else {
            self.transition(AccessState::Denied, io);
            self.deny(event.reason, io);
        }

        io.sleep_ms(self.timings.settle_ms);
        io.show("System Ready", "Waiting...");
        self.transition(AccessState::Idle, io);
        self.cycles = self.cycles.wrapping_add(1);
        event
    }

    /// One request to the verification server; never fails.
    pub fn verify<P: Platform>(&mut self, io: &mut NodeIo<P>) -> AccessEvent {
        if !io.network.is_connected() {
            warn!("Access: WiFi down, attempting reconnect");
            io.show("WiFi Error", "Reconnecting...");
            match io.network.connect() {
                Ok(()) => io.show("WiFi OK!", ""),
                Err(e) => {
                    warn!("Access: reconnect failed: {}", e);
                    io.show("WiFi Error!", "");
                }
            }
            return AccessEvent::from_comms_error(CommsError::NotConnected);
        }

        io.show("Verifying...", "Analysing face");
        match io.biometric.request_verdict() {
            Ok(verdict) => AccessEvent::from_verdict(verdict),
            Err(CommsError::HttpStatus(code)) => {
                warn!("Access: verification server answered HTTP {}", code);
                io.show("Server Error", &format!("Code: {code}"));
                AccessEvent::rejected(AccessReason::ServerError)
            }
            Err(CommsError::MalformedPayload) => {
                warn!("Access: verification server sent an unreadable verdict");
                io.show("Server Error", "Bad Response");
                AccessEvent::rejected(AccessReason::ServerError)
            }
            Err(e) => {
                warn!("Access: verification request failed: {}", e);
                io.show("Server Error", "Connection Err");
                io.sleep_ms(1_000);
                AccessEvent::from_comms_error(e)
            }
        }
    }

    fn grant<P: Platform>(&mut self, name: &str, io: &mut NodeIo<P>) {
        let t = self.timings;
        io.actuators.set_indicator(Indicator::Denied, false);
        io.actuators.set_indicator(Indicator::Granted, true);
        let shown = display_name(name, io.display.columns());
        io.show("Face Recognized!", &shown);

        info!("Access: opening door for '{}'", name);
        for angle in ramp(0, t.door_open_angle, t.ramp_step_deg) {
            io.actuators.set_servo_angle(ServoChannel::Door, angle);
            io.sleep_ms(t.ramp_step_delay_ms);
        }

        io.sleep_ms(t.door_dwell_ms);

        io.show("Closing...", "Door");
        for angle in ramp(t.door_open_angle, 0, t.ramp_step_deg).skip(1) {
            io.actuators.set_servo_angle(ServoChannel::Door, angle);
            io.sleep_ms(t.ramp_step_delay_ms);
        }
        io.actuators.set_indicator(Indicator::Granted, false);
        info!("Access: door closed");

        io.notify(&format!("Door opened for: {name}"));
    }

    fn deny<P: Platform>(&mut self, reason: AccessReason, io: &mut NodeIo<P>) {
        let t = self.timings;
        warn!("Access: denied ({})", reason);
        io.actuators.set_indicator(Indicator::Granted, false);
        io.actuators.set_indicator(Indicator::Denied, true);
        io.show("INTRUDER ALERT!", "Access Denied");

        for _ in 0..t.deny_blink_count {
            io.actuators.set_indicator(Indicator::Denied, false);
            io.sleep_ms(t.deny_blink_period_ms);
            io.actuators.set_indicator(Indicator::Denied, true);
            io.sleep_ms(t.deny_blink_period_ms);
        }
        io.actuators.set_indicator(Indicator::Denied, false);

        io.notify(&format!(
            "ALERT: unknown person at the door! Access denied ({reason})."
        ));
    }

    fn transition<P: Platform>(&mut self, to: AccessState, io: &mut NodeIo<P>) {
        let from = self.state;
        if from != to {
            self.state = to;
            io.emit(&AppEvent::AccessStateChanged { from, to });
        }
    }
}
