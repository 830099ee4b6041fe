//! Mock platform for integration tests.
//!
//! Every port is backed by a recording or scripted mock so tests can
//! assert on the full command history without touching real GPIO, PWM,
//! I2C or network stacks. Time is virtual: the delay advances the clock
//! it shares with [`MockClock`].

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use gardengate::app::access::Verdict;
use gardengate::app::commands::ChatMessage;
use gardengate::app::events::AppEvent;
use gardengate::app::platform::{NodeIo, Platform};
use gardengate::app::ports::{
    ActuatorPort, BiometricPort, ChatPort, ClimateReading, Clock, ConnectivityPort, DisplayPort,
    EventSink, Indicator, SensorPort, ServoChannel, WeatherPort,
};
use gardengate::app::weather::WeatherSnapshot;
use gardengate::config::NodeConfig;
use gardengate::error::{CommsError, ConnectivityError};
use gardengate::scheduler::Scheduler;

// ── Time ──────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockClock {
    now_ns: Rc<Cell<u64>>,
}

impl MockClock {
    pub fn advance_ms(&self, ms: u64) {
        self.now_ns.set(self.now_ns.get() + ms * 1_000_000);
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u64 {
        self.now_ns.get() / 1_000
    }
}

pub struct MockDelay {
    now_ns: Rc<Cell<u64>>,
    pub total_slept_ms: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ns.set(self.now_ns.get() + u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_ns.set(self.now_ns.get() + u64::from(ms) * 1_000_000);
        self.total_slept_ms += u64::from(ms);
    }
}

// ── Sensors ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSensors {
    /// One entry consumed per doorbell poll; empty means not pressed.
    pub doorbell: VecDeque<bool>,
    pub motion: VecDeque<bool>,
    pub distance_cm: Option<f32>,
    pub climate: Option<ClimateReading>,
}

impl SensorPort for MockSensors {
    fn doorbell_pressed(&mut self) -> bool {
        self.doorbell.pop_front().unwrap_or(false)
    }

    fn motion_detected(&mut self) -> bool {
        self.motion.pop_front().unwrap_or(false)
    }

    fn measure_distance_cm(&mut self) -> Option<f32> {
        self.distance_cm
    }

    fn read_climate(&mut self) -> Option<ClimateReading> {
        self.climate
    }
}

// ── Actuators ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Servo { channel: ServoChannel, angle: u8 },
    Indicator { indicator: Indicator, on: bool },
    Pump(bool),
    AllOff,
}

#[derive(Default)]
pub struct MockActuators {
    pub calls: Vec<ActuatorCall>,
}

impl MockActuators {
    pub fn servo_angles(&self, channel: ServoChannel) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Servo { channel: ch, angle } if *ch == channel => Some(*angle),
                _ => None,
            })
            .collect()
    }

    pub fn pump_starts(&self) -> usize {
        self.calls.iter().filter(|c| **c == ActuatorCall::Pump(true)).count()
    }

    /// Position in the call log of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&ActuatorCall) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }

    pub fn rposition(&self, pred: impl Fn(&ActuatorCall) -> bool) -> Option<usize> {
        self.calls.iter().rposition(pred)
    }

    pub fn indicator_writes(&self, indicator: Indicator, on: bool) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == ActuatorCall::Indicator { indicator, on })
            .count()
    }
}

impl ActuatorPort for MockActuators {
    fn set_servo_angle(&mut self, channel: ServoChannel, angle: u8) {
        self.calls.push(ActuatorCall::Servo { channel, angle });
    }

    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        self.calls.push(ActuatorCall::Indicator { indicator, on });
    }

    fn set_pump(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Pump(on));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub screens: Vec<(String, String)>,
}

impl MockDisplay {
    pub fn shown(&self, line1: &str, line2: &str) -> bool {
        self.screens.iter().any(|(a, b)| a == line1 && b == line2)
    }

    pub fn last(&self) -> Option<&(String, String)> {
        self.screens.last()
    }
}

impl DisplayPort for MockDisplay {
    fn clear(&mut self) {}

    fn write_text(&mut self, _text: &str, _max_columns: usize) {}

    fn move_cursor(&mut self, _col: u8, _row: u8) {}

    fn show(&mut self, line1: &str, line2: &str) {
        self.screens.push((line1.to_owned(), line2.to_owned()));
    }
}

// ── Network ───────────────────────────────────────────────────

pub struct MockNetwork {
    pub connected: bool,
    /// Outcome of the next `connect()`.
    pub connect_ok: bool,
    pub connect_attempts: u32,
}

impl ConnectivityPort for MockNetwork {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        self.connect_attempts += 1;
        if self.connect_ok {
            self.connected = true;
            Ok(())
        } else {
            Err(ConnectivityError::ConnectionFailed)
        }
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn ip_address(&self) -> Option<Ipv4Addr> {
        self.connected.then(|| Ipv4Addr::new(10, 0, 0, 7))
    }
}

// ── Remote services ───────────────────────────────────────────

#[derive(Default)]
pub struct MockBiometric {
    pub replies: VecDeque<Result<Verdict, CommsError>>,
    pub requests: u32,
}

impl BiometricPort for MockBiometric {
    fn request_verdict(&mut self) -> Result<Verdict, CommsError> {
        self.requests += 1;
        self.replies.pop_front().unwrap_or(Err(CommsError::RequestFailed))
    }
}

#[derive(Default)]
pub struct MockWeather {
    pub replies: VecDeque<Result<WeatherSnapshot, CommsError>>,
    pub fetches: u32,
}

impl WeatherPort for MockWeather {
    fn fetch_weather(&mut self) -> Result<WeatherSnapshot, CommsError> {
        self.fetches += 1;
        self.replies.pop_front().unwrap_or(Err(CommsError::RequestFailed))
    }
}

#[derive(Default)]
pub struct MockChat {
    /// One batch per poll; an empty queue means "no new messages".
    pub inbox: VecDeque<Result<Vec<ChatMessage>, CommsError>>,
    pub offsets: Vec<i64>,
    pub sent: Vec<String>,
    pub send_fails: bool,
}

impl MockChat {
    pub fn sent_containing(&self, needle: &str) -> usize {
        self.sent.iter().filter(|m| m.contains(needle)).count()
    }
}

impl ChatPort for MockChat {
    fn fetch_messages(&mut self, offset: i64) -> Result<Vec<ChatMessage>, CommsError> {
        self.offsets.push(offset);
        self.inbox.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn send_message(&mut self, text: &str) -> Result<(), CommsError> {
        if self.send_fails {
            return Err(CommsError::RequestFailed);
        }
        self.sent.push(text.to_owned());
        Ok(())
    }
}

// ── Events ────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Platform ──────────────────────────────────────────────────

pub struct MockPlatform;

impl Platform for MockPlatform {
    type Clock = MockClock;
    type Delay = MockDelay;
    type Sensors = MockSensors;
    type Actuators = MockActuators;
    type Display = MockDisplay;
    type Network = MockNetwork;
    type Biometric = MockBiometric;
    type Weather = MockWeather;
    type Chat = MockChat;
    type Events = RecordingSink;
}

pub type MockPlatformIo = NodeIo<MockPlatform>;

/// A node with the link up and every input idle.
pub fn node() -> MockPlatformIo {
    let clock = MockClock::default();
    let delay = MockDelay {
        now_ns: Rc::clone(&clock.now_ns),
        total_slept_ms: 0,
    };
    NodeIo {
        clock,
        delay,
        sensors: MockSensors::default(),
        actuators: MockActuators::default(),
        display: MockDisplay::default(),
        network: MockNetwork {
            connected: true,
            connect_ok: true,
            connect_attempts: 0,
        },
        biometric: MockBiometric::default(),
        weather: MockWeather::default(),
        chat: MockChat::default(),
        events: RecordingSink::default(),
    }
}

pub fn scheduler(io: MockPlatformIo) -> Scheduler<MockPlatform> {
    Scheduler::new(&NodeConfig::default(), io)
}

pub fn snapshot(temperature: f32, humidity: f32) -> WeatherSnapshot {
    WeatherSnapshot {
        location_name: "Rabat".into(),
        temperature,
        humidity,
        condition_text: "Sunny".into(),
    }
}

pub fn verdict(recognized: bool, name: &str) -> Verdict {
    Verdict {
        recognized,
        name: name.into(),
        confidence: if recognized { 85 } else { 0 },
        error: None,
    }
}
