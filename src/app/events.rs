//! Outbound application events.
//!
//! The controllers and the Scheduler emit these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them; in production they become log lines.

use super::access::{AccessEvent, AccessState};
use super::commands::ChatCommand;
use super::irrigation::IrrigationOutcome;
use super::weather::WeatherSnapshot;
use crate::error::CommsError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Startup sequence finished; the loop is about to run.
    Started,

    /// Rising edge seen on the doorbell input.
    DoorbellPressed,

    /// The access state machine moved between states.
    AccessStateChanged { from: AccessState, to: AccessState },

    /// Outcome of one verification round trip.
    AccessDecided(AccessEvent),

    /// PIR reported motion; an alert was attempted.
    MotionDetected,

    /// A fresh snapshot replaced the cached one.
    WeatherUpdated(WeatherSnapshot),

    /// Fetch failed; the previous snapshot is kept.
    WeatherFetchFailed(CommsError),

    /// The irrigation decision for the latest snapshot.
    IrrigationEvaluated(IrrigationOutcome),

    /// Pump ran for the full duration and was switched off.
    PumpCycleCompleted { duration_ms: u32 },

    /// A recognised chat command was accepted.
    CommandReceived { update_id: i64, command: ChatCommand },

    /// An outbound chat notification could not be delivered.
    NotificationFailed(CommsError),
}
