//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART in production). One line per
//! event, prefixed by the subsystem tag.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | loop running");
            }
            AppEvent::DoorbellPressed => {
                info!("ACCESS | doorbell");
            }
            AppEvent::AccessStateChanged { from, to } => {
                info!("ACCESS | {:?} -> {:?}", from, to);
            }
            AppEvent::AccessDecided(e) => {
                info!(
                    "ACCESS | recognized={} name='{}' confidence={} reason={:?}",
                    e.recognized, e.name, e.confidence, e.reason
                );
            }
            AppEvent::MotionDetected => {
                warn!("MOTION | detected");
            }
            AppEvent::WeatherUpdated(w) => {
                info!(
                    "WEATHER | {} T={:.0}\u{00b0}C H={:.0}% '{}'",
                    w.location_name, w.temperature, w.humidity, w.condition_text
                );
            }
            AppEvent::WeatherFetchFailed(e) => {
                warn!("WEATHER | fetch failed: {}", e);
            }
            AppEvent::IrrigationEvaluated(outcome) => {
                info!("IRRIGATION | {}", outcome);
            }
            AppEvent::PumpCycleCompleted { duration_ms } => {
                info!("IRRIGATION | pump cycle done ({} ms)", duration_ms);
            }
            AppEvent::CommandReceived { update_id, command } => {
                info!("CHAT | {:?} (update {})", command, update_id);
            }
            AppEvent::NotificationFailed(e) => {
                warn!("CHAT | notification failed: {}", e);
            }
        }
    }
}
