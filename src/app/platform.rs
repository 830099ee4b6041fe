//! Platform bundle: one concrete type per port.
//!
//! The [`Scheduler`](crate::scheduler::Scheduler) and every controller are
//! generic over a single [`Platform`] instead of ten independent type
//! parameters. Production binds the ESP-IDF adapters in `main`; the
//! integration tests bind recording mocks.

use embedded_hal::delay::DelayNs;
use log::warn;

use super::events::AppEvent;
use super::ports::{
    ActuatorPort, BiometricPort, ChatPort, Clock, ConnectivityPort, DisplayPort, EventSink,
    SensorPort, WeatherPort,
};
use crate::error::CommsError;

/// Binds a concrete type to every port of the node.
pub trait Platform {
    type Clock: Clock;
    /// Blocking sleeps (ramps, dwell, cooldowns, loop yield).
    type Delay: DelayNs;
    type Sensors: SensorPort;
    type Actuators: ActuatorPort;
    type Display: DisplayPort;
    type Network: ConnectivityPort;
    type Biometric: BiometricPort;
    type Weather: WeatherPort;
    type Chat: ChatPort;
    type Events: EventSink;
}

/// Owned instances of every port. Only the control loop touches these.
pub struct NodeIo<P: Platform> {
    pub clock: P::Clock,
    pub delay: P::Delay,
    pub sensors: P::Sensors,
    pub actuators: P::Actuators,
    pub display: P::Display,
    pub network: P::Network,
    pub biometric: P::Biometric,
    pub weather: P::Weather,
    pub chat: P::Chat,
    pub events: P::Events,
}

impl<P: Platform> NodeIo<P> {
    /// Send a chat notification. Failures are logged and reported as an
    /// event, never propagated.
    pub fn notify(&mut self, text: &str) -> bool {
        if !self.network.is_connected() {
            warn!("Notify: link down, dropping '{}'", first_line(text));
            self.events.emit(&AppEvent::NotificationFailed(CommsError::NotConnected));
            return false;
        }
        match self.chat.send_message(text) {
            Ok(()) => true,
            Err(e) => {
                warn!("Notify: send failed: {}", e);
                self.events.emit(&AppEvent::NotificationFailed(e));
                false
            }
        }
    }

    pub fn show(&mut self, line1: &str, line2: &str) {
        self.display.show(line1, line2);
    }

    pub fn sleep_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    pub fn emit(&mut self, event: &AppEvent) {
        self.events.emit(event);
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
