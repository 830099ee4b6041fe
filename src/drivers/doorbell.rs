//! Doorbell push-button edge detector.
//!
//! The button pulls the line HIGH against an internal pull-down. The main
//! loop polls [`Doorbell::rising_edge`] every tick; a held button reports
//! exactly one press and re-arms only after it is released. Debounce is
//! the access controller's short settle delay after an edge.

use embedded_hal::digital::InputPin;
use log::warn;

pub struct Doorbell<P> {
    pin: P,
    was_high: bool,
    read_faulted: bool,
}

impl<P: InputPin> Doorbell<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            was_high: false,
            read_faulted: false,
        }
    }

    /// `true` on the first poll that sees the line HIGH after it was LOW.
    pub fn rising_edge(&mut self) -> bool {
        let high = match self.pin.is_high() {
            Ok(level) => level,
            Err(_) => {
                if !self.read_faulted {
                    warn!("Doorbell: GPIO read failed, treating as released");
                    self.read_faulted = true;
                }
                false
            }
        };
        let edge = high && !self.was_high;
        self.was_high = high;
        edge
    }
}
