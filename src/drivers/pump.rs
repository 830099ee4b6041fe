//! Irrigation pump relay driver.
//!
//! On/off only: the relay (an LED on the bench rig) is driven from a
//! single push-pull output, HIGH = running.

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Stopped,
    Running,
}

pub struct PumpDriver<P> {
    pin: P,
    state: PumpState,
    starts: u32,
}

impl<P: OutputPin> PumpDriver<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: PumpState::Stopped,
            starts: 0,
        }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        if !on {
            return self.stop();
        }
        self.pin.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
        if self.state == PumpState::Stopped {
            self.starts = self.starts.wrapping_add(1);
        }
        self.state = PumpState::Running;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.pin.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.state = PumpState::Stopped;
        Ok(())
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PumpState::Running
    }

    /// Stopped → Running transitions since boot.
    pub fn start_count(&self) -> u32 {
        self.starts
    }
}
