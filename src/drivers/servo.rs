//! Hobby servo driver (SG90-class) on a 50 Hz PWM channel.
//!
//! Angle 0–180° maps linearly onto a 500–2500 µs pulse, which is then
//! expressed as a fraction of the 20 ms period against whatever duty
//! resolution the PWM peripheral exposes.
//!
//! Smooth door motion comes from [`ramp`]: fixed angle steps that the
//! caller applies with a fixed inter-step delay. Ramping blocks the
//! caller for its full duration.

use embedded_hal::pwm::SetDutyCycle;

use crate::error::ActuatorError;

pub const PULSE_MIN_US: u32 = 500;
pub const PULSE_MAX_US: u32 = 2_500;
pub const PERIOD_US: u32 = 20_000;
pub const MAX_ANGLE: u8 = 180;

/// Pulse width for an angle, clamped to the servo range.
pub fn angle_to_pulse_us(angle: u8) -> u32 {
    let angle = u32::from(angle.min(MAX_ANGLE));
    PULSE_MIN_US + (PULSE_MAX_US - PULSE_MIN_US) * angle / u32::from(MAX_ANGLE)
}

/// Duty count for a pulse width given the peripheral's full-scale count.
pub fn pulse_to_duty(pulse_us: u32, max_duty: u16) -> u16 {
    let duty = u64::from(pulse_us.min(PERIOD_US)) * u64::from(max_duty) / u64::from(PERIOD_US);
    duty as u16
}

pub struct Servo<P> {
    pwm: P,
    angle: u8,
}

impl<P: SetDutyCycle> Servo<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, angle: 0 }
    }

    pub fn set_angle(&mut self, angle: u8) -> Result<(), ActuatorError> {
        let angle = angle.min(MAX_ANGLE);
        let duty = pulse_to_duty(angle_to_pulse_us(angle), self.pwm.max_duty_cycle());
        self.pwm
            .set_duty_cycle(duty)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.angle = angle;
        Ok(())
    }

    /// Last angle successfully commanded.
    pub fn angle(&self) -> u8 {
        self.angle
    }
}

// ── Ramp ──────────────────────────────────────────────────────

/// Angles from `from` to `to` inclusive in `step`-degree increments.
///
/// Strictly monotonic and always ends exactly on `to`, even when the span
/// is not a multiple of `step`. A zero step is treated as 1°.
pub fn ramp(from: u8, to: u8, step: u8) -> Ramp {
    Ramp {
        next: Some(from),
        to,
        step: step.max(1),
    }
}

#[derive(Debug, Clone)]
pub struct Ramp {
    next: Option<u8>,
    to: u8,
    step: u8,
}

impl Iterator for Ramp {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let current = self.next?;
        self.next = if current == self.to {
            None
        } else if current < self.to {
            Some(current.saturating_add(self.step).min(self.to))
        } else {
            Some(current.saturating_sub(self.step).max(self.to))
        };
        Some(current)
    }
}
