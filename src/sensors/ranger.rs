//! HC-SR04 ultrasonic ranger for the reservoir level.
//!
//! A 10 µs trigger pulse starts a burst; the echo line then stays HIGH for
//! the round-trip time. Both waits (echo rising, echo falling) are bounded
//! by the configured timeout and a timeout yields an error, never a zero
//! distance.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;

use crate::app::ports::Clock;
use crate::error::SensorError;
use crate::sensors::DistanceSensor;

/// Speed of sound at ~20 °C.
pub const SPEED_OF_SOUND_CM_PER_US: f32 = 0.0343;

/// One-way distance for a round-trip echo width.
pub fn echo_to_distance_cm(echo_us: u64) -> f32 {
    echo_us as f32 * SPEED_OF_SOUND_CM_PER_US / 2.0
}

pub struct Ranger<T, E, C, D> {
    trigger: T,
    echo: E,
    clock: C,
    delay: D,
    timeout_us: u64,
}

impl<T, E, C, D> Ranger<T, E, C, D>
where
    T: OutputPin,
    E: InputPin,
    C: Clock,
    D: DelayNs,
{
    pub fn new(trigger: T, echo: E, clock: C, delay: D, timeout_us: u32) -> Self {
        Self {
            trigger,
            echo,
            clock,
            delay,
            timeout_us: u64::from(timeout_us),
        }
    }

    /// Fire one ping and time the echo.
    pub fn measure(&mut self) -> Result<f32, SensorError> {
        self.pulse_trigger()?;

        let armed = self.clock.now_us();
        while !self.echo_high()? {
            if self.clock.now_us().saturating_sub(armed) > self.timeout_us {
                return Err(SensorError::Timeout);
            }
        }

        let rise = self.clock.now_us();
        while self.echo_high()? {
            if self.clock.now_us().saturating_sub(rise) > self.timeout_us {
                return Err(SensorError::Timeout);
            }
        }

        let width = self.clock.now_us().saturating_sub(rise);
        Ok(echo_to_distance_cm(width))
    }

    fn pulse_trigger(&mut self) -> Result<(), SensorError> {
        self.trigger.set_low().map_err(|_| SensorError::GpioFailed)?;
        self.delay.delay_us(2);
        self.trigger.set_high().map_err(|_| SensorError::GpioFailed)?;
        self.delay.delay_us(10);
        self.trigger.set_low().map_err(|_| SensorError::GpioFailed)
    }

    fn echo_high(&mut self) -> Result<bool, SensorError> {
        self.echo.is_high().map_err(|_| SensorError::GpioFailed)
    }
}

impl<T, E, C, D> DistanceSensor for Ranger<T, E, C, D>
where
    T: OutputPin,
    E: InputPin,
    C: Clock,
    D: DelayNs,
{
    fn measure_distance_cm(&mut self) -> Option<f32> {
        match self.measure() {
            Ok(cm) => Some(cm),
            Err(e) => {
                debug!("Ranger: {}", e);
                None
            }
        }
    }
}
