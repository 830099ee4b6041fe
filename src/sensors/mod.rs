//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns the doorbell, motion input, reservoir ranger and local
//! climate sensor, and is exposed to the domain through
//! [`SensorPort`](crate::app::ports::SensorPort) (see `adapters::hardware`).

pub mod climate;
pub mod ranger;

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::ClimateReading;
use crate::drivers::doorbell::Doorbell;
use crate::error::SensorError;

/// Anything that can range the reservoir surface.
pub trait DistanceSensor {
    fn measure_distance_cm(&mut self) -> Option<f32>;
}

/// Anything that can sample local temperature and humidity.
pub trait ClimateSensor {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError>;
}

/// Aggregates all input drivers.
pub struct SensorHub<R, C, B, M> {
    pub ranger: R,
    pub climate: C,
    pub doorbell: Doorbell<B>,
    motion: M,
    motion_faulted: bool,
}

impl<R, C, B, M> SensorHub<R, C, B, M>
where
    R: DistanceSensor,
    C: ClimateSensor,
    B: InputPin,
    M: InputPin,
{
    /// Construct a new hub. Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(ranger: R, climate: C, doorbell: Doorbell<B>, motion: M) -> Self {
        Self {
            ranger,
            climate,
            doorbell,
            motion,
            motion_faulted: false,
        }
    }

    /// PIR level. A read error counts as "no motion".
    pub fn motion_level(&mut self) -> bool {
        match self.motion.is_high() {
            Ok(level) => level,
            Err(_) => {
                if !self.motion_faulted {
                    warn!("PIR: GPIO read failed, treating as idle");
                    self.motion_faulted = true;
                }
                false
            }
        }
    }
}
