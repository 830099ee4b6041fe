//! Weather-driven irrigation.
//!
//! One decision per fresh weather snapshot:
//!
//! | Condition                        | Outcome             | Action                |
//! |----------------------------------|---------------------|-----------------------|
//! | humidity > 75 %                  | `HumidityHigh`      | none                  |
//! | else temperature > 28 °C         | `IntensiveWatering` | pump + valve, notify  |
//! | else                             | `ConditionsOk`      | none                  |
//!
//! The Scheduler guarantees at most one evaluation per snapshot; this
//! module only decides and actuates.

use core::fmt;

use log::info;

use super::events::AppEvent;
use super::platform::{NodeIo, Platform};
use super::ports::{ActuatorPort, ServoChannel};
use super::weather::WeatherSnapshot;
use crate::config::NodeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrrigationOutcome {
    HumidityHigh,
    IntensiveWatering,
    ConditionsOk,
}

impl fmt::Display for IrrigationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HumidityHigh => write!(f, "Humidity high"),
            Self::IntensiveWatering => write!(f, "Intensive watering"),
            Self::ConditionsOk => write!(f, "Conditions OK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrigationThresholds {
    pub humidity_high_pct: f32,
    pub temperature_hot_c: f32,
}

impl Default for IrrigationThresholds {
    fn default() -> Self {
        Self {
            humidity_high_pct: 75.0,
            temperature_hot_c: 28.0,
        }
    }
}

/// Pure decision over a snapshot. Humidity wins over temperature.
pub fn decide(snapshot: &WeatherSnapshot, thresholds: &IrrigationThresholds) -> IrrigationOutcome {
    if snapshot.humidity > thresholds.humidity_high_pct {
        IrrigationOutcome::HumidityHigh
    } else if snapshot.temperature > thresholds.temperature_hot_c {
        IrrigationOutcome::IntensiveWatering
    } else {
        IrrigationOutcome::ConditionsOk
    }
}

pub struct IrrigationController {
    thresholds: IrrigationThresholds,
    pump_duration_ms: u32,
    valve_open_angle: u8,
    activations: u32,
}

impl IrrigationController {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            thresholds: IrrigationThresholds {
                humidity_high_pct: config.humidity_high_pct,
                temperature_hot_c: config.temperature_hot_c,
            },
            pump_duration_ms: config.pump_duration_ms,
            valve_open_angle: config.valve_open_angle,
            activations: 0,
        }
    }

    /// Decide for `snapshot` and run the pump if it calls for watering.
    pub fn evaluate<P: Platform>(
        &mut self,
        snapshot: &WeatherSnapshot,
        io: &mut NodeIo<P>,
    ) -> IrrigationOutcome {
        let outcome = decide(snapshot, &self.thresholds);
        info!(
            "Irrigation: {} (T={:.1}\u{00b0}C H={:.0}%)",
            outcome, snapshot.temperature, snapshot.humidity
        );
        io.emit(&AppEvent::IrrigationEvaluated(outcome));

        if outcome == IrrigationOutcome::IntensiveWatering {
            self.activate_pump(outcome, io);
        }
        outcome
    }

    /// Blocking pump cycle: relay and valve open, wait, both closed.
    fn activate_pump<P: Platform>(&mut self, reason: IrrigationOutcome, io: &mut NodeIo<P>) {
        let secs = self.pump_duration_ms / 1_000;
        info!("Irrigation: pump on for {}s ({})", secs, reason);

        io.actuators.set_pump(true);
        io.actuators.set_servo_angle(ServoChannel::Valve, self.valve_open_angle);

        io.show("Watering...", &format!("{secs}s"));
        io.notify(&format!("Pump on: {secs}s.\nReason: {reason}"));

        io.sleep_ms(self.pump_duration_ms);

        io.actuators.set_pump(false);
        io.actuators.set_servo_angle(ServoChannel::Valve, 0);
        self.activations = self.activations.wrapping_add(1);
        io.emit(&AppEvent::PumpCycleCompleted {
            duration_ms: self.pump_duration_ms,
        });
        info!("Irrigation: pump off");
    }

    /// Completed pump cycles since boot.
    pub fn activations(&self) -> u32 {
        self.activations
    }
}
