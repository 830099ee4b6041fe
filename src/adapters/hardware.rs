//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! [`SensorHub`] is exposed as [`SensorPort`]; the [`ActuatorBank`] owns
//! both servos, the pump relay and the two indicator LEDs and is exposed
//! as [`ActuatorPort`]. Driver errors stop here: they are logged and the
//! domain never sees them.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use log::{debug, warn};

use crate::app::ports::{ActuatorPort, ClimateReading, Indicator, SensorPort, ServoChannel};
use crate::drivers::indicator::IndicatorLed;
use crate::drivers::pump::PumpDriver;
use crate::drivers::servo::Servo;
use crate::sensors::{ClimateSensor, DistanceSensor, SensorHub};

// ── SensorPort implementation ─────────────────────────────────

impl<R, C, B, M> SensorPort for SensorHub<R, C, B, M>
where
    R: DistanceSensor,
    C: ClimateSensor,
    B: InputPin,
    M: InputPin,
{
    fn doorbell_pressed(&mut self) -> bool {
        self.doorbell.rising_edge()
    }

    fn motion_detected(&mut self) -> bool {
        self.motion_level()
    }

    fn measure_distance_cm(&mut self) -> Option<f32> {
        self.ranger.measure_distance_cm()
    }

    fn read_climate(&mut self) -> Option<ClimateReading> {
        match self.climate.read_climate() {
            Ok(reading) => Some(reading),
            Err(e) => {
                debug!("DHT22: read failed: {}", e);
                None
            }
        }
    }
}

// ── Actuators ─────────────────────────────────────────────────

/// Every output of the node.
pub struct ActuatorBank<SD, SV, PP, GP, RP> {
    door: Servo<SD>,
    valve: Servo<SV>,
    pump: PumpDriver<PP>,
    green: IndicatorLed<GP>,
    red: IndicatorLed<RP>,
}

impl<SD, SV, PP, GP, RP> ActuatorBank<SD, SV, PP, GP, RP>
where
    SD: SetDutyCycle,
    SV: SetDutyCycle,
    PP: OutputPin,
    GP: OutputPin,
    RP: OutputPin,
{
    pub fn new(
        door: Servo<SD>,
        valve: Servo<SV>,
        pump: PumpDriver<PP>,
        green: IndicatorLed<GP>,
        red: IndicatorLed<RP>,
    ) -> Self {
        Self {
            door,
            valve,
            pump,
            green,
            red,
        }
    }

    pub fn door_angle(&self) -> u8 {
        self.door.angle()
    }

    pub fn pump_starts(&self) -> u32 {
        self.pump.start_count()
    }
}

impl<SD, SV, PP, GP, RP> ActuatorPort for ActuatorBank<SD, SV, PP, GP, RP>
where
    SD: SetDutyCycle,
    SV: SetDutyCycle,
    PP: OutputPin,
    GP: OutputPin,
    RP: OutputPin,
{
    fn set_servo_angle(&mut self, channel: ServoChannel, angle: u8) {
        let result = match channel {
            ServoChannel::Door => self.door.set_angle(angle),
            ServoChannel::Valve => self.valve.set_angle(angle),
        };
        if let Err(e) = result {
            warn!("Servo {:?}: {}", channel, e);
        }
    }

    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        let result = match indicator {
            Indicator::Granted => self.green.set(on),
            Indicator::Denied => self.red.set(on),
        };
        if let Err(e) = result {
            warn!("LED {:?}: {}", indicator, e);
        }
    }

    fn set_pump(&mut self, on: bool) {
        if let Err(e) = self.pump.set(on) {
            warn!("Pump: {}", e);
        }
    }

    fn all_off(&mut self) {
        if let Err(e) = self.pump.stop() {
            warn!("Pump: {}", e);
        }
        if let Err(e) = self.green.off() {
            warn!("LED Granted: {}", e);
        }
        if let Err(e) = self.red.off() {
            warn!("LED Denied: {}", e);
        }
    }
}
