//! DHT22 (AM2302) temperature / humidity sensor on a single open-drain line.
//!
//! ```text
//!   host   ‾‾‾\____1.1ms____/‾‾
//!   sensor                    \__80µs__/‾‾80µs‾‾\__50µs__/‾26µs‾\ (bit 0)
//!                                                \__50µs__/‾‾‾70µs‾‾‾\ (bit 1)
//! ```
//!
//! 40 bits: humidity ×10 (u16), temperature ×10 (sign-magnitude u16),
//! checksum (low byte of the sum of the first four bytes).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ClimateReading, Clock};
use crate::error::SensorError;
use crate::sensors::ClimateSensor;

const START_LOW_US: u32 = 1_100;
const EDGE_TIMEOUT_US: u64 = 100;
/// HIGH phases longer than this are a 1 bit.
const ONE_THRESHOLD_US: u64 = 40;

/// Decode a raw 5-byte frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<ClimateReading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ChecksumMismatch);
    }
    let humidity = f32::from(u16::from_be_bytes([frame[0], frame[1]])) / 10.0;
    let magnitude = f32::from(u16::from_be_bytes([frame[2] & 0x7F, frame[3]])) / 10.0;
    let temperature = if frame[2] & 0x80 != 0 { -magnitude } else { magnitude };
    Ok(ClimateReading {
        temperature_c: temperature,
        humidity_pct: humidity,
    })
}

pub struct Dht22<P, C, D> {
    pin: P,
    clock: C,
    delay: D,
}

impl<P, C, D> Dht22<P, C, D>
where
    P: InputPin + OutputPin,
    C: Clock,
    D: DelayNs,
{
    pub fn new(pin: P, clock: C, delay: D) -> Self {
        Self { pin, clock, delay }
    }

    pub fn read(&mut self) -> Result<ClimateReading, SensorError> {
        self.pin.set_low().map_err(|_| SensorError::GpioFailed)?;
        self.delay.delay_us(START_LOW_US);
        self.pin.set_high().map_err(|_| SensorError::GpioFailed)?;

        self.wait_for(false)
            .map_err(|_| SensorError::NoResponse)?;
        self.wait_for(true)?;
        self.wait_for(false)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_for(true)?;
            let rise = self.clock.now_us();
            self.wait_for(false)?;
            if self.clock.now_us().saturating_sub(rise) > ONE_THRESHOLD_US {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        decode_frame(frame)
    }

    fn wait_for(&mut self, high: bool) -> Result<(), SensorError> {
        let start = self.clock.now_us();
        loop {
            if self.pin.is_high().map_err(|_| SensorError::GpioFailed)? == high {
                return Ok(());
            }
            if self.clock.now_us().saturating_sub(start) > EDGE_TIMEOUT_US {
                return Err(SensorError::Timeout);
            }
        }
    }
}

impl<P, C, D> ClimateSensor for Dht22<P, C, D>
where
    P: InputPin + OutputPin,
    C: Clock,
    D: DelayNs,
{
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        self.read()
    }
}
