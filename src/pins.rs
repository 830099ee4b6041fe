//! GPIO / peripheral pin assignments for the GardenGate node (ESP32 DevKit).
//!
//! Single source of truth for the wiring. `main` binds the matching typed
//! `esp_idf_hal` pins and logs this table at boot so a miswired board is
//! obvious from the serial console.

// ---------------------------------------------------------------------------
// Access control (front door)
// ---------------------------------------------------------------------------

/// Doorbell push-button. Internal pull-down, HIGH = pressed.
pub const DOORBELL_GPIO: i32 = 32;
/// PIR motion sensor output. HIGH = motion.
pub const PIR_GPIO: i32 = 25;
/// Door lock servo signal (LEDC channel 0).
pub const SERVO_DOOR_GPIO: i32 = 2;
/// Green "access granted" indicator.
pub const LED_GREEN_GPIO: i32 = 13;
/// Red "access denied" indicator.
pub const LED_RED_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Irrigation
// ---------------------------------------------------------------------------

/// Pump relay (an LED on the bench rig). HIGH = running.
pub const PUMP_GPIO: i32 = 21;
/// Irrigation valve servo signal (LEDC channel 1).
pub const SERVO_VALVE_GPIO: i32 = 23;
/// DHT22 single-wire data line (open-drain, external pull-up).
pub const DHT_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// Reservoir ultrasonic ranger (HC-SR04)
// ---------------------------------------------------------------------------

pub const TRIG_GPIO: i32 = 27;
pub const ECHO_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// I²C bus (PCF8574 LCD backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 19;
pub const I2C_SCL_GPIO: i32 = 18;
/// Standard-mode bus clock.
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Hobby servo frame rate (20 ms period).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC timer resolution (bits). 14-bit keeps ~1.2 µs per step at 50 Hz.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;

/// Every assigned GPIO with a short label, for the boot log.
pub const PIN_MAP: [(&str, i32); 12] = [
    ("doorbell", DOORBELL_GPIO),
    ("pir", PIR_GPIO),
    ("servo_door", SERVO_DOOR_GPIO),
    ("led_green", LED_GREEN_GPIO),
    ("led_red", LED_RED_GPIO),
    ("pump", PUMP_GPIO),
    ("servo_valve", SERVO_VALVE_GPIO),
    ("dht", DHT_GPIO),
    ("trig", TRIG_GPIO),
    ("echo", ECHO_GPIO),
    ("sda", I2C_SDA_GPIO),
    ("scl", I2C_SCL_GPIO),
];
