//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements         | Connects to                 |
//! |--------------|--------------------|-----------------------------|
//! | `hardware`   | SensorPort         | ESP32 GPIO (ranger, DHT22)  |
//! |              | ActuatorPort       | ESP32 LEDC PWM, GPIO        |
//! | `log_sink`   | EventSink          | Serial log output           |
//! | `time`       | Clock              | ESP32 system timer          |
//! | `wifi`       | ConnectivityPort   | ESP-IDF WiFi STA            |
//! | `http`       | HttpClient         | ESP-IDF HTTP client         |
//! | `biometric`  | BiometricPort      | Face verification server    |
//! | `weather`    | WeatherPort        | Weatherstack API            |
//! | `telegram`   | ChatPort           | Telegram Bot API            |
//!
//! The LCD is a driver that implements `DisplayPort` directly.

pub mod biometric;
pub mod hardware;
#[cfg(target_os = "espidf")]
pub mod http;
pub mod log_sink;
pub mod telegram;
pub mod time;
pub mod utils;
pub mod weather;
pub mod wifi;

#[cfg(test)]
mod fake_http;
