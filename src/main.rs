//! GardenGate Firmware: Main Entry Point
//!
//! Hexagonal architecture driven by one cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SensorHub        ActuatorBank     DisplayHandle  Esp32Time    │
//! │  (SensorPort)     (ActuatorPort)   (DisplayPort)  (Clock)      │
//! │  WifiAdapter      VerdictClient    Weatherstack   Telegram     │
//! │  (Connectivity)   (Biometric)      (Weather)      (Chat)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  AccessController · IrrigationController · Poller      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (fixed-priority tick, never returns)                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{
    AnyIOPin, AnyInputPin, AnyOutputPin, IOPin, Input, InputOutput, InputPin as _, Output,
    OutputPin as _, PinDriver, Pull,
};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution, config::TimerConfig};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{info, warn};

use gardengate::adapters::biometric::VerdictClient;
use gardengate::adapters::hardware::ActuatorBank;
use gardengate::adapters::http::EspHttpClient;
use gardengate::adapters::log_sink::LogEventSink;
use gardengate::adapters::telegram::TelegramClient;
use gardengate::adapters::time::Esp32TimeAdapter;
use gardengate::adapters::weather::WeatherstackClient;
use gardengate::adapters::wifi::WifiAdapter;
use gardengate::app::platform::{NodeIo, Platform};
use gardengate::config::NodeConfig;
use gardengate::drivers::doorbell::Doorbell;
use gardengate::drivers::indicator::IndicatorLed;
use gardengate::drivers::lcd::DisplayHandle;
use gardengate::drivers::pump::PumpDriver;
use gardengate::drivers::servo::Servo;
use gardengate::pins;
use gardengate::scheduler::Scheduler;
use gardengate::sensors::SensorHub;
use gardengate::sensors::climate::Dht22;
use gardengate::sensors::ranger::Ranger;

// ── Platform binding ──────────────────────────────────────────

type OutPin = PinDriver<'static, AnyOutputPin, Output>;
type InPin = PinDriver<'static, AnyInputPin, Input>;
type PulledPin = PinDriver<'static, AnyIOPin, Input>;
type DhtPin = PinDriver<'static, AnyIOPin, InputOutput>;

struct EspPlatform;

impl Platform for EspPlatform {
    type Clock = Esp32TimeAdapter;
    type Delay = FreeRtos;
    type Sensors = SensorHub<
        Ranger<OutPin, InPin, Esp32TimeAdapter, Ets>,
        Dht22<DhtPin, Esp32TimeAdapter, Ets>,
        PulledPin,
        InPin,
    >;
    type Actuators = ActuatorBank<LedcDriver<'static>, LedcDriver<'static>, OutPin, OutPin, OutPin>;
    type Display = DisplayHandle<I2cDriver<'static>, Ets>;
    type Network = WifiAdapter;
    type Biometric = VerdictClient<EspHttpClient>;
    type Weather = WeatherstackClient<EspHttpClient>;
    type Chat = TelegramClient<EspHttpClient>;
    type Events = LogEventSink;
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GardenGate v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    for (name, gpio) in pins::PIN_MAP {
        info!("  {:<12} GPIO{}", name, gpio);
    }

    // ── 2. Config (build-time overrides, else defaults) ───────
    let config = {
        let cfg = NodeConfig::from_build_env();
        match cfg.validate() {
            Ok(()) => cfg,
            Err(e) => {
                warn!("Config rejected ({}), using defaults", e);
                NodeConfig::default()
            }
        }
    };

    let p = Peripherals::take()?;
    let clock = Esp32TimeAdapter::new();

    // ── 3. Display ────────────────────────────────────────────
    let i2c = I2cDriver::new(
        p.i2c0,
        p.pins.gpio19,
        p.pins.gpio18,
        &I2cConfig::new().baudrate(pins::I2C_FREQ_HZ.Hz()),
    )?;
    let display = DisplayHandle::probe(i2c, Ets, config.lcd_address, config.lcd_columns);

    // ── 4. Actuators ──────────────────────────────────────────
    // Both servo channels share one timer for the life of the program.
    let servo_timer = &*Box::leak(Box::new(LedcTimerDriver::new(
        p.ledc.timer0,
        &TimerConfig::default()
            .frequency(pins::SERVO_PWM_FREQ_HZ.Hz())
            .resolution(servo_resolution()),
    )?));
    let door = LedcDriver::new(p.ledc.channel0, servo_timer, p.pins.gpio2)?;
    let valve = LedcDriver::new(p.ledc.channel1, servo_timer, p.pins.gpio23)?;

    let actuators = ActuatorBank::new(
        Servo::new(door),
        Servo::new(valve),
        PumpDriver::new(PinDriver::output(p.pins.gpio21.downgrade_output())?),
        IndicatorLed::new(PinDriver::output(p.pins.gpio13.downgrade_output())?),
        IndicatorLed::new(PinDriver::output(p.pins.gpio12.downgrade_output())?),
    );

    // ── 5. Sensors ────────────────────────────────────────────
    let ranger = Ranger::new(
        PinDriver::output(p.pins.gpio27.downgrade_output())?,
        PinDriver::input(p.pins.gpio26.downgrade_input())?,
        clock,
        Ets,
        config.echo_timeout_us,
    );
    let mut dht_pin = PinDriver::input_output_od(p.pins.gpio22.downgrade())?;
    dht_pin.set_pull(Pull::Up)?;
    let climate = Dht22::new(dht_pin, clock, Ets);

    let mut doorbell_pin = PinDriver::input(p.pins.gpio32.downgrade())?;
    doorbell_pin.set_pull(Pull::Down)?;
    let motion_pin = PinDriver::input(p.pins.gpio25.downgrade_input())?;

    let sensors = SensorHub::new(ranger, climate, Doorbell::new(doorbell_pin), motion_pin);

    // ── 6. Network and remote services ────────────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let driver = BlockingWifi::wrap(EspWifi::new(p.modem, sysloop.clone(), Some(nvs))?, sysloop)?;
    let mut network = WifiAdapter::new(driver);
    if let Err(e) = network.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        warn!("WiFi: {}", e);
    }

    let biometric = VerdictClient::new(
        EspHttpClient::new(config.http_timeout_ms),
        &config.verdict_base_url,
    );
    let weather = WeatherstackClient::new(
        EspHttpClient::new(config.http_timeout_ms),
        &config.weather_base_url,
        &config.weather_api_key,
        &config.weather_location,
    );
    let chat = TelegramClient::new(
        EspHttpClient::new(config.http_timeout_ms),
        &config.chat_base_url,
        &config.bot_token,
        &config.chat_id,
    );

    // ── 7. Scheduler ──────────────────────────────────────────
    let io: NodeIo<EspPlatform> = NodeIo {
        clock,
        delay: FreeRtos,
        sensors,
        actuators,
        display,
        network,
        biometric,
        weather,
        chat,
        events: LogEventSink::new(),
    };

    let mut scheduler = Scheduler::new(&config, io);
    scheduler.start();
    info!("System ready. Entering main loop.");
    scheduler.run()
}

/// LEDC resolution for [`pins::SERVO_PWM_RESOLUTION_BITS`].
fn servo_resolution() -> Resolution {
    match pins::SERVO_PWM_RESOLUTION_BITS {
        10 => Resolution::Bits10,
        12 => Resolution::Bits12,
        13 => Resolution::Bits13,
        15 => Resolution::Bits15,
        16 => Resolution::Bits16,
        _ => Resolution::Bits14,
    }
}
