//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the hexagonal boundary for network
//! connectivity.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   `esp_idf_svc::wifi::BlockingWifi`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Connect policy
//!
//! `connect()` makes up to [`CONNECT_ATTEMPTS`] attempts spaced
//! [`ATTEMPT_SPACING_MS`] apart, then gives up. There is no background
//! reconnect; callers retry on their own schedule (the access controller
//! does so when a doorbell press finds the link down).

use std::net::Ipv4Addr;

use log::{error, info};

use super::utils::is_printable_ascii;
use crate::app::ports::ConnectivityPort;
use crate::error::ConnectivityError;

pub const CONNECT_ATTEMPTS: u32 = 20;
pub const ATTEMPT_SPACING_MS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
type Driver = esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>;

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    ip: Option<Ipv4Addr>,
    #[cfg(target_os = "espidf")]
    driver: Driver,
    /// Simulation: when `false`, every attempt fails.
    #[cfg(not(target_os = "espidf"))]
    sim_link_available: bool,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(driver: Driver) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            ip: None,
            driver,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            ip: None,
            sim_link_available: true,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Store station credentials. An empty password selects an open network.
    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|_| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials set (SSID='{}')", self.ssid);
        Ok(())
    }

    /// Simulation only: make the access point reachable or not.
    #[cfg(not(target_os = "espidf"))]
    pub fn set_sim_link_available(&mut self, available: bool) {
        self.sim_link_available = available;
        if !available && self.state == WifiState::Connected {
            self.state = WifiState::Disconnected;
            self.ip = None;
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn configure(&mut self) -> Result<(), ConnectivityError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let conf = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.as_str().try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });
        self.driver.set_configuration(&conf).map_err(|e| {
            error!("WiFi(espidf): set_configuration failed: {:?}", e);
            ConnectivityError::ConnectionFailed
        })?;
        if !self.driver.is_started().unwrap_or(false) {
            self.driver.start().map_err(|e| {
                error!("WiFi(espidf): start failed: {:?}", e);
                ConnectivityError::ConnectionFailed
            })?;
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<Ipv4Addr, ConnectivityError> {
        self.driver.connect().map_err(|_| ConnectivityError::ConnectionFailed)?;
        self.driver
            .wait_netif_up()
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        let info = self
            .driver
            .wifi()
            .sta_netif()
            .get_ip_info()
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        Ok(info.ip)
    }

    #[cfg(not(target_os = "espidf"))]
    fn configure(&mut self) -> Result<(), ConnectivityError> {
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<Ipv4Addr, ConnectivityError> {
        if !self.sim_link_available {
            return Err(ConnectivityError::ConnectionFailed);
        }
        info!("WiFi(sim): associated with '{}'", self.ssid);
        Ok(Ipv4Addr::new(192, 168, 4, 2))
    }

    #[cfg(target_os = "espidf")]
    fn pause_between_attempts() {
        esp_idf_hal::delay::FreeRtos::delay_ms(ATTEMPT_SPACING_MS);
    }

    #[cfg(not(target_os = "espidf"))]
    fn pause_between_attempts() {}

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Err(e) = self.driver.disconnect() {
            log::warn!("WiFi(espidf): disconnect failed: {:?}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        info!("WiFi(sim): disconnected");
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.driver.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.sim_link_available
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.platform_is_connected() {
            return Ok(());
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        self.state = WifiState::Connecting;
        if let Err(e) = self.configure() {
            self.state = WifiState::Failed;
            return Err(e);
        }

        for attempt in 1..=CONNECT_ATTEMPTS {
            match self.platform_connect() {
                Ok(ip) => {
                    self.state = WifiState::Connected;
                    self.ip = Some(ip);
                    info!("WiFi: connected, IP {} (attempt {})", ip, attempt);
                    return Ok(());
                }
                Err(_) => {
                    if attempt < CONNECT_ATTEMPTS {
                        Self::pause_between_attempts();
                    }
                }
            }
        }

        error!("WiFi: no connection after {} attempts", CONNECT_ATTEMPTS);
        self.state = WifiState::Failed;
        self.ip = None;
        Err(ConnectivityError::ConnectionFailed)
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        self.ip = None;
        info!("WiFi: disconnected");
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    fn ip_address(&self) -> Option<Ipv4Addr> {
        if self.is_connected() { self.ip } else { None }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
