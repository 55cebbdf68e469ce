//! WiFi station-mode adapter.
//!
//! Joins the configured access point once at boot, before the control
//! loop starts. The join blocks with a bounded number of attempts; the
//! control loop itself never waits on WiFi.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.

use core::fmt;
use log::{info, warn};

use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl From<ConnectivityError> for CommsError {
    fn from(_: ConnectivityError) -> Self {
        CommsError::WifiConnectFailed
    }
}

impl From<ConnectivityError> for crate::error::Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Comms(e.into())
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
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

pub struct WifiAdapter {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    attempts: u32,
    connected: bool,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim_refuse: bool,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
        ssid: &str,
        password: &str,
    ) -> Result<Self, ConnectivityError> {
        let (ssid, password) = Self::credentials(ssid, password)?;
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs)
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        let wifi =
            BlockingWifi::wrap(esp_wifi, sysloop).map_err(|_| ConnectivityError::ConnectionFailed)?;
        Ok(Self {
            ssid,
            password,
            attempts: 0,
            connected: false,
            wifi,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        let (ssid, password) = Self::credentials(ssid, password)?;
        Ok(Self {
            ssid,
            password,
            attempts: 0,
            connected: false,
            sim_refuse: false,
        })
    }

    fn credentials(
        ssid: &str,
        password: &str,
    ) -> Result<(heapless::String<32>, heapless::String<64>), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut s = heapless::String::new();
        s.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        let mut p = heapless::String::new();
        p.push_str(password).map_err(|_| ConnectivityError::InvalidPassword)?;
        Ok((s, p))
    }

    /// Join the access point, retrying up to `max_attempts` times.
    pub fn connect_blocking(&mut self, max_attempts: u32) -> Result<(), ConnectivityError> {
        for _ in 0..max_attempts.max(1) {
            self.attempts = self.attempts.saturating_add(1);
            info!("WiFi: connecting to '{}' (attempt {})", self.ssid, self.attempts);
            match self.platform_connect() {
                Ok(()) => {
                    self.connected = true;
                    info!("WiFi: connected");
                    return Ok(());
                }
                Err(e) => warn!("WiFi: attempt {} failed: {}", self.attempts, e),
            }
        }
        Err(ConnectivityError::ConnectionFailed)
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: self
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });
        self.wifi
            .set_configuration(&config)
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        if !self.wifi.is_started().unwrap_or(false) {
            self.wifi.start().map_err(|_| ConnectivityError::ConnectionFailed)?;
        }
        self.wifi.connect().map_err(|_| ConnectivityError::ConnectionFailed)?;
        self.wifi
            .wait_netif_up()
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        if self.sim_refuse {
            return Err(ConnectivityError::ConnectionFailed);
        }
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl WifiAdapter {
    /// Make simulated joins fail.
    pub fn sim_refuse(&mut self, refuse: bool) {
        self.sim_refuse = refuse;
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
