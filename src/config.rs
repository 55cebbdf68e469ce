//! System configuration parameters
//!
//! All tunable parameters for the luxnode system. Values are loaded from
//! NVS at boot through [`ConfigPort`](crate::app::ports::ConfigPort) and
//! fall back to [`SystemConfig::default()`].

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::inference::window::MAX_WINDOW;

/// Fixed-capacity MQTT topic string.
pub type Topic = heapless::String<64>;

/// Build a fixed-capacity string from a literal known to fit.
fn fixed<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    let _ = out.push_str(s);
    out
}

/// Publish/subscribe topic layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Raw ADC sample (integer, not retained).
    pub raw: Topic,
    /// Predicted label `DARK` / `BRIGHT` (not retained).
    pub label: Topic,
    /// Confidence of the predicted label, 0–100 (not retained).
    pub confidence: Topic,
    /// Actuator state `ON` / `OFF` (retained).
    pub actuator: Topic,
    /// Inbound actuator command topic.
    pub command: Topic,
    /// Optional anomaly score topic. `None` keeps it off the wire.
    pub anomaly: Option<Topic>,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            raw: fixed("telemetry/raw"),
            label: fixed("telemetry/label"),
            confidence: fixed("telemetry/confidence"),
            actuator: fixed("telemetry/actuator"),
            command: fixed("command/actuator"),
            anomaly: None,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Sensor ---
    /// Full-scale ADC reading (12-bit ESP32 ADC = 4095).
    pub adc_max: u16,

    // --- Smoothing ---
    /// EMA weight of the newest sample, strictly inside (0, 1).
    pub ema_alpha: f32,

    // --- Classifier ---
    /// Logistic weight applied to the normalised reading.
    pub classifier_weight: f32,
    /// Logistic bias.
    pub classifier_bias: f32,

    // --- Anomaly ---
    /// Normalisation constant `K` in `var / (var + K)`.
    pub anomaly_normalization: f32,
    /// Number of recent raw samples scored each tick (1..=MAX_WINDOW).
    pub anomaly_window: u16,

    // --- Timing ---
    /// Sampling / telemetry period (milliseconds)
    pub publish_period_ms: u32,
    /// Minimum spacing between MQTT connect attempts (milliseconds)
    pub reconnect_interval_ms: u32,
    /// Upper bound for the reconnect backoff. Equal to
    /// `reconnect_interval_ms` means a fixed retry interval.
    pub reconnect_backoff_max_ms: u32,
    /// How long an in-flight connect attempt may take before it is
    /// abandoned and a fresh one started.
    pub connect_timeout_ms: u32,

    // --- Broker ---
    pub broker_host: heapless::String<64>,
    pub broker_port: u16,
    /// Client id prefix; the MAC-derived suffix is appended at boot.
    pub client_id_prefix: heapless::String<24>,

    // --- WiFi ---
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,

    // --- Topics ---
    pub topics: TopicConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Sensor
            adc_max: 4095,

            // Smoothing
            ema_alpha: 0.2,

            // Classifier: negative slope, more light -> lower P(dark)
            classifier_weight: -10.0,
            classifier_bias: 5.0,

            // Anomaly
            anomaly_normalization: 50_000.0,
            anomaly_window: 16,

            // Timing
            publish_period_ms: 1000,      // 1 Hz
            reconnect_interval_ms: 1000,  // 1 attempt/s
            reconnect_backoff_max_ms: 1000,
            connect_timeout_ms: 15_000,

            // Broker
            broker_host: fixed("broker.hivemq.com"),
            broker_port: 1883,
            client_id_prefix: fixed("LUXNODE_"),

            // WiFi
            wifi_ssid: fixed("Wokwi-GUEST"),
            wifi_password: heapless::String::new(),

            topics: TopicConfig::default(),
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.adc_max == 0 {
            return Err(ConfigError::ValidationFailed("adc_max must be > 0"));
        }
        if !(self.ema_alpha > 0.0 && self.ema_alpha < 1.0) {
            return Err(ConfigError::ValidationFailed("ema_alpha must be in (0, 1)"));
        }
        if !self.classifier_weight.is_finite() || !self.classifier_bias.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "classifier weight and bias must be finite",
            ));
        }
        if !(self.anomaly_normalization.is_finite() && self.anomaly_normalization > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "anomaly_normalization must be finite and > 0",
            ));
        }
        if self.anomaly_window == 0 || usize::from(self.anomaly_window) > MAX_WINDOW {
            return Err(ConfigError::ValidationFailed(
                "anomaly_window must be 1..=MAX_WINDOW",
            ));
        }
        if !(100..=60_000).contains(&self.publish_period_ms) {
            return Err(ConfigError::ValidationFailed(
                "publish_period_ms must be 100–60000",
            ));
        }
        if !(100..=60_000).contains(&self.reconnect_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "reconnect_interval_ms must be 100–60000",
            ));
        }
        if self.reconnect_backoff_max_ms < self.reconnect_interval_ms
            || self.reconnect_backoff_max_ms > 300_000
        {
            return Err(ConfigError::ValidationFailed(
                "reconnect_backoff_max_ms must be reconnect_interval_ms–300000",
            ));
        }
        if self.connect_timeout_ms < self.reconnect_interval_ms
            || self.connect_timeout_ms > 120_000
        {
            return Err(ConfigError::ValidationFailed(
                "connect_timeout_ms must be reconnect_interval_ms–120000",
            ));
        }
        if self.broker_host.is_empty() || self.broker_port == 0 {
            return Err(ConfigError::ValidationFailed("broker host/port required"));
        }
        let t = &self.topics;
        let required = [&t.raw, &t.label, &t.confidence, &t.actuator, &t.command];
        if required.iter().any(|topic| topic.is_empty())
            || t.anomaly.as_ref().is_some_and(|topic| topic.is_empty())
        {
            return Err(ConfigError::ValidationFailed("topics must be non-empty"));
        }
        Ok(())
    }

    /// `mqtt://host:port` URL for the broker.
    pub fn broker_url(&self) -> String {
        format!("mqtt://{}:{}", self.broker_host, self.broker_port)
    }
}
