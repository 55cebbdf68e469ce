//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (light sensor, LED, MQTT client, clock, event sinks,
//! config storage) implement these traits. The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the control loop never touches hardware or sockets directly.

use crate::config::{SystemConfig, Topic};
use crate::error::{ActuatorError, CommsError, SensorError};

/// Largest inbound payload the firmware buffers. Commands are `ON`/`OFF`.
pub const MAX_INBOUND_PAYLOAD: usize = 64;

/// Broker client identity: configured prefix plus 12 hex digits of MAC.
pub type ClientId = heapless::String<40>;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain a light reading.
pub trait SensorPort {
    /// One synchronous ADC sample in `0..=adc_max`.
    fn read_light(&mut self) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the actuator output.
pub trait ActuatorPort {
    fn set_actuator(&mut self, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Channel port (driven adapter: domain ↔ publish/subscribe broker)
// ───────────────────────────────────────────────────────────────

/// A message received on a subscribed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: Topic,
    pub payload: heapless::Vec<u8, MAX_INBOUND_PAYLOAD>,
}

impl InboundMessage {
    pub fn new(topic: &str, payload: &[u8]) -> Result<Self, CommsError> {
        let mut t = Topic::new();
        t.push_str(topic).map_err(|_| CommsError::TopicTooLong)?;
        let p = heapless::Vec::from_slice(payload).map_err(|_| CommsError::PayloadTooLarge)?;
        Ok(Self {
            topic: t,
            payload: p,
        })
    }
}

/// Publish/subscribe channel (MQTT in production).
///
/// Every method must return promptly: connection attempts are started,
/// not awaited, and inbound delivery is a non-blocking poll.
pub trait ChannelPort {
    /// Start a connection attempt with the given client identity.
    fn begin_connect(&mut self, client_id: &str) -> Result<(), CommsError>;

    /// Whether the broker session is currently up.
    fn is_connected(&self) -> bool;

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError>;

    /// Fire-and-forget publish.
    fn publish(&mut self, topic: &str, payload: &[u8], retained: bool) -> Result<(), CommsError>;

    /// Take the next buffered inbound message, if any.
    fn poll_inbound(&mut self) -> Option<InboundMessage>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST call [`SystemConfig::validate`] before persisting.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("stored config corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::IoError => Self::Config("config storage I/O error"),
        }
    }
}
