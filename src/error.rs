//! Unified error types for the luxnode firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they
//! can be logged and carried through [`AppEvent`](crate::app::events::AppEvent)s
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The light sensor could not be read.
    Sensor(SensorError),
    /// The actuator output could not be driven.
    Actuator(ActuatorError),
    /// A scoring engine could not produce a result.
    Score(ScoreError),
    /// The publish/subscribe channel failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Score(e) => write!(f, "score: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

/// Lets bootstrap code hand firmware errors to `anyhow` with `?`.
impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// Reading is outside the configured ADC range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Signal errors
// ---------------------------------------------------------------------------

/// Failures of the streaming pull interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    /// Bad construction parameters (e.g. an empty buffer).
    InvalidArgument,
    /// `offset + length` exceeds `total_length`.
    OutOfRange {
        offset: usize,
        length: usize,
        total: usize,
    },
    /// No backing buffer is currently attached.
    Unbound,
    /// The data source itself failed to produce samples.
    ReadFailure,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::OutOfRange {
                offset,
                length,
                total,
            } => write!(f, "read {offset}+{length} beyond length {total}"),
            Self::Unbound => write!(f, "no backing buffer"),
            Self::ReadFailure => write!(f, "source read failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreError {
    /// The signal has no samples.
    EmptySignal,
    /// A pull from the signal failed.
    Read(SignalError),
    /// A sample was NaN or infinite.
    NonFinite,
    /// The normalisation constant is not finite and positive.
    InvalidNormalization,
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySignal => write!(f, "empty signal"),
            Self::Read(e) => write!(f, "signal read: {e}"),
            Self::NonFinite => write!(f, "non-finite sample"),
            Self::InvalidNormalization => write!(f, "normalisation constant must be > 0"),
        }
    }
}

impl From<SignalError> for ScoreError {
    fn from(e: SignalError) -> Self {
        Self::Read(e)
    }
}

impl From<ScoreError> for Error {
    fn from(e: ScoreError) -> Self {
        Self::Score(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The channel is not connected; the operation was skipped.
    ChannelUnavailable,
    /// A connection attempt could not be started or was refused.
    ConnectFailed,
    PublishFailed,
    SubscribeFailed,
    /// Topic does not fit the fixed-capacity topic buffer.
    TopicTooLong,
    /// Payload does not fit the fixed-capacity payload buffer.
    PayloadTooLarge,
    /// The access point could not be joined at boot.
    WifiConnectFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelUnavailable => write!(f, "channel unavailable"),
            Self::ConnectFailed => write!(f, "MQTT connect failed"),
            Self::PublishFailed => write!(f, "MQTT publish failed"),
            Self::SubscribeFailed => write!(f, "MQTT subscribe failed"),
            Self::TopicTooLong => write!(f, "topic too long"),
            Self::PayloadTooLarge => write!(f, "payload too large"),
            Self::WifiConnectFailed => write!(f, "WiFi connect failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
