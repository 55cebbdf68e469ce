//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them (serial log, test recorder, ...).

use super::link::LinkState;
use crate::error::Error;
use crate::inference::Label;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started; carries the initial actuator state and
    /// whether the EMA could be seeded from a first reading.
    Started { actuator_on: bool, seeded: bool },

    /// One sampling tick completed.
    Telemetry(TelemetryData),

    /// A sampling tick was abandoned before publishing.
    TickSkipped(Error),

    /// The broker connection changed state.
    LinkChanged { from: LinkState, to: LinkState },

    /// A remote command changed (or re-asserted) the actuator state.
    ActuatorChanged { on: bool },

    /// A payload on the command topic was not a recognised command.
    CommandIgnored,
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub raw: u16,
    pub ema: f32,
    /// Normalised, clamped classifier input.
    pub x: f32,
    pub label: Label,
    pub confidence_pct: u8,
    pub anomaly: f32,
    pub actuator_on: bool,
    /// Publishes that failed during this tick.
    pub publish_failures: u8,
}
