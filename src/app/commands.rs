//! Inbound commands to the application service.
//!
//! Remote actuator overrides arrive as raw MQTT payloads; [`ActuatorCommand::parse`]
//! turns them into a typed command or rejects them.

/// Remote actuator override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    On,
    Off,
}

impl ActuatorCommand {
    /// Parse a command payload: whitespace-trimmed, case-insensitive
    /// `ON` / `OFF`. Anything else (including non-UTF-8) is `None`.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        let text = core::str::from_utf8(payload).ok()?.trim();
        if text.eq_ignore_ascii_case("ON") {
            Some(Self::On)
        } else if text.eq_ignore_ascii_case("OFF") {
            Some(Self::Off)
        } else {
            None
        }
    }

    /// Actuator state this command requests.
    pub const fn target_state(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Wire form of an actuator state.
pub const fn state_payload(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}
