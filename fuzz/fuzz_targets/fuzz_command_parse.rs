//! Fuzz target: `ActuatorCommand::parse` and `InboundMessage::new`
//!
//! Arbitrary bytes as a command payload must never panic; anything the
//! parser accepts must be a padded, case-insensitive ON or OFF.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use luxnode::app::commands::{ActuatorCommand, state_payload};
use luxnode::app::ports::{InboundMessage, MAX_INBOUND_PAYLOAD};

fuzz_target!(|data: &[u8]| {
    if let Some(cmd) = ActuatorCommand::parse(data) {
        let text = core::str::from_utf8(data).expect("accepted payloads are UTF-8");
        assert!(text.trim().eq_ignore_ascii_case(state_payload(cmd.target_state())));
    }

    match InboundMessage::new("command/actuator", data) {
        Ok(msg) => assert_eq!(&msg.payload[..], data),
        Err(_) => assert!(data.len() > MAX_INBOUND_PAYLOAD),
    }
});
