//! Remote actuator commands: parsing, state ownership and the immediate
//! retained state publish.

use luxnode::app::events::AppEvent;
use luxnode::config::SystemConfig;

use crate::mock_hw::{ConnectMode, MockChannel, MockHardware, RecordingSink, started_app};

const ACT: &str = "telemetry/actuator";
const CMD: &str = "command/actuator";

/// Connected service with the first tick already done and the publish
/// log cleared.
fn connected() -> (
    luxnode::app::service::AppService,
    MockHardware,
    MockChannel,
    RecordingSink,
) {
    let mut hw = MockHardware::new(2000);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);
    app.poll(0, &mut hw, &mut ch, &mut sink);
    ch.publishes.clear();
    sink.events.clear();
    (app, hw, ch, sink)
}

#[test]
fn padded_lowercase_on_switches_led_and_publishes_at_once() {
    let (mut app, mut hw, mut ch, mut sink) = connected();

    ch.push_inbound(CMD, b"on ");
    app.poll(10, &mut hw, &mut ch, &mut sink);

    assert!(app.actuator_on());
    assert!(hw.led());
    assert_eq!(ch.publishes.len(), 1);
    assert_eq!(ch.publishes[0].topic, ACT);
    assert_eq!(ch.publishes[0].payload, "ON");
    assert!(ch.publishes[0].retained);
    assert_eq!(ch.retained.get(ACT).map(String::as_str), Some("ON"));
    assert_eq!(sink.events, vec![AppEvent::ActuatorChanged { on: true }]);
}

#[test]
fn off_command_after_on() {
    let (mut app, mut hw, mut ch, mut sink) = connected();

    ch.push_inbound(CMD, b"ON");
    ch.push_inbound(CMD, b"\toff\r\n");
    app.poll(10, &mut hw, &mut ch, &mut sink);

    assert!(!app.actuator_on());
    // Startup write, then one write per command.
    assert_eq!(hw.led_writes, vec![false, true, false]);
    let payloads: Vec<_> = ch.publishes.iter().map(|p| p.payload.as_str()).collect();
    assert_eq!(payloads, vec!["ON", "OFF"]);
}

#[test]
fn unrecognised_payload_changes_nothing() {
    let (mut app, mut hw, mut ch, mut sink) = connected();

    ch.push_inbound(CMD, b"TOGGLE");
    app.poll(10, &mut hw, &mut ch, &mut sink);

    assert!(!app.actuator_on());
    assert_eq!(hw.led_writes, vec![false]);
    assert!(ch.publishes.is_empty());
    assert_eq!(sink.events, vec![AppEvent::CommandIgnored]);
}

#[test]
fn messages_on_other_topics_are_ignored() {
    let (mut app, mut hw, mut ch, mut sink) = connected();

    ch.push_inbound("command/other", b"ON");
    app.poll(10, &mut hw, &mut ch, &mut sink);

    assert!(!app.actuator_on());
    assert!(ch.publishes.is_empty());
    assert!(sink.events.is_empty());
}

#[test]
fn repeated_command_republishes_state() {
    let (mut app, mut hw, mut ch, mut sink) = connected();

    ch.push_inbound(CMD, b"ON");
    ch.push_inbound(CMD, b"ON");
    app.poll(10, &mut hw, &mut ch, &mut sink);

    assert_eq!(ch.published_to(ACT).len(), 2);
    assert!(app.actuator_on());
}

#[test]
fn actuator_write_failure_keeps_commanded_state() {
    let (mut app, mut hw, mut ch, mut sink) = connected();

    hw.fail_writes = true;
    ch.push_inbound(CMD, b"ON");
    app.poll(10, &mut hw, &mut ch, &mut sink);

    assert!(app.actuator_on());
    assert_eq!(ch.published_to(ACT)[0].payload, "ON");
}

#[test]
fn dispatch_is_bounded_per_iteration() {
    use luxnode::app::service::MAX_DISPATCH_PER_POLL;

    let (mut app, mut hw, mut ch, mut sink) = connected();

    for _ in 0..MAX_DISPATCH_PER_POLL + 2 {
        ch.push_inbound(CMD, b"ON");
    }
    app.poll(10, &mut hw, &mut ch, &mut sink);
    assert_eq!(ch.inbound.len(), 2);
    app.poll(20, &mut hw, &mut ch, &mut sink);
    assert!(ch.inbound.is_empty());
}
