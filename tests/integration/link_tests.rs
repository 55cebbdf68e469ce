//! Broker link supervision as seen through the service.

use luxnode::app::events::AppEvent;
use luxnode::app::link::LinkState;
use luxnode::config::SystemConfig;

use crate::mock_hw::{ConnectMode, MockChannel, MockHardware, RecordingSink, started_app};

const ACT: &str = "telemetry/actuator";
const CMD: &str = "command/actuator";

#[test]
fn reconnect_resubscribes_and_republishes_held_state() {
    let mut hw = MockHardware::new(2000);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);

    app.poll(0, &mut hw, &mut ch, &mut sink);
    ch.push_inbound(CMD, b"ON");
    app.poll(10, &mut hw, &mut ch, &mut sink);

    // Broker drops the session; the retained copy is gone with it.
    ch.connected = false;
    ch.retained.clear();
    app.poll(20, &mut hw, &mut ch, &mut sink);
    assert_eq!(app.link_state(), LinkState::Disconnected);
    assert!(sink.events.contains(&AppEvent::LinkChanged {
        from: LinkState::Connected,
        to: LinkState::Disconnected,
    }));

    ch.publishes.clear();
    // Last attempt was at t=0, so the next is due at t=1000.
    app.poll(999, &mut hw, &mut ch, &mut sink);
    assert_eq!(ch.connect_calls, 1);

    app.poll(1000, &mut hw, &mut ch, &mut sink);
    assert_eq!(ch.connect_calls, 2);
    assert_eq!(app.link_state(), LinkState::Connected);
    assert_eq!(ch.subscriptions, vec![CMD.to_string(), CMD.to_string()]);
    assert_eq!(ch.publishes[0].topic, ACT);
    assert_eq!(ch.publishes[0].payload, "ON");
    assert!(ch.publishes[0].retained);
    assert_eq!(ch.retained.get(ACT).map(String::as_str), Some("ON"));
    assert!(app.actuator_on(), "state survives the outage");
}

#[test]
fn pending_attempt_times_out_and_retries() {
    let mut hw = MockHardware::new(2000);
    let mut ch = MockChannel::new(ConnectMode::Pending);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);

    app.poll(0, &mut hw, &mut ch, &mut sink);
    assert_eq!(app.link_state(), LinkState::Connecting);

    // A slow handshake is not cut short by the retry interval.
    for now in (1000..15_000).step_by(1000) {
        app.poll(now, &mut hw, &mut ch, &mut sink);
    }
    assert_eq!(app.link_state(), LinkState::Connecting);
    assert_eq!(ch.connect_calls, 1);

    app.poll(15_000, &mut hw, &mut ch, &mut sink);
    assert_eq!(app.link_state(), LinkState::Disconnected);

    // Session comes up late; adopted without another attempt.
    ch.connected = true;
    app.poll(15_010, &mut hw, &mut ch, &mut sink);
    assert_eq!(app.link_state(), LinkState::Connected);
    assert_eq!(ch.connect_calls, 1);
    assert_eq!(ch.subscriptions, vec![CMD.to_string()]);
}

#[test]
fn backoff_grows_when_configured() {
    let config = SystemConfig {
        reconnect_backoff_max_ms: 4000,
        ..SystemConfig::default()
    };
    let mut hw = MockHardware::new(2000);
    let mut ch = MockChannel::new(ConnectMode::Refuse);
    let mut sink = RecordingSink::default();
    let mut app = started_app(config, &mut hw, &mut sink);

    // Attempts at 0, 2000, 6000; none at 1000, 3000, 5000.
    for now in (0..=6000).step_by(1000) {
        app.poll(now, &mut hw, &mut ch, &mut sink);
    }
    assert_eq!(ch.connect_calls, 3);
}

#[test]
fn link_events_trace_the_state_machine() {
    let mut hw = MockHardware::new(2000);
    let mut ch = MockChannel::new(ConnectMode::Pending);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);

    app.poll(0, &mut hw, &mut ch, &mut sink);
    ch.connected = true;
    app.poll(100, &mut hw, &mut ch, &mut sink);

    let links: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::LinkChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        links,
        vec![
            (LinkState::Disconnected, LinkState::Connecting),
            (LinkState::Connecting, LinkState::Connected),
        ]
    );
}
