//! End-to-end control loop behaviour against mock adapters.

use luxnode::app::events::AppEvent;
use luxnode::app::link::LinkState;
use luxnode::config::SystemConfig;
use luxnode::inference::Label;

use crate::mock_hw::{ConnectMode, MockChannel, MockHardware, RecordingSink, started_app};

const RAW: &str = "telemetry/raw";
const LABEL: &str = "telemetry/label";
const CONF: &str = "telemetry/confidence";
const ACT: &str = "telemetry/actuator";
const CMD: &str = "command/actuator";

#[test]
fn first_poll_connects_then_publishes_full_telemetry() {
    let mut hw = MockHardware::new(4095);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);

    app.poll(0, &mut hw, &mut ch, &mut sink);

    assert_eq!(app.link_state(), LinkState::Connected);
    assert_eq!(ch.client_ids, vec![crate::mock_hw::CLIENT_ID.to_string()]);
    assert_eq!(ch.subscriptions, vec![CMD.to_string()]);
    assert_eq!(ch.topics(), vec![ACT, RAW, LABEL, CONF, ACT]);

    let p = &ch.publishes;
    assert_eq!((p[0].payload.as_str(), p[0].retained), ("OFF", true));
    assert_eq!((p[1].payload.as_str(), p[1].retained), ("4095", false));
    assert_eq!((p[2].payload.as_str(), p[2].retained), ("BRIGHT", false));
    assert_eq!((p[3].payload.as_str(), p[3].retained), ("99", false));
    assert_eq!((p[4].payload.as_str(), p[4].retained), ("OFF", true));
}

#[test]
fn dark_reading_classifies_dark() {
    let mut hw = MockHardware::new(0);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);

    app.poll(0, &mut hw, &mut ch, &mut sink);

    let t = sink.telemetry()[0];
    assert_eq!(t.label, Label::Dark);
    assert_eq!(t.confidence_pct, 99);
    assert_eq!(t.x, 0.0);
    assert_eq!(ch.published_to(LABEL)[0].payload, "DARK");
}

#[test]
fn telemetry_is_time_gated() {
    let mut hw = MockHardware::new(2000);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);

    for now in [0, 10, 500, 999, 1000, 1500, 2000] {
        app.poll(now, &mut hw, &mut ch, &mut sink);
    }
    assert_eq!(sink.telemetry().len(), 3);
    assert_eq!(ch.published_to(RAW).len(), 3);
}

#[test]
fn ema_smooths_a_step() {
    let mut hw = MockHardware::new(0);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);
    assert_eq!(app.ema(), Some(0.0));

    hw.reading = 100;
    app.poll(0, &mut hw, &mut ch, &mut sink);
    let t = sink.telemetry()[0];
    assert_eq!(t.raw, 100);
    assert!((t.ema - 20.0).abs() < 1e-4, "ema = {}", t.ema);
    // The raw topic carries the unsmoothed sample.
    assert_eq!(ch.published_to(RAW)[0].payload, "100");
}

#[test]
fn command_lands_before_same_iteration_telemetry() {
    let mut hw = MockHardware::new(3000);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);

    app.poll(0, &mut hw, &mut ch, &mut sink);
    ch.publishes.clear();

    ch.push_inbound(CMD, b"ON");
    app.poll(1000, &mut hw, &mut ch, &mut sink);

    assert_eq!(ch.topics(), vec![ACT, RAW, LABEL, CONF, ACT]);
    assert!(ch.published_to(ACT).iter().all(|p| p.payload == "ON" && p.retained));
    assert!(sink.telemetry().last().unwrap().actuator_on);
}

#[test]
fn sensor_failure_skips_tick_without_publishing() {
    let mut hw = MockHardware::new(1000);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);

    hw.fail_reads = true;
    app.poll(0, &mut hw, &mut ch, &mut sink);

    // Only the on-connect retained state went out.
    assert_eq!(ch.topics(), vec![ACT]);
    assert_eq!(app.tick_count(), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::TickSkipped(_))), 1);
    assert!(sink.telemetry().is_empty());
    assert_eq!(app.ema(), Some(1000.0), "filter untouched by a failed read");

    hw.fail_reads = false;
    app.poll(1000, &mut hw, &mut ch, &mut sink);
    assert_eq!(sink.telemetry().len(), 1);
}

#[test]
fn partial_publish_failure_does_not_stop_the_rest() {
    let mut hw = MockHardware::new(1000);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);

    ch.failing_topics.insert(LABEL.into());
    app.poll(0, &mut hw, &mut ch, &mut sink);

    assert_eq!(ch.topics(), vec![ACT, RAW, CONF, ACT]);
    assert_eq!(sink.telemetry()[0].publish_failures, 1);
    assert_eq!(app.stats().failed, 1);
    assert_eq!(app.stats().published, 4);
}

#[test]
fn sampling_continues_while_broker_unreachable() {
    let mut hw = MockHardware::new(500);
    let mut ch = MockChannel::new(ConnectMode::Refuse);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);

    for now in [0, 500, 1000, 1500, 2000] {
        app.poll(now, &mut hw, &mut ch, &mut sink);
    }

    assert_eq!(app.link_state(), LinkState::Disconnected);
    assert_eq!(ch.connect_calls, 3, "one attempt per interval");
    assert_eq!(sink.telemetry().len(), 3);
    assert!(ch.publishes.is_empty());
    assert_eq!(sink.telemetry()[0].publish_failures, 4);
}

#[test]
fn optional_anomaly_topic_is_published_when_configured() {
    let mut config = SystemConfig::default();
    config.topics.anomaly = Some(heapless::String::try_from("telemetry/anomaly").unwrap());

    let mut hw = MockHardware::new(100);
    hw.script.extend([100, 0, 100, 0]);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(config, &mut hw, &mut sink);

    for now in [0, 1000, 2000, 3000] {
        app.poll(now, &mut hw, &mut ch, &mut sink);
    }

    let anomaly = ch.published_to("telemetry/anomaly");
    assert_eq!(anomaly.len(), 4);
    assert_eq!(anomaly[0].payload, "0.0000");
    assert!(!anomaly[3].retained);
    let last = sink.telemetry()[3].anomaly;
    assert!((last - 2500.0 / 52_500.0).abs() < 1e-5, "anomaly = {}", last);
}

#[test]
fn anomaly_topic_is_off_by_default() {
    let mut hw = MockHardware::new(100);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(SystemConfig::default(), &mut hw, &mut sink);

    app.poll(0, &mut hw, &mut ch, &mut sink);
    assert!(ch.topics().iter().all(|t| !t.contains("anomaly")));
}
