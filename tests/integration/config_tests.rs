//! Configuration flowing from storage into the service.

use luxnode::app::ports::{ConfigError, ConfigPort};
use luxnode::config::SystemConfig;

use crate::mock_hw::{ConnectMode, MockChannel, MockHardware, MockNvs, RecordingSink, started_app};

#[test]
fn stored_config_drives_topics_and_period() {
    let nvs = MockNvs::default();
    let mut config = SystemConfig::default();
    config.publish_period_ms = 250;
    config.topics.raw = heapless::String::try_from("lab/ldr/raw").unwrap();
    nvs.save(&config).unwrap();

    let mut hw = MockHardware::new(1234);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(nvs.load().unwrap(), &mut hw, &mut sink);

    for now in [0, 250, 500] {
        app.poll(now, &mut hw, &mut ch, &mut sink);
    }
    let raw = ch.published_to("lab/ldr/raw");
    assert_eq!(raw.len(), 3);
    assert_eq!(raw[0].payload, "1234");
}

#[test]
fn invalid_config_is_not_persisted() {
    let nvs = MockNvs::default();
    let config = SystemConfig {
        anomaly_window: 0,
        ..SystemConfig::default()
    };
    assert!(matches!(nvs.save(&config), Err(ConfigError::ValidationFailed(_))));
    assert_eq!(nvs.load().unwrap(), SystemConfig::default());
}

#[test]
fn classifier_parameters_come_from_config() {
    // Positive slope flips the decision for a bright reading.
    let config = SystemConfig {
        classifier_weight: 10.0,
        classifier_bias: -5.0,
        ..SystemConfig::default()
    };
    let mut hw = MockHardware::new(4095);
    let mut ch = MockChannel::new(ConnectMode::Accept);
    let mut sink = RecordingSink::default();
    let mut app = started_app(config, &mut hw, &mut sink);

    app.poll(0, &mut hw, &mut ch, &mut sink);
    assert_eq!(ch.published_to("telemetry/label")[0].payload, "DARK");
}
