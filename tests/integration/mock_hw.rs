//! Mock adapters for integration tests.
//!
//! Records every actuator write, publish and subscription so tests can
//! assert on the full history without touching GPIO or a broker.

use std::cell::Cell;
use std::collections::{HashMap, HashSet, VecDeque};

use luxnode::app::events::AppEvent;
use luxnode::app::ports::{
    ActuatorPort, ChannelPort, ClockPort, ConfigError, ConfigPort, EventSink, InboundMessage,
    SensorPort,
};
use luxnode::config::SystemConfig;
use luxnode::error::{ActuatorError, CommsError, SensorError};

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Returned by every read unless `script` has entries.
    pub reading: u16,
    /// Readings consumed front-first before falling back to `reading`.
    pub script: VecDeque<u16>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub led_writes: Vec<bool>,
    pub reads: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(reading: u16) -> Self {
        Self {
            reading,
            script: VecDeque::new(),
            fail_reads: false,
            fail_writes: false,
            led_writes: Vec::new(),
            reads: 0,
        }
    }

    /// Physical LED level after the last successful write.
    pub fn led(&self) -> bool {
        self.led_writes.last().copied().unwrap_or(false)
    }
}

impl SensorPort for MockHardware {
    fn read_light(&mut self) -> Result<u16, SensorError> {
        self.reads += 1;
        if self.fail_reads {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(self.script.pop_front().unwrap_or(self.reading))
    }
}

impl ActuatorPort for MockHardware {
    fn set_actuator(&mut self, on: bool) -> Result<(), ActuatorError> {
        if self.fail_writes {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.led_writes.push(on);
        Ok(())
    }
}

// ── MockChannel ───────────────────────────────────────────────

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectMode {
    /// Session comes up during `begin_connect`.
    Accept,
    /// `begin_connect` fails.
    Refuse,
    /// Attempt starts but the session never comes up on its own.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publish {
    pub topic: String,
    pub payload: String,
    pub retained: bool,
}

pub struct MockChannel {
    pub mode: ConnectMode,
    pub connected: bool,
    pub connect_calls: u32,
    pub client_ids: Vec<String>,
    pub subscriptions: Vec<String>,
    pub publishes: Vec<Publish>,
    pub retained: HashMap<String, String>,
    pub failing_topics: HashSet<String>,
    pub inbound: VecDeque<InboundMessage>,
}

#[allow(dead_code)]
impl MockChannel {
    pub fn new(mode: ConnectMode) -> Self {
        Self {
            mode,
            connected: false,
            connect_calls: 0,
            client_ids: Vec::new(),
            subscriptions: Vec::new(),
            publishes: Vec::new(),
            retained: HashMap::new(),
            failing_topics: HashSet::new(),
            inbound: VecDeque::new(),
        }
    }

    pub fn push_inbound(&mut self, topic: &str, payload: &[u8]) {
        self.inbound
            .push_back(InboundMessage::new(topic, payload).expect("fits inbound limits"));
    }

    pub fn published_to(&self, topic: &str) -> Vec<&Publish> {
        self.publishes.iter().filter(|p| p.topic == topic).collect()
    }

    pub fn topics(&self) -> Vec<&str> {
        self.publishes.iter().map(|p| p.topic.as_str()).collect()
    }
}

impl ChannelPort for MockChannel {
    fn begin_connect(&mut self, client_id: &str) -> Result<(), CommsError> {
        self.connect_calls += 1;
        self.client_ids.push(client_id.into());
        match self.mode {
            ConnectMode::Accept => {
                self.connected = true;
                Ok(())
            }
            ConnectMode::Refuse => Err(CommsError::ConnectFailed),
            ConnectMode::Pending => Ok(()),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        if !self.connected {
            return Err(CommsError::ChannelUnavailable);
        }
        self.subscriptions.push(topic.into());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8], retained: bool) -> Result<(), CommsError> {
        if !self.connected {
            return Err(CommsError::ChannelUnavailable);
        }
        if self.failing_topics.contains(topic) {
            return Err(CommsError::PublishFailed);
        }
        let payload = String::from_utf8_lossy(payload).into_owned();
        if retained {
            self.retained.insert(topic.into(), payload.clone());
        }
        self.publishes.push(Publish {
            topic: topic.into(),
            payload,
            retained,
        });
        Ok(())
    }

    fn poll_inbound(&mut self) -> Option<InboundMessage> {
        self.inbound.pop_front()
    }
}

// ── MockClock ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl ClockPort for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn telemetry(&self) -> Vec<luxnode::app::events::TelemetryData> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Telemetry(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockNvs ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockNvs {
    pub stored: std::cell::RefCell<Option<SystemConfig>>,
}

impl ConfigPort for MockNvs {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        Ok(self.stored.borrow().clone().unwrap_or_default())
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self.stored.borrow_mut() = Some(config.clone());
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────

pub const CLIENT_ID: &str = "LUXNODE_TEST0001";

/// Build and start a service against `hw`.
pub fn started_app(
    config: SystemConfig,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
) -> luxnode::app::service::AppService {
    use luxnode::app::ports::ClientId;
    use luxnode::inference::LogisticClassifier;

    let classifier = LogisticClassifier::from_config(&config);
    let mut id = ClientId::new();
    id.push_str(CLIENT_ID).expect("client id fits");
    let mut app = luxnode::app::service::AppService::new(config, classifier, id);
    app.start(hw, sink);
    app
}
