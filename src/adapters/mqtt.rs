//! MQTT channel adapter.
//!
//! Implements [`ChannelPort`] over the ESP-IDF MQTT client. The client's
//! event callback runs on the MQTT task; it never touches domain state.
//! It only flips the shared `connected` flag and pushes received messages
//! into a bounded `embassy-sync` inbox that the control loop drains.
//!
//! ```text
//! ┌──────────────┐ InboundMessage ┌──────────────┐
//! │  MQTT task   │───────────────▶│ Control loop │
//! │  (callback)  │   inbox (8)    │ poll_inbound │
//! └──────────────┘                └──────────────┘
//! ```
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`.
//! - **all other targets**: an in-memory broker simulation with a retained
//!   store, publish log, fault injection and inbound injection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};

use crate::app::ports::{ChannelPort, InboundMessage};
use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};

/// Inbound messages buffered between callback and control loop.
pub const INBOX_DEPTH: usize = 8;

type Inbox = Channel<CriticalSectionRawMutex, InboundMessage, INBOX_DEPTH>;

/// Queue a received message. Oversized or overflowing messages are dropped.
fn enqueue(inbox: &Inbox, topic: &str, payload: &[u8]) -> bool {
    let msg = match InboundMessage::new(topic, payload) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("MQTT: dropping message on '{}': {}", topic, e);
            return false;
        }
    };
    if inbox.try_send(msg).is_err() {
        warn!("MQTT: inbox full, dropping message on '{}'", topic);
        return false;
    }
    true
}

pub struct MqttAdapter {
    url: String,
    inbox: Arc<Inbox>,
    connected: Arc<AtomicBool>,
    #[cfg(target_os = "espidf")]
    client: Option<EspMqttClient<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimBroker,
}

impl MqttAdapter {
    /// `url` is `mqtt://host:port`. No connection is made until
    /// [`ChannelPort::begin_connect`].
    pub fn new(url: &str) -> Self {
        Self {
            url: url.into(),
            inbox: Arc::new(Channel::new()),
            connected: Arc::new(AtomicBool::new(false)),
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            sim: SimBroker::default(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF client
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl ChannelPort for MqttAdapter {
    fn begin_connect(&mut self, client_id: &str) -> Result<(), CommsError> {
        // Only reached after a lost session or an expired attempt; the old
        // client is torn down before a fresh one starts.
        self.client = None;
        self.connected.store(false, Ordering::Release);

        let conf = MqttClientConfiguration {
            client_id: Some(client_id),
            ..Default::default()
        };
        let connected = Arc::clone(&self.connected);
        let inbox = Arc::clone(&self.inbox);
        let client = EspMqttClient::new_cb(&self.url, &conf, move |event| {
            match event.payload() {
                EventPayload::Connected(_) => connected.store(true, Ordering::Release),
                EventPayload::Disconnected => connected.store(false, Ordering::Release),
                EventPayload::Received {
                    topic: Some(topic),
                    data,
                    ..
                } => {
                    enqueue(&inbox, topic, data);
                }
                EventPayload::Error(e) => warn!("MQTT: client error: {:?}", e),
                _ => {}
            }
        })
        .map_err(|e| {
            warn!("MQTT: client start failed: {}", e);
            CommsError::ConnectFailed
        })?;

        info!("MQTT: connecting to {} as '{}'", self.url, client_id);
        self.client = Some(client);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        if !self.is_connected() {
            return Err(CommsError::ChannelUnavailable);
        }
        let client = self.client.as_mut().ok_or(CommsError::ChannelUnavailable)?;
        client
            .subscribe(topic, QoS::AtMostOnce)
            .map_err(|_| CommsError::SubscribeFailed)?;
        info!("MQTT: subscribed to '{}'", topic);
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8], retained: bool) -> Result<(), CommsError> {
        if !self.is_connected() {
            return Err(CommsError::ChannelUnavailable);
        }
        let client = self.client.as_mut().ok_or(CommsError::ChannelUnavailable)?;
        client
            .publish(topic, QoS::AtMostOnce, retained, payload)
            .map_err(|_| CommsError::PublishFailed)?;
        Ok(())
    }

    fn poll_inbound(&mut self) -> Option<InboundMessage> {
        self.inbox.try_receive().ok()
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

/// A publish recorded by the simulated broker.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub retained: bool,
}

#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
struct SimBroker {
    refuse_connect: bool,
    fail_publishes: usize,
    connects: u32,
    subscriptions: Vec<String>,
    retained: std::collections::HashMap<String, Vec<u8>>,
    published: Vec<PublishedMessage>,
}

#[cfg(not(target_os = "espidf"))]
impl ChannelPort for MqttAdapter {
    fn begin_connect(&mut self, client_id: &str) -> Result<(), CommsError> {
        self.sim.connects += 1;
        if self.sim.refuse_connect {
            return Err(CommsError::ConnectFailed);
        }
        info!("MQTT(sim): '{}' connected to {}", client_id, self.url);
        self.connected.store(true, Ordering::Release);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        if !self.is_connected() {
            return Err(CommsError::ChannelUnavailable);
        }
        if !self.sim.subscriptions.iter().any(|t| t == topic) {
            self.sim.subscriptions.push(topic.into());
        }
        // Broker delivers the retained message for a new subscription.
        if let Some(payload) = self.sim.retained.get(topic) {
            enqueue(&self.inbox, topic, payload);
        }
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8], retained: bool) -> Result<(), CommsError> {
        if !self.is_connected() {
            return Err(CommsError::ChannelUnavailable);
        }
        if self.sim.fail_publishes > 0 {
            self.sim.fail_publishes -= 1;
            return Err(CommsError::PublishFailed);
        }
        if retained {
            self.sim.retained.insert(topic.into(), payload.to_vec());
        }
        self.sim.published.push(PublishedMessage {
            topic: topic.into(),
            payload: payload.to_vec(),
            retained,
        });
        Ok(())
    }

    fn poll_inbound(&mut self) -> Option<InboundMessage> {
        self.inbox.try_receive().ok()
    }
}

#[cfg(not(target_os = "espidf"))]
impl MqttAdapter {
    /// Deliver a message from another client. Only subscribed topics
    /// reach the inbox; returns whether it was queued.
    pub fn sim_inject(&mut self, topic: &str, payload: &[u8]) -> bool {
        if !self.is_connected() || !self.sim.subscriptions.iter().any(|t| t == topic) {
            return false;
        }
        enqueue(&self.inbox, topic, payload)
    }

    /// Drop the session as if the broker went away (clean session).
    pub fn sim_drop_connection(&mut self) {
        self.connected.store(false, Ordering::Release);
        self.sim.subscriptions.clear();
    }

    pub fn sim_refuse_connect(&mut self, refuse: bool) {
        self.sim.refuse_connect = refuse;
    }

    /// Fail the next `n` publishes with [`CommsError::PublishFailed`].
    pub fn sim_fail_next_publishes(&mut self, n: usize) {
        self.sim.fail_publishes = n;
    }

    pub fn sim_connects(&self) -> u32 {
        self.sim.connects
    }

    pub fn sim_published(&self) -> &[PublishedMessage] {
        &self.sim.published
    }

    pub fn sim_clear_published(&mut self) {
        self.sim.published.clear();
    }

    pub fn sim_retained(&self, topic: &str) -> Option<&[u8]> {
        self.sim.retained.get(topic).map(Vec::as_slice)
    }

    pub fn sim_is_subscribed(&self, topic: &str) -> bool {
        self.sim.subscriptions.iter().any(|t| t == topic)
    }
}
