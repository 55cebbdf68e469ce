//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the smoothing filter, the scoring engines, the
//! broker link supervisor and the actuator state. All I/O flows through
//! port traits injected at call sites, making the whole loop testable with
//! mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ ChannelPort (publish)
//!                 │        AppService         │
//! ActuatorPort ◀──│  EMA · Classifier · Link  │ ◀── ChannelPort (commands)
//!                 └──────────────────────────┘ ──▶ EventSink
//! ```
//!
//! One call to [`AppService::poll`] is one iteration of the cooperative
//! loop: link maintenance, then inbound command dispatch, then the
//! time-gated sampling tick. Commands are therefore always applied before
//! the same iteration's actuator telemetry is computed.

use core::fmt::Write;

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::control::ema::EmaFilter;
use crate::inference::{AnomalyScorer, Classifier, LogisticClassifier, SampleWindow};

use super::commands::{ActuatorCommand, state_payload};
use super::events::{AppEvent, TelemetryData};
use super::link::{LinkState, LinkSupervisor, LinkTransition};
use super::ports::{
    ActuatorPort, ChannelPort, ClientId, EventSink, InboundMessage, SensorPort,
};

/// Upper bound on inbound messages handled per iteration (inbox depth).
pub const MAX_DISPATCH_PER_POLL: usize = 8;

/// Running publish counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishStats {
    pub published: u32,
    pub failed: u32,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService<C = LogisticClassifier> {
    config: SystemConfig,
    classifier: C,
    scorer: AnomalyScorer,
    ema: EmaFilter,
    window: SampleWindow,
    link: LinkSupervisor,
    client_id: ClientId,
    /// Single source of truth for the actuator. Written only by commands.
    actuator_on: bool,
    last_sample_ms: Option<u64>,
    tick_count: u64,
    stats: PublishStats,
}

impl<C: Classifier> AppService<C> {
    /// Construct the service. Call [`start`](Self::start) before polling.
    pub fn new(config: SystemConfig, classifier: C, client_id: ClientId) -> Self {
        let scorer = AnomalyScorer::new(config.anomaly_normalization);
        let ema = EmaFilter::unseeded(config.ema_alpha);
        let window = SampleWindow::new(usize::from(config.anomaly_window));
        let link = LinkSupervisor::new(
            config.reconnect_interval_ms,
            config.reconnect_backoff_max_ms,
            config.connect_timeout_ms,
        );
        Self {
            config,
            classifier,
            scorer,
            ema,
            window,
            link,
            client_id,
            actuator_on: false,
            last_sample_ms: None,
            tick_count: 0,
            stats: PublishStats::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the actuator to its initial (off) state and seed the EMA
    /// from a first real reading.
    pub fn start(&mut self, hw: &mut (impl SensorPort + ActuatorPort), sink: &mut impl EventSink) {
        if let Err(e) = hw.set_actuator(self.actuator_on) {
            warn!("Initial actuator write failed: {}", e);
        }
        match hw.read_light() {
            Ok(raw) => self.ema.seed(f32::from(raw)),
            Err(e) => warn!("EMA seed read failed ({}), seeding from first tick", e),
        }
        sink.emit(&AppEvent::Started {
            actuator_on: self.actuator_on,
            seeded: self.ema.is_seeded(),
        });
        info!("AppService started as '{}'", self.client_id);
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one loop iteration at time `now_ms`.
    pub fn poll(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        channel: &mut impl ChannelPort,
        sink: &mut impl EventSink,
    ) {
        self.maintain_link(now_ms, channel, sink);
        self.dispatch_inbound(hw, channel, sink);
        if self.sample_due(now_ms) {
            self.last_sample_ms = Some(now_ms);
            self.sample_tick(hw, channel, sink);
        }
    }

    /// Connectivity maintenance. On (re)connect, subscribe to the command
    /// topic and republish the held actuator state retained.
    pub fn maintain_link(
        &mut self,
        now_ms: u64,
        channel: &mut impl ChannelPort,
        sink: &mut impl EventSink,
    ) {
        let from = self.link.state();
        let transition = self.link.maintain(now_ms, channel, &self.client_id);
        let to = self.link.state();
        if from != to {
            sink.emit(&AppEvent::LinkChanged { from, to });
        }

        if transition == LinkTransition::Established {
            if let Err(e) = channel.subscribe(&self.config.topics.command) {
                warn!("Subscribe to '{}' failed: {}", self.config.topics.command, e);
            }
            publish(
                &mut self.stats,
                channel,
                &self.config.topics.actuator,
                state_payload(self.actuator_on).as_bytes(),
                true,
            );
        }
    }

    /// Handle the messages currently buffered by the channel.
    pub fn dispatch_inbound(
        &mut self,
        hw: &mut impl ActuatorPort,
        channel: &mut impl ChannelPort,
        sink: &mut impl EventSink,
    ) {
        for _ in 0..MAX_DISPATCH_PER_POLL {
            let Some(msg) = channel.poll_inbound() else {
                break;
            };
            self.handle_message(&msg, hw, channel, sink);
        }
    }

    /// Route one inbound message. Only the command topic is acted on.
    pub fn handle_message(
        &mut self,
        msg: &InboundMessage,
        hw: &mut impl ActuatorPort,
        channel: &mut impl ChannelPort,
        sink: &mut impl EventSink,
    ) {
        if msg.topic != self.config.topics.command {
            debug!("Ignoring message on '{}'", msg.topic);
            return;
        }
        match ActuatorCommand::parse(&msg.payload) {
            Some(cmd) => self.apply_command(cmd, hw, channel, sink),
            None => {
                debug!("Unrecognised command payload ({} bytes)", msg.payload.len());
                sink.emit(&AppEvent::CommandIgnored);
            }
        }
    }

    /// Apply a remote actuator command and publish the new state at once.
    pub fn apply_command(
        &mut self,
        cmd: ActuatorCommand,
        hw: &mut impl ActuatorPort,
        channel: &mut impl ChannelPort,
        sink: &mut impl EventSink,
    ) {
        self.actuator_on = cmd.target_state();
        if let Err(e) = hw.set_actuator(self.actuator_on) {
            warn!("Actuator write failed: {}", e);
        }
        publish(
            &mut self.stats,
            channel,
            &self.config.topics.actuator,
            state_payload(self.actuator_on).as_bytes(),
            true,
        );
        sink.emit(&AppEvent::ActuatorChanged {
            on: self.actuator_on,
        });
    }

    /// Whether the sampling period has elapsed.
    pub fn sample_due(&self, now_ms: u64) -> bool {
        self.last_sample_ms.is_none_or(|last| {
            now_ms.saturating_sub(last) >= u64::from(self.config.publish_period_ms)
        })
    }

    /// Sample → smooth → score → classify → publish.
    ///
    /// A sensor or scoring failure abandons the tick before anything is
    /// published; the actuator is never touched here.
    pub fn sample_tick(
        &mut self,
        hw: &mut impl SensorPort,
        channel: &mut impl ChannelPort,
        sink: &mut impl EventSink,
    ) -> Option<TelemetryData> {
        self.tick_count += 1;

        let raw = match hw.read_light() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Tick {}: sensor read failed: {}", self.tick_count, e);
                sink.emit(&AppEvent::TickSkipped(e.into()));
                return None;
            }
        };

        let ema = self.ema.update(f32::from(raw));
        self.window.push(f32::from(raw));

        let anomaly = match self.scorer.score(&self.window) {
            Ok(score) => score.value(),
            Err(e) => {
                warn!("Tick {}: anomaly scoring failed: {}", self.tick_count, e);
                sink.emit(&AppEvent::TickSkipped(e.into()));
                return None;
            }
        };

        let x = (ema / f32::from(self.config.adc_max)).clamp(0.0, 1.0);
        let prediction = self.classifier.classify(x);

        let failed_before = self.stats.failed;
        let topics = &self.config.topics;

        let mut buf: heapless::String<16> = heapless::String::new();
        let _ = write!(buf, "{}", raw);
        publish(&mut self.stats, channel, &topics.raw, buf.as_bytes(), false);

        publish(
            &mut self.stats,
            channel,
            &topics.label,
            prediction.label.as_str().as_bytes(),
            false,
        );

        buf.clear();
        let _ = write!(buf, "{}", prediction.confidence_pct);
        publish(&mut self.stats, channel, &topics.confidence, buf.as_bytes(), false);

        publish(
            &mut self.stats,
            channel,
            &topics.actuator,
            state_payload(self.actuator_on).as_bytes(),
            true,
        );

        if let Some(topic) = &topics.anomaly {
            buf.clear();
            let _ = write!(buf, "{:.4}", anomaly);
            publish(&mut self.stats, channel, topic, buf.as_bytes(), false);
        }

        let telemetry = TelemetryData {
            raw,
            ema,
            x,
            label: prediction.label,
            confidence_pct: prediction.confidence_pct,
            anomaly,
            actuator_on: self.actuator_on,
            publish_failures: self.stats.failed.saturating_sub(failed_before) as u8,
        };
        sink.emit(&AppEvent::Telemetry(telemetry));
        Some(telemetry)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn actuator_on(&self) -> bool {
        self.actuator_on
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Current smoothed reading (`None` until seeded).
    pub fn ema(&self) -> Option<f32> {
        self.ema.value()
    }

    /// Sampling ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn stats(&self) -> PublishStats {
        self.stats
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}

/// Fire-and-forget publish. Failures are counted and logged, never retried;
/// the next periodic publish carries the current state anyway.
fn publish(
    stats: &mut PublishStats,
    channel: &mut impl ChannelPort,
    topic: &str,
    payload: &[u8],
    retained: bool,
) {
    match channel.publish(topic, payload, retained) {
        Ok(()) => stats.published = stats.published.wrapping_add(1),
        Err(e) => {
            stats.failed = stats.failed.wrapping_add(1);
            debug!("Publish to '{}' skipped: {}", topic, e);
        }
    }
}
