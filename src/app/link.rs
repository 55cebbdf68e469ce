//! Broker connectivity supervisor.
//!
//! ```text
//!   Disconnected ──(interval elapsed)──▶ Connecting ──(session up)──▶ Connected
//!        ▲                                   │                          │
//!        └──────────(attempt refused)────────┘◀──────(session lost)─────┘
//! ```
//!
//! Attempts are rate-limited to one per backoff interval. The interval is
//! fixed at `reconnect_interval_ms` unless `reconnect_backoff_max_ms` is
//! larger, in which case it doubles after each failed attempt up to that
//! cap and resets on success.
//!
//! An attempt in flight is left alone for `connect_timeout_ms`, which is
//! much longer than the retry interval: starting a new attempt tears down
//! the client that is still handshaking.

use log::{info, warn};

use super::ports::ChannelPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Result of one [`LinkSupervisor::maintain`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTransition {
    /// Nothing changed.
    Steady,
    /// The session came up during this pass.
    Established,
    /// The session was lost during this pass.
    Lost,
    /// A connection attempt started but has not completed.
    Attempting,
    /// A connection attempt was refused.
    AttemptFailed,
}

pub struct LinkSupervisor {
    state: LinkState,
    base_interval_ms: u64,
    max_interval_ms: u64,
    interval_ms: u64,
    connect_timeout_ms: u64,
    last_attempt_ms: Option<u64>,
    attempts: u32,
}

impl LinkSupervisor {
    /// `connect_timeout_ms` is raised to at least `interval_ms`.
    pub fn new(interval_ms: u32, max_interval_ms: u32, connect_timeout_ms: u32) -> Self {
        let base = u64::from(interval_ms);
        Self {
            state: LinkState::Disconnected,
            base_interval_ms: base,
            max_interval_ms: u64::from(max_interval_ms).max(base),
            interval_ms: base,
            connect_timeout_ms: u64::from(connect_timeout_ms).max(base),
            last_attempt_ms: None,
            attempts: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Attempts since the last successful connection.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Current spacing between attempts.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Re-evaluate the connection. Called once per loop iteration.
    pub fn maintain(
        &mut self,
        now_ms: u64,
        channel: &mut impl ChannelPort,
        client_id: &str,
    ) -> LinkTransition {
        match self.state {
            LinkState::Connected => {
                if channel.is_connected() {
                    LinkTransition::Steady
                } else {
                    warn!("Link: session lost, will reconnect");
                    self.state = LinkState::Disconnected;
                    LinkTransition::Lost
                }
            }
            LinkState::Connecting => {
                if channel.is_connected() {
                    self.mark_connected()
                } else if self.attempt_expired(now_ms) {
                    warn!("Link: attempt {} timed out", self.attempts);
                    self.state = LinkState::Disconnected;
                    self.grow_backoff();
                    LinkTransition::AttemptFailed
                } else {
                    LinkTransition::Attempting
                }
            }
            LinkState::Disconnected => {
                if channel.is_connected() {
                    // Adapter reconnected on its own.
                    return self.mark_connected();
                }
                if !self.attempt_due(now_ms) {
                    return LinkTransition::Steady;
                }
                self.last_attempt_ms = Some(now_ms);
                self.attempts = self.attempts.saturating_add(1);
                info!("Link: connect attempt {} as '{}'", self.attempts, client_id);
                match channel.begin_connect(client_id) {
                    Ok(()) => {
                        self.state = LinkState::Connecting;
                        self.check_pending(channel)
                    }
                    Err(e) => {
                        warn!("Link: connect attempt failed: {}", e);
                        self.grow_backoff();
                        LinkTransition::AttemptFailed
                    }
                }
            }
        }
    }

    fn check_pending(&mut self, channel: &impl ChannelPort) -> LinkTransition {
        if channel.is_connected() {
            self.mark_connected()
        } else {
            LinkTransition::Attempting
        }
    }

    fn mark_connected(&mut self) -> LinkTransition {
        info!("Link: connected after {} attempt(s)", self.attempts);
        self.state = LinkState::Connected;
        self.attempts = 0;
        self.interval_ms = self.base_interval_ms;
        LinkTransition::Established
    }

    fn attempt_due(&self, now_ms: u64) -> bool {
        self.last_attempt_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.interval_ms)
    }

    fn attempt_expired(&self, now_ms: u64) -> bool {
        self.last_attempt_ms
            .is_some_and(|last| now_ms.saturating_sub(last) >= self.connect_timeout_ms)
    }

    fn grow_backoff(&mut self) {
        self.interval_ms = (self.interval_ms.saturating_mul(2)).min(self.max_interval_ms);
    }
}
