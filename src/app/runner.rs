//! Cooperative main loop driver.
//!
//! [`run`] repeatedly polls an [`AppService`] against the current clock
//! until its [`CancelToken`] fires. The `idle` hook runs between
//! iterations: a short FreeRTOS delay on target, a no-op or a simulated
//! clock advance in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::inference::Classifier;

use super::ports::{ActuatorPort, ChannelPort, ClockPort, EventSink, SensorPort};
use super::service::AppService;

/// Shared stop flag for the main loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Drive the service until cancelled. Returns the iteration count.
pub fn run<C: Classifier>(
    app: &mut AppService<C>,
    hw: &mut (impl SensorPort + ActuatorPort),
    channel: &mut impl ChannelPort,
    clock: &impl ClockPort,
    sink: &mut impl EventSink,
    cancel: &CancelToken,
    mut idle: impl FnMut(),
) -> u64 {
    let mut iterations = 0u64;
    while !cancel.is_cancelled() {
        app.poll(clock.now_ms(), hw, channel, sink);
        iterations += 1;
        idle();
    }
    log::info!("Main loop stopped after {} iterations", iterations);
    iterations
}
