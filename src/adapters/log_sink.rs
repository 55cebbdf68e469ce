//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production, stderr on the host).

use log::{info, warn};

use crate::app::commands::state_payload;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "LDR(raw)={} | EMA={:.1} | x={:.3} | pred={} | conf={}% | LED={} | anomaly={:.4}",
                    t.raw,
                    t.ema,
                    t.x,
                    t.label,
                    t.confidence_pct,
                    state_payload(t.actuator_on),
                    t.anomaly,
                );
                if t.publish_failures > 0 {
                    warn!("{} publish(es) dropped this tick", t.publish_failures);
                }
            }
            AppEvent::TickSkipped(e) => {
                warn!("TICK | skipped: {}", e);
            }
            AppEvent::LinkChanged { from, to } => {
                info!("LINK | {:?} -> {:?}", from, to);
            }
            AppEvent::ActuatorChanged { on } => {
                info!("CMD | LED -> {}", state_payload(*on));
            }
            AppEvent::CommandIgnored => {
                info!("CMD | unrecognised payload ignored");
            }
            AppEvent::Started { actuator_on, seeded } => {
                info!(
                    "START | LED={} | ema_seeded={}",
                    state_payload(*actuator_on),
                    seeded
                );
            }
        }
    }
}
