//! On-device inference: streaming signals and the two scoring engines.
//!
//! ```text
//!   BufferSignal ─┐
//!   SampleWindow ─┼──▶ Signal trait ──▶ AnomalyScorer ──▶ AnomalyScore
//!   Synthetic    ─┘
//!
//!   normalised x ──▶ Classifier trait ──▶ Classification { label, confidence }
//! ```
//!
//! Both engines are stateless: they borrow their input for one call and
//! return an immutable result. The control loop only sees the
//! [`Classifier`](classifier::Classifier) trait, so the logistic stub can be
//! replaced by a trained model without touching it.

pub mod anomaly;
pub mod classifier;
pub mod signal;
pub mod window;

pub use anomaly::{AnomalyScore, AnomalyScorer};
pub use classifier::{Classification, Classifier, Label, LogisticClassifier};
pub use signal::{BufferSignal, Signal, SyntheticSignal};
pub use window::SampleWindow;

/// Output of any scoring call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreResult {
    Anomaly(AnomalyScore),
    Classification(Classification),
}

impl From<AnomalyScore> for ScoreResult {
    fn from(s: AnomalyScore) -> Self {
        Self::Anomaly(s)
    }
}

impl From<Classification> for ScoreResult {
    fn from(c: Classification) -> Self {
        Self::Classification(c)
    }
}
