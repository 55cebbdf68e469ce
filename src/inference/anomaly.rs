//! Variance-based anomaly scorer.
//!
//! Two full passes over the signal through the pull interface: the first
//! computes the mean, the second the population variance. The variance is
//! squashed into `[0, 1]` with `var / (var + K)`, so sensor noise scores
//! near zero and large excursions saturate toward one.

use super::signal::Signal;
use crate::error::ScoreError;

/// Default normalisation constant `K`.
pub const DEFAULT_NORMALIZATION: f32 = 50_000.0;

/// Samples pulled per `read` call.
const CHUNK: usize = 16;

/// Normalised anomaly score in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AnomalyScore(f32);

impl AnomalyScore {
    pub fn value(self) -> f32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnomalyScorer {
    normalization: f32,
}

impl Default for AnomalyScorer {
    fn default() -> Self {
        Self::new(DEFAULT_NORMALIZATION)
    }
}

impl AnomalyScorer {
    /// `normalization` must be finite and positive; [`score`](Self::score)
    /// refuses to run otherwise.
    pub fn new(normalization: f32) -> Self {
        Self { normalization }
    }

    /// Score `signal`. Deterministic and side-effect free.
    pub fn score(&self, signal: &impl Signal) -> Result<AnomalyScore, ScoreError> {
        // K <= 0 makes a flat signal 0/0.
        if !(self.normalization.is_finite() && self.normalization > 0.0) {
            return Err(ScoreError::InvalidNormalization);
        }
        let n = signal.total_length();
        if n == 0 {
            return Err(ScoreError::EmptySignal);
        }

        // f64 accumulators keep squared f32 extremes finite.
        let mut sum = 0.0f64;
        for_each_sample(signal, |x| sum += f64::from(x))?;
        let mean = sum / n as f64;

        let mut sq = 0.0f64;
        for_each_sample(signal, |x| {
            let d = f64::from(x) - mean;
            sq += d * d;
        })?;
        let variance = sq / n as f64;

        if !variance.is_finite() {
            return Err(ScoreError::NonFinite);
        }
        let score = variance / (variance + f64::from(self.normalization));
        Ok(AnomalyScore(score.clamp(0.0, 1.0) as f32))
    }
}

/// Pull the whole signal in chunks, feeding every sample to `f`.
fn for_each_sample(signal: &impl Signal, mut f: impl FnMut(f32)) -> Result<(), ScoreError> {
    let n = signal.total_length();
    let mut buf = [0.0f32; CHUNK];
    let mut offset = 0;
    while offset < n {
        let len = CHUNK.min(n - offset);
        signal.read(offset, &mut buf[..len])?;
        buf[..len].iter().copied().for_each(&mut f);
        offset += len;
    }
    Ok(())
}
