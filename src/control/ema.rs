//! Exponential moving average filter for the raw LDR reading.
//!
//! `ema ← (1-α)·ema + α·raw`, evaluated as `ema + α·(raw - ema)` so a
//! constant input leaves the state bit-exact. The filter is seeded with
//! the first real reading; a zero seed would drag early classifications
//! toward DARK.

pub struct EmaFilter {
    alpha: f32,
    value: Option<f32>,
}

impl EmaFilter {
    /// Create a filter seeded with `seed`.
    pub fn new(alpha: f32, seed: f32) -> Self {
        Self {
            alpha,
            value: Some(seed),
        }
    }

    /// Create a filter that seeds itself from its first update.
    pub fn unseeded(alpha: f32) -> Self {
        Self { alpha, value: None }
    }

    /// Seed (or re-seed) the filter state.
    pub fn seed(&mut self, value: f32) {
        self.value = Some(value);
    }

    pub fn is_seeded(&self) -> bool {
        self.value.is_some()
    }

    /// Feed one raw sample and return the smoothed value.
    pub fn update(&mut self, raw: f32) -> f32 {
        let next = match self.value {
            Some(ema) => ema + self.alpha * (raw - ema),
            None => raw,
        };
        self.value = Some(next);
        next
    }

    /// Current smoothed value (`None` until seeded).
    pub fn value(&self) -> Option<f32> {
        self.value
    }
}
