//! Fuzz target: `AnomalyScorer::score`
//!
//! Interprets the input as little-endian f32 samples (NaN and infinities
//! included). Scoring must never panic and any score must lie in [0, 1].
//!
//! cargo fuzz run fuzz_anomaly_score

#![no_main]

use libfuzzer_sys::fuzz_target;
use luxnode::inference::{AnomalyScorer, BufferSignal};

fuzz_target!(|data: &[u8]| {
    let samples: Vec<f32> = data
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let Ok(signal) = BufferSignal::from_buffer(&samples) else {
        assert!(samples.is_empty());
        return;
    };
    if let Ok(score) = AnomalyScorer::default().score(&signal) {
        assert!((0.0..=1.0).contains(&score.value()));
    }
});
