//! Signal conditioning between the raw sensor and the classifier.

pub mod ema;
