//! Binary light classifier.
//!
//! [`LogisticClassifier`] is a fixed-parameter stand-in for a trained
//! TinyML model: `p_dark = sigmoid(w·x + b)` over one normalised feature.
//! The control loop depends only on the [`Classifier`] trait.

use core::fmt;

/// Predicted light condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Dark,
    Bright,
}

impl Label {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "DARK",
            Self::Bright => "BRIGHT",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chosen label plus the probability of that label, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub label: Label,
    /// Always in `50..=100` for a two-class model.
    pub confidence_pct: u8,
}

/// Scalar-in, label-out scoring contract.
pub trait Classifier {
    /// Classify a normalised reading `x ∈ [0, 1]`. Callers clamp first.
    fn classify(&self, x: f32) -> Classification;
}

/// Logistic function.
pub fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticClassifier {
    weight: f32,
    bias: f32,
}

impl Default for LogisticClassifier {
    fn default() -> Self {
        Self::new(-10.0, 5.0)
    }
}

impl LogisticClassifier {
    pub fn new(weight: f32, bias: f32) -> Self {
        Self { weight, bias }
    }

    pub fn from_config(config: &crate::config::SystemConfig) -> Self {
        Self::new(config.classifier_weight, config.classifier_bias)
    }

    /// Probability of [`Label::Dark`].
    pub fn p_dark(&self, x: f32) -> f32 {
        sigmoid(self.weight * x + self.bias)
    }
}

impl Classifier for LogisticClassifier {
    fn classify(&self, x: f32) -> Classification {
        let p_dark = self.p_dark(x);
        let (label, p) = if p_dark >= 0.5 {
            (Label::Dark, p_dark)
        } else {
            (Label::Bright, 1.0 - p_dark)
        };
        Classification {
            label,
            confidence_pct: (p * 100.0).round().clamp(0.0, 100.0) as u8,
        }
    }
}
