//! GPIO / peripheral pin assignments for the luxnode board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1)
// ---------------------------------------------------------------------------

/// LDR light sensor in a voltage divider.
/// ADC1 channel 6 (GPIO 34 on ESP32, input-only pin).
pub const LDR_ADC_GPIO: i32 = 34;
/// ADC1 channel index wired to [`LDR_ADC_GPIO`].
pub const LDR_ADC_CHANNEL: u32 = 6;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Indicator LED (on-board LED on most DevKit boards). Active HIGH.
pub const LED_GPIO: i32 = 2;
