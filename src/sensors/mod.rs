//! Sensor drivers.
//!
//! The node has a single analog light sensor; see [`ldr`].

pub mod ldr;

pub use ldr::LdrSensor;
