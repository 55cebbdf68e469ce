//! luxnode firmware library.
//!
//! A networked light-sensing node: an LDR is sampled periodically, smoothed,
//! scored and classified, and the results are published over MQTT while a
//! remotely commanded LED mirrors its state back to the broker.
//!
//! Exposes the pure-logic modules for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.
//!
//! ## Features
//!
//! The default feature set is empty so `cargo test` runs on the host
//! without an ESP-IDF toolchain. Device builds must enable `espidf`:
//!
//! ```text
//! cargo build --release --target xtensa-esp32-espidf --features espidf
//! ```

#![deny(unused_must_use)]

#[cfg(all(target_os = "espidf", not(feature = "espidf")))]
compile_error!("building for ESP-IDF requires `--features espidf`");

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod inference;
pub mod pins;

pub mod adapters;
pub mod drivers;
pub mod sensors;
