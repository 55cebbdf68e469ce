//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the light-sensing node:
//! the sampling tick, command handling, and broker link supervision.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod link;
pub mod ports;
pub mod runner;
pub mod service;
