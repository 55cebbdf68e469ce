//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`LdrSensor`] and the indicator [`LedDriver`], exposing them
//! through [`SensorPort`] and [`ActuatorPort`]. On non-espidf targets the
//! underlying drivers use cfg-gated simulation stubs.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::led::LedDriver;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::LdrSensor;

pub struct HardwareAdapter<P> {
    ldr: LdrSensor,
    led: LedDriver<P>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(ldr: LdrSensor, led: LedDriver<P>) -> Self {
        Self { ldr, led }
    }

    /// Physical LED state (last successful write).
    pub fn led_is_on(&self) -> bool {
        self.led.is_on()
    }
}

impl<P: OutputPin> SensorPort for HardwareAdapter<P> {
    fn read_light(&mut self) -> Result<u16, SensorError> {
        self.ldr.read()
    }
}

impl<P: OutputPin> ActuatorPort for HardwareAdapter<P> {
    fn set_actuator(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.led.set(on)
    }
}
