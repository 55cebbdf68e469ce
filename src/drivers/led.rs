//! Indicator LED driver.
//!
//! Generic over any [`OutputPin`] so the same driver runs against the real
//! GPIO ([`GpioOutput`]) or a test double.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`GpioOutput`] writes the pin level via hw_init.
//! On host/test: [`GpioOutput`] only remembers the level.

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

use crate::drivers::hw_init;
use crate::error::ActuatorError;

impl embedded_hal::digital::Error for ActuatorError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A push-pull GPIO output configured by [`hw_init::init_peripherals`].
pub struct GpioOutput {
    pin: i32,
    high: bool,
}

impl GpioOutput {
    pub fn new(pin: i32) -> Self {
        Self { pin, high: false }
    }

    /// Last level written.
    pub fn is_set_high(&self) -> bool {
        self.high
    }
}

impl ErrorType for GpioOutput {
    type Error = ActuatorError;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, false)?;
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, true)?;
        self.high = true;
        Ok(())
    }
}

/// Active-high LED.
pub struct LedDriver<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> LedDriver<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let res = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.on = on;
        Ok(())
    }

    /// Last state successfully written.
    pub fn is_on(&self) -> bool {
        self.on
    }
}
