//! LDR (photoresistor) light sensor driver.
//!
//! The LDR sits in a voltage divider on an ADC1 input; brighter light
//! gives a higher reading. One blocking 12-bit conversion per call.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the ADC1 oneshot channel configured by hw_init.
//! On host/test: reads from a static `AtomicU16` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::drivers::hw_init;
use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
static SIM_LDR_ADC: AtomicU16 = AtomicU16::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_LDR_FAIL: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_ldr_adc(raw: u16) {
    SIM_LDR_ADC.store(raw, Ordering::Relaxed);
}

/// Make subsequent simulated reads fail with [`SensorError::AdcReadFailed`].
#[cfg(not(target_os = "espidf"))]
pub fn sim_fail_reads(fail: bool) {
    SIM_LDR_FAIL.store(fail, Ordering::Relaxed);
}

pub struct LdrSensor {
    channel: u32,
    adc_max: u16,
    total_reads: u32,
}

impl LdrSensor {
    pub fn new(channel: u32, adc_max: u16) -> Self {
        Self {
            channel,
            adc_max,
            total_reads: 0,
        }
    }

    /// Take one raw sample in `0..=adc_max`.
    pub fn read(&mut self) -> Result<u16, SensorError> {
        let raw = self.read_adc()?;
        if raw > self.adc_max {
            return Err(SensorError::OutOfRange);
        }
        self.total_reads = self.total_reads.wrapping_add(1);
        Ok(raw)
    }

    pub fn total_reads(&self) -> u32 {
        self.total_reads
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(self.channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        // Keep the hw_init sim path exercised even though the value is injected.
        hw_init::adc1_read(self.channel)?;
        if SIM_LDR_FAIL.load(Ordering::Relaxed) {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(SIM_LDR_ADC.load(Ordering::Relaxed))
    }
}
