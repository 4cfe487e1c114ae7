//! Bus pacing
//!
//! Converts a bus frequency into the delay inserted between line
//! transitions. The delay is a blocking busy-wait; yielding mid-bit would
//! let other work stretch the electrical timing unpredictably.

use embedded_hal::delay::DelayNs;
use softwire_hal::I2cConfig;

/// Half-bit delay generator
pub struct Timing<D> {
    delay: D,
    /// Microseconds per wait (0 = don't throttle)
    delay_us: u32,
}

impl<D: DelayNs> Timing<D> {
    /// Create timing for a bus speed
    pub fn new(delay: D, speed: I2cConfig) -> Self {
        Self {
            delay,
            delay_us: speed.half_period_us(),
        }
    }

    /// Set the bus frequency in kHz
    ///
    /// `delay = ceil(1000 / kHz)` µs; zero disables throttling.
    pub fn configure(&mut self, frequency_khz: u32) {
        self.delay_us = I2cConfig::from_khz(frequency_khz).half_period_us();
    }

    /// Current delay per wait in microseconds
    pub fn delay_us(&self) -> u32 {
        self.delay_us
    }

    /// Block for the configured delay
    pub fn wait(&mut self) {
        self.wait_for(self.delay_us);
    }

    /// Block for an explicit number of microseconds
    ///
    /// For phases that need pacing other than the half-bit delay.
    pub fn wait_for(&mut self, micros: u32) {
        self.delay.delay_us(micros);
    }

    /// Give back the delay provider
    pub fn free(self) -> D {
        self.delay
    }
}
