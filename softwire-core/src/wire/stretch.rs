//! Clock stretching
//!
//! A slow target may keep SCL low after we release it. We poll the line and
//! give up after a fixed number of half-bit delays. This is the only
//! timeout in the engine.

use embedded_hal::delay::DelayNs;
use softwire_hal::DirectionalPin;

use super::{Line, Wire};
use crate::error::I2cError;

/// Waits allowed for a target to release SCL
pub const MAX_STRETCH_WAITS: u8 = 10;

impl<SCL, SDA, D> Wire<SCL, SDA, D>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
    D: DelayNs,
{
    /// Wait for a released SCL to actually go high
    ///
    /// Must only be called right after releasing the clock. Returns as soon
    /// as the line reads high, without any further delay. Forcing the bus
    /// back to a stopped state on failure is up to the caller.
    pub fn await_clock_release(&mut self) -> Result<(), I2cError> {
        let mut waits: u8 = 0;

        while !self.pins.is_high(Line::Clock) {
            self.timing.wait();
            waits += 1;

            if waits == MAX_STRETCH_WAITS {
                return Err(I2cError::ClockStretchTimeout);
            }
        }

        Ok(())
    }
}
