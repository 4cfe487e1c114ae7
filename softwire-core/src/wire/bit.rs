//! Single bit transfer
//!
//! One bit cell: set up SDA while SCL is low, release SCL, let the target
//! stretch, hold, then pull SCL low again. Data is sampled only while SCL
//! is high.

use embedded_hal::delay::DelayNs;
use softwire_hal::DirectionalPin;

use super::{Line, Wire};
use crate::error::I2cError;

impl<SCL, SDA, D> Wire<SCL, SDA, D>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
    D: DelayNs,
{
    /// Clock one bit out
    ///
    /// On a stretch timeout SCL is left released.
    pub fn transmit_bit(&mut self, bit: bool) -> Result<(), I2cError> {
        if bit {
            self.release(Line::Data);
        } else {
            self.assert(Line::Data);
        }

        self.wait();
        self.release(Line::Clock);
        self.wait();

        self.await_clock_release()?;
        self.wait();

        self.assert(Line::Clock);
        Ok(())
    }

    /// Clock one bit in
    ///
    /// Order matters: release SDA, release SCL, resolve stretching, wait,
    /// sample SDA, then pull SCL low.
    pub fn receive_bit(&mut self) -> Result<bool, I2cError> {
        // Let the target drive the data line
        self.release(Line::Data);
        self.wait();

        self.release(Line::Clock);
        self.await_clock_release()?;
        self.wait();

        let bit = self.pins.is_high(Line::Data);

        self.assert(Line::Clock);
        Ok(bit)
    }
}
