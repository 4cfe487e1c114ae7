//! Byte transfer with acknowledgement
//!
//! Eight data bits, most significant first, followed by a ninth bit going
//! the other way. A low ninth bit means "acknowledged".

use embedded_hal::delay::DelayNs;
use softwire_hal::DirectionalPin;

use super::Wire;
use crate::error::I2cError;

/// Acknowledge bit
///
/// Note the polarity: `Ack` is logic 0 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Acknowledge {
    /// Byte accepted / send me another one (SDA low)
    Ack = 0,
    /// Byte refused / end of read (SDA high)
    Nack = 1,
}

impl Acknowledge {
    /// Decode a sampled ninth bit
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Acknowledge::Nack
        } else {
            Acknowledge::Ack
        }
    }

    /// Level to put on SDA
    pub fn bit(self) -> bool {
        matches!(self, Acknowledge::Nack)
    }

    /// Check for acknowledgement
    pub fn is_ack(self) -> bool {
        self == Acknowledge::Ack
    }
}

impl<SCL, SDA, D> Wire<SCL, SDA, D>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
    D: DelayNs,
{
    /// Send a byte and return the target's acknowledge bit
    pub fn transmit_byte(&mut self, value: u8) -> Result<Acknowledge, I2cError> {
        for shift in (0..8).rev() {
            self.transmit_bit((value >> shift) & 1 != 0)?;
        }

        let ack = self.receive_bit()?;
        Ok(Acknowledge::from_bit(ack))
    }

    /// Receive a byte and answer with `mode`
    ///
    /// `Ack` asks the target for another byte; `Nack` ends the read.
    pub fn receive_byte(&mut self, mode: Acknowledge) -> Result<u8, I2cError> {
        let mut value: u8 = 0;
        for _ in 0..8 {
            value = (value << 1) | self.receive_bit()? as u8;
        }

        self.transmit_bit(mode.bit())?;
        Ok(value)
    }
}
