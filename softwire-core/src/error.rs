//! Bus error types
//!
//! Every failure leaves the bus stopped. The variant says which phase of
//! the transaction went wrong so the caller can decide whether a retry
//! makes sense.

use core::fmt;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

/// I2C transaction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// Target held SCL low for longer than the stretch retry bound
    ClockStretchTimeout,
    /// Nobody acknowledged the address byte (write direction)
    AddressNotAcknowledged,
    /// Target refused the register address byte
    RegisterNotAcknowledged,
    /// Target refused a data byte
    DataNotAcknowledged,
    /// Nobody acknowledged the address byte after the repeated start
    RepeatedAddressNotAcknowledged,
    /// Address does not fit in 7 bits
    InvalidAddress,
}

impl I2cError {
    /// Short tag identifying the failed phase
    pub fn tag(&self) -> &'static str {
        match self {
            I2cError::ClockStretchTimeout => "Clock Stretch Error",
            I2cError::AddressNotAcknowledged => "Adr",
            I2cError::RegisterNotAcknowledged => "Reg",
            I2cError::DataNotAcknowledged => "Cmd",
            I2cError::RepeatedAddressNotAcknowledged => "Adr-R",
            I2cError::InvalidAddress => "Invalid Adr",
        }
    }

    /// Check if this is an acknowledge failure (as opposed to a bus fault)
    pub fn is_nack(&self) -> bool {
        matches!(
            self,
            I2cError::AddressNotAcknowledged
                | I2cError::RegisterNotAcknowledged
                | I2cError::DataNotAcknowledged
                | I2cError::RepeatedAddressNotAcknowledged
        )
    }
}

impl fmt::Display for I2cError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl embedded_hal::i2c::Error for I2cError {
    fn kind(&self) -> ErrorKind {
        match self {
            I2cError::ClockStretchTimeout => ErrorKind::Bus,
            I2cError::AddressNotAcknowledged | I2cError::RepeatedAddressNotAcknowledged => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            I2cError::RegisterNotAcknowledged | I2cError::DataNotAcknowledged => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
            }
            I2cError::InvalidAddress => ErrorKind::Other,
        }
    }
}
