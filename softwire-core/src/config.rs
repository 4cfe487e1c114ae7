//! Bus configuration
//!
//! Everything a [`SoftI2c`](crate::SoftI2c) needs besides the pins and the
//! delay provider.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use softwire_hal::I2cConfig;

use crate::error::I2cError;

/// Highest valid 7-bit address
pub const MAX_ADDRESS: u8 = 0x7F;

/// Per-bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// 7-bit target address used by the register operations
    pub address: u8,
    /// Bus frequency in kHz (0 = unthrottled)
    pub frequency_khz: u32,
    /// Emit diagnostics to the sink
    pub verbose: bool,
}

impl BusConfig {
    /// Create a config for a target address, unthrottled and quiet
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            frequency_khz: 0,
            verbose: false,
        }
    }

    /// Set the bus speed
    pub const fn with_speed(mut self, speed: I2cConfig) -> Self {
        self.frequency_khz = speed.frequency_khz;
        self
    }

    /// Enable or disable diagnostics
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Bus speed as an [`I2cConfig`]
    pub const fn speed(&self) -> I2cConfig {
        I2cConfig::from_khz(self.frequency_khz)
    }

    /// Check the address fits in 7 bits
    pub fn validate(&self) -> Result<(), I2cError> {
        check_address(self.address)
    }
}

/// Reject addresses that need more than 7 bits
pub(crate) fn check_address(address: u8) -> Result<(), I2cError> {
    if address > MAX_ADDRESS {
        return Err(I2cError::InvalidAddress);
    }
    Ok(())
}
