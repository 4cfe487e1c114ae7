//! I2C bus abstractions
//!
//! Provides the controller-side I2C trait and the bus speed settings shared
//! by every implementation.

/// I2C bus controller
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// I2C bus speed
///
/// A bit-banged bus has no clock divider; the frequency only sets how long
/// the engine waits between line transitions. Zero means "don't wait at
/// all", which is as fast as the CPU can toggle the pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in kHz (0 = unthrottled)
    pub frequency_khz: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::UNTHROTTLED
    }
}

impl I2cConfig {
    /// No delay between transitions
    pub const UNTHROTTLED: Self = Self { frequency_khz: 0 };

    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency_khz: 100 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency_khz: 400 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency_khz: 1_000,
    };

    /// Create a config for an arbitrary frequency
    pub const fn from_khz(frequency_khz: u32) -> Self {
        Self { frequency_khz }
    }

    /// Delay between line transitions in microseconds
    ///
    /// `ceil(1000 / kHz)`, so the bus never runs faster than requested.
    pub const fn half_period_us(&self) -> u32 {
        if self.frequency_khz == 0 {
            0
        } else {
            1_000u32.div_ceil(self.frequency_khz)
        }
    }
}
