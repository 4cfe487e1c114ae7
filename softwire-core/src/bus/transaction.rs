//! Register-level transactions
//!
//! Each operation opens and closes its own transaction. Reads from a
//! register use a repeated start between the write phase (address +
//! register) and the read phase.
//!
//! On any failure the bus is stopped, the failed phase is reported to the
//! diagnostic sink (when verbose) and returned. Nothing is retried.
//!
//! # Multi-byte values
//!
//! [`write_data`](SoftI2c::write_data) streams the value least-significant
//! byte first. [`read_data`](SoftI2c::read_data) shifts each received byte
//! in from the right, so the first byte on the wire ends up most
//! significant. The two are deliberately not mirror images: they match
//! devices that take little-endian writes and report big-endian registers.

use embedded_hal::delay::DelayNs;
use softwire_hal::DirectionalPin;

use super::{address_byte, SoftI2c};
use crate::diag::DiagnosticSink;
use crate::error::I2cError;
use crate::wire::Acknowledge;

/// Largest value handled by `write_data` / `read_data`, in bytes
pub const MAX_DATA_BYTES: u8 = 4;

impl<SCL, SDA, D, S> SoftI2c<SCL, SDA, D, S>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
    D: DelayNs,
    S: DiagnosticSink,
{
    /// Write a single byte (command) to the device
    pub fn write_byte(&mut self, data: u8) -> Result<(), I2cError> {
        let address = self.address;
        self.bracket(|bus| bus.write_phase(address, None, &[data]))
    }

    /// Write one byte to a register
    pub fn write_register(&mut self, register: u8, data: u8) -> Result<(), I2cError> {
        self.write_array(register, &[data])
    }

    /// Read one byte from a register
    pub fn read_register(&mut self, register: u8) -> Result<u8, I2cError> {
        let mut buf = [0u8; 1];
        self.read_array(register, &mut buf)?;
        Ok(buf[0])
    }

    /// Write consecutive bytes starting at a register
    pub fn write_array(&mut self, register: u8, data: &[u8]) -> Result<(), I2cError> {
        let address = self.address;
        self.bracket(|bus| bus.write_phase(address, Some(register), data))
    }

    /// Read consecutive bytes starting at a register
    ///
    /// Every byte but the last is acknowledged. An empty buffer does
    /// nothing.
    pub fn read_array(&mut self, register: u8, buf: &mut [u8]) -> Result<(), I2cError> {
        if buf.is_empty() {
            return Ok(());
        }

        let address = self.address;
        self.bracket(|bus| {
            bus.write_phase(address, Some(register), &[])?;
            bus.read_phase(address, buf, I2cError::RepeatedAddressNotAcknowledged)
        })
    }

    /// Write the low `byte_count` bytes of `value`, least significant first
    ///
    /// `byte_count` is clamped to 4.
    pub fn write_data(&mut self, register: u8, value: u32, byte_count: u8) -> Result<(), I2cError> {
        let count = byte_count.min(MAX_DATA_BYTES) as usize;
        let bytes = value.to_le_bytes();
        self.write_array(register, &bytes[..count])
    }

    /// Read `byte_count` bytes into an integer, first byte most significant
    ///
    /// `byte_count` is clamped to 4; zero reads nothing and returns 0.
    pub fn read_data(&mut self, register: u8, byte_count: u8) -> Result<u32, I2cError> {
        let count = byte_count.min(MAX_DATA_BYTES) as usize;
        let mut bytes = [0u8; MAX_DATA_BYTES as usize];
        self.read_array(register, &mut bytes[..count])?;

        Ok(bytes[..count]
            .iter()
            .fold(0u32, |acc, &byte| (acc << 8) | byte as u32))
    }

    /// Run `body` inside START ... STOP
    ///
    /// Errors from `body` abort the transaction.
    pub(crate) fn bracket<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, I2cError>,
    ) -> Result<T, I2cError> {
        match body(self) {
            Ok(value) => {
                self.stop()?;
                Ok(value)
            }
            Err(error) => Err(self.abort(error)),
        }
    }

    /// Send one byte, mapping a not-acknowledge to `on_nack`
    pub(crate) fn send(&mut self, byte: u8, on_nack: I2cError) -> Result<(), I2cError> {
        match self.wire.transmit_byte(byte)? {
            Acknowledge::Ack => Ok(()),
            Acknowledge::Nack => Err(on_nack),
        }
    }

    /// START, address for writing, optional register, then data
    pub(crate) fn write_phase(
        &mut self,
        address: u8,
        register: Option<u8>,
        data: &[u8],
    ) -> Result<(), I2cError> {
        self.start_condition()?;
        self.send(address_byte(address, false), I2cError::AddressNotAcknowledged)?;

        if let Some(register) = register {
            self.send(register, I2cError::RegisterNotAcknowledged)?;
        }

        for &byte in data {
            self.send(byte, I2cError::DataNotAcknowledged)?;
        }
        Ok(())
    }

    /// (Repeated) START, address for reading, then fill `buf`
    pub(crate) fn read_phase(
        &mut self,
        address: u8,
        buf: &mut [u8],
        on_nack: I2cError,
    ) -> Result<(), I2cError> {
        self.start_condition()?;
        self.send(address_byte(address, true), on_nack)?;
        self.receive_into(buf, true)
    }

    /// Fill `buf`, acknowledging each byte
    ///
    /// With `end_of_read` the last byte is not-acknowledged so the target
    /// lets go of SDA.
    pub(crate) fn receive_into(&mut self, buf: &mut [u8], end_of_read: bool) -> Result<(), I2cError> {
        let last = buf.len().saturating_sub(1);
        for (i, byte) in buf.iter_mut().enumerate() {
            let mode = if end_of_read && i == last {
                Acknowledge::Nack
            } else {
                Acknowledge::Ack
            };
            *byte = self.wire.receive_byte(mode)?;
        }
        Ok(())
    }
}
