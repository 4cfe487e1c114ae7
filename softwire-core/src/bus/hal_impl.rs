//! Generic bus trait implementations
//!
//! Lets the engine stand in for a hardware peripheral: anything written
//! against [`softwire_hal::I2cBus`] or [`embedded_hal::i2c::I2c`] can drive
//! a bit-banged bus. These calls take the target address per call and
//! leave the configured register-operation address alone.
//!
//! Operation placement follows embedded-hal: one START before the first
//! operation, a repeated START whenever the direction changes, and the
//! last byte of each run of reads is not-acknowledged.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorType, I2c, Operation};
use softwire_hal::{DirectionalPin, I2cBus};

use super::{address_byte, SoftI2c};
use crate::config::check_address;
use crate::diag::DiagnosticSink;
use crate::error::I2cError;

fn is_empty_read(op: &Operation<'_>) -> bool {
    matches!(op, Operation::Read(buf) if buf.is_empty())
}

impl<SCL, SDA, D, S> ErrorType for SoftI2c<SCL, SDA, D, S> {
    type Error = I2cError;
}

impl<SCL, SDA, D, S> I2c for SoftI2c<SCL, SDA, D, S>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
    D: DelayNs,
    S: DiagnosticSink,
{
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        check_address(address)?;

        // Empty reads put nothing on the wire; skip them entirely
        if operations.iter().all(is_empty_read) {
            return Ok(());
        }

        self.bracket(|bus| {
            // Direction of the current address phase (true = read)
            let mut reading: Option<bool> = None;

            for i in 0..operations.len() {
                if is_empty_read(&operations[i]) {
                    continue;
                }

                let is_read = matches!(operations[i], Operation::Read(_));
                if reading != Some(is_read) {
                    let on_nack = match reading {
                        None => I2cError::AddressNotAcknowledged,
                        Some(_) => I2cError::RepeatedAddressNotAcknowledged,
                    };
                    bus.start_condition()?;
                    bus.send(address_byte(address, is_read), on_nack)?;
                    reading = Some(is_read);
                }

                let read_continues = operations[i + 1..]
                    .iter()
                    .find(|op| !is_empty_read(op))
                    .is_some_and(|op| matches!(op, Operation::Read(_)));

                match &mut operations[i] {
                    Operation::Read(buf) => bus.receive_into(buf, !read_continues)?,
                    Operation::Write(bytes) => {
                        for &byte in bytes.iter() {
                            bus.send(byte, I2cError::DataNotAcknowledged)?;
                        }
                    }
                }
            }
            Ok(())
        })
    }
}

impl<SCL, SDA, D, S> I2cBus for SoftI2c<SCL, SDA, D, S>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
    D: DelayNs,
    S: DiagnosticSink,
{
    type Error = I2cError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        I2c::transaction(self, address, &mut [Operation::Write(data)])
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        I2c::transaction(self, address, &mut [Operation::Read(buf)])
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        I2c::transaction(
            self,
            address,
            &mut [Operation::Write(write_data), Operation::Read(read_buf)],
        )
    }
}
