//! Bus scan
//!
//! Probes every 7-bit address with an empty write and collects the ones
//! that acknowledge. Address 0 (general call) is skipped.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use softwire_hal::DirectionalPin;

use super::{address_byte, SoftI2c};
use crate::config::{check_address, MAX_ADDRESS};
use crate::diag::{Diagnostic, DiagnosticSink};
use crate::error::I2cError;
use crate::wire::Acknowledge;

/// Addresses that answered a scan
pub type DeviceList = Vec<u8, { MAX_ADDRESS as usize }>;

impl<SCL, SDA, D, S> SoftI2c<SCL, SDA, D, S>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
    D: DelayNs,
    S: DiagnosticSink,
{
    /// Probe 1..=127 and report each responder
    ///
    /// Only runs when verbose; a quiet bus returns an empty list without
    /// touching the lines.
    pub fn list_devices(&mut self) -> Result<DeviceList, I2cError> {
        if !self.verbose {
            return Ok(DeviceList::new());
        }

        let devices = self.scan()?;
        for &address in &devices {
            self.report(Diagnostic::DeviceFound(address));
        }
        Ok(devices)
    }

    /// Probe 1..=127 and return the addresses that acknowledge
    pub fn scan(&mut self) -> Result<DeviceList, I2cError> {
        let mut devices = DeviceList::new();
        for address in 1..=MAX_ADDRESS {
            if self.probe(address)? {
                // Capacity covers every probed address
                let _ = devices.push(address);
            }
        }
        Ok(devices)
    }

    /// Address-only write; true if someone acknowledged
    pub fn probe(&mut self, address: u8) -> Result<bool, I2cError> {
        check_address(address)?;
        self.bracket(|bus| {
            bus.start_condition()?;
            let ack = bus.wire.transmit_byte(address_byte(address, false))?;
            Ok(ack == Acknowledge::Ack)
        })
    }
}
