//! Bus handle
//!
//! [`SoftI2c`] owns one physical bus: both lines, the pacing, the target
//! address and the start/stop state. All operations take `&mut self` and
//! run to completion, so one handle can never interleave two
//! transactions.
//!
//! # Usage
//!
//! ```ignore
//! let config = BusConfig::new(0x48).with_speed(I2cConfig::STANDARD);
//! let mut i2c = SoftI2c::new(scl, sda, delay, config)?;
//!
//! i2c.write_register(0x01, 0x60)?;
//! let temp = i2c.read_data(0x00, 2)?;
//! ```

pub mod hal_impl;
pub mod machine;
pub mod scan;
pub mod transaction;

pub use machine::BusState;
pub use scan::DeviceList;

use embedded_hal::delay::DelayNs;
use softwire_hal::DirectionalPin;

use crate::config::{check_address, BusConfig};
use crate::diag::{Diagnostic, DiagnosticSink, NoopSink};
use crate::error::I2cError;
use crate::wire::{Acknowledge, PinDriver, Timing, Wire};

/// Address byte on the wire: 7-bit address plus R/W bit
#[inline]
pub(crate) fn address_byte(address: u8, read: bool) -> u8 {
    (address << 1) | read as u8
}

/// Bit-banged I2C bus
pub struct SoftI2c<SCL, SDA, D, S = NoopSink> {
    wire: Wire<SCL, SDA, D>,
    /// 7-bit target address for the register operations
    address: u8,
    state: BusState,
    verbose: bool,
    sink: S,
}

impl<SCL, SDA, D> SoftI2c<SCL, SDA, D, NoopSink>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
    D: DelayNs,
{
    /// Create a bus without diagnostics output
    ///
    /// The bus is forced to a stopped state before this returns.
    pub fn new(scl: SCL, sda: SDA, delay: D, config: BusConfig) -> Result<Self, I2cError> {
        Self::with_sink(scl, sda, delay, config, NoopSink)
    }
}

impl<SCL, SDA, D, S> SoftI2c<SCL, SDA, D, S>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
    D: DelayNs,
    S: DiagnosticSink,
{
    /// Create a bus reporting to `sink` when verbose
    ///
    /// The bus is forced to a stopped state before this returns.
    pub fn with_sink(
        scl: SCL,
        sda: SDA,
        delay: D,
        config: BusConfig,
        sink: S,
    ) -> Result<Self, I2cError> {
        config.validate()?;

        let mut bus = Self {
            wire: Wire::new(PinDriver::new(scl, sda), Timing::new(delay, config.speed())),
            address: config.address,
            state: BusState::Idle,
            verbose: config.verbose,
            sink,
        };
        bus.reset();
        Ok(bus)
    }

    /// Drive a stop regardless of what the lines were doing
    pub fn reset(&mut self) {
        if let Err(error) = self.stop_condition() {
            self.report_fault(error);
        }
    }

    /// Set the bus frequency in kHz (0 = unthrottled)
    ///
    /// Only changes the half-bit delay; the clock-stretch bound stays at
    /// the same number of waits.
    pub fn set_speed(&mut self, frequency_khz: u32) {
        self.wire.timing_mut().configure(frequency_khz);
    }

    /// Current half-bit delay in microseconds
    pub fn delay_us(&self) -> u32 {
        self.wire.timing().delay_us()
    }

    /// Change the target address
    pub fn set_address(&mut self, address: u8) -> Result<(), I2cError> {
        check_address(address)?;
        self.address = address;
        Ok(())
    }

    /// Current target address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Enable or disable diagnostics
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if diagnostics are enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Get the diagnostic sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get the diagnostic sink mutably
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Send a START (or repeated START while a transaction is open)
    ///
    /// Low-level access for protocols the register helpers don't cover.
    /// Pair every start with [`stop`](Self::stop).
    pub fn start(&mut self) -> Result<(), I2cError> {
        self.start_condition().map_err(|error| self.abort(error))
    }

    /// Send a STOP
    pub fn stop(&mut self) -> Result<(), I2cError> {
        self.stop_condition().map_err(|error| {
            self.report_fault(error);
            error
        })
    }

    /// Send a raw byte inside an open transaction
    ///
    /// A not-acknowledge is returned, not treated as an error.
    pub fn transmit_byte(&mut self, value: u8) -> Result<Acknowledge, I2cError> {
        self.wire
            .transmit_byte(value)
            .map_err(|error| self.abort(error))
    }

    /// Receive a raw byte inside an open transaction
    pub fn receive_byte(&mut self, mode: Acknowledge) -> Result<u8, I2cError> {
        self.wire
            .receive_byte(mode)
            .map_err(|error| self.abort(error))
    }

    /// Release both lines and hand back the hardware
    pub fn release(self) -> (SCL, SDA, D, S) {
        let (pins, timing) = self.wire.free();
        let (scl, sda) = pins.free();
        (scl, sda, timing.free(), self.sink)
    }

    /// Force the bus idle and report `error`
    fn abort(&mut self, error: I2cError) -> I2cError {
        // Stop always ends idle; if the clock is still stuck the first
        // error is the one worth returning
        let _ = self.stop_condition();
        self.report_fault(error);
        error
    }

    fn report_fault(&mut self, error: I2cError) {
        self.report(Diagnostic::Fault(error));
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if self.verbose {
            self.sink.report(diagnostic);
        }
    }
}
