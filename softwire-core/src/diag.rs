//! Diagnostic reporting
//!
//! The engine never prints. When verbosity is enabled it hands
//! [`Diagnostic`] values to an injected [`DiagnosticSink`]; what happens to
//! them (RTT, UART, a test buffer) is the application's business.

use core::fmt;

use crate::error::I2cError;

/// Something worth telling the user about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic {
    /// A transaction was aborted
    Fault(I2cError),
    /// A device acknowledged its address during a scan (7-bit)
    DeviceFound(u8),
}

impl Diagnostic {
    /// Short tag for the message
    pub fn tag(&self) -> &'static str {
        match self {
            Diagnostic::Fault(error) => error.tag(),
            Diagnostic::DeviceFound(_) => "Device resp",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Fault(error) => write!(f, "{}", error),
            Diagnostic::DeviceFound(address) => write!(f, "Device resp: 0x{:02X}", address),
        }
    }
}

/// Receiver for diagnostics
pub trait DiagnosticSink {
    /// Deliver one diagnostic
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Buffer diagnostics in memory; extra entries past capacity are dropped
impl<const N: usize> DiagnosticSink for heapless::Vec<Diagnostic, N> {
    fn report(&mut self, diagnostic: Diagnostic) {
        let _ = self.push(diagnostic);
    }
}

/// Sink that logs through defmt
#[cfg(feature = "defmt")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefmtSink;

#[cfg(feature = "defmt")]
impl DiagnosticSink for DefmtSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::Fault(error) => defmt::warn!("i2c: {}", error.tag()),
            Diagnostic::DeviceFound(address) => defmt::info!("Device resp: {=u8:#x}", address),
        }
    }
}
