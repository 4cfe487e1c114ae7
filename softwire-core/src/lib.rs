//! Bit-banged I2C controller engine
//!
//! Drives an I2C bus from two ordinary GPIO lines. Nothing in here depends
//! on a particular chip:
//!
//! - Open-drain emulation and clock stretching (`wire`)
//! - Bit and byte transfer with acknowledge handling
//! - Start / repeated start / stop sequencing
//! - Register-level transactions and bus scanning (`bus`)
//! - Diagnostics routed to an injected sink
//!
//! Pins only need to implement [`softwire_hal::DirectionalPin`]; pacing
//! comes from any blocking [`embedded_hal::delay::DelayNs`].

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod config;
pub mod diag;
pub mod error;
pub mod wire;

#[cfg(test)]
mod sim;

pub use bus::{BusState, DeviceList, SoftI2c};
pub use config::BusConfig;
#[cfg(feature = "defmt")]
pub use diag::DefmtSink;
pub use diag::{Diagnostic, DiagnosticSink, NoopSink};
pub use error::I2cError;
pub use wire::{Acknowledge, Line};
