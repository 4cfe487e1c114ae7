//! RP2040 support for the softwire I2C engine
//!
//! Provides RP2040 implementations of the `softwire-hal` traits:
//!
//! - Open-drain bus lines on any GPIO (`gpio::FlexLine`)
//! - Pin allocation by number for config-driven setup (`pins`)
//!
//! Pacing uses [`embassy_time::Delay`], which busy-waits on the time
//! driver and implements the blocking `DelayNs` trait.

#![no_std]

pub mod gpio;
pub mod pins;

pub use embassy_time::Delay;
pub use gpio::FlexLine;
pub use pins::{PinBank, PinError};
