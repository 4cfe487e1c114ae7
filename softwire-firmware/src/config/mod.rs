//! Firmware configuration
//!
//! Loaded from the `bus.toml` compiled into the image. Uses a small
//! no_std parser; build.rs has already rejected malformed files.

pub mod toml;

pub use toml::parse_config;

use embassy_rp::gpio::Pull;
use softwire_core::wire::MAX_STRETCH_WAITS;
use softwire_core::BusConfig;
use softwire_hal::I2cConfig;

/// A bus line's GPIO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO number
    pub pin: u8,
    /// Enable the internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Pad pull setting for this line
    pub fn pull(&self) -> Pull {
        if self.pull_up {
            Pull::Up
        } else {
            Pull::None
        }
    }
}

/// Periodic register read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Register to read
    pub register: u8,
    /// Bytes per read (0-4)
    pub bytes: u8,
    /// Time between reads
    pub interval_ms: u32,
}

/// Everything in bus.toml
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareConfig {
    pub scl: PinConfig,
    pub sda: PinConfig,
    pub bus: BusConfig,
    pub scan_on_boot: bool,
    pub poll: PollConfig,
}

impl FirmwareConfig {
    /// Longest a single clock release may be stretched before giving up
    pub fn stretch_budget_us(&self) -> u32 {
        self.bus.speed().half_period_us() * MAX_STRETCH_WAITS as u32
    }
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            scl: PinConfig {
                pin: 4,
                pull_up: true,
            },
            sda: PinConfig {
                pin: 5,
                pull_up: true,
            },
            bus: BusConfig::new(0x48).with_speed(I2cConfig::STANDARD),
            scan_on_boot: true,
            poll: PollConfig {
                register: 0x00,
                bytes: 2,
                interval_ms: 1000,
            },
        }
    }
}
