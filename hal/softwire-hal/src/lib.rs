//! softwire Hardware Abstraction Layer
//!
//! This crate defines the small hardware surface the bit-banged I2C engine
//! needs, so the same engine runs on any chip that can switch a GPIO between
//! input and output.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (softwire-firmware, etc.)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  softwire-core (protocol engine)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  softwire-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ softwire-hal- │       │  OpenDrain    │
//! │    rp2040     │       │ (embedded-hal)│
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::DirectionalPin`] - Open-drain line control by pin direction
//! - [`i2c::I2cBus`] - I2C bus operations

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use gpio::{DirectionalPin, OpenDrain, PinDirection};
pub use i2c::{I2cBus, I2cConfig};
