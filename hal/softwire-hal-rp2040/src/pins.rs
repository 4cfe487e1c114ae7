//! Pin allocation by number
//!
//! Bus lines come from a config file, so the firmware needs to pick GPIOs
//! at runtime instead of naming `PIN_4` in code.

use embassy_rp::gpio::{AnyPin, Pull};
use embassy_rp::Peri;

use crate::gpio::FlexLine;

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Build a [`PinBank`] from every GPIO in the peripherals struct
///
/// Usage:
/// ```ignore
/// let p = embassy_rp::init(Default::default());
/// let mut bank = pin_bank!(p);
/// let scl = bank.take_line(4, Pull::Up)?;
/// ```
#[macro_export]
macro_rules! pin_bank {
    ($p:expr) => {
        $crate::pins::PinBank::new([
            $p.PIN_0.into(),
            $p.PIN_1.into(),
            $p.PIN_2.into(),
            $p.PIN_3.into(),
            $p.PIN_4.into(),
            $p.PIN_5.into(),
            $p.PIN_6.into(),
            $p.PIN_7.into(),
            $p.PIN_8.into(),
            $p.PIN_9.into(),
            $p.PIN_10.into(),
            $p.PIN_11.into(),
            $p.PIN_12.into(),
            $p.PIN_13.into(),
            $p.PIN_14.into(),
            $p.PIN_15.into(),
            $p.PIN_16.into(),
            $p.PIN_17.into(),
            $p.PIN_18.into(),
            $p.PIN_19.into(),
            $p.PIN_20.into(),
            $p.PIN_21.into(),
            $p.PIN_22.into(),
            $p.PIN_23.into(),
            $p.PIN_24.into(),
            $p.PIN_25.into(),
            $p.PIN_26.into(),
            $p.PIN_27.into(),
            $p.PIN_28.into(),
            $p.PIN_29.into(),
        ])
    };
}

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
}

/// Every GPIO, handed out by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Create a bank owning the given pins, indexed by GPIO number
    pub fn new(pins: [Peri<'static, AnyPin>; GPIO_COUNT]) -> Self {
        Self {
            pins: pins.map(Some),
        }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin)?
            .take()
            .ok_or(PinError::AlreadyTaken)
    }

    /// Take a pin by number as a released bus line
    pub fn take_line(&mut self, pin_num: u8, pull: Pull) -> Result<FlexLine<'static>, PinError> {
        self.take(pin_num).map(|pin| FlexLine::new(pin, pull))
    }
}
