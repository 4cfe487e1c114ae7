//! Open-drain bus lines on RP2040 GPIOs
//!
//! The RP2040 pads have no open-drain mode, so each line is a `Flex` pin
//! whose output latch stays low. Switching the pad to output pulls the
//! line down; switching it back to input lets the pull-up take it high.

use embassy_rp::gpio::{AnyPin, Flex, Pull};
use embassy_rp::Peri;
use softwire_hal::{DirectionalPin, PinDirection};

/// One I2C line on a GPIO
pub struct FlexLine<'d> {
    pin: Flex<'d>,
}

impl<'d> FlexLine<'d> {
    /// Take a GPIO as a released bus line
    ///
    /// Use `Pull::Up` when the board has no external pull-up resistors.
    /// The internal pull-ups are weak, so keep the bus slow in that case.
    pub fn new(pin: Peri<'d, AnyPin>, pull: Pull) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_pull(pull);
        pin.set_low();
        pin.set_as_input();
        Self { pin }
    }
}

impl DirectionalPin for FlexLine<'_> {
    fn set_direction(&mut self, direction: PinDirection) {
        match direction {
            PinDirection::Output => {
                // Re-latch low in case something else touched the pad
                self.pin.set_low();
                self.pin.set_as_output();
            }
            PinDirection::Input => self.pin.set_as_input(),
        }
    }

    fn is_high(&mut self) -> bool {
        self.pin.is_high()
    }
}
