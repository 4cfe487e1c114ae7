//! GPIO pin abstractions
//!
//! I2C lines are wired-AND: any device may pull a line low, nobody drives it
//! high. A plain push-pull GPIO emulates this by switching direction:
//!
//! - **Output** with the output latch at logic-low pulls the line down
//! - **Input** lets the external pull-up (or a remote device) set the level
//!
//! [`DirectionalPin`] is the only capability the bit-banged engine needs
//! from a chip. Implement it in a chip HAL, or wrap an embedded-hal
//! open-drain pin in [`OpenDrain`].

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinDirection {
    /// High impedance; the line floats to whatever the bus says
    Input,
    /// Actively driving logic-low
    Output,
}

/// GPIO pin that can switch between input and output-low
///
/// Implementations must guarantee that [`PinDirection::Output`] always
/// drives logic-low. There is deliberately no way to drive a line high.
pub trait DirectionalPin {
    /// Set the pin direction
    fn set_direction(&mut self, direction: PinDirection);

    /// Check if the line reads high (logic 1)
    ///
    /// Only meaningful while the pin is an input.
    fn is_high(&mut self) -> bool;

    /// Check if the line reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

/// Adapter for embedded-hal pins already configured as open-drain outputs
///
/// Most chip HALs offer an open-drain output mode whose `set_high` releases
/// the line and whose input buffer stays connected. For those pins a
/// direction switch maps directly onto the output level:
///
/// - `Output` → `set_low()`
/// - `Input` → `set_high()` (released)
///
/// Only pins with an `Infallible` error type are accepted, since the bit
/// engine has no way to recover from a GPIO that fails mid-bit.
pub struct OpenDrain<P> {
    pin: P,
}

impl<P> OpenDrain<P>
where
    P: InputPin + OutputPin + ErrorType<Error = Infallible>,
{
    /// Wrap an open-drain pin and release the line
    pub fn new(pin: P) -> Self {
        let mut line = Self { pin };
        line.set_direction(PinDirection::Input);
        line
    }

    /// Give back the wrapped pin
    pub fn free(self) -> P {
        self.pin
    }
}

impl<P> DirectionalPin for OpenDrain<P>
where
    P: InputPin + OutputPin + ErrorType<Error = Infallible>,
{
    fn set_direction(&mut self, direction: PinDirection) {
        let result = match direction {
            PinDirection::Output => self.pin.set_low(),
            PinDirection::Input => self.pin.set_high(),
        };
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn is_high(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(level) => level,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock open-drain pin: low if we drive it or somebody else does
    struct MockOpenDrainPin {
        driven_low: bool,
        external_low: bool,
    }

    impl MockOpenDrainPin {
        fn new() -> Self {
            Self {
                driven_low: true,
                external_low: false,
            }
        }
    }

    impl ErrorType for MockOpenDrainPin {
        type Error = Infallible;
    }

    impl OutputPin for MockOpenDrainPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.driven_low = true;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.driven_low = false;
            Ok(())
        }
    }

    impl InputPin for MockOpenDrainPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!(self.driven_low || self.external_low))
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(self.driven_low || self.external_low)
        }
    }

    #[test]
    fn test_new_releases_line() {
        let mut line = OpenDrain::new(MockOpenDrainPin::new());
        assert!(line.is_high());
        assert!(!line.free().driven_low);
    }

    #[test]
    fn test_output_drives_low() {
        let mut line = OpenDrain::new(MockOpenDrainPin::new());

        line.set_direction(PinDirection::Output);
        assert!(line.is_low());

        line.set_direction(PinDirection::Input);
        assert!(line.is_high());
    }

    #[test]
    fn test_released_line_follows_remote_device() {
        let mut pin = MockOpenDrainPin::new();
        pin.external_low = true;
        let mut line = OpenDrain::new(pin);

        // Released, but the remote device holds it down
        line.set_direction(PinDirection::Input);
        assert!(line.is_low());
    }

    #[test]
    fn test_default_is_low() {
        struct Fixed(bool);

        impl DirectionalPin for Fixed {
            fn set_direction(&mut self, _direction: PinDirection) {}

            fn is_high(&mut self) -> bool {
                self.0
            }
        }

        assert!(Fixed(false).is_low());
        assert!(!Fixed(true).is_low());
    }
}
