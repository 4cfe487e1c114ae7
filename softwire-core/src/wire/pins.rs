//! Open-drain pin driver
//!
//! "High" is never driven. It is what the line does when every device lets
//! go of it.

use softwire_hal::{DirectionalPin, PinDirection};

/// Bus line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// SCL
    Clock,
    /// SDA
    Data,
}

/// Owner of the clock and data pins
pub struct PinDriver<SCL, SDA> {
    scl: SCL,
    sda: SDA,
}

impl<SCL, SDA> PinDriver<SCL, SDA>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
{
    /// Take ownership of both pins
    pub fn new(scl: SCL, sda: SDA) -> Self {
        Self { scl, sda }
    }

    /// Drive a line low (output, latch low)
    pub fn assert(&mut self, line: Line) {
        match line {
            Line::Clock => self.scl.set_direction(PinDirection::Output),
            Line::Data => self.sda.set_direction(PinDirection::Output),
        }
    }

    /// Release a line (input, pulled up externally)
    pub fn release(&mut self, line: Line) {
        match line {
            Line::Clock => self.scl.set_direction(PinDirection::Input),
            Line::Data => self.sda.set_direction(PinDirection::Input),
        }
    }

    /// Sample a line
    ///
    /// Only meaningful while the line is released; reading an asserted line
    /// just reports our own pull-down.
    pub fn is_high(&mut self, line: Line) -> bool {
        match line {
            Line::Clock => self.scl.is_high(),
            Line::Data => self.sda.is_high(),
        }
    }

    /// Release both lines and give the pins back
    pub fn free(mut self) -> (SCL, SDA) {
        self.release(Line::Data);
        self.release(Line::Clock);
        (self.scl, self.sda)
    }
}
