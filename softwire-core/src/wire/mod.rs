//! Bit-level bus driving
//!
//! Everything below the transaction layer: open-drain line control, pacing,
//! clock-stretch handling, and bit and byte transfer with acknowledgement.
//!
//! The wire has no idea whether a transaction is open. Start and stop
//! sequencing lives in [`crate::bus`].

pub mod bit;
pub mod byte;
pub mod pins;
pub mod stretch;
pub mod timing;

pub use byte::Acknowledge;
pub use pins::{Line, PinDriver};
pub use stretch::MAX_STRETCH_WAITS;
pub use timing::Timing;

use embedded_hal::delay::DelayNs;
use softwire_hal::DirectionalPin;

/// The two bus lines plus the timing that paces them
pub struct Wire<SCL, SDA, D> {
    pins: PinDriver<SCL, SDA>,
    timing: Timing<D>,
}

impl<SCL, SDA, D> Wire<SCL, SDA, D>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
    D: DelayNs,
{
    /// Bundle pins and timing
    pub fn new(pins: PinDriver<SCL, SDA>, timing: Timing<D>) -> Self {
        Self { pins, timing }
    }

    /// Pull a line low
    #[inline]
    pub fn assert(&mut self, line: Line) {
        self.pins.assert(line);
    }

    /// Let a line float high
    #[inline]
    pub fn release(&mut self, line: Line) {
        self.pins.release(line);
    }

    /// Wait one configured half-bit delay
    #[inline]
    pub fn wait(&mut self) {
        self.timing.wait();
    }

    /// Get the timing controller
    pub fn timing(&self) -> &Timing<D> {
        &self.timing
    }

    /// Get the timing controller for reconfiguration
    pub fn timing_mut(&mut self) -> &mut Timing<D> {
        &mut self.timing
    }

    /// Split back into pins and timing
    pub fn free(self) -> (PinDriver<SCL, SDA>, Timing<D>) {
        (self.pins, self.timing)
    }
}
