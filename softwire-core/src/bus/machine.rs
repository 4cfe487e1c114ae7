//! Start/stop sequencing
//!
//! The bus is either idle or inside a transaction. A START opens one, a
//! STOP closes it, and a START while open is a repeated start. A STOP
//! always leaves the bus idle, even when it fails, because it is what every
//! error path uses to recover.

use embedded_hal::delay::DelayNs;
use softwire_hal::DirectionalPin;

use super::SoftI2c;
use crate::diag::DiagnosticSink;
use crate::error::I2cError;
use crate::wire::Line;

/// Bus states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    /// No transaction open
    Idle,
    /// Between a START and its STOP
    Active,
}

impl<SCL, SDA, D, S> SoftI2c<SCL, SDA, D, S>
where
    SCL: DirectionalPin,
    SDA: DirectionalPin,
    D: DelayNs,
    S: DiagnosticSink,
{
    /// Current bus state
    pub fn state(&self) -> BusState {
        self.state
    }

    /// Check if a transaction is open
    pub fn is_active(&self) -> bool {
        self.state == BusState::Active
    }

    /// START: SDA falls while SCL is high
    ///
    /// While active, first bring both lines back up so the falling SDA is
    /// seen as a repeated start. A stretch timeout there leaves the state
    /// untouched for the caller to clean up.
    pub(crate) fn start_condition(&mut self) -> Result<(), I2cError> {
        if self.state == BusState::Active {
            self.wire.release(Line::Data);
            self.wire.wait();
            self.wire.release(Line::Clock);
            self.wire.await_clock_release()?;
            self.wire.wait();
        }

        self.wire.assert(Line::Data);
        self.wire.wait();
        self.wire.assert(Line::Clock);
        self.wire.wait();

        self.state = BusState::Active;
        Ok(())
    }

    /// STOP: SDA rises while SCL is high
    pub(crate) fn stop_condition(&mut self) -> Result<(), I2cError> {
        self.wire.assert(Line::Data);
        self.wire.wait();
        self.wire.release(Line::Clock);

        if let Err(error) = self.wire.await_clock_release() {
            self.state = BusState::Idle;
            return Err(error);
        }
        self.wire.wait();

        self.wire.release(Line::Data);
        self.wire.wait();

        self.state = BusState::Idle;
        Ok(())
    }
}
