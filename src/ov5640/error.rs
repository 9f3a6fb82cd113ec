//! Errors for the register bus side of the driver.

use super::regs::Unsupported;

/// Driver errors, generic over the I2C error `E`.
#[derive(Debug, Eq, PartialEq)]
pub enum Error<E> {
    /// I2C write error (no acknowledgment or bus timeout).
    I2cWrite(E),
    /// I2C read error (no acknowledgment or bus timeout).
    I2cRead(E),
    /// Chip ID mismatch, holds the value read.
    ChipId(u16),
    /// The requested setting has no register encoding. Nothing was written.
    Unsupported,
    /// Register write-readback mismatch.
    RegMismatch((u16, u8)),
    /// The autofocus MCU did not answer in time.
    Timeout,
}

impl<E> From<Unsupported> for Error<E> {
    fn from(_: Unsupported) -> Self {
        Error::Unsupported
    }
}
