//! A generic driver for the Serial Camera Control Bus on the OV5640 image sensor. The OV5640
//! uses 16-bit register addresses, so every transaction starts with the address high byte.
//! Works with any microcontroller implementing the embedded-hal I2C interface.

use super::error::Error;
use super::regs::Register;
use core::marker::PhantomData;
use embedded_hal::blocking::i2c;
use heapless::{consts, Vec};

/// Largest payload for a single block write, two bytes of the buffer hold the address.
pub const MAX_BLOCK: usize = 254;

/// SCCB driver.
pub struct SCCB<I2C> {
    /// Marker to ensure the same I2C type is used in all calls.
    i2c: PhantomData<I2C>,
    /// Device I2C address.
    address: u8,
}

impl<I2C, E> SCCB<I2C>
where
    I2C: i2c::Read<Error = E> + i2c::Write<Error = E>,
{
    /// Creates a new SCCB driver associated with an I2C peripheral.
    pub fn new(_i2c: &I2C, address: u8) -> Self {
        SCCB {
            i2c: PhantomData,
            address,
        }
    }

    /// I2C read wrapper for mapping `E --> Error`.
    fn i2c_read(&self, i2c: &mut I2C, buf: &mut [u8]) -> Result<(), Error<E>> {
        i2c.read(self.address, buf).map_err(Error::I2cRead)
    }

    /// I2C write wrapper for mapping `E --> Error`.
    fn i2c_write(&self, i2c: &mut I2C, buf: &[u8]) -> Result<(), Error<E>> {
        i2c.write(self.address, buf).map_err(Error::I2cWrite)
    }

    /// Read a register, must be two seperate transactions and we can't use `WriteRead`.
    pub fn read_register(&self, i2c: &mut I2C, reg: u16) -> Result<u8, Error<E>> {
        // Write the address
        self.i2c_write(i2c, &reg.to_be_bytes())?;

        // Read the value
        let mut buf = [0x00];
        self.i2c_read(i2c, &mut buf)?;

        Ok(buf[0])
    }

    /// Write a register.
    pub fn write_register(&self, i2c: &mut I2C, reg: u16, val: u8) -> Result<(), Error<E>> {
        let [hi, lo] = reg.to_be_bytes();
        self.i2c_write(i2c, &[hi, lo, val])
    }

    /// Set or clear the `mask` bits of a register, leaving the others alone.
    pub fn update_bits(
        &self,
        i2c: &mut I2C,
        reg: u16,
        mask: u8,
        enable: bool,
    ) -> Result<(), Error<E>> {
        let val = self.read_register(i2c, reg)?;
        let val = if enable { val | mask } else { val & !mask };
        self.write_register(i2c, reg, val)
    }

    /// Write up to `MAX_BLOCK` bytes to consecutive registers in one transaction.
    pub fn write_block(&self, i2c: &mut I2C, reg: u16, data: &[u8]) -> Result<(), Error<E>> {
        let mut buf: Vec<u8, consts::U256> = Vec::new();
        buf.extend_from_slice(&reg.to_be_bytes())
            .map_err(|_| Error::Unsupported)?;
        buf.extend_from_slice(data).map_err(|_| Error::Unsupported)?;
        self.i2c_write(i2c, &buf)
    }

    /// Apply a register configuration, in order. Stops at the first failed write; registers
    /// written before it keep their new values.
    ///
    /// Readback skips `GROUP_ACCESS`, its end and launch bits are strobes that read back
    /// cleared.
    pub fn apply_config(
        &self,
        i2c: &mut I2C,
        list: &[(u16, u8)],
        do_readback: bool,
    ) -> Result<(), Error<E>> {
        for (reg, val) in list.iter() {
            // Write the register
            self.write_register(i2c, *reg, *val)?;

            // Readback to check the write register worked
            if do_readback && *reg != Register::GROUP_ACCESS {
                let readback = self.read_register(i2c, *reg)?;
                if readback != *val {
                    return Err(Error::RegMismatch((*reg, readback)));
                }
            }
        }

        Ok(())
    }
}
