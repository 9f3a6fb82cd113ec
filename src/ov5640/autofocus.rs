//! Autofocus through the sensor's embedded MCU.
//!
//! The MCU firmware is not stored on the sensor. It is uploaded to `AF_FIRMWARE` after every
//! reset, then driven with commands written to `AF_CMD_MAIN` and acknowledged through
//! `AF_CMD_ACK`.

use super::error::Error;
use super::regs::Register;
use super::sccb::MAX_BLOCK;
use super::Ov5640;
use embedded_hal::blocking::{delay::DelayMs, i2c};

#[cfg(feature = "rttdebug")]
use rtt_target::rprintln;

/// Firmware status once the MCU has booted and is waiting for commands.
pub const AF_STATUS_IDLE: u8 = 0x70;

/// Status polls after uploading firmware, `AF_POLL_MS` apart.
const STATUS_POLLS: u16 = 100;
/// Acknowledge polls for a single command, `AF_POLL_MS` apart.
const ACK_POLLS: u16 = 1000;
const AF_POLL_MS: u16 = 10;

// MCU commands
const CMD_TRIGGER: u8 = 0x03;
const CMD_RELEASE: u8 = 0x08;
const CMD_SET_STEP: u8 = 0x1A;
const CMD_GET_STEP: u8 = 0x1B;

/// Clears the command registers and starts the MCU once the firmware is in place.
const START_MCU: &[(u16, u8)] = &[
    (Register::AF_CMD_MAIN, 0x00),
    (Register::AF_CMD_ACK, 0x00),
    (Register::AF_CMD_PARA0, 0x00),
    (0x3025, 0x00),
    (0x3026, 0x00),
    (Register::AF_CMD_PARA3, 0x00),
    (Register::AF_CMD_PARA4, 0x00),
    (Register::AF_FW_STATUS, 0x7F),
    (Register::SYSTEM_RESET00, 0x00),
];

impl<I2C, P, E> Ov5640<I2C, P>
where
    I2C: i2c::Read<Error = E> + i2c::Write<Error = E>,
{
    /// Upload the autofocus firmware and wait for the MCU to come up.
    pub fn autofocus_init<D: DelayMs<u16>>(
        &mut self,
        firmware: &[u8],
        delay: &mut D,
    ) -> Result<(), Error<E>> {
        if firmware.is_empty() || firmware.len() > 0x8000 {
            return Err(Error::Unsupported);
        }

        // Hold the MCU in reset during the upload
        self.sccb
            .write_register(&mut self.i2c, Register::SYSTEM_RESET00, 0x20)?;
        delay.delay_ms(AF_POLL_MS);

        for (index, chunk) in firmware.chunks(MAX_BLOCK).enumerate() {
            let reg = Register::AF_FIRMWARE + (index * MAX_BLOCK) as u16;
            self.sccb.write_block(&mut self.i2c, reg, chunk)?;
        }

        self.sccb.apply_config(&mut self.i2c, START_MCU, false)?;

        for _ in 0..STATUS_POLLS {
            if self.autofocus_status()? == AF_STATUS_IDLE {
                #[cfg(feature = "rttdebug")]
                rprintln!("OV5640 autofocus firmware running");

                return Ok(());
            }
            delay.delay_ms(AF_POLL_MS);
        }

        Err(Error::Timeout)
    }

    /// Raw firmware status register.
    pub fn autofocus_status(&mut self) -> Result<u8, Error<E>> {
        self.sccb
            .read_register(&mut self.i2c, Register::AF_FW_STATUS)
    }

    /// Issue an MCU command and wait for it to be acknowledged.
    fn af_command<D: DelayMs<u16>>(&mut self, cmd: u8, delay: &mut D) -> Result<(), Error<E>> {
        self.sccb
            .write_register(&mut self.i2c, Register::AF_CMD_ACK, 0x01)?;
        self.sccb
            .write_register(&mut self.i2c, Register::AF_CMD_MAIN, cmd)?;

        for _ in 0..ACK_POLLS {
            if self
                .sccb
                .read_register(&mut self.i2c, Register::AF_CMD_ACK)?
                == 0x00
            {
                return Ok(());
            }
            delay.delay_ms(AF_POLL_MS);
        }

        #[cfg(feature = "rttdebug")]
        rprintln!("OV5640 autofocus command 0x{:02X} not acknowledged", cmd);

        Err(Error::Timeout)
    }

    /// Run a single focus cycle. Returns the focus state of the five zones, nonzero when
    /// the zone is in focus.
    pub fn autofocus<D: DelayMs<u16>>(&mut self, delay: &mut D) -> Result<[u8; 5], Error<E>> {
        self.af_command(CMD_RELEASE, delay)?;
        self.af_command(CMD_TRIGGER, delay)?;

        let mut zones = [0u8; 5];
        for (offset, zone) in zones.iter_mut().enumerate() {
            *zone = self
                .sccb
                .read_register(&mut self.i2c, Register::AF_CMD_PARA0 + offset as u16)?;
        }
        Ok(zones)
    }

    /// Current voice coil motor position.
    pub fn vcm_step<D: DelayMs<u16>>(&mut self, delay: &mut D) -> Result<u8, Error<E>> {
        self.af_command(CMD_GET_STEP, delay)?;
        self.sccb
            .read_register(&mut self.i2c, Register::AF_CMD_PARA4)
    }

    /// Move the voice coil motor to a fixed position.
    pub fn set_vcm_step<D: DelayMs<u16>>(
        &mut self,
        step: u8,
        delay: &mut D,
    ) -> Result<(), Error<E>> {
        self.sccb
            .write_register(&mut self.i2c, Register::AF_CMD_PARA3, 0x00)?;
        self.sccb
            .write_register(&mut self.i2c, Register::AF_CMD_PARA4, step)?;
        self.af_command(CMD_SET_STEP, delay)
    }
}
