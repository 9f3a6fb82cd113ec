//! OV5640 device driver.
//! * Configuration goes over the SCCB (I2C) port, see `sccb`.
//! * Pixel data comes in over the parallel bus, see `parallel`.
//! * Register tables and the sequences built from them live in `regs`.
//!
//! Every setter writes the sensor first and updates the cached configuration only when all of
//! its writes succeeded. A setter that fails part way leaves the sensor in an unknown mix of
//! old and new register values; apply the setting again (or re-create the driver) to recover.

mod autofocus;
mod error;
pub mod parallel;
mod power;
pub mod regs;
pub mod sccb;
mod settings;

pub use error::Error;
pub use parallel::{
    complete_frame, CaptureError, CaptureTimeout, FrameFormat, ParallelBus, ParallelPins,
};
pub use power::{power_up, NoPin};
pub use settings::{
    AspectRatio, CaptureConfig, ColorSpace, Config, Effect, Resolution, Tuning, WhiteBalance,
};

use embedded_hal::blocking::{delay::DelayMs, i2c};
use regs::{Register, OV5640_CHIP_ID};
use sccb::SCCB;

#[cfg(feature = "rttdebug")]
use rtt_target::rprintln;

/// OV5640 handle. Owns the register bus and the parallel bus until `release`.
pub struct Ov5640<I2C, P> {
    i2c: I2C,
    port: P,
    sccb: SCCB<I2C>,
    config: CaptureConfig,
    tuning: Tuning,
    readback: bool,
    timeout: CaptureTimeout,
}

impl<I2C, P, E> Ov5640<I2C, P>
where
    I2C: i2c::Read<Error = E> + i2c::Write<Error = E>,
{
    /// Initialize the OV5640 device driver.
    /// * Checks the chip ID to confirm the sensor answers on the bus.
    /// * Resets the sensor and writes the power-on defaults.
    /// * Applies the resolution and colour space from `config`.
    ///
    /// The master clock must already be running and the sensor powered up (see `power_up`).
    ///
    /// `port` is only used by `capture`. A board that captures through a camera interface
    /// peripheral can pass `()` and size its transfers from `frame_format` instead.
    pub fn new<D: DelayMs<u16>>(
        i2c: I2C,
        port: P,
        delay: &mut D,
        config: Config,
    ) -> Result<Self, Error<E>> {
        let sccb = SCCB::new(&i2c, config.address);
        let mut ov5640 = Ov5640 {
            i2c,
            port,
            sccb,
            config: CaptureConfig {
                resolution: config.resolution,
                color_space: config.color_space,
                ..CaptureConfig::default()
            },
            tuning: Tuning::default(),
            readback: config.readback,
            timeout: config.timeout,
        };
        ov5640.init(delay)?;
        Ok(ov5640)
    }

    fn init<D: DelayMs<u16>>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        // Establish communication with the OV5640
        self.check_id()?;

        let (reg, val) = regs::SOFTWARE_RESET;
        self.sccb.write_register(&mut self.i2c, reg, val)?;
        delay.delay_ms(regs::RESET_DELAY_MS);
        self.sccb
            .apply_config(&mut self.i2c, regs::SENSOR_DEFAULTS, self.readback)?;

        let mode = self.config;
        self.apply_mode(&mode)?;
        let (reg, val) = regs::test_pattern_reg(mode.test_pattern);
        self.sccb.write_register(&mut self.i2c, reg, val)?;

        self.tuning.quality =
            self.sccb
                .read_register(&mut self.i2c, Register::COMPRESSION_CTRL07)?
                & 0x3F;

        #[cfg(feature = "rttdebug")]
        rprintln!("OV5640 initialization complete!");

        Ok(())
    }

    /// Read the chip ID. No side effects, usable as a bus presence check at any time.
    pub fn chip_id(&mut self) -> Result<u16, Error<E>> {
        let msb: u16 = self
            .sccb
            .read_register(&mut self.i2c, Register::CHIP_ID_HIGH)?
            .into();
        let lsb: u16 = self
            .sccb
            .read_register(&mut self.i2c, Register::CHIP_ID_LOW)?
            .into();
        Ok((msb << 8) | lsb)
    }

    /// Check the chip ID matches the OV5640.
    pub fn check_id(&mut self) -> Result<(), Error<E>> {
        let id = self.chip_id()?;

        #[cfg(feature = "rttdebug")]
        rprintln!("OV5640 chip ID 0x{:04X}", id);

        if id != OV5640_CHIP_ID {
            return Err(Error::ChipId(id));
        }
        Ok(())
    }

    /// Write a register list, honouring the readback setting.
    fn apply(&mut self, list: &[(u16, u8)]) -> Result<(), Error<E>> {
        self.sccb.apply_config(&mut self.i2c, list, self.readback)
    }

    /// Write the full size and colour space sequence for `mode`.
    fn apply_mode(&mut self, mode: &CaptureConfig) -> Result<(), Error<E>> {
        let list = regs::mode_regs(mode)?;

        #[cfg(feature = "rttdebug")]
        {
            let (width, height) = mode.resolution.dimensions();
            rprintln!(
                "OV5640 mode {}x{} {:?}, {} writes",
                width,
                height,
                mode.color_space,
                list.len()
            );
        }

        self.apply(&list)
    }

    /// Switch to a new capture mode, caching it only once every write went through.
    fn set_mode(&mut self, next: CaptureConfig) -> Result<(), Error<E>> {
        self.apply_mode(&next)?;
        self.config = next;
        Ok(())
    }

    /// Rewrite the timing control registers for new flip settings.
    fn set_image_options(&mut self, next: CaptureConfig) -> Result<(), Error<E>> {
        self.apply(&regs::image_option_regs(&next))?;
        self.config = next;
        Ok(())
    }

    /// Change the output size.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<E>> {
        self.set_mode(CaptureConfig {
            resolution,
            ..self.config
        })
    }

    /// Change the output format. Reprograms the whole mode since JPEG runs a faster PLL.
    pub fn set_color_space(&mut self, color_space: ColorSpace) -> Result<(), Error<E>> {
        self.set_mode(CaptureConfig {
            color_space,
            ..self.config
        })
    }

    /// Mirror the image horizontally.
    pub fn set_flip_x(&mut self, flip_x: bool) -> Result<(), Error<E>> {
        self.set_image_options(CaptureConfig {
            flip_x,
            ..self.config
        })
    }

    /// Flip the image vertically.
    pub fn set_flip_y(&mut self, flip_y: bool) -> Result<(), Error<E>> {
        self.set_image_options(CaptureConfig {
            flip_y,
            ..self.config
        })
    }

    /// Replace the image with the colour bar test pattern.
    pub fn set_test_pattern(&mut self, enable: bool) -> Result<(), Error<E>> {
        let (reg, val) = regs::test_pattern_reg(enable);
        self.sccb.write_register(&mut self.i2c, reg, val)?;
        self.config.test_pattern = enable;
        Ok(())
    }

    /// Colour saturation, `-4..=4`.
    pub fn set_saturation(&mut self, level: i8) -> Result<(), Error<E>> {
        self.apply(&regs::saturation_regs(level)?)?;
        self.tuning.saturation = Some(level);
        Ok(())
    }

    /// Brightness, `-4..=4`.
    pub fn set_brightness(&mut self, level: i8) -> Result<(), Error<E>> {
        self.apply(&regs::brightness_regs(level)?)?;
        self.tuning.brightness = Some(level);
        Ok(())
    }

    /// Contrast, `-3..=3`.
    pub fn set_contrast(&mut self, level: i8) -> Result<(), Error<E>> {
        self.apply(&regs::contrast_regs(level)?)?;
        self.tuning.contrast = Some(level);
        Ok(())
    }

    /// Exposure target (EV), `-3..=3`.
    pub fn set_exposure_value(&mut self, level: i8) -> Result<(), Error<E>> {
        self.apply(&regs::exposure_value_regs(level)?)?;
        self.tuning.exposure_value = Some(level);
        Ok(())
    }

    pub fn set_white_balance(&mut self, mode: WhiteBalance) -> Result<(), Error<E>> {
        self.apply(&regs::white_balance_regs(mode)?)?;
        self.tuning.white_balance = Some(mode);
        Ok(())
    }

    pub fn set_effect(&mut self, effect: Effect) -> Result<(), Error<E>> {
        self.apply(&regs::effect_regs(effect))?;
        self.tuning.effect = Some(effect);
        Ok(())
    }

    /// Let the AEC stretch exposure across frames in low light.
    pub fn set_night_mode(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.sccb.update_bits(
            &mut self.i2c,
            Register::AEC_CTRL00,
            regs::NIGHT_MODE_BIT,
            enable,
        )?;
        self.tuning.night_mode = Some(enable);
        Ok(())
    }

    /// JPEG quantization scale, `QUALITY_MIN..=QUALITY_MAX`. Lower means larger, better frames.
    pub fn set_quality(&mut self, quality: u8) -> Result<(), Error<E>> {
        let (reg, val) = regs::quality_reg(quality)?;
        self.sccb.write_register(&mut self.i2c, reg, val)?;
        self.tuning.quality = quality;
        Ok(())
    }
}

impl<I2C, P: ParallelBus> Ov5640<I2C, P> {
    /// Capture one frame into `buf`, returning the number of bytes written. JPEG frames are
    /// trimmed at the end-of-image marker.
    pub fn capture(&mut self, buf: &mut [u8]) -> Result<usize, CaptureError<P::Error>> {
        let format = self.frame_format();
        let result = parallel::capture(&mut self.port, &format, &self.timeout, buf);

        #[cfg(feature = "rttdebug")]
        {
            if result.is_err() {
                rprintln!("OV5640 capture failed");
            }
        }

        result
    }
}

impl<I2C, P> Ov5640<I2C, P> {
    /// Capture configuration as last written to the sensor.
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Image tuning as last written to the sensor.
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Image width in pixels.
    pub fn width(&self) -> u16 {
        self.config.resolution.dimensions().0
    }

    /// Image height in pixels.
    pub fn height(&self) -> u16 {
        self.config.resolution.dimensions().1
    }

    /// Buffer size for one frame at the current resolution and colour space. For JPEG this
    /// is an estimate based on the quality setting.
    pub fn capture_buffer_size(&self) -> usize {
        let pixels = self.width() as usize * self.height() as usize;
        match self.config.color_space.bytes_per_pixel() {
            Some(bpp) => pixels * bpp,
            None => pixels / (self.tuning.quality.max(regs::QUALITY_MIN) as usize),
        }
    }

    /// Shape of the frame the sensor is currently streaming.
    pub fn frame_format(&self) -> FrameFormat {
        FrameFormat {
            lines: self.height(),
            jpeg: self.config.color_space == ColorSpace::Jpeg,
            min_buffer: self.capture_buffer_size(),
        }
    }

    /// Poll budgets used by `capture`.
    pub fn capture_timeout(&self) -> &CaptureTimeout {
        &self.timeout
    }

    /// Hand back the register bus and the parallel bus.
    pub fn release(self) -> (I2C, P) {
        (self.i2c, self.port)
    }
}
