//! Symbolic sensor settings and the cached configuration built from them.

use super::parallel::CaptureTimeout;
use super::regs::{Unsupported, OV5640_ADDRESS};
use core::convert::TryFrom;

/// Output frame sizes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u8)]
pub enum Resolution {
    /// 96x96
    R96x96 = 0,
    /// 160x120
    Qqvga = 1,
    /// 176x144
    Qcif = 2,
    /// 240x176
    Hqvga = 3,
    /// 240x240
    R240x240 = 4,
    /// 320x240
    Qvga = 5,
    /// 400x296
    Cif = 6,
    /// 480x320
    Hvga = 7,
    /// 640x480
    Vga = 8,
    /// 800x600
    Svga = 9,
    /// 1024x768
    Xga = 10,
    /// 1280x720
    Hd = 11,
    /// 1280x1024
    Sxga = 12,
    /// 1600x1200
    Uxga = 13,
    /// 2560x1440
    Qhd = 14,
    /// 2560x1600
    Wqxga = 15,
    /// 1088x1920, portrait
    PortraitFhd = 16,
    /// 2560x1920
    Qsxga = 17,
}

/// Aspect ratio of the sensor window an output size is cut from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AspectRatio {
    R4x3,
    R3x2,
    R16x10,
    R5x3,
    R16x9,
    R21x9,
    R5x4,
    R1x1,
    R9x16,
}

impl Resolution {
    /// Every supported output size, smallest first.
    pub const ALL: [Resolution; 18] = [
        Resolution::R96x96,
        Resolution::Qqvga,
        Resolution::Qcif,
        Resolution::Hqvga,
        Resolution::R240x240,
        Resolution::Qvga,
        Resolution::Cif,
        Resolution::Hvga,
        Resolution::Vga,
        Resolution::Svga,
        Resolution::Xga,
        Resolution::Hd,
        Resolution::Sxga,
        Resolution::Uxga,
        Resolution::Qhd,
        Resolution::Wqxga,
        Resolution::PortraitFhd,
        Resolution::Qsxga,
    ];

    /// Width and height in pixels.
    pub fn dimensions(self) -> (u16, u16) {
        match self {
            Resolution::R96x96 => (96, 96),
            Resolution::Qqvga => (160, 120),
            Resolution::Qcif => (176, 144),
            Resolution::Hqvga => (240, 176),
            Resolution::R240x240 => (240, 240),
            Resolution::Qvga => (320, 240),
            Resolution::Cif => (400, 296),
            Resolution::Hvga => (480, 320),
            Resolution::Vga => (640, 480),
            Resolution::Svga => (800, 600),
            Resolution::Xga => (1024, 768),
            Resolution::Hd => (1280, 720),
            Resolution::Sxga => (1280, 1024),
            Resolution::Uxga => (1600, 1200),
            Resolution::Qhd => (2560, 1440),
            Resolution::Wqxga => (2560, 1600),
            Resolution::PortraitFhd => (1088, 1920),
            Resolution::Qsxga => (2560, 1920),
        }
    }

    pub fn aspect_ratio(self) -> AspectRatio {
        match self {
            Resolution::R96x96 | Resolution::R240x240 => AspectRatio::R1x1,
            Resolution::Qcif | Resolution::Sxga => AspectRatio::R5x4,
            Resolution::Hvga => AspectRatio::R3x2,
            Resolution::Hd | Resolution::Qhd => AspectRatio::R16x9,
            Resolution::Wqxga => AspectRatio::R16x10,
            Resolution::PortraitFhd => AspectRatio::R9x16,
            _ => AspectRatio::R4x3,
        }
    }
}

impl TryFrom<u8> for Resolution {
    type Error = Unsupported;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Resolution::ALL
            .get(index as usize)
            .copied()
            .ok_or(Unsupported)
    }
}

/// Pixel output format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum ColorSpace {
    Rgb565 = 0,
    Yuv422 = 1,
    Grayscale = 2,
    Jpeg = 3,
}

impl ColorSpace {
    pub const ALL: [ColorSpace; 4] = [
        ColorSpace::Rgb565,
        ColorSpace::Yuv422,
        ColorSpace::Grayscale,
        ColorSpace::Jpeg,
    ];

    /// Bytes per pixel on the parallel bus, `None` for compressed output.
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            ColorSpace::Rgb565 | ColorSpace::Yuv422 => Some(2),
            ColorSpace::Grayscale => Some(1),
            ColorSpace::Jpeg => None,
        }
    }
}

impl TryFrom<u8> for ColorSpace {
    type Error = Unsupported;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        ColorSpace::ALL
            .get(index as usize)
            .copied()
            .ok_or(Unsupported)
    }
}

/// White balance presets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum WhiteBalance {
    Auto = 0,
    Sunny = 1,
    Fluorescent = 2,
    Cloudy = 3,
    Incandescent = 4,
}

impl TryFrom<u8> for WhiteBalance {
    type Error = Unsupported;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(WhiteBalance::Auto),
            1 => Ok(WhiteBalance::Sunny),
            2 => Ok(WhiteBalance::Fluorescent),
            3 => Ok(WhiteBalance::Cloudy),
            4 => Ok(WhiteBalance::Incandescent),
            _ => Err(Unsupported),
        }
    }
}

/// Special digital effects.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Effect {
    None = 0,
    Negative = 1,
    Grayscale = 2,
    RedTint = 3,
    GreenTint = 4,
    BlueTint = 5,
    Sepia = 6,
}

impl TryFrom<u8> for Effect {
    type Error = Unsupported;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Effect::None),
            1 => Ok(Effect::Negative),
            2 => Ok(Effect::Grayscale),
            3 => Ok(Effect::RedTint),
            4 => Ok(Effect::GreenTint),
            5 => Ok(Effect::BlueTint),
            6 => Ok(Effect::Sepia),
            _ => Err(Unsupported),
        }
    }
}

/// Capture mode as last written to the sensor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CaptureConfig {
    pub resolution: Resolution,
    pub color_space: ColorSpace,
    pub flip_x: bool,
    pub flip_y: bool,
    pub test_pattern: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            resolution: Resolution::Qqvga,
            color_space: ColorSpace::Rgb565,
            flip_x: false,
            flip_y: false,
            test_pattern: false,
        }
    }
}

/// Image tuning as last written to the sensor. `None` means the power-on default is still
/// in effect.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tuning {
    pub saturation: Option<i8>,
    pub brightness: Option<i8>,
    pub contrast: Option<i8>,
    pub exposure_value: Option<i8>,
    pub white_balance: Option<WhiteBalance>,
    pub effect: Option<Effect>,
    pub night_mode: Option<bool>,
    /// JPEG quantization scale, read back from the sensor during init.
    pub quality: u8,
}

/// Driver construction settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// 7-bit SCCB address.
    pub address: u8,
    /// Output size applied during init.
    pub resolution: Resolution,
    /// Output format applied during init.
    pub color_space: ColorSpace,
    /// Read every register back after writing it.
    pub readback: bool,
    /// Poll budgets for the parallel capture handshake.
    pub timeout: CaptureTimeout,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: OV5640_ADDRESS,
            resolution: Resolution::Qqvga,
            color_space: ColorSpace::Rgb565,
            readback: false,
            timeout: CaptureTimeout::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_indices_round_trip_or_reject() {
        assert_eq!(Resolution::try_from(8), Ok(Resolution::Vga));
        assert_eq!(Resolution::try_from(18), Err(Unsupported));
        assert_eq!(ColorSpace::try_from(3), Ok(ColorSpace::Jpeg));
        assert_eq!(ColorSpace::try_from(4), Err(Unsupported));
        assert_eq!(WhiteBalance::try_from(5), Err(Unsupported));
        assert_eq!(Effect::try_from(7), Err(Unsupported));
    }

    #[test]
    fn resolution_table_is_ordered() {
        for (index, resolution) in Resolution::ALL.iter().enumerate() {
            assert_eq!(*resolution as usize, index);
        }
        assert!(Resolution::Vga < Resolution::Xga);
    }
}
