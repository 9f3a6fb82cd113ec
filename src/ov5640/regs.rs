//! OV5640 register map.
//!
//! Everything in this module is a pure lookup: symbolic settings go in, ordered
//! `(address, value)` pairs come out. Nothing here touches the bus.

use super::settings::{
    AspectRatio, CaptureConfig, ColorSpace, Effect, Resolution, WhiteBalance,
};
use heapless::{consts, Vec};

/// Statically allocated (size 64) list of `(address, value)` writes, applied in order.
pub type RegList = Vec<(u16, u8), consts::U64>;

/// A symbolic value with no register encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Unsupported;

/// Device I2C address, 0x78 on the wire before the I2C driver shifts it.
pub const OV5640_ADDRESS: u8 = 0x3C;

/// Expected value of the chip ID registers.
pub const OV5640_CHIP_ID: u16 = 0x5640;

/// Delay after the software reset before the sensor accepts writes again.
pub const RESET_DELAY_MS: u16 = 10;

/// Device register addresses.
pub struct Register;

impl Register {
    // System control
    pub const SYSTEM_RESET00: u16 = 0x3000;
    pub const SYSTEM_RESET02: u16 = 0x3002;
    pub const CLOCK_ENABLE02: u16 = 0x3006;
    pub const SYSTEM_CTROL0: u16 = 0x3008;
    pub const DRIVE_CAPABILITY: u16 = 0x302C;
    pub const SCCB_SYSTEM_CTRL1: u16 = 0x3103;
    pub const SYSTEM_ROOT_DIVIDER: u16 = 0x3108;
    pub const GROUP_ACCESS: u16 = 0x3212;

    // Chip ID
    pub const CHIP_ID_HIGH: u16 = 0x300A;
    pub const CHIP_ID_LOW: u16 = 0x300B;

    // PLL
    pub const SC_PLL_CTRL0: u16 = 0x3034;
    pub const SC_PLL_CTRL1: u16 = 0x3035;
    pub const SC_PLL_CTRL2: u16 = 0x3036;
    pub const SC_PLL_CTRL3: u16 = 0x3037;
    pub const SC_PLL_BYPASS: u16 = 0x3039;
    pub const PCLK_RATIO: u16 = 0x3824;
    pub const VFIFO_CTRL0C: u16 = 0x460C;

    // Autofocus MCU
    pub const AF_CMD_MAIN: u16 = 0x3022;
    pub const AF_CMD_ACK: u16 = 0x3023;
    pub const AF_CMD_PARA0: u16 = 0x3024;
    pub const AF_CMD_PARA3: u16 = 0x3027;
    pub const AF_CMD_PARA4: u16 = 0x3028;
    pub const AF_FW_STATUS: u16 = 0x3029;
    pub const AF_FIRMWARE: u16 = 0x8000;

    // Manual white balance
    pub const AWB_R_GAIN_H: u16 = 0x3400;
    pub const AWB_MANUAL: u16 = 0x3406;

    // AEC/AGC
    pub const AEC_CTRL00: u16 = 0x3A00;
    pub const AEC_CTRL0F: u16 = 0x3A0F;
    pub const AEC_CTRL10: u16 = 0x3A10;
    pub const AEC_CTRL11: u16 = 0x3A11;
    pub const AEC_CTRL1B: u16 = 0x3A1B;
    pub const AEC_CTRL1E: u16 = 0x3A1E;
    pub const AEC_CTRL1F: u16 = 0x3A1F;

    // Timing window, each a 16-bit pair with the Y register two addresses after X
    pub const X_ADDR_ST_H: u16 = 0x3800;
    pub const X_ADDR_END_H: u16 = 0x3804;
    pub const X_OUTPUT_SIZE_H: u16 = 0x3808;
    pub const X_TOTAL_SIZE_H: u16 = 0x380C;
    pub const X_OFFSET_H: u16 = 0x3810;
    pub const X_INCREMENT: u16 = 0x3814;
    pub const Y_INCREMENT: u16 = 0x3815;

    // Timing control: flip, mirror, binning, compression
    pub const TIMING_TC_REG20: u16 = 0x3820;
    pub const TIMING_TC_REG21: u16 = 0x3821;
    pub const READOUT_4514: u16 = 0x4514;
    pub const READOUT_4520: u16 = 0x4520;

    // Format and ISP
    pub const FORMAT_CTRL00: u16 = 0x4300;
    pub const COMPRESSION_CTRL07: u16 = 0x4407;
    pub const ISP_CONTROL_01: u16 = 0x5001;
    pub const ISP_CONTROL_03: u16 = 0x5003;
    pub const FORMAT_CTRL: u16 = 0x501F;
    pub const PRE_ISP_TEST_SETTING_1: u16 = 0x503D;

    // Colour matrix and special digital effects
    pub const CMX1: u16 = 0x5381;
    pub const SDE_CTRL0: u16 = 0x5580;
    pub const SDE_CTRL3: u16 = 0x5583;
    pub const SDE_CTRL4: u16 = 0x5584;
    pub const SDE_CTRL5: u16 = 0x5585;
    pub const SDE_CTRL6: u16 = 0x5586;
    pub const SDE_CTRL7: u16 = 0x5587;
    pub const SDE_CTRL8: u16 = 0x5588;
}

/// Setting the upper bit of `SYSTEM_CTROL0` resets all registers.
pub const SOFTWARE_RESET: (u16, u8) = (Register::SYSTEM_CTROL0, 0x82);

/// Power-on defaults, written after `SOFTWARE_RESET` and `RESET_DELAY_MS`.
pub const SENSOR_DEFAULTS: &[(u16, u8)] = &[
    (Register::SYSTEM_CTROL0, 0x42), // power down
    (Register::SCCB_SYSTEM_CTRL1, 0x13), // enable pll
    // io direction
    (0x3017, 0xFF),
    (0x3018, 0xFF),
    (Register::DRIVE_CAPABILITY, 0xC3),
    (0x4740, 0x21), // vsync active high, pclk active high
    (0x4713, 0x02), // jpeg mode select
    (Register::ISP_CONTROL_01, 0x83), // colour matrix, awb and sde
    (Register::SYSTEM_RESET00, 0x00),
    (Register::SYSTEM_RESET02, 0x1C), // reset jfifo, sfifo, jpg, fmux, avg
    (0x3004, 0xFF),
    (Register::CLOCK_ENABLE02, 0xC3),
    (0x5000, 0xA7),
    (Register::ISP_CONTROL_01, 0xA3), // scaling on
    (Register::ISP_CONTROL_03, 0x08),
    // Undocumented, the sensor misbehaves without them
    (0x370C, 0x02),
    (0x3634, 0x40),
    // AEC/AGC
    (0x3A02, 0x03),
    (0x3A03, 0xD8),
    (0x3A08, 0x01),
    (0x3A09, 0x27),
    (0x3A0A, 0x00),
    (0x3A0B, 0xF6),
    (0x3A0D, 0x04),
    (0x3A0E, 0x03),
    (Register::AEC_CTRL0F, 0x30),
    (Register::AEC_CTRL10, 0x28),
    (Register::AEC_CTRL11, 0x60),
    (0x3A13, 0x43),
    (0x3A14, 0x03),
    (0x3A15, 0xD8),
    (0x3A18, 0x00), // gain ceiling
    (0x3A19, 0xF8),
    (Register::AEC_CTRL1B, 0x30),
    (Register::AEC_CTRL1E, 0x26),
    (Register::AEC_CTRL1F, 0x14),
    // VCM debug
    (0x3600, 0x08),
    (0x3601, 0x33),
    // 50/60Hz detection
    (0x3C01, 0xA4),
    (0x3C04, 0x28),
    (0x3C05, 0x98),
    (0x3C06, 0x00),
    (0x3C07, 0x08),
    (0x3C08, 0x00),
    (0x3C09, 0x1C),
    (0x3C0A, 0x9C),
    (0x3C0B, 0x40),
    (Register::VFIFO_CTRL0C, 0x22), // no jpeg footer
    // BLC
    (0x4001, 0x02),
    (0x4004, 0x02),
    // AWB
    (0x5180, 0xFF),
    (0x5181, 0xF2),
    (0x5182, 0x00),
    (0x5183, 0x14),
    (0x5184, 0x25),
    (0x5185, 0x24),
    (0x5186, 0x09),
    (0x5187, 0x09),
    (0x5188, 0x09),
    (0x5189, 0x75),
    (0x518A, 0x54),
    (0x518B, 0xE0),
    (0x518C, 0xB2),
    (0x518D, 0x42),
    (0x518E, 0x3D),
    (0x518F, 0x56),
    (0x5190, 0x46),
    (0x5191, 0xF8),
    (0x5192, 0x04),
    (0x5193, 0x70),
    (0x5194, 0xF0),
    (0x5195, 0xF0),
    (0x5196, 0x03),
    (0x5197, 0x01),
    (0x5198, 0x04),
    (0x5199, 0x12),
    (0x519A, 0x04),
    (0x519B, 0x00),
    (0x519C, 0x06),
    (0x519D, 0x82),
    (0x519E, 0x38),
    // Colour matrix (saturation)
    (0x5381, 0x1E),
    (0x5382, 0x5B),
    (0x5383, 0x08),
    (0x5384, 0x0A),
    (0x5385, 0x7E),
    (0x5386, 0x88),
    (0x5387, 0x7C),
    (0x5388, 0x6C),
    (0x5389, 0x10),
    (0x538A, 0x01),
    (0x538B, 0x98),
    // CIP (sharpness and denoise)
    (0x5300, 0x10),
    (0x5301, 0x10),
    (0x5302, 0x18),
    (0x5303, 0x19),
    (0x5304, 0x10),
    (0x5305, 0x10),
    (0x5306, 0x08),
    (0x5307, 0x16),
    (0x5308, 0x40),
    (0x5309, 0x10),
    (0x530A, 0x10),
    (0x530B, 0x04),
    (0x530C, 0x06),
    // Gamma
    (0x5480, 0x01),
    (0x5481, 0x00),
    (0x5482, 0x1E),
    (0x5483, 0x3B),
    (0x5484, 0x58),
    (0x5485, 0x66),
    (0x5486, 0x71),
    (0x5487, 0x7D),
    (0x5488, 0x83),
    (0x5489, 0x8F),
    (0x548A, 0x98),
    (0x548B, 0xA6),
    (0x548C, 0xB8),
    (0x548D, 0xCA),
    (0x548E, 0xD7),
    (0x548F, 0xE3),
    (0x5490, 0x1D),
    // SDE: brightness and contrast enabled
    (Register::SDE_CTRL0, 0x06),
    (Register::SDE_CTRL3, 0x40),
    (Register::SDE_CTRL4, 0x10),
    (Register::SDE_CTRL6, 0x20),
    (Register::SDE_CTRL7, 0x00),
    (Register::SDE_CTRL8, 0x00),
    (0x5589, 0x10),
    (0x558A, 0x00),
    (0x558B, 0xF8),
    (0x501D, 0x40), // manual contrast offset
    (Register::SYSTEM_CTROL0, 0x02), // power on
    (0x3C00, 0x04), // 50Hz
];

/// Sensor window for one aspect ratio.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    pub max_width: u16,
    pub max_height: u16,
    pub start_x: u16,
    pub start_y: u16,
    pub end_x: u16,
    pub end_y: u16,
    pub offset_x: u16,
    pub offset_y: u16,
    pub total_x: u16,
    pub total_y: u16,
}

const fn window(
    max_width: u16,
    max_height: u16,
    start_x: u16,
    start_y: u16,
    end_x: u16,
    end_y: u16,
    total_x: u16,
    total_y: u16,
) -> Window {
    Window {
        max_width,
        max_height,
        start_x,
        start_y,
        end_x,
        end_y,
        offset_x: 32,
        offset_y: 16,
        total_x,
        total_y,
    }
}

/// Sensor window used for every output size of the given aspect ratio.
pub fn window_for(ratio: AspectRatio) -> Window {
    match ratio {
        AspectRatio::R4x3 => window(2560, 1920, 0, 0, 2623, 1951, 2844, 1968),
        AspectRatio::R3x2 => window(2560, 1704, 0, 110, 2623, 1843, 2844, 1752),
        AspectRatio::R16x10 => window(2560, 1600, 0, 160, 2623, 1791, 2844, 1648),
        AspectRatio::R5x3 => window(2560, 1536, 0, 192, 2623, 1759, 2844, 1584),
        AspectRatio::R16x9 => window(2560, 1440, 0, 240, 2623, 1711, 2844, 1488),
        AspectRatio::R21x9 => window(2560, 1080, 0, 420, 2623, 1531, 2844, 1128),
        AspectRatio::R5x4 => window(2400, 1920, 80, 0, 2543, 1951, 2684, 1968),
        AspectRatio::R1x1 => window(1920, 1920, 320, 0, 2543, 1951, 2684, 1968),
        AspectRatio::R9x16 => window(1088, 1920, 736, 0, 1887, 1951, 1884, 1968),
    }
}

/// Binning halves the sensor readout, scaling runs the ISP scaler on what is left.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Scaling {
    pub binning: bool,
    pub scale: bool,
}

/// Derive binning and scaling for an output size.
pub fn scaling(resolution: Resolution) -> Scaling {
    let (width, height) = resolution.dimensions();
    let win = window_for(resolution.aspect_ratio());
    let half = (win.max_width / 2, win.max_height / 2);

    Scaling {
        binning: width <= half.0 && height <= half.1,
        scale: !((width == win.max_width && height == win.max_height)
            || (width == half.0 && height == half.1)),
    }
}

/// PLL settings, see `pll_regs` for the accepted ranges.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PllConfig {
    pub bypass: bool,
    pub multiplier: u16,
    pub sys_div: u8,
    pub pre_div: u8,
    pub root_2x: bool,
    pub pclk_root_div: u8,
    pub pclk_manual: bool,
    pub pclk_div: u8,
}

impl PllConfig {
    /// PLL settings for a colour space at a given output size.
    pub fn for_mode(resolution: Resolution, color_space: ColorSpace) -> Self {
        match color_space {
            ColorSpace::Jpeg => PllConfig {
                bypass: false,
                multiplier: if resolution < Resolution::Xga { 180 } else { 200 },
                sys_div: 4,
                pre_div: 2,
                root_2x: false,
                pclk_root_div: 2,
                pclk_manual: true,
                pclk_div: 4,
            },
            _ => PllConfig {
                bypass: false,
                multiplier: 32,
                sys_div: 1,
                pre_div: 1,
                root_2x: false,
                pclk_root_div: 1,
                pclk_manual: true,
                pclk_div: 4,
            },
        }
    }
}

/// PLL register writes. Out of range fields are rejected.
pub fn pll_regs(pll: &PllConfig) -> Result<[(u16, u8); 9], Unsupported> {
    if pll.multiplier > 252
        || pll.multiplier < 4
        || pll.sys_div > 15
        || pll.pre_div > 8
        || pll.pclk_div > 31
        || pll.pclk_root_div > 3
    {
        return Err(Unsupported);
    }

    Ok([
        (Register::SC_PLL_BYPASS, if pll.bypass { 0x80 } else { 0x00 }),
        (Register::SC_PLL_CTRL0, 0x1A),
        (Register::SC_PLL_CTRL1, 0x01 | ((pll.sys_div & 0x0F) << 4)),
        (Register::SC_PLL_CTRL2, pll.multiplier as u8),
        (
            Register::SC_PLL_CTRL3,
            (pll.pre_div & 0x0F) | if pll.root_2x { 0x10 } else { 0x00 },
        ),
        (
            Register::SYSTEM_ROOT_DIVIDER,
            ((pll.pclk_root_div & 0x03) << 4) | 0x06,
        ),
        (Register::PCLK_RATIO, pll.pclk_div & 0x1F),
        // Bit 1 selects the manual PCLK divider, the sensor only behaves with it set
        (Register::VFIFO_CTRL0C, 0x22),
        (Register::SCCB_SYSTEM_CTRL1, 0x13),
    ])
}

/// Register writes for a colour space.
pub fn color_space_regs(color_space: ColorSpace) -> &'static [(u16, u8)] {
    match color_space {
        ColorSpace::Rgb565 => &[
            (Register::FORMAT_CTRL, 0x01),    // RGB
            (Register::FORMAT_CTRL00, 0x61),  // RGB565 (BGR)
            (Register::SYSTEM_RESET02, 0x1C), // reset jfifo, sfifo, jpg, fmux, avg
            (Register::CLOCK_ENABLE02, 0xC3), // no jpeg clock
        ],
        ColorSpace::Yuv422 => &[
            (Register::FORMAT_CTRL, 0x00),   // YUV422
            (Register::FORMAT_CTRL00, 0x30), // YUYV
        ],
        ColorSpace::Grayscale => &[
            (Register::FORMAT_CTRL, 0x00),   // YUV422
            (Register::FORMAT_CTRL00, 0x10), // Y8
        ],
        ColorSpace::Jpeg => &[
            (Register::FORMAT_CTRL, 0x00),
            (Register::FORMAT_CTRL00, 0x30),
            (Register::SYSTEM_RESET02, 0x00), // enable everything
            (Register::CLOCK_ENABLE02, 0xFF), // enable all clocks
            (0x471C, 0x50),
        ],
    }
}

/// Push a 16-bit value as two byte writes, high byte first.
fn push16(list: &mut RegList, reg: u16, value: u16) -> Result<(), Unsupported> {
    list.push((reg, (value >> 8) as u8)).map_err(|_| Unsupported)?;
    list.push((reg + 1, (value & 0xFF) as u8))
        .map_err(|_| Unsupported)
}

/// Push an X/Y register pair, Y lives two addresses after X.
fn push_xy(list: &mut RegList, reg: u16, x: u16, y: u16) -> Result<(), Unsupported> {
    push16(list, reg, x)?;
    push16(list, reg + 2, y)
}

/// Window, output size, total size and offset writes for an output size.
pub fn size_regs(resolution: Resolution, list: &mut RegList) -> Result<(), Unsupported> {
    let (width, height) = resolution.dimensions();
    let win = window_for(resolution.aspect_ratio());
    let binning = scaling(resolution).binning;

    push_xy(list, Register::X_ADDR_ST_H, win.start_x, win.start_y)?;
    push_xy(list, Register::X_ADDR_END_H, win.end_x, win.end_y)?;
    push_xy(list, Register::X_OUTPUT_SIZE_H, width, height)?;

    if !binning {
        push_xy(list, Register::X_TOTAL_SIZE_H, win.total_x, win.total_y)?;
        push_xy(list, Register::X_OFFSET_H, win.offset_x, win.offset_y)
    } else {
        let total_x = if width > 920 { win.total_x - 200 } else { 2060 };
        push_xy(list, Register::X_TOTAL_SIZE_H, total_x, win.total_y / 2)?;
        push_xy(list, Register::X_OFFSET_H, win.offset_x / 2, win.offset_y / 2)
    }
}

/// Timing control writes for flips, binning and compression.
pub fn image_option_regs(config: &CaptureConfig) -> [(u16, u8); 6] {
    let binning = scaling(config.resolution).binning;
    let mut reg20 = 0x00;
    let mut reg21 = 0x00;
    let mut readout = 0;

    if config.color_space == ColorSpace::Jpeg {
        reg21 |= 0x20;
    }

    if binning {
        reg20 |= 0x01;
        reg21 |= 0x01;
        readout |= 4;
    } else {
        reg20 |= 0x40;
    }

    if config.flip_y {
        reg20 |= 0x06;
        readout |= 1;
    }

    if config.flip_x {
        reg21 |= 0x06;
        readout |= 2;
    }

    let reg4514 = [0x88, 0x00, 0xBB, 0x00, 0xAA, 0xBB, 0xBB, 0xAA][readout];
    let (reg4520, increment) = if binning { (0x0B, 0x31) } else { (0x10, 0x11) };

    [
        (Register::TIMING_TC_REG20, reg20),
        (Register::TIMING_TC_REG21, reg21),
        (Register::READOUT_4514, reg4514),
        (Register::READOUT_4520, reg4520),
        (Register::X_INCREMENT, increment),
        (Register::Y_INCREMENT, increment),
    ]
}

/// The full transition to a capture mode: size, scaler, image options, PLL and colour space.
pub fn mode_regs(config: &CaptureConfig) -> Result<RegList, Unsupported> {
    let mut list = RegList::new();
    size_regs(config.resolution, &mut list)?;

    // Scale enable is bit 5 on top of the 0x83 default
    let isp = if scaling(config.resolution).scale { 0xA3 } else { 0x83 };
    list.push((Register::ISP_CONTROL_01, isp))
        .map_err(|_| Unsupported)?;

    list.extend_from_slice(&image_option_regs(config))
        .map_err(|_| Unsupported)?;
    list.extend_from_slice(&pll_regs(&PllConfig::for_mode(
        config.resolution,
        config.color_space,
    ))?)
    .map_err(|_| Unsupported)?;
    list.extend_from_slice(color_space_regs(config.color_space))
        .map_err(|_| Unsupported)?;

    Ok(list)
}

/// Test pattern (colour bar) enable write.
pub fn test_pattern_reg(enable: bool) -> (u16, u8) {
    (
        Register::PRE_ISP_TEST_SETTING_1,
        if enable { 0x80 } else { 0x00 },
    )
}

/// Wrap writes in a group hold so the sensor latches them on the same frame.
fn group_hold(writes: &[(u16, u8)]) -> Result<RegList, Unsupported> {
    let mut list = RegList::new();
    list.push((Register::GROUP_ACCESS, 0x03)) // start group 3
        .map_err(|_| Unsupported)?;
    list.extend_from_slice(writes).map_err(|_| Unsupported)?;
    list.extend_from_slice(&[
        (Register::GROUP_ACCESS, 0x13), // end group 3
        (Register::GROUP_ACCESS, 0xA3), // launch group 3
    ])
    .map_err(|_| Unsupported)?;
    Ok(list)
}

/// Index of a signed level in a table covering `-limit..=limit`.
fn level_index(level: i8, limit: i8) -> Result<usize, Unsupported> {
    if level < -limit || level > limit {
        return Err(Unsupported);
    }
    Ok((level + limit) as usize)
}

const SATURATION_LEVELS: [[u8; 11]; 9] = [
    [0x1D, 0x60, 0x03, 0x07, 0x48, 0x4F, 0x4B, 0x40, 0x0B, 0x01, 0x98], // -4
    [0x1D, 0x60, 0x03, 0x08, 0x54, 0x5C, 0x58, 0x4B, 0x0D, 0x01, 0x98], // -3
    [0x1D, 0x60, 0x03, 0x0A, 0x60, 0x6A, 0x64, 0x56, 0x0E, 0x01, 0x98], // -2
    [0x1D, 0x60, 0x03, 0x0B, 0x6C, 0x77, 0x70, 0x60, 0x10, 0x01, 0x98], // -1
    [0x1D, 0x60, 0x03, 0x0C, 0x78, 0x84, 0x7D, 0x6B, 0x12, 0x01, 0x98], // 0
    [0x1D, 0x60, 0x03, 0x0D, 0x84, 0x91, 0x8A, 0x76, 0x14, 0x01, 0x98], // +1
    [0x1D, 0x60, 0x03, 0x0E, 0x90, 0x9E, 0x96, 0x80, 0x16, 0x01, 0x98], // +2
    [0x1D, 0x60, 0x03, 0x10, 0x9C, 0xAC, 0xA2, 0x8B, 0x17, 0x01, 0x98], // +3
    [0x1D, 0x60, 0x03, 0x11, 0xA8, 0xB9, 0xAF, 0x96, 0x19, 0x01, 0x98], // +4
];

/// Colour matrix writes for a saturation level in `-4..=4`.
pub fn saturation_regs(level: i8) -> Result<RegList, Unsupported> {
    let row = &SATURATION_LEVELS[level_index(level, 4)?];
    let mut list = RegList::new();
    for (offset, val) in row.iter().enumerate() {
        list.push((Register::CMX1 + offset as u16, *val))
            .map_err(|_| Unsupported)?;
    }
    Ok(list)
}

const EV_REGISTERS: [u16; 6] = [
    Register::AEC_CTRL0F,
    Register::AEC_CTRL10,
    Register::AEC_CTRL11,
    Register::AEC_CTRL1B,
    Register::AEC_CTRL1E,
    Register::AEC_CTRL1F,
];

const EV_LEVELS: [[u8; 6]; 7] = [
    [0x10, 0x08, 0x10, 0x08, 0x20, 0x10], // -3
    [0x20, 0x18, 0x41, 0x20, 0x18, 0x10], // -2
    [0x30, 0x28, 0x61, 0x30, 0x28, 0x10], // -1
    [0x38, 0x30, 0x61, 0x38, 0x30, 0x10], // 0
    [0x40, 0x38, 0x71, 0x40, 0x38, 0x10], // +1
    [0x50, 0x48, 0x90, 0x50, 0x48, 0x20], // +2
    [0x60, 0x58, 0xA0, 0x60, 0x58, 0x20], // +3
];

/// AEC target writes for an exposure value in `-3..=3`.
pub fn exposure_value_regs(level: i8) -> Result<RegList, Unsupported> {
    let row = &EV_LEVELS[level_index(level, 3)?];
    let mut list = RegList::new();
    for (reg, val) in EV_REGISTERS.iter().zip(row.iter()) {
        list.push((*reg, *val)).map_err(|_| Unsupported)?;
    }
    Ok(list)
}

const CONTRAST_LEVELS: [[u8; 2]; 7] = [
    [0x14, 0x14], // -3
    [0x18, 0x18], // -2
    [0x1C, 0x1C], // -1
    [0x20, 0x00], // 0
    [0x24, 0x10], // +1
    [0x28, 0x18], // +2
    [0x2C, 0x1C], // +3
];

/// SDE contrast writes for a level in `-3..=3`, under group hold.
pub fn contrast_regs(level: i8) -> Result<RegList, Unsupported> {
    let row = CONTRAST_LEVELS[level_index(level, 3)?];
    group_hold(&[(Register::SDE_CTRL6, row[0]), (Register::SDE_CTRL5, row[1])])
}

/// SDE brightness writes for a level in `-4..=4`, under group hold.
pub fn brightness_regs(level: i8) -> Result<RegList, Unsupported> {
    level_index(level, 4)?;
    let magnitude = (level.abs() as u8) << 4;
    let sign = if level < 0 { 0x09 } else { 0x01 };
    group_hold(&[(Register::SDE_CTRL7, magnitude), (Register::SDE_CTRL8, sign)])
}

/// Manual white balance gains, under group hold. `Auto` hands control back to the AWB.
pub fn white_balance_regs(mode: WhiteBalance) -> Result<RegList, Unsupported> {
    let gains: [u8; 6] = match mode {
        WhiteBalance::Auto => [0x04, 0x00, 0x04, 0x00, 0x04, 0x00],
        WhiteBalance::Sunny => [0x06, 0x1C, 0x04, 0x00, 0x04, 0xF3],
        WhiteBalance::Fluorescent => [0x05, 0x48, 0x04, 0x00, 0x07, 0xCF],
        WhiteBalance::Cloudy => [0x06, 0x48, 0x04, 0x00, 0x04, 0xD3],
        WhiteBalance::Incandescent => [0x04, 0x10, 0x04, 0x00, 0x08, 0x40],
    };
    let manual = if mode == WhiteBalance::Auto { 0x00 } else { 0x01 };

    let mut writes: Vec<(u16, u8), consts::U8> = Vec::new();
    writes.push((Register::AWB_MANUAL, manual))
        .map_err(|_| Unsupported)?;
    for (offset, val) in gains.iter().enumerate() {
        writes.push((Register::AWB_R_GAIN_H + offset as u16, *val))
            .map_err(|_| Unsupported)?;
    }
    group_hold(&writes)
}

/// Special digital effect writes.
pub fn effect_regs(effect: Effect) -> [(u16, u8); 4] {
    let vals: [u8; 4] = match effect {
        Effect::None => [0x06, 0x40, 0x10, 0x08],
        Effect::Negative => [0x46, 0x40, 0x28, 0x08],
        Effect::Grayscale => [0x1E, 0x80, 0x80, 0x08],
        Effect::RedTint => [0x1E, 0x80, 0xC0, 0x08],
        Effect::GreenTint => [0x1E, 0x60, 0x60, 0x08],
        Effect::BlueTint => [0x1E, 0xA0, 0x40, 0x08],
        Effect::Sepia => [0x1E, 0x40, 0xA0, 0x08],
    };

    [
        (Register::SDE_CTRL0, vals[0]),
        (Register::SDE_CTRL3, vals[1]),
        (Register::SDE_CTRL4, vals[2]),
        (Register::ISP_CONTROL_03, vals[3]),
    ]
}

/// Smallest and largest JPEG quantization scale accepted by `quality_reg`.
pub const QUALITY_MIN: u8 = 2;
pub const QUALITY_MAX: u8 = 54;

/// JPEG quantization scale write, lower is better quality.
pub fn quality_reg(quality: u8) -> Result<(u16, u8), Unsupported> {
    if quality < QUALITY_MIN || quality > QUALITY_MAX {
        return Err(Unsupported);
    }
    Ok((Register::COMPRESSION_CTRL07, quality & 0x3F))
}

/// Night mode is bit 2 of `AEC_CTRL00`.
pub const NIGHT_MODE_BIT: u8 = 0x04;
