//! Shared helpers: scripted SCCB traffic and a simulated parallel bus.

#![allow(dead_code)]

use core::convert::Infallible;
use embedded_hal_mock::delay::MockNoop;
use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use ov5640_rs::ov5640::regs::{self, Register};
use ov5640_rs::ov5640::{CaptureConfig, CaptureTimeout, Config, Ov5640, ParallelBus};

pub const ADDR: u8 = 0x3C;

/// Quality read back from the sensor during init.
pub const INIT_QUALITY: u8 = 12;

/// Capture budgets small enough for a stalled test to fail quickly.
pub const TEST_TIMEOUT: CaptureTimeout = CaptureTimeout {
    clock_polls: 100,
    sync_edges: 1000,
};

pub fn write(reg: u16, val: u8) -> I2cTransaction {
    let [hi, lo] = reg.to_be_bytes();
    I2cTransaction::write(ADDR, vec![hi, lo, val])
}

pub fn read(reg: u16, val: u8) -> Vec<I2cTransaction> {
    let [hi, lo] = reg.to_be_bytes();
    vec![
        I2cTransaction::write(ADDR, vec![hi, lo]),
        I2cTransaction::read(ADDR, vec![val]),
    ]
}

pub fn writes(list: &[(u16, u8)]) -> Vec<I2cTransaction> {
    list.iter().map(|(reg, val)| write(*reg, *val)).collect()
}

/// Writes as `apply_config` sends them with readback on, the sensor echoing every value.
/// Group access strobes are not read back.
pub fn verified_writes(list: &[(u16, u8)]) -> Vec<I2cTransaction> {
    let mut t = Vec::new();
    for (reg, val) in list.iter() {
        t.push(write(*reg, *val));
        if *reg != Register::GROUP_ACCESS {
            t.extend(read(*reg, *val));
        }
    }
    t
}

pub fn chip_id_reads() -> Vec<I2cTransaction> {
    let mut t = read(Register::CHIP_ID_HIGH, 0x56);
    t.extend(read(Register::CHIP_ID_LOW, 0x40));
    t
}

/// Everything `Ov5640::new` sends for a given starting mode.
pub fn init_transactions(mode: &CaptureConfig) -> Vec<I2cTransaction> {
    init_sequence(mode, writes)
}

/// `init_transactions` with register readback enabled.
pub fn verified_init_transactions(mode: &CaptureConfig) -> Vec<I2cTransaction> {
    init_sequence(mode, verified_writes)
}

fn init_sequence(
    mode: &CaptureConfig,
    apply: fn(&[(u16, u8)]) -> Vec<I2cTransaction>,
) -> Vec<I2cTransaction> {
    let mut t = chip_id_reads();
    t.push(write(regs::SOFTWARE_RESET.0, regs::SOFTWARE_RESET.1));
    t.extend(apply(regs::SENSOR_DEFAULTS));
    t.extend(apply(&regs::mode_regs(mode).unwrap()));
    let (reg, val) = regs::test_pattern_reg(false);
    t.push(write(reg, val));
    t.extend(read(Register::COMPRESSION_CTRL07, INIT_QUALITY));
    t
}

pub fn test_config(mode: &CaptureConfig) -> Config {
    Config {
        resolution: mode.resolution,
        color_space: mode.color_space,
        timeout: TEST_TIMEOUT,
        ..Config::default()
    }
}

/// Bring up a driver on a mock bus expecting init followed by `then`. The returned mock
/// shares its expectations with the one owned by the driver, call `done` on it at the end.
pub fn driver<P: ParallelBus>(
    mode: CaptureConfig,
    port: P,
    then: Vec<I2cTransaction>,
) -> (Ov5640<I2cMock, P>, I2cMock) {
    let mut expectations = init_transactions(&mode);
    expectations.extend(then);
    let i2c = I2cMock::new(&expectations);
    let handle = i2c.clone();
    let camera = Ov5640::new(i2c, port, &mut MockNoop::new(), test_config(&mode)).unwrap();
    (camera, handle)
}

/// Bus state during one pixel clock period.
#[derive(Clone, Copy, Debug)]
pub struct Sample {
    pub vsync: bool,
    pub href: bool,
    pub data: u8,
}

const IDLE: Sample = Sample {
    vsync: false,
    href: false,
    data: 0,
};

const PULSE: Sample = Sample {
    vsync: true,
    href: false,
    data: 0,
};

/// Simulated sensor output. Every `pclk` call toggles the clock, a rising edge moves on to
/// the next sample. Once the script runs out the bus sits idle.
pub struct SimSensor {
    samples: Vec<Sample>,
    tick: usize,
    clock: bool,
}

impl SimSensor {
    pub fn new(samples: Vec<Sample>) -> Self {
        SimSensor {
            samples,
            tick: 0,
            clock: false,
        }
    }

    /// A bus that never produces a frame.
    pub fn idle() -> Self {
        SimSensor::new(Vec::new())
    }

    fn current(&self) -> Sample {
        self.samples.get(self.tick).copied().unwrap_or(IDLE)
    }
}

impl ParallelBus for SimSensor {
    type Error = Infallible;

    fn vsync(&mut self) -> Result<bool, Infallible> {
        Ok(self.current().vsync)
    }

    fn href(&mut self) -> Result<bool, Infallible> {
        Ok(self.current().href)
    }

    fn pclk(&mut self) -> Result<bool, Infallible> {
        self.clock = !self.clock;
        if self.clock {
            self.tick += 1;
        }
        Ok(self.clock)
    }

    fn data(&mut self) -> Result<u8, Infallible> {
        Ok(self.current().data)
    }
}

/// Builds the sample script for a sequence of frames.
pub struct Timeline {
    samples: Vec<Sample>,
}

impl Timeline {
    pub fn new() -> Self {
        Timeline {
            samples: vec![IDLE; 3],
        }
    }

    pub fn idle(mut self, count: usize) -> Self {
        self.samples.extend(std::iter::repeat(IDLE).take(count));
        self
    }

    pub fn vsync(mut self) -> Self {
        self.samples.extend(std::iter::repeat(PULSE).take(3));
        self.idle(2)
    }

    pub fn line(mut self, data: &[u8]) -> Self {
        self.samples.extend(data.iter().map(|byte| Sample {
            vsync: false,
            href: true,
            data: *byte,
        }));
        self.idle(2)
    }

    /// A VSYNC pulse followed by `lines`.
    pub fn frame(self, lines: &[Vec<u8>]) -> Self {
        lines.iter().fold(self.vsync(), |t, line| t.line(line))
    }

    pub fn build(self) -> SimSensor {
        SimSensor::new(self.samples)
    }
}

/// `count` lines of `width` bytes with a recognisable pattern.
pub fn pattern_lines(count: usize, width: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|line| {
            (0..width)
                .map(|col| (line * 31 + col * 7) as u8)
                .collect()
        })
        .collect()
}
