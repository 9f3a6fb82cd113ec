//! Capture frames from an OV5640 on the STM32F746G Discovery Board. Press the USER button to
//! grab a frame, a summary of it is printed over RTT.

#![no_main]
#![no_std]

mod util;

use ov5640_rs::board::{
    self,
    dcmi::{frame_bytes, Dcmi},
    stm32f746_disco::configure_pins,
    ButtonPin,
};
use ov5640_rs::ov5640::{power_up, ColorSpace, Config, NoPin, Ov5640, Resolution};

use core::cell::{Cell, RefCell};
use cortex_m::interrupt::{free, Mutex};
use cortex_m_rt::entry;
use rtt_target::{rprintln, rtt_init, set_print_channel};
use stm32f7xx_hal::{
    delay::Delay,
    gpio::ExtiPin,
    i2c::{BlockingI2c, Mode},
    interrupt, pac,
    prelude::*,
    rcc::{HSEClock, HSEClockMode},
};

#[cfg(feature = "qqvga")]
const RESOLUTION: Resolution = Resolution::Qqvga;
#[cfg(feature = "qqvga")]
const FRAME_SIZE: usize = 160 * 120 * 2;

#[cfg(feature = "qvga")]
const RESOLUTION: Resolution = Resolution::Qvga;
#[cfg(feature = "qvga")]
const FRAME_SIZE: usize = 320 * 240 * 2;

/// RGB565 frame buffer in internal SRAM, word aligned for DMA.
static mut FRAME: [u32; FRAME_SIZE / 4] = [0; FRAME_SIZE / 4];

// Shared memory between main thread and interrupts
static SHUTTER: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));
static BUTTON: Mutex<RefCell<Option<ButtonPin>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Setup RTT for logging
    let channels = rtt_init! {
        up: {
            0: {
                size: 4096
                mode: BlockIfFull
                name: "Terminal"
            }
        }
    };

    set_print_channel(channels.up.0);

    // Get peripherals
    let pac_periph = pac::Peripherals::take().unwrap();
    let cm_periph = cortex_m::Peripherals::take().unwrap();

    // USER button is the shutter
    let mut rcc_regs = pac_periph.RCC;
    let button = board::setup_button(
        &mut rcc_regs,
        pac_periph.SYSCFG,
        pac_periph.EXTI,
        pac_periph.GPIOI,
    );
    free(|cs| *BUTTON.borrow(cs).borrow_mut() = Some(button));

    // Discovery board: HSE = 25 MHz, SYSCLK = 216 MHz
    let mut rcc = rcc_regs.constrain();
    let hse_cfg = HSEClock::new(board::get_xtal(), HSEClockMode::Oscillator);
    let clocks = rcc.cfgr.hse(hse_cfg).sysclk(216.mhz()).freeze();

    // Delay configuration
    let mut delay = Delay::new(cm_periph.SYST, clocks);

    // GPIO configuration, the camera module has its own 24 MHz oscillator for XCLK
    let (scl, sda, mut pwdn) = configure_pins();
    power_up(&mut pwdn, &mut NoPin, &mut delay).unwrap();

    // I2C1 configuration (SCCB)
    let i2c = BlockingI2c::i2c1(
        pac_periph.I2C1,
        (scl, sda),
        Mode::standard(100.khz()),
        clocks,
        &mut rcc.apb1,
        10000,
    );

    let config = Config {
        resolution: RESOLUTION,
        color_space: ColorSpace::Rgb565,
        ..Config::default()
    };
    // The DCMI reads the parallel bus, the driver only needs the SCCB port
    let mut camera = match Ov5640::new(i2c, (), &mut delay, config) {
        Ok(camera) => camera,
        Err(e) => {
            rprintln!("OV5640 init failed: {:?}", e);
            loop {}
        }
    };

    match camera.chip_id() {
        Ok(id) => rprintln!("OV5640 chip ID 0x{:04X}", id),
        Err(e) => rprintln!("OV5640 chip ID read failed: {:?}", e),
    }
    rprintln!(
        "{}x{} RGB565, {} byte frames",
        camera.width(),
        camera.height(),
        camera.capture_buffer_size()
    );

    let mut dcmi = Dcmi::new(pac_periph.DCMI, pac_periph.DMA2);

    unsafe {
        cortex_m::peripheral::NVIC::unmask(pac::Interrupt::EXTI15_10);
    }

    let frame = unsafe { &mut FRAME };

    loop {
        let shutter = free(|cs| SHUTTER.borrow(cs).replace(false));
        if !shutter {
            continue;
        }

        let format = camera.frame_format();
        match dcmi.capture(&format, camera.capture_timeout(), &mut frame[..]) {
            Ok(len) => util::frame_summary(&frame_bytes(&frame[..])[..len]),
            Err(e) => rprintln!("Capture failed: {:?}", e),
        }
    }
}

#[interrupt]
fn EXTI15_10() {
    free(|cs| {
        if let Some(button) = BUTTON.borrow(cs).borrow_mut().as_mut() {
            button.clear_interrupt_pending_bit();
        }
        SHUTTER.borrow(cs).set(true);
    });
}
