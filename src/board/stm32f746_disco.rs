//! Board specific functions for the STM32F746G Discovery Board.

use stm32f7xx_hal::{
    gpio::{self, Alternate, Output, PushPull, Speed, AF4},
    pac,
    prelude::*,
};

/// Type alias for the camera power down pin, active high.
pub type PowerDownPin = gpio::gpioh::PH13<Output<PushPull>>;

/// Configure the camera connector (P1) pins and return the ones the drivers need. Note that
/// the peripherals are stolen, so this should only be done during init to be safe.
///
/// Pin configuration:
///
///     I2C1 SCL:   PB8  --> OV5640 SIOC
///     I2C1 SDA:   PB9 <--> OV5640 SIOD
///     (HW OSC 24M)     --> OV5640 XCLK
///     DCMI_PWR:   PH13 --> OV5640 PWDN
///     PCLK:       PA6  <-- OV5640 PCLK
///     HREF:       PA4  <-- OV5640 HREF
///     VSYNC:      PG9  <-- OV5640 VSYNC
///     D0:         PH9  <-- OV5640 Y2
///     D1:         PH10 <-- OV5640 Y3
///     D2:         PH11 <-- OV5640 Y4
///     D3:         PH12 <-- OV5640 Y5
///     D4:         PH14 <-- OV5640 Y6
///     D5:         PD3  <-- OV5640 Y7
///     D6:         PE5  <-- OV5640 Y8
///     D7:         PE6  <-- OV5640 Y9
///
/// The parallel bus pins are handed to the DCMI, see `board::dcmi`.
pub fn configure_pins() -> (
    gpio::gpiob::PB8<Alternate<AF4>>,
    gpio::gpiob::PB9<Alternate<AF4>>,
    PowerDownPin,
) {
    let pac_periph = unsafe { pac::Peripherals::steal() };
    let gpioa = pac_periph.GPIOA.split();
    let gpiob = pac_periph.GPIOB.split();
    let gpiod = pac_periph.GPIOD.split();
    let gpioe = pac_periph.GPIOE.split();
    let gpiog = pac_periph.GPIOG.split();
    let gpioh = pac_periph.GPIOH.split();

    // Configure I2C1 for OV5640 SCCB
    let scl = gpiob
        .pb8
        .into_alternate_af4()
        .internal_pull_up(true)
        .set_open_drain();
    let sda = gpiob
        .pb9
        .into_alternate_af4()
        .internal_pull_up(true)
        .set_open_drain();

    // Camera starts powered down
    let pwdn = gpioh.ph13.into_push_pull_output();

    // Configure DCMI for OV5640 parallel
    let _dcmi_pclk = gpioa
        .pa6
        .into_alternate_af13()
        .internal_pull_up(true)
        .set_open_drain()
        .set_speed(Speed::VeryHigh);

    let _dcmi_href = gpioa
        .pa4
        .into_alternate_af13()
        .internal_pull_up(true)
        .set_open_drain()
        .set_speed(Speed::VeryHigh);

    let _dcmi_vsync = gpiog
        .pg9
        .into_alternate_af13()
        .internal_pull_up(true)
        .set_open_drain()
        .set_speed(Speed::VeryHigh);

    let _dcmi_d0 = gpioh
        .ph9
        .into_alternate_af13()
        .internal_pull_up(true)
        .set_open_drain()
        .set_speed(Speed::VeryHigh);

    let _dcmi_d1 = gpioh
        .ph10
        .into_alternate_af13()
        .internal_pull_up(true)
        .set_open_drain()
        .set_speed(Speed::VeryHigh);

    let _dcmi_d2 = gpioh
        .ph11
        .into_alternate_af13()
        .internal_pull_up(true)
        .set_open_drain()
        .set_speed(Speed::VeryHigh);

    let _dcmi_d3 = gpioh
        .ph12
        .into_alternate_af13()
        .internal_pull_up(true)
        .set_open_drain()
        .set_speed(Speed::VeryHigh);

    let _dcmi_d4 = gpioh
        .ph14
        .into_alternate_af13()
        .internal_pull_up(true)
        .set_open_drain()
        .set_speed(Speed::VeryHigh);

    let _dcmi_d5 = gpiod
        .pd3
        .into_alternate_af13()
        .internal_pull_up(true)
        .set_open_drain()
        .set_speed(Speed::VeryHigh);

    let _dcmi_d6 = gpioe
        .pe5
        .into_alternate_af13()
        .internal_pull_up(true)
        .set_open_drain()
        .set_speed(Speed::VeryHigh);

    let _dcmi_d7 = gpioe
        .pe6
        .into_alternate_af13()
        .internal_pull_up(true)
        .set_open_drain()
        .set_speed(Speed::VeryHigh);

    (scl, sda, pwdn)
}
