//! Power-up sequencing for the PWDN and RESETB pads.

use core::convert::Infallible;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

/// Stand-in for a control pad that is not wired to the microcontroller.
pub struct NoPin;

impl OutputPin for NoPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Bring the sensor out of power down and reset. PWDN is active high, RESETB active low.
/// The master clock must be running before this is called.
pub fn power_up<PWDN, RST, D, E>(pwdn: &mut PWDN, reset: &mut RST, delay: &mut D) -> Result<(), E>
where
    PWDN: OutputPin<Error = E>,
    RST: OutputPin<Error = E>,
    D: DelayMs<u16>,
{
    reset.set_low()?;
    pwdn.set_high()?;
    delay.delay_ms(5);

    pwdn.set_low()?;
    delay.delay_ms(1);

    reset.set_high()?;
    // SCCB is usable 20ms after reset is released
    delay.delay_ms(20);

    Ok(())
}
