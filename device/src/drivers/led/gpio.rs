use crate::traits::led::Led;
use embedded_hal::digital::OutputPin;

/// LED on an exclusively-owned output line.
pub struct GpioLed<P>
where
    P: OutputPin,
{
    pin: P,
    state: bool,
}

impl<P> GpioLed<P>
where
    P: OutputPin,
{
    /// Take the line and drive it low.
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin, state: false })
    }
}

impl<P> Led for GpioLed<P>
where
    P: OutputPin,
{
    type Error = P::Error;

    fn set(&mut self, state: bool) -> Result<(), Self::Error> {
        match state {
            true => self.pin.set_high(),
            false => self.pin.set_low(),
        }?;
        self.state = state;
        Ok(())
    }

    fn state(&self) -> bool {
        self.state
    }

    /// Leaves the line low before giving it up.
    fn close(mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestPin;

    #[test]
    fn test_opens_low() {
        let pin = TestPin::new(true);
        let led = GpioLed::new(pin.clone()).unwrap();
        assert!(!pin.level());
        assert!(!led.state());
    }

    #[test]
    fn test_set_and_close() {
        let pin = TestPin::new(false);
        let mut led = GpioLed::new(pin.clone()).unwrap();
        led.on().unwrap();
        assert!(pin.level());
        assert!(led.state());

        led.close().unwrap();
        assert!(!pin.level());
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let pin = TestPin::new(false);
        let mut led = GpioLed::new(pin.clone()).unwrap();
        pin.set_failing(true);
        assert!(led.set(true).is_err());
        assert!(!led.state());
        assert!(GpioLed::new(pin).is_err());
    }
}
