//! Board Support Packages (BSP).
//!
//! A board hands out the two lines the application needs. Each line can be
//! opened once; a second open reports [`Error::NotAvailable`].

use crate::drivers::{button::Button, led::GpioLed};
use crate::error::Error;
use crate::traits::{self, button::Active};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::digital::Wait;

pub trait Board {
    type Led: traits::led::Led;
    type Button: traits::button::Button;

    /// Open the LED line as an output, initially low.
    fn open_led(&mut self) -> Result<Self::Led, Error>;

    /// Open the button line as an input pressed at the `active` level.
    fn open_button(&mut self, active: Active) -> Result<Self::Button, Error>;
}

/// Board built from any pair of HAL pins.
pub struct GpioBoard<L, B>
where
    L: OutputPin,
    B: Wait + InputPin,
{
    led: Option<L>,
    button: Option<B>,
}

impl<L, B> GpioBoard<L, B>
where
    L: OutputPin,
    B: Wait + InputPin,
{
    pub fn new(led: L, button: B) -> Self {
        Self {
            led: Some(led),
            button: Some(button),
        }
    }

    /// A board where some lines are not wired, such as a carrier without
    /// an LED. Opening a missing line reports [`Error::NotAvailable`].
    pub fn partial(led: Option<L>, button: Option<B>) -> Self {
        Self { led, button }
    }
}

impl<L, B> Board for GpioBoard<L, B>
where
    L: OutputPin,
    B: Wait + InputPin,
{
    type Led = GpioLed<L>;
    type Button = Button<B>;

    fn open_led(&mut self) -> Result<Self::Led, Error> {
        let pin = self.led.take().ok_or(Error::NotAvailable)?;
        GpioLed::new(pin).map_err(|_| Error::Gpio)
    }

    fn open_button(&mut self, active: Active) -> Result<Self::Button, Error> {
        let pin = self.button.take().ok_or(Error::NotAvailable)?;
        Ok(Button::new(pin, active))
    }
}
