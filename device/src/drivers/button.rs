use crate::traits::button::{Active, Button as ButtonTrait, Event};
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

/// Push button on an edge-waiting input line.
///
/// Each edge is followed by a level read, so a bounce that ends on the same
/// level as it started reports the same event twice.
pub struct Button<P>
where
    P: Wait + InputPin,
{
    pin: P,
    active: Active,
}

impl<P> Button<P>
where
    P: Wait + InputPin,
{
    pub fn new(pin: P, active: Active) -> Self {
        Self { pin, active }
    }

    pub fn is_pressed(&mut self) -> Result<bool, P::Error> {
        let high = self.pin.is_high()?;
        Ok(self.active.event(high) == Event::Pressed)
    }
}

impl<P> ButtonTrait for Button<P>
where
    P: Wait + InputPin,
{
    type Error = P::Error;

    async fn wait_any(&mut self) -> Result<Event, Self::Error> {
        self.pin.wait_for_any_edge().await?;
        let high = self.pin.is_high()?;
        Ok(self.active.event(high))
    }

    /// Samples the line once more, so a dead input is reported on release.
    fn close(mut self) -> Result<(), Self::Error> {
        self.pin.is_high().map(|_| ())
    }
}
