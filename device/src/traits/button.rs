/// Transition reported by a [`Button`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Pressed,
    Released,
}

/// Level of the input line that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Active {
    High,
    Low,
}

impl Active {
    /// Map a sampled line level to a button event.
    pub fn event(self, high: bool) -> Event {
        match (self, high) {
            (Active::High, true) | (Active::Low, false) => Event::Pressed,
            (Active::High, false) | (Active::Low, true) => Event::Released,
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Button {
    type Error: embedded_hal::digital::Error;

    /// Wait for the next level transition and report what it means.
    async fn wait_any(&mut self) -> Result<Event, Self::Error>;

    /// Wait until the button is released.
    async fn wait_released(&mut self) -> Result<(), Self::Error> {
        while self.wait_any().await? != Event::Released {}
        Ok(())
    }

    /// Release the underlying line.
    fn close(self) -> Result<(), Self::Error>
    where
        Self: Sized,
    {
        Ok(())
    }
}
