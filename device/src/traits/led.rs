pub trait Led {
    type Error: embedded_hal::digital::Error;

    fn set(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Last value successfully written to the line.
    fn state(&self) -> bool;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }

    /// Release the underlying line.
    fn close(self) -> Result<(), Self::Error>
    where
        Self: Sized,
    {
        Ok(())
    }
}
