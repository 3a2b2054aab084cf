/// A short, user-visible confirmation, shown once per press.
pub trait Acknowledge {
    fn acknowledge(&mut self, message: &str);
}

/// Writes acknowledgments to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAcknowledge;

impl Acknowledge for LogAcknowledge {
    fn acknowledge(&mut self, message: &str) {
        info!("{}", message);
    }
}
