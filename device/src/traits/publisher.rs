/// Outbound notification channel.
///
/// Both calls return immediately. Delivery happens elsewhere and its outcome
/// is never reported back to the caller.
pub trait Publisher {
    /// Begin publishing one notification.
    fn start(&mut self);

    /// Stop accepting notifications and release the remote session.
    fn close(&mut self);
}
