use crate::error::Error;

/// Request/response carrier used by the publish worker.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// POST a JSON `body` to `path`, authorized with a bearer `token`.
    ///
    /// Any non-success answer is reported as [`Error::Rejected`].
    async fn post(&mut self, path: &str, body: &[u8], token: &str) -> Result<(), Error>;
}
