//! Crate-wide error type.
//!
//! Variants carry only fixed-size data so the type stays usable without
//! `alloc`. Hardware and network failures are logged where they happen;
//! this type only travels as far as the controller.

/// Errors surfaced by drivers, clients and setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A GPIO line could not be opened, configured, read or written.
    Gpio,
    /// The requested peripheral or resource does not exist on this board.
    NotAvailable,
    /// The credentials resource could not be parsed or is incomplete.
    Credentials,
    /// A configuration value is empty or does not fit its buffer.
    Config,
    /// A bounded queue had no room for another item.
    QueueFull,
    /// Connecting to or talking with the remote endpoint failed.
    Network,
    /// The remote endpoint answered with a non-success status.
    Rejected,
    /// A message could not be encoded.
    Encode,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::Gpio => "gpio failure",
            Error::NotAvailable => "not available",
            Error::Credentials => "invalid credentials",
            Error::Config => "invalid configuration",
            Error::QueueFull => "queue full",
            Error::Network => "network failure",
            Error::Rejected => "rejected by remote",
            Error::Encode => "encoding failure",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
