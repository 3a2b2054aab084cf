pub mod acknowledge;
pub mod button;
pub mod led;
pub mod publisher;
pub mod transport;
