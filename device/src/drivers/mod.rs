pub mod button;
pub mod input;
pub mod led;
