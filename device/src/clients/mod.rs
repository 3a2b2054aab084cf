pub mod http;
pub mod pubsub;
