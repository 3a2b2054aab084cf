#![cfg_attr(not(feature = "std"), no_std)]
//! A push button, an LED and a cloud notification.
//!
//! The button line is wrapped by an input driver that turns level
//! transitions into key events on a queue. A [`ButtonController`] drains
//! that queue: pressing the action key lights the LED and, once per press,
//! shows an acknowledgment and asks the publisher to send a message to a
//! Cloud Pub/Sub topic. Releasing the key turns the LED off again.
//!
//! # Example
//!
//! ```ignore
//! let events: Channel<NoopRawMutex, Event, EVENT_QUEUE_DEPTH> = Channel::new();
//! let commands = PublishChannel::<PUBLISH_QUEUE_DEPTH>::new();
//!
//! let mut controller = ButtonController::setup(
//!     &mut GpioBoard::new(led_pin, button_pin),
//!     ButtonConfig::default(),
//!     events.sender().into(),
//!     &RESOURCES,
//!     |config, credentials| {
//!         PubsubPublisher::new(
//!             config.label,
//!             config.project_id,
//!             config.topic,
//!             credentials,
//!             commands.sender().into(),
//!         )
//!     },
//!     LogAcknowledge,
//! );
//!
//! let mut worker = PubsubWorker::new(
//!     HttpTransport::new(&tcp, &dns, ENDPOINT),
//!     commands.receiver().into(),
//! );
//! join(controller.run(events.receiver().into()), worker.run()).await;
//! ```

pub(crate) mod fmt;

pub mod app;
pub mod bsp;
pub mod clients;
pub mod config;
pub mod domain;
pub mod drivers;
pub mod error;
pub mod resources;
pub mod traits;

pub use app::ButtonController;
pub use bsp::{Board, GpioBoard};
pub use config::ButtonConfig;
pub use domain::key::{Event, KeyAction, KeyCode, KeyEvent};
pub use error::Error;

#[cfg(feature = "std")]
pub mod testutil;
