//! Application constants and compile-time configuration.
//!
//! Project, topic and endpoint can be overridden at build time through the
//! `PUBSUB_PROJECT_ID`, `PUBSUB_TOPIC` and `PUBSUB_ENDPOINT` environment
//! variables.

use crate::domain::key::KeyCode;
use crate::traits::button::Active;

/// Key code emitted by the button driver.
pub const KEY_CODE: KeyCode = KeyCode::SPACE;

/// The button pulls the line low when pressed.
pub const BUTTON_ACTIVE: Active = Active::Low;

/// Label attached to every published message.
pub const PUBLISHER_LABEL: &str = "sample-button";

pub const PROJECT_ID: &str = match option_env!("PUBSUB_PROJECT_ID") {
    Some(id) => id,
    None => "sample-project",
};

pub const TOPIC: &str = match option_env!("PUBSUB_TOPIC") {
    Some(topic) => topic,
    None => "button-events",
};

/// Base URL of the Pub/Sub REST endpoint. Defaults to the local emulator.
pub const ENDPOINT: &str = match option_env!("PUBSUB_ENDPOINT") {
    Some(endpoint) => endpoint,
    None => "http://localhost:8085",
};

/// Name of the resource holding publisher credentials.
pub const CREDENTIALS_RESOURCE: &str = "credentials";

/// Shown once per press.
pub const ACKNOWLEDGMENT: &str = "Press attendance contact button!!";

/// Depth of the dispatcher event queue.
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Depth of the publish command queue.
pub const PUBLISH_QUEUE_DEPTH: usize = 4;

/// Runtime view of the settings above, handed to the controller at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonConfig {
    pub key_code: KeyCode,
    pub active: Active,
    pub label: &'static str,
    pub project_id: &'static str,
    pub topic: &'static str,
    pub credentials_resource: &'static str,
    pub acknowledgment: &'static str,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            key_code: KEY_CODE,
            active: BUTTON_ACTIVE,
            label: PUBLISHER_LABEL,
            project_id: PROJECT_ID,
            topic: TOPIC,
            credentials_resource: CREDENTIALS_RESOURCE,
            acknowledgment: ACKNOWLEDGMENT,
        }
    }
}
