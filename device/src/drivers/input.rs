//! Input driver turning button transitions into key events.
//!
//! The driver does not call any handler itself. Every transition observed
//! while registered is enqueued on the dispatcher queue, and whoever drains
//! that queue decides what a key event means.

use crate::domain::key::{Event, KeyCode, KeyEvent};
use crate::error::Error;
use crate::traits::button::{Button, Event as ButtonEvent};
use embassy_sync::channel::{DynamicSender, TrySendError};
use embedded_hal::digital::Error as _;

pub struct ButtonInputDriver<'q, B>
where
    B: Button,
{
    button: B,
    code: KeyCode,
    queue: DynamicSender<'q, Event>,
    registered: bool,
}

impl<'q, B> ButtonInputDriver<'q, B>
where
    B: Button,
{
    pub fn new(button: B, code: KeyCode, queue: DynamicSender<'q, Event>) -> Self {
        Self {
            button,
            code,
            queue,
            registered: false,
        }
    }

    /// Start forwarding transitions to the queue.
    pub fn register(&mut self) {
        if !self.registered {
            debug!("Registering input driver for {:?}", self.code);
            self.registered = true;
        }
    }

    /// Stop forwarding. Transitions are still consumed, but dropped.
    pub fn unregister(&mut self) {
        if self.registered {
            debug!("Unregistering input driver for {:?}", self.code);
            self.registered = false;
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Wait for the next transition and forward it.
    ///
    /// Returns the key event that was enqueued, if any. A full queue drops
    /// the event.
    pub async fn poll(&mut self) -> Result<Option<KeyEvent>, Error> {
        let event = self.button.wait_any().await.map_err(|e| {
            warn!("Button read failed: {:?}", e.kind());
            Error::Gpio
        })?;
        if !self.registered {
            trace!("Ignoring {:?}, driver not registered", event);
            return Ok(None);
        }

        let key = match event {
            ButtonEvent::Pressed => KeyEvent::down(self.code),
            ButtonEvent::Released => KeyEvent::up(self.code),
        };

        match self.queue.try_send(Event::Key(key)) {
            Ok(()) => {
                trace!("Enqueued {:?}", key);
                Ok(Some(key))
            }
            Err(TrySendError::Full(_)) => {
                warn!("Dropping {:?}: {:?}", key, Error::QueueFull);
                Ok(None)
            }
        }
    }

    /// Unregister and release the button.
    pub fn close(mut self) -> Result<(), Error> {
        self.unregister();
        self.button.close().map_err(|e| {
            warn!("Button release failed: {:?}", e.kind());
            Error::Gpio
        })
    }
}
