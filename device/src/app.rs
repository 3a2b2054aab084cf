//! Button controller.
//!
//! Owns the LED, the button input driver and the optional publisher, and
//! reacts to key events drained from the dispatcher queue:
//!
//! * key-down: LED on, then notify once per press (acknowledge + publish),
//! * key-up: LED off, guard cleared.
//!
//! Every hardware failure is logged and the controller keeps running with
//! whatever is left.

use crate::bsp::Board;
use crate::config::ButtonConfig;
use crate::domain::key::{Event, KeyAction, KeyCode, KeyEvent};
use crate::drivers::input::ButtonInputDriver;
use crate::error::Error;
use crate::resources::{Credentials, Resources};
use crate::traits::{acknowledge::Acknowledge, led::Led, publisher::Publisher};
use embassy_futures::select::{select, Either};
use embassy_sync::channel::{DynamicReceiver, DynamicSender};
use embedded_hal::digital::Error as _;

pub struct ButtonController<'q, B, P, A>
where
    B: Board,
    P: Publisher,
    A: Acknowledge,
{
    led: Option<B::Led>,
    input: Option<ButtonInputDriver<'q, B::Button>>,
    publisher: Option<P>,
    ack: A,
    config: ButtonConfig,
    locked: bool,
}

impl<'q, B, P, A> ButtonController<'q, B, P, A>
where
    B: Board,
    P: Publisher,
    A: Acknowledge,
{
    /// Open the LED and button lines and construct the publisher.
    ///
    /// The publisher is only built when `resources` holds the configured
    /// credentials resource. Nothing here is fatal: whatever fails is logged
    /// and left absent.
    pub fn setup<R, F>(
        board: &mut B,
        config: ButtonConfig,
        queue: DynamicSender<'q, Event>,
        resources: &R,
        publisher: F,
        ack: A,
    ) -> Self
    where
        R: Resources,
        F: FnOnce(&ButtonConfig, &Credentials<'_>) -> Result<P, Error>,
    {
        info!("Configuring GPIO pins");
        let led = match board.open_led() {
            Ok(led) => Some(led),
            Err(e) => {
                error!("Error configuring LED GPIO: {:?}", e);
                None
            }
        };

        info!("Registering button driver");
        let input = match board.open_button(config.active) {
            Ok(button) => {
                let mut driver = ButtonInputDriver::new(button, config.key_code, queue);
                driver.register();
                Some(driver)
            }
            Err(e) => {
                error!("Error configuring button GPIO: {:?}", e);
                None
            }
        };

        let publisher = match resources.get(config.credentials_resource) {
            Some(data) => match Credentials::parse(data).and_then(|c| publisher(&config, &c)) {
                Ok(publisher) => Some(publisher),
                Err(e) => {
                    error!("Error creating publisher: {:?}", e);
                    None
                }
            },
            None => {
                info!(
                    "No '{}' resource, publishing disabled",
                    config.credentials_resource
                );
                None
            }
        };

        Self {
            led,
            input,
            publisher,
            ack,
            config,
            locked: false,
        }
    }

    pub fn on_key_down(&mut self, code: KeyCode) -> bool {
        if code != self.config.key_code {
            return false;
        }
        self.set_led_value(true);
        self.notify();
        true
    }

    pub fn on_key_up(&mut self, code: KeyCode) -> bool {
        if code != self.config.key_code {
            return false;
        }
        self.set_led_value(false);
        self.locked = false;
        true
    }

    /// Route a key event to its handler. Returns whether it was handled.
    pub fn dispatch(&mut self, event: KeyEvent) -> bool {
        match event.action {
            KeyAction::Down => self.on_key_down(event.code),
            KeyAction::Up => self.on_key_up(event.code),
        }
    }

    fn set_led_value(&mut self, value: bool) {
        match self.led.as_mut() {
            Some(led) => {
                if let Err(e) = led.set(value) {
                    error!("Error updating LED value: {:?}", e.kind());
                }
            }
            None => warn!("LED not available, dropping value {}", value),
        }
    }

    // Key repeat delivers more key-downs while held; only the first notifies.
    fn notify(&mut self) {
        if self.locked {
            return;
        }
        self.locked = true;
        self.ack.acknowledge(self.config.acknowledgment);
        if let Some(publisher) = self.publisher.as_mut() {
            publisher.start();
        }
    }

    fn close_input(&mut self) {
        if let Some(input) = self.input.take() {
            if let Err(e) = input.close() {
                error!("Error closing button driver: {:?}", e);
            }
        }
    }

    /// Release every handle. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.close_input();

        if let Some(led) = self.led.take() {
            if let Err(e) = led.close() {
                error!("Error closing LED GPIO: {:?}", e.kind());
            }
        }

        if let Some(mut publisher) = self.publisher.take() {
            publisher.close();
        }
    }

    /// Dispatch events until [`Event::Shutdown`], then tear down.
    ///
    /// Transitions picked up by the input driver go through `events` like
    /// any other event, so handlers never run concurrently.
    pub async fn run(&mut self, events: DynamicReceiver<'q, Event>) {
        loop {
            let event = if let Some(input) = self.input.as_mut() {
                let next = select(events.receive(), input.poll()).await;
                match next {
                    Either::First(event) => event,
                    Either::Second(Ok(_)) => continue,
                    Either::Second(Err(e)) => {
                        error!("Error reading button, disabling input: {:?}", e);
                        self.close_input();
                        continue;
                    }
                }
            } else {
                events.receive().await
            };

            match event {
                Event::Key(key) => {
                    if !self.dispatch(key) {
                        trace!("Unhandled {:?}", key);
                    }
                }
                Event::Shutdown => {
                    info!("Shutting down");
                    self.teardown();
                    return;
                }
            }
        }
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    /// Last value written to the LED, if it is open.
    pub fn led_state(&self) -> Option<bool> {
        self.led.as_ref().map(|led| led.state())
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    pub fn has_publisher(&self) -> bool {
        self.publisher.is_some()
    }
}

impl<'q, B, P, A> Drop for ButtonController<'q, B, P, A>
where
    B: Board,
    P: Publisher,
    A: Acknowledge,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::GpioBoard;
    use crate::resources::{Resource, StaticResources};
    use crate::testutil::{TestAcknowledge, TestPin, TestPublisher};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;

    static WITH_CREDENTIALS: [Resource<'static>; 1] =
        [Resource::new("credentials", br#"{"access_token":"secret"}"#)];
    static WITHOUT_CREDENTIALS: [Resource<'static>; 0] = [];

    type Controller<'q> = ButtonController<'q, GpioBoard<TestPin, TestPin>, TestPublisher, TestAcknowledge>;

    fn controller<'q, R: Resources>(
        queue: &'q Channel<NoopRawMutex, Event, 4>,
        led: &TestPin,
        resources: &R,
        publisher: &TestPublisher,
        ack: &TestAcknowledge,
    ) -> Controller<'q> {
        let mut board = GpioBoard::new(led.clone(), TestPin::new(true));
        let publisher = publisher.clone();
        ButtonController::setup(
            &mut board,
            ButtonConfig::default(),
            queue.sender().into(),
            resources,
            move |_, _| Ok(publisher),
            ack.clone(),
        )
    }

    #[test]
    fn test_key_down_then_up() {
        let queue = Channel::new();
        let led = TestPin::new(false);
        let publisher = TestPublisher::new();
        let ack = TestAcknowledge::new();
        let resources = StaticResources::new(&WITH_CREDENTIALS);
        let mut c = controller(&queue, &led, &resources, &publisher, &ack);
        assert!(c.has_publisher());
        assert_eq!(Some(false), c.led_state());

        assert!(c.on_key_down(KeyCode::SPACE));
        assert!(led.level());
        assert!(c.is_locked());
        assert_eq!(1, publisher.starts());
        assert_eq!(vec!["Press attendance contact button!!".to_string()], ack.messages());

        assert!(c.on_key_up(KeyCode::SPACE));
        assert!(!led.level());
        assert!(!c.is_locked());
    }

    #[test]
    fn test_repeat_does_not_notify_again() {
        let queue = Channel::new();
        let led = TestPin::new(false);
        let publisher = TestPublisher::new();
        let ack = TestAcknowledge::new();
        let resources = StaticResources::new(&WITH_CREDENTIALS);
        let mut c = controller(&queue, &led, &resources, &publisher, &ack);

        for _ in 0..5 {
            assert!(c.on_key_down(KeyCode::SPACE));
            assert_eq!(Some(true), c.led_state());
        }
        assert_eq!(1, publisher.starts());
        assert_eq!(1, ack.messages().len());

        c.on_key_up(KeyCode::SPACE);
        c.on_key_down(KeyCode::SPACE);
        assert_eq!(2, publisher.starts());
    }

    #[test]
    fn test_other_keys_ignored() {
        let queue = Channel::new();
        let led = TestPin::new(false);
        let publisher = TestPublisher::new();
        let ack = TestAcknowledge::new();
        let resources = StaticResources::new(&WITH_CREDENTIALS);
        let mut c = controller(&queue, &led, &resources, &publisher, &ack);

        assert!(!c.on_key_down(KeyCode::ENTER));
        assert!(!c.dispatch(KeyEvent::up(KeyCode::ENTER)));
        assert!(!led.level());
        assert_eq!(0, publisher.starts());
        assert!(!c.is_locked());
    }

    #[test]
    fn test_key_up_without_down() {
        let queue = Channel::new();
        let led = TestPin::new(false);
        let publisher = TestPublisher::new();
        let ack = TestAcknowledge::new();
        let resources = StaticResources::new(&WITHOUT_CREDENTIALS);
        let mut c = controller(&queue, &led, &resources, &publisher, &ack);

        assert!(c.on_key_up(KeyCode::SPACE));
        assert_eq!(Some(false), c.led_state());
        assert!(!c.is_locked());
    }

    #[test]
    fn test_no_credentials_no_publisher() {
        let queue = Channel::new();
        let led = TestPin::new(false);
        let publisher = TestPublisher::new();
        let ack = TestAcknowledge::new();
        let resources = StaticResources::new(&WITHOUT_CREDENTIALS);
        let mut c = controller(&queue, &led, &resources, &publisher, &ack);
        assert!(!c.has_publisher());

        c.on_key_down(KeyCode::SPACE);
        c.on_key_up(KeyCode::SPACE);
        c.on_key_down(KeyCode::SPACE);
        assert_eq!(0, publisher.starts());
        // The acknowledgment does not depend on the publisher.
        assert_eq!(2, ack.messages().len());
    }

    #[test]
    fn test_publisher_construction_failure() {
        let queue: Channel<NoopRawMutex, Event, 4> = Channel::new();
        let resources = StaticResources::new(&WITH_CREDENTIALS);
        let mut board = GpioBoard::new(TestPin::new(false), TestPin::new(true));
        let c: Controller<'_> = ButtonController::setup(
            &mut board,
            ButtonConfig::default(),
            queue.sender().into(),
            &resources,
            |_, _| Err(Error::Config),
            TestAcknowledge::new(),
        );
        assert!(!c.has_publisher());
        assert!(c.has_input());
    }

    #[test]
    fn test_led_failure_is_not_fatal() {
        let queue = Channel::new();
        let led = TestPin::new(false);
        led.set_failing(true);
        let publisher = TestPublisher::new();
        let ack = TestAcknowledge::new();
        let resources = StaticResources::new(&WITH_CREDENTIALS);
        let mut c = controller(&queue, &led, &resources, &publisher, &ack);
        assert_eq!(None, c.led_state());
        assert!(c.has_input());

        assert!(c.on_key_down(KeyCode::SPACE));
        assert_eq!(1, publisher.starts());
        assert!(c.on_key_up(KeyCode::SPACE));
        assert!(!c.is_locked());
    }

    #[test]
    fn test_led_write_failure_still_notifies() {
        let queue = Channel::new();
        let led = TestPin::new(false);
        let publisher = TestPublisher::new();
        let ack = TestAcknowledge::new();
        let resources = StaticResources::new(&WITH_CREDENTIALS);
        let mut c = controller(&queue, &led, &resources, &publisher, &ack);

        led.set_failing(true);
        assert!(c.on_key_down(KeyCode::SPACE));
        assert_eq!(Some(false), c.led_state());
        assert_eq!(1, publisher.starts());
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let queue = Channel::new();
        let led = TestPin::new(false);
        let publisher = TestPublisher::new();
        let ack = TestAcknowledge::new();
        let resources = StaticResources::new(&WITH_CREDENTIALS);
        let mut c = controller(&queue, &led, &resources, &publisher, &ack);
        c.on_key_down(KeyCode::SPACE);

        c.teardown();
        assert!(!led.level());
        assert!(!c.has_input());
        assert!(!c.has_publisher());
        assert_eq!(None, c.led_state());
        assert_eq!(1, publisher.closes());

        c.teardown();
        drop(c);
        assert_eq!(1, publisher.closes());
    }

    #[test]
    fn test_teardown_survives_failing_lines() {
        let queue: Channel<NoopRawMutex, Event, 4> = Channel::new();
        let led = TestPin::new(false);
        let button = TestPin::new(true);
        let publisher = TestPublisher::new();
        let ack = TestAcknowledge::new();
        let resources = StaticResources::new(&WITH_CREDENTIALS);
        let mut board = GpioBoard::new(led.clone(), button.clone());
        let mut c: Controller<'_> = ButtonController::setup(
            &mut board,
            ButtonConfig::default(),
            queue.sender().into(),
            &resources,
            {
                let publisher = publisher.clone();
                move |_, _| Ok(publisher)
            },
            ack.clone(),
        );
        assert!(c.on_key_down(KeyCode::SPACE));

        led.set_failing(true);
        button.set_failing(true);
        c.teardown();
        c.teardown();

        assert_eq!(1, publisher.closes());
        assert!(!c.has_publisher());
        assert!(!c.has_input());
        assert_eq!(None, c.led_state());
    }

    #[test]
    fn test_drop_tears_down() {
        let queue = Channel::new();
        let led = TestPin::new(false);
        let publisher = TestPublisher::new();
        let ack = TestAcknowledge::new();
        let resources = StaticResources::new(&WITH_CREDENTIALS);
        let c = controller(&queue, &led, &resources, &publisher, &ack);
        drop(c);
        assert_eq!(1, publisher.closes());
    }
}
