//! Test doubles for pins, publishers, acknowledgments and transports.
//!
//! Every double is a cheap handle around shared state, so a test can keep
//! one clone for inspection while the code under test owns another.

use crate::error::Error;
use crate::traits::{acknowledge::Acknowledge, publisher::Publisher, transport::Transport};
use core::cell::{Cell, RefCell};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use embedded_hal_async::digital::Wait;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestPinError;

impl embedded_hal::digital::Error for TestPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

struct InnerPin {
    level: Cell<bool>,
    failing: Cell<bool>,
    edge: Signal<NoopRawMutex, ()>,
}

/// A pin usable both as input and output, driven from the test.
#[derive(Clone)]
pub struct TestPin {
    inner: Rc<InnerPin>,
}

impl TestPin {
    pub fn new(initial: bool) -> Self {
        Self {
            inner: Rc::new(InnerPin {
                level: Cell::new(initial),
                failing: Cell::new(false),
                edge: Signal::new(),
            }),
        }
    }

    /// Change the line level and raise an edge.
    pub fn set_level(&self, high: bool) {
        self.inner.level.set(high);
        self.inner.edge.signal(());
    }

    /// Raise an edge without changing the level.
    pub fn pulse(&self) {
        self.inner.edge.signal(());
    }

    pub fn level(&self) -> bool {
        self.inner.level.get()
    }

    /// Make every subsequent read, write and wait fail.
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.set(failing);
    }

    fn check(&self) -> Result<(), TestPinError> {
        if self.inner.failing.get() {
            Err(TestPinError)
        } else {
            Ok(())
        }
    }
}

impl ErrorType for TestPin {
    type Error = TestPinError;
}

impl InputPin for TestPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(!self.level())
    }
}

impl OutputPin for TestPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.inner.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.inner.level.set(true);
        Ok(())
    }
}

impl Wait for TestPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        while !self.is_high()? {
            self.wait_for_any_edge().await?;
        }
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        while !self.is_low()? {
            self.wait_for_any_edge().await?;
        }
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        loop {
            self.wait_for_any_edge().await?;
            if self.level() {
                return Ok(());
            }
        }
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        loop {
            self.wait_for_any_edge().await?;
            if !self.level() {
                return Ok(());
            }
        }
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.inner.edge.wait().await;
        self.check()
    }
}

#[derive(Default)]
struct PublisherLog {
    starts: Cell<usize>,
    closes: Cell<usize>,
}

/// Publisher that only counts calls.
#[derive(Clone, Default)]
pub struct TestPublisher {
    log: Rc<PublisherLog>,
}

impl TestPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts(&self) -> usize {
        self.log.starts.get()
    }

    pub fn closes(&self) -> usize {
        self.log.closes.get()
    }
}

impl Publisher for TestPublisher {
    fn start(&mut self) {
        self.log.starts.set(self.log.starts.get() + 1);
    }

    fn close(&mut self) {
        self.log.closes.set(self.log.closes.get() + 1);
    }
}

/// Records every acknowledgment shown.
#[derive(Clone, Default)]
pub struct TestAcknowledge {
    messages: Rc<RefCell<Vec<String>>>,
}

impl TestAcknowledge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Acknowledge for TestAcknowledge {
    fn acknowledge(&mut self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub path: String,
    pub body: String,
    pub token: String,
}

struct TransportLog {
    posts: RefCell<Vec<Post>>,
    result: Cell<Result<(), Error>>,
}

/// Transport that records requests and answers with a preset result.
#[derive(Clone)]
pub struct RecordingTransport {
    log: Rc<TransportLog>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            log: Rc::new(TransportLog {
                posts: RefCell::new(Vec::new()),
                result: Cell::new(Ok(())),
            }),
        }
    }

    pub fn set_result(&self, result: Result<(), Error>) {
        self.log.result.set(result);
    }

    pub fn posts(&self) -> Vec<Post> {
        self.log.posts.borrow().clone()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for RecordingTransport {
    async fn post(&mut self, path: &str, body: &[u8], token: &str) -> Result<(), Error> {
        self.log.posts.borrow_mut().push(Post {
            path: path.to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
            token: token.to_string(),
        });
        self.log.result.get()
    }
}
