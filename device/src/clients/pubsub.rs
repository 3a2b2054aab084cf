//! Cloud Pub/Sub publisher.
//!
//! Publishing is split in two halves sharing a command queue:
//!
//! * [`PubsubPublisher`] is the handle held by the controller. `start()`
//!   only enqueues a request and returns.
//! * [`PubsubWorker`] runs as its own task, drains the queue and talks to
//!   the REST endpoint through a [`Transport`].
//!
//! Failed requests are logged and forgotten.

use crate::error::Error;
use crate::resources::Credentials;
use crate::traits::{publisher::Publisher, transport::Transport};
use core::fmt::Write;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, DynamicReceiver, DynamicSender, TrySendError};
use heapless::String;
use serde::Serialize;

/// Event name attached to every message.
const PRESSED: &str = "pressed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub label: String<32>,
    pub project_id: String<64>,
    pub topic: String<64>,
    pub token: String<512>,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Publish(PublishRequest),
    Close,
}

/// Command queue between a [`PubsubPublisher`] and its [`PubsubWorker`].
pub type PublishChannel<const N: usize> = Channel<NoopRawMutex, Command, N>;

fn bounded<const N: usize>(value: &str) -> Result<String<N>, Error> {
    let mut s = String::new();
    s.push_str(value).map_err(|_| Error::Config)?;
    Ok(s)
}

pub struct PubsubPublisher<'a> {
    request: PublishRequest,
    commands: DynamicSender<'a, Command>,
    closed: bool,
}

impl<'a> PubsubPublisher<'a> {
    /// Create a publisher for `topic` in `project_id`.
    ///
    /// A `project_id` carried by the credentials takes precedence.
    pub fn new(
        label: &str,
        project_id: &str,
        topic: &str,
        credentials: &Credentials<'_>,
        commands: DynamicSender<'a, Command>,
    ) -> Result<Self, Error> {
        let project_id = credentials.project_id.unwrap_or(project_id);
        if label.is_empty() || project_id.is_empty() || topic.is_empty() {
            return Err(Error::Config);
        }
        if credentials.access_token.is_empty() {
            return Err(Error::Credentials);
        }

        let request = PublishRequest {
            label: bounded(label)?,
            project_id: bounded(project_id)?,
            topic: bounded(topic)?,
            token: bounded(credentials.access_token).map_err(|_| Error::Credentials)?,
            sequence: 0,
        };
        info!(
            "Publishing to projects/{}/topics/{}",
            request.project_id.as_str(),
            request.topic.as_str()
        );
        Ok(Self {
            request,
            commands,
            closed: false,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<'a> Publisher for PubsubPublisher<'a> {
    fn start(&mut self) {
        if self.closed {
            debug!("Publisher closed, ignoring start");
            return;
        }
        self.request.sequence = self.request.sequence.wrapping_add(1);
        let sequence = self.request.sequence;
        match self.commands.try_send(Command::Publish(self.request.clone())) {
            Ok(()) => debug!("Queued publish #{}", sequence),
            Err(TrySendError::Full(_)) => {
                warn!("Dropping publish #{}: {:?}", sequence, Error::QueueFull)
            }
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(TrySendError::Full(_)) = self.commands.try_send(Command::Close) {
            warn!("Worker not told to close: {:?}", Error::QueueFull);
        }
    }
}

#[derive(Serialize)]
struct Attributes<'a> {
    label: &'a str,
    event: &'a str,
    sequence: &'a str,
}

#[derive(Serialize)]
struct Message<'a> {
    attributes: Attributes<'a>,
}

#[derive(Serialize)]
struct PublishBody<'a> {
    messages: &'a [Message<'a>],
}

/// REST path of the `topics.publish` call.
pub fn publish_path(request: &PublishRequest) -> Result<String<192>, Error> {
    let mut path = String::new();
    write!(
        path,
        "/v1/projects/{}/topics/{}:publish",
        request.project_id, request.topic
    )
    .map_err(|_| Error::Config)?;
    Ok(path)
}

/// JSON body of the `topics.publish` call.
pub fn publish_body(request: &PublishRequest) -> Result<String<256>, Error> {
    let mut sequence: String<10> = String::new();
    write!(sequence, "{}", request.sequence).map_err(|_| Error::Encode)?;
    let messages = [Message {
        attributes: Attributes {
            label: &request.label,
            event: PRESSED,
            sequence: &sequence,
        },
    }];
    serde_json_core::to_string(&PublishBody {
        messages: &messages,
    })
    .map_err(|_| Error::Encode)
}

pub struct PubsubWorker<'a, T>
where
    T: Transport,
{
    transport: T,
    commands: DynamicReceiver<'a, Command>,
}

impl<'a, T> PubsubWorker<'a, T>
where
    T: Transport,
{
    pub fn new(transport: T, commands: DynamicReceiver<'a, Command>) -> Self {
        Self {
            transport,
            commands,
        }
    }

    /// Serve publish requests until the publisher is closed.
    pub async fn run(&mut self) {
        loop {
            match self.commands.receive().await {
                Command::Publish(request) => match self.publish(&request).await {
                    Ok(()) => info!("Published #{}", request.sequence),
                    Err(e) => warn!("Error publishing #{}: {:?}", request.sequence, e),
                },
                Command::Close => {
                    info!("Publisher closed");
                    return;
                }
            }
        }
    }

    pub async fn publish(&mut self, request: &PublishRequest) -> Result<(), Error> {
        let path = publish_path(request)?;
        let body = publish_body(request)?;
        trace!("POST {} {}", path.as_str(), body.as_str());
        self.transport
            .post(&path, body.as_bytes(), &request.token)
            .await
    }
}
