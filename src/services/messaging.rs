//! Chat transport port.
//!
//! A transport carries rider and driver messages between devices. Conversation
//! stores never talk to a transport directly: a chat session publishes what
//! the local user sends and feeds what the subscription yields back into the
//! store.

use crate::{
    core::conversation::CANNED_REPLY,
    entities::{IncomingMessage, Message, MessageKind, SenderRole},
    errors::{Error, Result},
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Delivers chat messages for a ride.
#[async_trait]
pub trait MessagingTransport: Send + Sync {
    /// Sends a locally created message to the other party.
    async fn publish(&self, message: &Message) -> Result<()>;

    /// Streams messages from the other party on `ride_id`.
    async fn subscribe(&self, ride_id: &str) -> Result<mpsc::UnboundedReceiver<IncomingMessage>>;
}

type Subscribers = HashMap<String, Vec<mpsc::UnboundedSender<IncomingMessage>>>;

/// In-process transport that answers every rider text with a canned driver reply.
///
/// The reply is delivered from inside `publish` after the configured delay, so
/// dropping the publishing future also drops the pending reply.
///
/// # Defaults
/// * `reply_delay`: 1 second
/// * `reply`: "Got it! See you soon."
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    reply_delay: Duration,
    reply: String,
    subscribers: Arc<Mutex<Subscribers>>,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), CANNED_REPLY)
    }
}

impl SimulatedTransport {
    /// A transport that replies with `reply` after `reply_delay`.
    pub fn new(reply_delay: Duration, reply: impl Into<String>) -> Self {
        Self {
            reply_delay,
            reply: reply.into(),
            subscribers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Pushes `incoming` to every live subscriber of `ride_id` and returns how many received it.
    ///
    /// Subscribers whose receiver has been dropped are pruned, and a ride left
    /// with none is forgotten.
    pub fn deliver(&self, ride_id: &str, incoming: &IncomingMessage) -> Result<usize> {
        let mut subscribers = self.registry()?;
        let Some(senders) = subscribers.get_mut(ride_id) else {
            return Ok(0);
        };
        senders.retain(|sender| sender.send(incoming.clone()).is_ok());
        let delivered = senders.len();
        if delivered == 0 {
            subscribers.remove(ride_id);
        }
        trace!(ride_id, delivered, "Delivered message");
        Ok(delivered)
    }

    /// Number of rides with at least one registered subscriber
    pub fn registered_rides(&self) -> Result<usize> {
        Ok(self.registry()?.len())
    }

    /// Number of subscribers registered for `ride_id`, including any not yet pruned
    pub fn registered_subscribers(&self, ride_id: &str) -> Result<usize> {
        Ok(self.registry()?.get(ride_id).map_or(0, Vec::len))
    }

    fn registry(&self) -> Result<MutexGuard<'_, Subscribers>> {
        self.subscribers.lock().map_err(|_| Error::Transport {
            message: "subscriber registry poisoned".to_string(),
        })
    }
}

#[async_trait]
impl MessagingTransport for SimulatedTransport {
    async fn publish(&self, message: &Message) -> Result<()> {
        if message.sender != SenderRole::Rider || message.kind != MessageKind::Text {
            return Ok(());
        }
        debug!(ride_id = %message.ride_id, delay = ?self.reply_delay, "Scheduling simulated reply");
        tokio::time::sleep(self.reply_delay).await;
        let reply = IncomingMessage::text(message.sender.counterpart(), self.reply.clone());
        self.deliver(&message.ride_id, &reply)?;
        Ok(())
    }

    async fn subscribe(&self, ride_id: &str) -> Result<mpsc::UnboundedReceiver<IncomingMessage>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut subscribers = self.registry()?;
        subscribers.retain(|_, senders| {
            senders.retain(|sender| !sender.is_closed());
            !senders.is_empty()
        });
        subscribers
            .entry(ride_id.to_string())
            .or_default()
            .push(sender);
        debug!(ride_id, "Subscribed to ride chat");
        Ok(receiver)
    }
}
