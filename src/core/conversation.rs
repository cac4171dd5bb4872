//! Conversation store - The append-only chat log for one ride.
//!
//! Messages are appended in O(1) and never edited or removed. Timestamps come
//! from the wall clock but never go backwards, so insertion order and timestamp
//! order agree.

use crate::{
    entities::{IncomingMessage, Message, MessageKind, SenderRole},
    errors::{Error, Result},
};
use chrono::Utc;
use tracing::trace;
use uuid::Uuid;

/// Reply appended by [`ConversationStore::simulate_remote_reply`]
pub const CANNED_REPLY: &str = "Got it! See you soon.";

/// Chat log for a single ride
#[derive(Debug, Clone)]
pub struct ConversationStore {
    ride_id: String,
    messages: Vec<Message>,
    canned_reply: String,
}

impl ConversationStore {
    /// An empty conversation for `ride_id`.
    pub fn new(ride_id: impl Into<String>) -> Self {
        Self {
            ride_id: ride_id.into(),
            messages: Vec::new(),
            canned_reply: CANNED_REPLY.to_string(),
        }
    }

    /// Replaces the text used by [`ConversationStore::simulate_remote_reply`].
    #[must_use]
    pub fn with_canned_reply(mut self, reply: impl Into<String>) -> Self {
        self.canned_reply = reply.into();
        self
    }

    /// Ride this conversation belongs to
    #[must_use]
    pub fn ride_id(&self) -> &str {
        &self.ride_id
    }

    /// All messages in insertion order
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if nothing has been said yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends a text message from `sender` and returns it for local echo.
    pub fn send(&mut self, body: &str, sender: SenderRole) -> Result<&Message> {
        if body.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }
        Ok(self.append(sender, body.to_string(), MessageKind::Text))
    }

    /// Appends a message delivered by a transport.
    pub fn receive(&mut self, incoming: IncomingMessage) -> Result<&Message> {
        if incoming.body.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }
        Ok(self.append(incoming.sender, incoming.body, incoming.kind))
    }

    /// Appends the canned driver reply.
    pub fn simulate_remote_reply(&mut self) -> &Message {
        let reply = self.canned_reply.clone();
        self.append(SenderRole::Driver, reply, MessageKind::Text)
    }

    /// Appends a live-location share from `sender`.
    pub fn share_location(&mut self, sender: SenderRole) -> &Message {
        let body = match sender {
            SenderRole::Driver => "Driver shared live location",
            SenderRole::Rider => "Rider shared live location",
        };
        self.append(sender, body.to_string(), MessageKind::Location)
    }

    /// Appends an app notice. System notices are attributed to the driver side.
    pub fn post_system(&mut self, body: impl Into<String>) -> &Message {
        self.append(SenderRole::Driver, body.into(), MessageKind::System)
    }

    fn append(&mut self, sender: SenderRole, body: String, kind: MessageKind) -> &Message {
        let now = Utc::now();
        let timestamp = self
            .messages
            .last()
            .map_or(now, |last| last.timestamp.max(now));
        let message = Message {
            id: Uuid::new_v4().to_string(),
            ride_id: self.ride_id.clone(),
            sender,
            body,
            kind,
            timestamp,
        };
        trace!(ride_id = %self.ride_id, %sender, ?kind, "Appending message");
        let index = self.messages.len();
        self.messages.push(message);
        &self.messages[index]
    }
}
