//! Chat session - Connects a conversation store to a messaging transport.

use super::task::ScopedTask;
use crate::{
    core::ConversationStore,
    entities::{Message, SenderRole},
    errors::Result,
    services::{MessagingTransport, RetryPolicy, with_retry},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// One open chat screen.
///
/// Sent messages are echoed into the store immediately and published in the
/// background. Messages from the other party arrive through the transport
/// subscription.
pub struct ChatSession {
    role: SenderRole,
    ride_id: String,
    store: Arc<Mutex<ConversationStore>>,
    transport: Arc<dyn MessagingTransport>,
    retry: RetryPolicy,
    _inbound: ScopedTask,
    outbound: Vec<ScopedTask>,
}

impl ChatSession {
    /// Subscribes to the ride's chat and starts feeding replies into `store`.
    ///
    /// # Arguments
    /// * `store` - Conversation to append to, possibly already holding a welcome message
    /// * `role` - Who is typing on this device
    /// * `transport` - Message carrier
    /// * `retry` - Policy for subscribe and publish calls
    ///
    /// # Errors
    /// `Transport` if the subscription cannot be established.
    pub async fn open(
        store: ConversationStore,
        role: SenderRole,
        transport: Arc<dyn MessagingTransport>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let ride_id = store.ride_id().to_string();
        let mut inbox = with_retry(&retry, "subscribe", || transport.subscribe(&ride_id)).await?;
        let store = Arc::new(Mutex::new(store));

        let inbound_store = Arc::clone(&store);
        let inbound = ScopedTask::spawn("chat-inbound", async move {
            while let Some(incoming) = inbox.recv().await {
                let mut store = inbound_store.lock().await;
                if let Err(error) = store.receive(incoming) {
                    warn!(ride_id = store.ride_id(), %error, "Dropping inbound message");
                }
            }
            debug!("Chat subscription closed");
        });

        Ok(Self {
            role,
            ride_id,
            store,
            transport,
            retry,
            _inbound: inbound,
            outbound: Vec::new(),
        })
    }

    /// Ride this chat belongs to
    #[must_use]
    pub fn ride_id(&self) -> &str {
        &self.ride_id
    }

    /// Appends `body` to the conversation and publishes it.
    ///
    /// # Errors
    /// `EmptyMessage` if `body` is blank; nothing is appended or published.
    pub async fn send(&mut self, body: &str) -> Result<Message> {
        let message = self.store.lock().await.send(body, self.role)?.clone();
        self.publish(message.clone());
        Ok(message)
    }

    /// Shares this device's live location.
    pub async fn share_location(&mut self) -> Message {
        let message = self.store.lock().await.share_location(self.role).clone();
        self.publish(message.clone());
        message
    }

    /// Snapshot of the conversation
    pub async fn messages(&self) -> Vec<Message> {
        self.store.lock().await.messages().to_vec()
    }

    fn publish(&mut self, message: Message) {
        self.outbound.retain(|task| !task.is_finished());
        let transport = Arc::clone(&self.transport);
        let retry = self.retry;
        self.outbound.push(ScopedTask::spawn("chat-publish", async move {
            let published = with_retry(&retry, "publish", || transport.publish(&message)).await;
            if let Err(error) = published {
                warn!(message_id = %message.id, %error, "Failed to publish message");
            }
        }));
    }
}
