//! Message entity - One entry in a ride's chat log.
//!
//! Messages are immutable once created. The conversation store assigns ids and
//! timestamps; transports only deliver [`IncomingMessage`] payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the ride sent a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    /// The passenger
    Rider,
    /// The driver
    Driver,
}

impl SenderRole {
    /// The other party in the conversation.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Rider => Self::Driver,
            Self::Driver => Self::Rider,
        }
    }
}

impl fmt::Display for SenderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rider => write!(f, "rider"),
            Self::Driver => write!(f, "driver"),
        }
    }
}

/// How a message is rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain chat text
    #[default]
    Text,
    /// A live-location share
    Location,
    /// A notice generated by the app
    System,
}

/// Message model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for the message
    pub id: String,
    /// Ride this conversation belongs to
    pub ride_id: String,
    /// Who sent the message
    pub sender: SenderRole,
    /// Message text
    pub body: String,
    /// Rendering kind
    pub kind: MessageKind,
    /// When the message was appended to the log
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Time of day as shown under a chat bubble, e.g. "2:30 PM".
    #[must_use]
    pub fn time_label(&self) -> String {
        self.timestamp.format("%-I:%M %p").to_string()
    }
}

/// Message payload delivered by a transport, before the store stamps it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Who sent the message
    pub sender: SenderRole,
    /// Message text
    pub body: String,
    /// Rendering kind
    #[serde(default)]
    pub kind: MessageKind,
}

impl IncomingMessage {
    /// A plain text message from `sender`.
    pub fn text(sender: SenderRole, body: impl Into<String>) -> Self {
        Self {
            sender,
            body: body.into(),
            kind: MessageKind::Text,
        }
    }
}
