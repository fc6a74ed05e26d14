/// Shared types for the dashboard: the conversation and message rows as the
/// data source stores them, plus the change-feed payload.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who answers a conversation: the bot or a human operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Ai,
    Human,
}

impl Mode {
    /// The mode a toggle switches to.
    pub fn opposite(self) -> Self {
        match self {
            Mode::Ai => Mode::Human,
            Mode::Human => Mode::Ai,
        }
    }

    /// Wire value for the toggle webhook ("AI" / "HUMAN").
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Ai => "AI",
            Mode::Human => "HUMAN",
        }
    }
}

/// Originator class of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Customer,
    Ai,
    Human,
    System,
}

/// One conversation thread with a WhatsApp contact.
///
/// Rows are created and mutated by the external pipeline (first inbound
/// message, metadata extraction, mode flips); the dashboard only flips
/// `mode` optimistically after a successful webhook call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    /// WhatsApp contact identifier (phone number without the `+`).
    pub wa_id: String,
    pub name: Option<String>,
    pub mode: Mode,
    pub lead_status: String,
    pub origin_city: Option<String>,
    pub destination_city: Option<String>,
    pub move_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Sole sort key for the list view (descending).
    pub last_message_at: DateTime<Utc>,
}

/// One message within a conversation. Append-only, ordered by `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub content: String,
    pub sender: Sender,
    pub message_type: String,
    pub wa_message_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Change-feed payload for the conversations collection. The controller
/// treats every variant as a refetch trigger, so only the row id is carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    Insert { id: String },
    Update { id: String },
    Delete { id: String },
}
