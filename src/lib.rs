/// movedesk — terminal operator dashboard for a moving-company WhatsApp desk.
///
/// Two-pane chat UI (conversation list + message thread) over an external
/// real-time data source, with a per-conversation AI/HUMAN mode toggle and
/// outbound delivery through two webhook endpoints.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod source;
pub mod types;
pub mod ui;
pub mod webhooks;

pub use config::Config;
pub use controller::{Dashboard, DeskEvent};
pub use error::{DeskError, Result};
pub use types::{ChangeEvent, Conversation, Message, Mode, Sender};
