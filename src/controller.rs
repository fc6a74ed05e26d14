/// Dashboard state and reconciliation.
///
/// The `Dashboard` owns the canonical in-memory copies of the conversation
/// list and the currently loaded thread. Views get read-only references;
/// every mutation goes through [`Dashboard::apply`]. Network work runs in
/// spawned tasks that post [`DeskEvent`]s back into the app's channel, so a
/// fetch never blocks the UI loop.
///
/// Two reconciliation strategies, kept deliberately distinct:
/// - conversations: any change notification triggers a full refetch (the
///   list is small, total order comes from the source each time);
/// - messages: insert notifications append in arrival order, no refetch and
///   no resequencing (append-only stream, commit-ordered by the feed).
use crate::source::DataSource;
use crate::types::{Conversation, Message, Mode};
use crate::webhooks::WebhookSink;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Results of async work, drained by the UI loop and fed to `apply`.
#[derive(Debug, Clone)]
pub enum DeskEvent {
    /// Fresh conversation list (initial load or change-triggered refetch).
    ConversationsLoaded(Vec<Conversation>),
    /// The conversation fetch failed; prior list state stays as-is.
    ConversationsLoadFailed,
    /// Fresh thread for the selected conversation.
    MessagesLoaded(Vec<Message>),
    /// Something changed in the conversations collection; refetch.
    ConversationsChanged,
    /// A row landed on the selected conversation's message feed.
    MessageInserted(Message),
    /// The toggle webhook accepted the switch.
    ModeToggled { conversation_id: String, new_mode: Mode },
    /// The send webhook failed; the operator must be told.
    SendFailed(String),
}

/// Scoped subscription handle: the feed task is aborted when the handle is
/// dropped, so replacing or discarding it is the teardown.
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct Dashboard {
    source: Arc<dyn DataSource>,
    sink: Arc<dyn WebhookSink>,
    events: UnboundedSender<DeskEvent>,

    pub conversations: Vec<Conversation>,
    pub selected: Option<Conversation>,
    pub messages: Vec<Message>,
    /// True only until the initial conversation fetch resolves.
    pub loading: bool,

    conv_sub: Option<Subscription>,
    msg_sub: Option<Subscription>,
}

impl Dashboard {
    pub fn new(
        source: Arc<dyn DataSource>,
        sink: Arc<dyn WebhookSink>,
        events: UnboundedSender<DeskEvent>,
    ) -> Self {
        Self {
            source,
            sink,
            events,
            conversations: Vec::new(),
            selected: None,
            messages: Vec::new(),
            loading: true,
            conv_sub: None,
            msg_sub: None,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|c| c.id.as_str())
    }

    /// Fetch the conversation list in the background. On failure the error
    /// is logged, prior state stays as-is and only `loading` is cleared, so
    /// a failed first fetch falls through to the empty-list view instead of
    /// pinning the loading screen.
    pub fn load_conversations(&self) {
        let source = self.source.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            match source.list_conversations().await {
                Ok(list) => {
                    let _ = tx.send(DeskEvent::ConversationsLoaded(list));
                }
                Err(e) => {
                    error!("Error loading conversations: {}", e);
                    let _ = tx.send(DeskEvent::ConversationsLoadFailed);
                }
            }
        });
    }

    fn load_messages(&self, conversation_id: String) {
        let source = self.source.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            match source.list_messages(&conversation_id).await {
                Ok(messages) => {
                    let _ = tx.send(DeskEvent::MessagesLoaded(messages));
                }
                Err(e) => error!("Error loading messages for {}: {}", conversation_id, e),
            }
        });
    }

    /// Watch the conversations collection for the lifetime of the dashboard.
    /// Every notification, whatever its type, triggers a full refetch.
    pub fn subscribe_conversations(&mut self) {
        let source = self.source.clone();
        let tx = self.events.clone();
        let handle = tokio::spawn(async move {
            match source.conversation_changes().await {
                Ok(mut changes) => {
                    while let Some(change) = changes.next().await {
                        debug!("Conversation change: {:?}", change);
                        if tx.send(DeskEvent::ConversationsChanged).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => error!("Error subscribing to conversation changes: {}", e),
            }
        });
        self.conv_sub = Some(Subscription::new(handle));
    }

    fn subscribe_messages(&mut self, conversation_id: String) {
        let source = self.source.clone();
        let tx = self.events.clone();
        let handle = tokio::spawn(async move {
            match source.message_inserts(&conversation_id).await {
                Ok(mut inserts) => {
                    while let Some(message) = inserts.next().await {
                        if tx.send(DeskEvent::MessageInserted(message)).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => error!("Error subscribing to messages for {}: {}", conversation_id, e),
            }
        });
        // Replacing the handle aborts the previous conversation's feed.
        self.msg_sub = Some(Subscription::new(handle));
    }

    /// Make `conversation` the selected one: fetch its thread and swap the
    /// message feed over to it. The previous thread stays on screen until
    /// the fetch resolves.
    pub fn select(&mut self, conversation: Conversation) {
        info!("Selected conversation {}", conversation.id);
        let id = conversation.id.clone();
        self.selected = Some(conversation);
        self.load_messages(id.clone());
        self.subscribe_messages(id);
    }

    /// Ask the webhook to flip `conversation` to the opposite mode. The
    /// local patch happens only after the webhook accepts, via the
    /// `ModeToggled` event; on failure nothing changes and the displayed
    /// mode stays at the last known truth.
    pub fn toggle_mode(&self, conversation: &Conversation) {
        let new_mode = conversation.mode.opposite();
        let conversation_id = conversation.id.clone();
        let sink = self.sink.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            match sink.toggle_mode(&conversation_id, new_mode).await {
                Ok(()) => {
                    let _ = tx.send(DeskEvent::ModeToggled {
                        conversation_id,
                        new_mode,
                    });
                }
                Err(e) => error!("Error toggling mode for {}: {}", conversation_id, e),
            }
        });
    }

    /// Send operator text to the selected conversation. No-op without a
    /// selection or with whitespace-only content. No optimistic insert: the
    /// message comes back through the insert feed once delivered.
    pub fn send_message(&self, content: &str) {
        let Some(selected) = &self.selected else {
            return;
        };
        let content = content.trim();
        if content.is_empty() {
            return;
        }

        let conversation_id = selected.id.clone();
        let wa_id = selected.wa_id.clone();
        let message = content.to_string();
        let sink = self.sink.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            if let Err(e) = sink.send_message(&conversation_id, &wa_id, &message).await {
                error!("Error sending message to {}: {}", conversation_id, e);
                let _ = tx.send(DeskEvent::SendFailed(e.to_string()));
            }
        });
    }

    /// Fold one event into the state. This is the only place state mutates.
    pub fn apply(&mut self, event: DeskEvent) {
        match event {
            DeskEvent::ConversationsLoaded(list) => {
                self.conversations = list;
                self.loading = false;
            }
            DeskEvent::ConversationsLoadFailed => {
                self.loading = false;
            }
            DeskEvent::MessagesLoaded(messages) => {
                // Unconditional replace: a stale in-flight fetch can land
                // after a reselect and win. Accepted race at this scale;
                // the next notification converges it.
                self.messages = messages;
            }
            DeskEvent::ConversationsChanged => {
                self.load_conversations();
            }
            DeskEvent::MessageInserted(message) => {
                // The feed is server-filtered, but one forwarded event can
                // still arrive after a reselect; scope it here too.
                if self.selected_id() == Some(message.conversation_id.as_str()) {
                    self.messages.push(message);
                }
            }
            DeskEvent::ModeToggled {
                conversation_id,
                new_mode,
            } => {
                for conversation in &mut self.conversations {
                    if conversation.id == conversation_id {
                        conversation.mode = new_mode;
                    }
                }
                if let Some(selected) = &mut self.selected {
                    if selected.id == conversation_id {
                        selected.mode = new_mode;
                    }
                }
            }
            // Surfaced by the app layer as a blocking alert; no state here.
            DeskEvent::SendFailed(_) => {}
        }
    }
}
