/// Real-time data source client: REST reads + SSE change feeds.
///
/// Two query operations (conversations ordered by last_message_at descending,
/// messages for one conversation ordered by created_at ascending) and two
/// subscriptions (any change on the conversations collection, insert-only
/// message rows filtered server-side by conversation id).
use crate::error::{DeskError, Result};
use crate::types::{ChangeEvent, Conversation, Message};
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Read + subscribe surface of the external store. The dashboard only ever
/// consumes this trait; the live implementation is [`HttpDataSource`].
#[async_trait]
pub trait DataSource: Send + Sync {
    /// All conversations, most recent activity first.
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// All messages of one conversation, oldest first.
    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>>;

    /// Change notifications for the conversations collection (any event type).
    async fn conversation_changes(&self) -> Result<BoxStream<'static, ChangeEvent>>;

    /// Insert notifications for one conversation's messages, in commit order.
    async fn message_inserts(&self, conversation_id: &str) -> Result<BoxStream<'static, Message>>;
}

// ─── HTTP implementation ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ConversationsEnvelope {
    conversations: Vec<Conversation>,
}

#[derive(Deserialize)]
struct MessagesEnvelope {
    messages: Vec<Message>,
}

pub struct HttpDataSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn get_checked(&self, url: String) -> Result<reqwest::Response> {
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(DeskError::Status(resp.status().as_u16(), url));
        }
        Ok(resp)
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let url = format!("{}/api/conversations", self.base_url);
        let resp = self.get_checked(url).await?;
        let envelope: ConversationsEnvelope = resp.json().await?;
        Ok(envelope.conversations)
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let url = format!("{}/api/conversations/{}/messages", self.base_url, conversation_id);
        let resp = self.get_checked(url).await?;
        let envelope: MessagesEnvelope = resp.json().await?;
        Ok(envelope.messages)
    }

    async fn conversation_changes(&self) -> Result<BoxStream<'static, ChangeEvent>> {
        let url = format!("{}/api/events/conversations", self.base_url);
        let resp = self.get_checked(url).await?;
        Ok(sse_json_stream(resp).boxed())
    }

    async fn message_inserts(&self, conversation_id: &str) -> Result<BoxStream<'static, Message>> {
        let url = format!(
            "{}/api/events/messages?conversation_id={}",
            self.base_url, conversation_id
        );
        let resp = self.get_checked(url).await?;
        Ok(sse_json_stream(resp).boxed())
    }
}

// ─── SSE framing ─────────────────────────────────────────────────────────────

/// Turns an SSE response body into a stream of deserialized `data:` payloads.
/// Malformed records are logged and skipped; the stream ends when the server
/// closes the connection or the body errors out.
fn sse_json_stream<T>(resp: reqwest::Response) -> impl futures_util::Stream<Item = T> + Send
where
    T: DeserializeOwned + Send + 'static,
{
    futures_util::stream::unfold((resp, SseParser::new()), |(mut resp, mut parser)| async move {
        loop {
            if let Some(record) = parser.next_record() {
                match serde_json::from_str::<T>(&record) {
                    Ok(value) => return Some((value, (resp, parser))),
                    Err(e) => {
                        warn!("Skipping malformed event record: {}", e);
                        continue;
                    }
                }
            }
            match resp.chunk().await {
                Ok(Some(chunk)) => parser.push(&chunk),
                Ok(None) => {
                    debug!("Event stream closed by server");
                    return None;
                }
                Err(e) => {
                    warn!("Event stream error: {}", e);
                    return None;
                }
            }
        }
    })
}

/// Incremental parser for `text/event-stream` framing: `data:` lines
/// accumulate, a blank line completes a record, comment lines (leading `:`)
/// and other fields are ignored. Chunk boundaries may fall anywhere,
/// including inside a UTF-8 sequence, so bytes are buffered until a full
/// line is available.
struct SseParser {
    buf: Vec<u8>,
    data_lines: Vec<String>,
    ready: VecDeque<String>,
}

impl SseParser {
    fn new() -> Self {
        Self {
            buf: Vec::new(),
            data_lines: Vec::new(),
            ready: VecDeque::new(),
        }
    }

    fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            self.feed_line(line);
        }
    }

    fn feed_line(&mut self, line: &str) {
        if line.is_empty() {
            if !self.data_lines.is_empty() {
                self.ready.push_back(self.data_lines.join("\n"));
                self.data_lines.clear();
            }
        } else if line.starts_with(':') {
            // keepalive comment
        } else if let Some(rest) = line.strip_prefix("data:") {
            self.data_lines.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
        }
        // other fields (event:, id:, retry:) are not used by this feed
    }

    fn next_record(&mut self) -> Option<String> {
        self.ready.pop_front()
    }
}
