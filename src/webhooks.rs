/// Outbound webhook calls. The endpoints own the authoritative logic (the
/// actual mode switch, the actual WhatsApp delivery); this client only posts
/// the intent and reports success or failure. Success is any 2xx response,
/// the body is ignored. No retries.
use crate::error::{DeskError, Result};
use crate::types::Mode;
use async_trait::async_trait;

#[async_trait]
pub trait WebhookSink: Send + Sync {
    /// Ask the backend to switch a conversation to `new_mode`.
    async fn toggle_mode(&self, conversation_id: &str, new_mode: Mode) -> Result<()>;

    /// Ask the backend to deliver an operator message over WhatsApp.
    async fn send_message(&self, conversation_id: &str, wa_id: &str, message: &str) -> Result<()>;
}

pub struct HttpWebhooks {
    http: reqwest::Client,
    toggle_url: String,
    send_url: String,
}

impl HttpWebhooks {
    pub fn new(http: reqwest::Client, toggle_url: impl Into<String>, send_url: impl Into<String>) -> Self {
        Self {
            http,
            toggle_url: toggle_url.into(),
            send_url: send_url.into(),
        }
    }

    async fn post(&self, url: &str, body: serde_json::Value) -> Result<()> {
        let resp = self.http.post(url).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(DeskError::Status(resp.status().as_u16(), url.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl WebhookSink for HttpWebhooks {
    async fn toggle_mode(&self, conversation_id: &str, new_mode: Mode) -> Result<()> {
        self.post(
            &self.toggle_url,
            serde_json::json!({
                "conversation_id": conversation_id,
                "new_mode": new_mode.as_str(),
            }),
        )
        .await
    }

    async fn send_message(&self, conversation_id: &str, wa_id: &str, message: &str) -> Result<()> {
        self.post(
            &self.send_url,
            serde_json::json!({
                "conversation_id": conversation_id,
                "wa_id": wa_id,
                "message": message,
            }),
        )
        .await
    }
}
