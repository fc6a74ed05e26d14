/// HTTP client tests: REST reads, SSE feeds and webhook posts against a
/// local mock server.
use chrono::{TimeZone, Utc};
use futures_util::StreamExt;
use movedesk::error::DeskError;
use movedesk::source::{DataSource, HttpDataSource};
use movedesk::types::{ChangeEvent, Conversation, Message, Mode, Sender};
use movedesk::webhooks::{HttpWebhooks, WebhookSink};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn conversation(id: &str, last_message_hour: u32) -> Conversation {
    let t = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    Conversation {
        id: id.to_string(),
        wa_id: "5551234".to_string(),
        name: Some("Maria".to_string()),
        mode: Mode::Ai,
        lead_status: "qualified".to_string(),
        origin_city: Some("Miami".to_string()),
        destination_city: Some("Orlando".to_string()),
        move_date: None,
        notes: None,
        created_at: t,
        updated_at: t,
        last_message_at: Utc.with_ymd_and_hms(2024, 1, 1, last_message_hour, 0, 0).unwrap(),
    }
}

fn message(id: &str, hour: u32) -> Message {
    Message {
        id: id.to_string(),
        conversation_id: "c1".to_string(),
        content: "hola".to_string(),
        sender: Sender::Customer,
        message_type: "text".to_string(),
        wa_message_id: Some(format!("wamid.{}", id)),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn list_conversations_parses_the_envelope_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "conversations": [conversation("a", 12), conversation("b", 9)],
        })))
        .mount(&server)
        .await;

    let source = HttpDataSource::new(reqwest::Client::new(), server.uri());
    let conversations = source.list_conversations().await.unwrap();
    assert_eq!(conversations.len(), 2);
    assert_eq!(conversations[0].id, "a");
    assert_eq!(conversations[1].id, "b");
    assert_eq!(conversations[0].mode, Mode::Ai);
}

#[tokio::test]
async fn list_messages_hits_the_conversation_scoped_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/conversations/c1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [message("m1", 9), message("m2", 10)],
        })))
        .mount(&server)
        .await;

    let source = HttpDataSource::new(reqwest::Client::new(), server.uri());
    let messages = source.list_messages("c1").await.unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].created_at <= messages[1].created_at);
    assert_eq!(messages[0].sender, Sender::Customer);
}

#[tokio::test]
async fn fetch_failure_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/conversations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = HttpDataSource::new(reqwest::Client::new(), server.uri());
    match source.list_conversations().await {
        Err(DeskError::Status(code, _)) => assert_eq!(code, 500),
        other => panic!("expected status error, got {:?}", other.map(|v| v.len())),
    }
}

#[tokio::test]
async fn conversation_feed_decodes_sse_records_and_skips_keepalives() {
    let server = MockServer::start().await;
    let body = ": connected\n\n\
                data: {\"type\":\"insert\",\"id\":\"c1\"}\n\n\
                data: not json\n\n\
                data: {\"type\":\"update\",\"id\":\"c2\"}\n\n";
    Mock::given(method("GET"))
        .and(path("/api/events/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let source = HttpDataSource::new(reqwest::Client::new(), server.uri());
    let changes: Vec<ChangeEvent> = source
        .conversation_changes()
        .await
        .unwrap()
        .collect()
        .await;
    assert_eq!(changes.len(), 2);
    assert!(matches!(changes[0], ChangeEvent::Insert { ref id } if id == "c1"));
    assert!(matches!(changes[1], ChangeEvent::Update { ref id } if id == "c2"));
}

#[tokio::test]
async fn message_feed_is_scoped_by_conversation_id() {
    let server = MockServer::start().await;
    let row = serde_json::to_string(&message("m7", 11)).unwrap();
    Mock::given(method("GET"))
        .and(path("/api/events/messages"))
        .and(query_param("conversation_id", "c1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(format!("data: {}\n\n", row), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let source = HttpDataSource::new(reqwest::Client::new(), server.uri());
    let rows: Vec<Message> = source.message_inserts("c1").await.unwrap().collect().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "m7");
    assert_eq!(rows[0].conversation_id, "c1");
}

#[tokio::test]
async fn toggle_webhook_posts_the_documented_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/toggle"))
        .and(body_json(serde_json::json!({
            "conversation_id": "1",
            "new_mode": "HUMAN",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = HttpWebhooks::new(
        reqwest::Client::new(),
        format!("{}/toggle", server.uri()),
        format!("{}/send", server.uri()),
    );
    sink.toggle_mode("1", Mode::Human).await.unwrap();
}

#[tokio::test]
async fn send_webhook_posts_the_documented_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_json(serde_json::json!({
            "conversation_id": "1",
            "wa_id": "5551234",
            "message": "hola",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = HttpWebhooks::new(
        reqwest::Client::new(),
        format!("{}/toggle", server.uri()),
        format!("{}/send", server.uri()),
    );
    sink.send_message("1", "5551234", "hola").await.unwrap();
}

#[tokio::test]
async fn webhook_non_2xx_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let sink = HttpWebhooks::new(
        reqwest::Client::new(),
        format!("{}/toggle", server.uri()),
        format!("{}/send", server.uri()),
    );
    match sink.send_message("1", "5551234", "hola").await {
        Err(DeskError::Status(code, _)) => assert_eq!(code, 502),
        other => panic!("expected status error, got {:?}", other),
    }
}
