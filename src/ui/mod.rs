/// Rendering layer: pure functions from state to ratatui widgets, plus the
/// formatting helpers shared between the list and the chat window.
pub mod bubble;
pub mod chat_list;
pub mod chat_window;
pub mod mode_toggle;

use crate::types::Conversation;
use chrono::{DateTime, Utc};

/// First character of the name (or the contact id when unnamed), uppercased.
pub fn avatar_initial(conversation: &Conversation) -> String {
    let source = conversation
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(&conversation.wa_id);
    source
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string())
}

/// The row/header label: the contact name, or the phone id prefixed with `+`.
pub fn display_label(conversation: &Conversation) -> String {
    match conversation.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("+{}", conversation.wa_id),
    }
}

/// `Origin → Destination`, or the new-conversation placeholder when the
/// route has not been extracted yet.
pub fn route_summary(conversation: &Conversation) -> String {
    match (&conversation.origin_city, &conversation.destination_city) {
        (Some(origin), Some(destination)) => format!("{} → {}", origin, destination),
        _ => "Nueva conversación".to_string(),
    }
}

/// Humanized "time since" in operator Spanish.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    if seconds < 60 {
        "ahora".to_string()
    } else if seconds < 3600 {
        format!("hace {} min", seconds / 60)
    } else if seconds < 86_400 {
        format!("hace {} h", seconds / 3600)
    } else {
        format!("hace {} d", seconds / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;
    use chrono::TimeZone;

    fn conversation(name: Option<&str>) -> Conversation {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        Conversation {
            id: "1".to_string(),
            wa_id: "5551234".to_string(),
            name: name.map(|n| n.to_string()),
            mode: Mode::Ai,
            lead_status: "new".to_string(),
            origin_city: None,
            destination_city: None,
            move_date: None,
            notes: None,
            created_at: t,
            updated_at: t,
            last_message_at: t,
        }
    }

    #[test]
    fn initial_prefers_name_over_wa_id() {
        assert_eq!(avatar_initial(&conversation(Some("maria"))), "M");
        assert_eq!(avatar_initial(&conversation(None)), "5");
        assert_eq!(avatar_initial(&conversation(Some(""))), "5");
    }

    #[test]
    fn label_falls_back_to_prefixed_wa_id() {
        assert_eq!(display_label(&conversation(Some("Maria"))), "Maria");
        assert_eq!(display_label(&conversation(None)), "+5551234");
    }

    #[test]
    fn route_needs_both_cities() {
        let mut c = conversation(None);
        c.origin_city = Some("Miami".to_string());
        assert_eq!(route_summary(&c), "Nueva conversación");
        c.destination_city = Some("Orlando".to_string());
        assert_eq!(route_summary(&c), "Miami → Orlando");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let at = |secs: i64| now - chrono::Duration::seconds(secs);
        assert_eq!(relative_time(at(10), now), "ahora");
        assert_eq!(relative_time(at(300), now), "hace 5 min");
        assert_eq!(relative_time(at(7200), now), "hace 2 h");
        assert_eq!(relative_time(at(200_000), now), "hace 2 d");
        // clock skew: a future timestamp reads as "ahora"
        assert_eq!(relative_time(at(-50), now), "ahora");
    }
}
