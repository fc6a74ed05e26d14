/// Per-message rendering: one message becomes a short run of styled lines.
///
/// `system` renders as a centered notice with no bubble side; `customer`
/// aligns left without a sender label; `ai` and `human` align right with
/// their label. Content newlines are preserved and long lines wrap to the
/// bubble width.
use crate::types::{Message, Sender};
use chrono::Local;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Render one message into thread lines for a pane `width` columns wide.
pub fn lines(message: &Message, width: u16) -> Vec<Line<'static>> {
    let bubble_width = (width as usize * 7 / 10).max(12);
    let wrapped = wrap(&message.content, bubble_width);

    let (alignment, body_style, label) = match message.sender {
        Sender::System => {
            let style = Style::default().fg(Color::Yellow);
            let mut out: Vec<Line<'static>> = wrapped
                .into_iter()
                .map(|text| Line::from(Span::styled(text, style)).alignment(Alignment::Center))
                .collect();
            out.push(Line::default());
            return out;
        }
        Sender::Customer => (Alignment::Left, Style::default().fg(Color::White), None),
        Sender::Ai => (
            Alignment::Right,
            Style::default().fg(Color::LightBlue),
            Some("🤖 AI"),
        ),
        Sender::Human => (
            Alignment::Right,
            Style::default().fg(Color::LightGreen),
            Some("👨 Operador"),
        ),
    };

    let mut out = Vec::with_capacity(wrapped.len() + 3);
    if let Some(label) = label {
        out.push(
            Line::from(Span::styled(
                label,
                body_style.add_modifier(Modifier::BOLD),
            ))
            .alignment(alignment),
        );
    }
    for text in wrapped {
        out.push(Line::from(Span::styled(text, body_style)).alignment(alignment));
    }
    let stamp = message
        .created_at
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();
    out.push(
        Line::from(Span::styled(stamp, Style::default().fg(Color::DarkGray)))
            .alignment(alignment),
    );
    out.push(Line::default());
    out
}

/// Split on embedded newlines, then hard-wrap each line to `width` chars.
/// Char-based, which is close enough for phone-chat text.
fn wrap(content: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for raw_line in content.split('\n') {
        if raw_line.is_empty() {
            out.push(String::new());
            continue;
        }
        let chars: Vec<char> = raw_line.chars().collect();
        for chunk in chars.chunks(width) {
            out.push(chunk.iter().collect());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(sender: Sender, content: &str) -> Message {
        Message {
            id: "m1".to_string(),
            conversation_id: "1".to_string(),
            content: content.to_string(),
            sender,
            message_type: "text".to_string(),
            wa_message_id: None,
            created_at: Utc::now(),
        }
    }

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn system_notice_is_centered_without_label_or_stamp() {
        let out = lines(&message(Sender::System, "Modo cambiado"), 80);
        assert_eq!(out[0].alignment, Some(Alignment::Center));
        assert_eq!(text_of(&out[0]), "Modo cambiado");
        // content + trailing spacer only
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn customer_aligns_left_with_no_sender_label() {
        let out = lines(&message(Sender::Customer, "hola"), 80);
        assert_eq!(out[0].alignment, Some(Alignment::Left));
        assert_eq!(text_of(&out[0]), "hola");
    }

    #[test]
    fn operator_senders_align_right_with_label() {
        let ai = lines(&message(Sender::Ai, "claro"), 80);
        assert_eq!(ai[0].alignment, Some(Alignment::Right));
        assert_eq!(text_of(&ai[0]), "🤖 AI");
        let human = lines(&message(Sender::Human, "claro"), 80);
        assert_eq!(text_of(&human[0]), "👨 Operador");
    }

    #[test]
    fn embedded_newlines_are_preserved() {
        let out = lines(&message(Sender::Customer, "uno\ndos"), 80);
        assert_eq!(text_of(&out[0]), "uno");
        assert_eq!(text_of(&out[1]), "dos");
    }

    #[test]
    fn long_lines_wrap_to_bubble_width() {
        let out = lines(&message(Sender::Customer, &"x".repeat(40)), 20);
        // bubble width is max(12, 70% of 20) = 14
        assert_eq!(text_of(&out[0]).chars().count(), 14);
        assert_eq!(text_of(&out[1]).chars().count(), 14);
    }
}
