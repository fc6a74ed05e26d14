/// Conversation list pane: one two-line row per conversation, in the order
/// given (the controller keeps it sorted by last activity). The cursor row
/// is highlighted by the List widget; the selected conversation carries a
/// marker so it stays visible while the cursor moves.
use crate::types::Conversation;
use crate::ui::{self, mode_toggle};
use chrono::{DateTime, Utc};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(
    f: &mut Frame<'_>,
    area: Rect,
    conversations: &[Conversation],
    selected_id: Option<&str>,
    cursor: usize,
    now: DateTime<Utc>,
) {
    let block = Block::default()
        .title("🚚 Mudanzas Express — WhatsApp")
        .borders(Borders::ALL);

    if conversations.is_empty() {
        let placeholder = Paragraph::new(vec![
            Line::default(),
            Line::from("No hay conversaciones").alignment(Alignment::Center),
            Line::from(Span::styled(
                "Las conversaciones aparecerán aquí cuando lleguen mensajes de WhatsApp",
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center),
        ])
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem<'_>> = conversations
        .iter()
        .map(|conversation| row(conversation, selected_id, inner_width, now))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    state.select(Some(cursor.min(conversations.len().saturating_sub(1))));
    f.render_stateful_widget(list, area, &mut state);
}

fn row<'a>(
    conversation: &'a Conversation,
    selected_id: Option<&str>,
    width: usize,
    now: DateTime<Utc>,
) -> ListItem<'a> {
    let is_selected = selected_id == Some(conversation.id.as_str());
    let marker = if is_selected { "▶ " } else { "  " };
    let label = ui::display_label(conversation);
    let when = ui::relative_time(conversation.last_message_at, now);

    let mut first = vec![
        Span::styled(marker, Style::default().fg(Color::Green)),
        Span::styled(
            format!("({}) ", ui::avatar_initial(conversation)),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(label.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    let used = 2 + 4 + label.chars().count() + when.chars().count();
    first.push(Span::raw(" ".repeat(width.saturating_sub(used).max(1))));
    first.push(Span::styled(when, Style::default().fg(Color::DarkGray)));

    let second = vec![
        Span::raw("    "),
        Span::styled(
            ui::route_summary(conversation),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        mode_toggle::badge(conversation.mode),
    ];

    ListItem::new(Text::from(vec![Line::from(first), Line::from(second)]))
}
