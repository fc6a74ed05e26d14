/// Chat window pane: header with contact identity and mode toggle, the
/// message thread pinned to the newest message, and the mode-gated input
/// region (editable in HUMAN mode, informational banner in AI mode).
use crate::types::{Conversation, Message, Mode};
use crate::ui::{self, bubble, mode_toggle};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(
    f: &mut Frame<'_>,
    area: Rect,
    conversation: Option<&Conversation>,
    messages: &[Message],
    input: &str,
    input_focused: bool,
) {
    let Some(conversation) = conversation else {
        let placeholder = Paragraph::new(vec![
            Line::default(),
            Line::from("💬").alignment(Alignment::Center),
            Line::from("Selecciona una conversación").alignment(Alignment::Center),
            Line::from(Span::styled(
                "para ver los mensajes",
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center),
        ])
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(placeholder, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(area);

    render_header(f, chunks[0], conversation);
    render_thread(f, chunks[1], messages);
    render_input(f, chunks[2], conversation.mode, input, input_focused);
}

fn render_header(f: &mut Frame<'_>, area: Rect, conversation: &Conversation) {
    let label = ui::display_label(conversation);
    let subtitle = match (&conversation.origin_city, &conversation.destination_city) {
        (Some(_), Some(_)) => ui::route_summary(conversation),
        _ => conversation.wa_id.clone(),
    };

    let mut title_spans = vec![
        Span::styled(
            format!("({}) ", ui::avatar_initial(conversation)),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(label.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
    ];
    title_spans.extend(mode_toggle::spans(conversation.mode));

    let header = Paragraph::new(vec![
        Line::from(title_spans),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::DarkGray))),
    ])
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_thread(f: &mut Frame<'_>, area: Rect, messages: &[Message]) {
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in messages {
        lines.extend(bubble::lines(message, inner_width));
    }

    // Pin the view to the newest message.
    let scroll = (lines.len() as u16).saturating_sub(inner_height);
    let thread = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .scroll((scroll, 0));
    f.render_widget(thread, area);
}

fn render_input(f: &mut Frame<'_>, area: Rect, mode: Mode, input: &str, focused: bool) {
    match mode {
        Mode::Human => {
            let border_style = if focused {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let title = if focused {
                "Mensaje — Enter envía, Alt+Enter salto de línea"
            } else {
                "Mensaje — Tab para escribir"
            };

            let mut line = if input.is_empty() {
                vec![Span::styled(
                    "Escribe un mensaje...",
                    Style::default().fg(Color::DarkGray),
                )]
            } else {
                vec![Span::raw(input.to_string())]
            };
            if focused {
                line.push(Span::styled("▏", Style::default().fg(Color::Green)));
            }

            let send_hint = if input.trim().is_empty() {
                Span::styled("Enviar", Style::default().fg(Color::DarkGray))
            } else {
                Span::styled(
                    "Enviar ⏎",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )
            };

            let widget = Paragraph::new(vec![
                Line::from(line),
                Line::from(send_hint).alignment(Alignment::Right),
            ])
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border_style),
            );
            f.render_widget(widget, area);
        }
        Mode::Ai => {
            let banner = Paragraph::new(vec![
                Line::from(Span::styled(
                    "🤖 Modo AI activo",
                    Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
                Line::from(Span::styled(
                    "El AI está respondiendo automáticamente. Cambia a modo Humano para escribir.",
                    Style::default().fg(Color::Gray),
                ))
                .alignment(Alignment::Center),
            ])
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::LightBlue)),
            );
            f.render_widget(banner, area);
        }
    }
}
