/// AI/HUMAN switch rendering. Stateless: the displayed mode is exactly what
/// the caller passes in; flipping it is the key handler's job.
use crate::types::Mode;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

pub fn color(mode: Mode) -> Color {
    match mode {
        Mode::Ai => Color::LightBlue,
        Mode::Human => Color::LightGreen,
    }
}

/// Compact badge for list rows: `🤖 AI` / `👨 Humano`.
pub fn badge(mode: Mode) -> Span<'static> {
    let text = match mode {
        Mode::Ai => "🤖 AI",
        Mode::Human => "👨 Humano",
    };
    Span::styled(text, Style::default().fg(color(mode)))
}

/// Full header toggle: icon, label and a two-position switch.
pub fn spans(mode: Mode) -> Vec<Span<'static>> {
    let style = Style::default().fg(color(mode)).add_modifier(Modifier::BOLD);
    let (label, switch) = match mode {
        Mode::Ai => ("🤖 AI", "[●──]"),
        Mode::Human => ("👨 Humano", "[──●]"),
    };
    vec![
        Span::styled(label, style),
        Span::raw(" "),
        Span::styled(switch, style),
    ]
}
