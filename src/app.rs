/// Terminal application: owns the event loop, key handling and drawing.
///
/// Single-threaded UI discipline: the loop drains the event channel, feeds
/// events to the dashboard, polls the keyboard with a short timeout and
/// redraws. All network work happens in tasks the dashboard spawns.
use crate::config::Config;
use crate::controller::{Dashboard, DeskEvent};
use crate::error::Result;
use crate::source::HttpDataSource;
use crate::types::Mode;
use crate::ui::{chat_list, chat_window};
use crate::webhooks::HttpWebhooks;
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Input,
}

struct App {
    dashboard: Dashboard,
    events_rx: mpsc::UnboundedReceiver<DeskEvent>,
    focus: Focus,
    cursor: usize,
    input: String,
    alert: Option<String>,
    should_quit: bool,
}

pub async fn run(config: Config) -> Result<()> {
    let http = reqwest::Client::builder().build()?;
    let source = Arc::new(HttpDataSource::new(http.clone(), config.api_url.clone()));
    let sink = Arc::new(HttpWebhooks::new(http, config.toggle_url, config.send_url));

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let mut dashboard = Dashboard::new(source, sink, events_tx);
    dashboard.load_conversations();
    dashboard.subscribe_conversations();

    let mut app = App {
        dashboard,
        events_rx,
        focus: Focus::List,
        cursor: 0,
        input: String::new(),
        alert: None,
        should_quit: false,
    };

    // TUI setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run_loop(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("Dashboard closed");
    res
}

impl App {
    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        loop {
            while let Ok(desk_event) = self.events_rx.try_recv() {
                self.handle_desk_event(desk_event);
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn handle_desk_event(&mut self, desk_event: DeskEvent) {
        if let DeskEvent::SendFailed(reason) = &desk_event {
            // The one failure the operator must see; everything else
            // degrades to logged staleness.
            self.alert = Some(format!("Error al enviar mensaje\n{}", reason));
        }
        self.dashboard.apply(desk_event);
        if !self.dashboard.conversations.is_empty() {
            self.cursor = self.cursor.min(self.dashboard.conversations.len() - 1);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.alert.take().is_some() {
            return; // any key dismisses the alert
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // The input region only exists in HUMAN mode; fall back to the list
        // when a toggle pulled the rug out.
        if self.focus == Focus::Input
            && self.dashboard.selected.as_ref().map(|c| c.mode) != Some(Mode::Human)
        {
            self.focus = Focus::List;
        }

        match self.focus {
            Focus::List => self.handle_list_key(key),
            Focus::Input => self.handle_input_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.cursor + 1 < self.dashboard.conversations.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(conversation) = self.dashboard.conversations.get(self.cursor).cloned() {
                    self.dashboard.select(conversation);
                }
            }
            KeyCode::Char('t') => {
                if let Some(conversation) = self.dashboard.conversations.get(self.cursor) {
                    self.dashboard.toggle_mode(conversation);
                }
            }
            KeyCode::Tab => {
                if self.dashboard.selected.as_ref().map(|c| c.mode) == Some(Mode::Human) {
                    self.focus = Focus::Input;
                }
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Tab => self.focus = Focus::List,
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                self.input.push('\n');
            }
            KeyCode::Enter => {
                self.dashboard.send_message(&self.input);
                if !self.input.trim().is_empty() {
                    self.input.clear();
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn draw(&self, f: &mut Frame<'_>) {
        if self.dashboard.loading {
            let loading = Paragraph::new(vec![
                Line::default(),
                Line::from("Cargando conversaciones...").alignment(Alignment::Center),
            ])
            .block(Block::default().borders(Borders::ALL).title("🚚 Mudanzas Express"));
            f.render_widget(loading, f.size());
            return;
        }

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(33), Constraint::Min(40)])
            .split(f.size());

        chat_list::render(
            f,
            panes[0],
            &self.dashboard.conversations,
            self.dashboard.selected_id(),
            self.cursor,
            Utc::now(),
        );
        chat_window::render(
            f,
            panes[1],
            self.dashboard.selected.as_ref(),
            &self.dashboard.messages,
            &self.input,
            self.focus == Focus::Input,
        );

        if let Some(alert) = &self.alert {
            self.draw_alert(f, alert);
        }
    }

    fn draw_alert(&self, f: &mut Frame<'_>, alert: &str) {
        let area = centered_rect(50, 20, f.size());
        let mut lines: Vec<Line<'_>> = alert
            .split('\n')
            .map(|l| Line::from(l.to_string()).alignment(Alignment::Center))
            .collect();
        lines.push(Line::default());
        lines.push(
            Line::from(Span::styled(
                "Pulsa cualquier tecla para continuar",
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center),
        );

        let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
