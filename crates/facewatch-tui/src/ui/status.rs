//! Status bar
//!
//! Displays connection status, identity and key hints.

use facewatch_app::ConnectionState;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::App;

const KEY_HINTS: &str = "F1 detection | F2/F3 record | PgUp/PgDn scroll | Esc quit";

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let connection_status = match app.connection_state() {
        ConnectionState::Disconnected => {
            Span::styled("Disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Connected => Span::styled(
            format!("Connected ({})", app.server_addr()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let username = app.session().map_or_else(String::new, |s| format!(" | {}", s.username()));
    let detail = app.status_message().unwrap_or(KEY_HINTS);

    let status_line = Line::from(vec![
        Span::raw(" "),
        connection_status,
        Span::raw(username),
        Span::styled(format!(" | {detail}"), Style::default().fg(Color::Gray)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
