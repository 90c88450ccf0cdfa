//! Identity gate
//!
//! Centered username prompt shown until the participant joins.

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::App;

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 7;
const PROMPT: &str = "> ";

/// Render the gate dialog.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [row] = Layout::vertical([Constraint::Length(DIALOG_HEIGHT)]).flex(Flex::Center).areas(area);
    let [dialog] =
        Layout::horizontal([Constraint::Length(DIALOG_WIDTH)]).flex(Flex::Center).areas(row);

    let gate = app.gate();
    let border_style = if gate.has_error() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let hint = if gate.has_error() {
        Span::styled("Please enter a username", Style::default().fg(Color::Red))
    } else {
        Span::styled("Enter to join, Esc to quit", Style::default().fg(Color::DarkGray))
    };

    let lines = vec![
        Line::from(Span::styled(
            "Enter your name to join the stream",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::raw(PROMPT), Span::raw(gate.input().text())]),
        Line::from(""),
        Line::from(hint),
    ];

    let block =
        Block::default().borders(Borders::ALL).border_style(border_style).title(" Facewatch ");
    frame.render_widget(Paragraph::new(lines).block(block), dialog);

    let cursor_offset = (gate.input().cursor() as u16).min(dialog.width.saturating_sub(4));
    let cursor_x = dialog.x.saturating_add(1 + PROMPT.len() as u16).saturating_add(cursor_offset);
    let cursor_y = dialog.y.saturating_add(3);
    frame.set_cursor_position((cursor_x.min(dialog.right().saturating_sub(2)), cursor_y));
}
