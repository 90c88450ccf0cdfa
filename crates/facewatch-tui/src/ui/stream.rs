//! Stream panel
//!
//! Frame metadata and the detection count. Images are not decoded; the panel
//! shows what arrived and how big it was.

use facewatch_app::ViewModel;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the stream panel.
pub fn render(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Stream ");

    let lines = match view.frame() {
        None => vec![Line::from(Span::styled(
            "Waiting for stream...",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(current) => vec![
            Line::from(Span::styled(
                view.face_count_label(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Frames received: {}", view.frames_received())),
            Line::from(Span::styled(
                format!("Frame size: {} bytes", current.image_data.len()),
                Style::default().fg(Color::DarkGray),
            )),
        ],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
