//! Viewer roster
//!
//! Viewer count and one line per viewer, in server order.

use facewatch_app::ViewModel;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Render the roster.
pub fn render(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let items: Vec<ListItem> = view
        .roster()
        .entries
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}]", entry.avatar()),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::raw(entry.display_name().to_string()),
                Span::styled(
                    format!("  {}", entry.connected_at),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let block =
        Block::default().borders(Borders::ALL).title(format!(" {} ", view.viewer_count_label()));
    frame.render_widget(List::new(items).block(block), area);
}
