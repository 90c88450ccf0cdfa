//! Chat transcript
//!
//! Participant messages and system notices share one rendering path; only the
//! author style differs. The view is bottom-anchored and honours the
//! transcript's scroll-back.

use facewatch_app::ChatTranscript;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, transcript: &ChatTranscript, area: Rect) {
    let title = if transcript.scroll_back() > 0 {
        format!(" Chat (+{} below) ", transcript.scroll_back())
    } else {
        " Chat ".to_string()
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let visible_height = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let end = transcript.len().saturating_sub(transcript.scroll_back());
    let start = end.saturating_sub(visible_height);

    let items: Vec<ListItem> = transcript.messages()[start..end]
        .iter()
        .map(|msg| {
            let author_style = if msg.is_system() {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC)
            } else {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{}:", msg.author), author_style),
                Span::raw(" "),
                Span::raw(msg.body.clone()),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
