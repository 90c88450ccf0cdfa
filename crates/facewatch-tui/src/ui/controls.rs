//! Detection and recording controls
//!
//! Keys are shown dimmed while their control is disabled.

use facewatch_app::{RecordingControls, ViewModel};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const RECORDING_INDICATOR: &str = "\u{25cf} REC";

/// Render the controls panel.
pub fn render(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let RecordingControls { start_enabled, stop_enabled, indicator_active } =
        view.recording_controls();

    let detection_style = if view.detection_enabled() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let detection = Line::from(vec![
        Span::styled("[F1] ", key_style(true)),
        Span::styled(view.detection_label(), detection_style),
    ]);

    let mut recording = vec![
        Span::styled("[F2] Start", key_style(start_enabled)),
        Span::raw("  "),
        Span::styled("[F3] Stop", key_style(stop_enabled)),
    ];
    if indicator_active {
        recording.push(Span::raw("  "));
        recording.push(Span::styled(
            RECORDING_INDICATOR,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        if let Some(file) = view.recording_file() {
            recording.push(Span::styled(format!(" {file}"), Style::default().fg(Color::Red)));
        }
    }

    let block = Block::default().borders(Borders::ALL).title(" Controls ");
    let paragraph = Paragraph::new(vec![detection, Line::from(recording)]).block(block);
    frame.render_widget(paragraph, area);
}

fn key_style(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    }
}
