//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O) and only read the App;
//! nothing here feeds state back.

mod chat;
mod controls;
mod gate;
mod input;
mod status;
mod stream;
mod viewers;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::App;

/// Render the entire UI.
///
/// Until the identity gate is passed only the gate is shown.
pub fn render(frame: &mut Frame, app: &App) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    if app.session().is_none() {
        gate::render(frame, app, frame.area());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, *main_area);
    input::render(frame, app.chat_input(), *input_area);
    status::render(frame, app, *status_area);
}

/// Render the main area (stream column + chat).
fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    const STREAM_COLUMN_PERCENT: u16 = 55;
    const STREAM_MIN_HEIGHT: u16 = 4;
    const CONTROLS_HEIGHT: u16 = 4;
    const VIEWERS_HEIGHT: u16 = 8;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(STREAM_COLUMN_PERCENT),
            Constraint::Percentage(100 - STREAM_COLUMN_PERCENT),
        ])
        .split(area);

    let [stream_column, chat_area] = columns.as_ref() else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(STREAM_MIN_HEIGHT),
            Constraint::Length(CONTROLS_HEIGHT),
            Constraint::Length(VIEWERS_HEIGHT),
        ])
        .split(*stream_column);

    let [stream_area, controls_area, viewers_area] = rows.as_ref() else {
        return;
    };

    stream::render(frame, app.view(), *stream_area);
    controls::render(frame, app.view(), *controls_area);
    viewers::render(frame, app.view(), *viewers_area);
    chat::render(frame, app.view().transcript(), *chat_area);
}
