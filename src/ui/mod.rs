mod dashboard;
mod login;
mod portal;
mod quiz;
mod result;
mod welcome;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::App;
use crate::data::ConfigStore;
use crate::generate::QuestionGenerator;
use crate::models::AppState;

pub fn render<S: ConfigStore, G: QuestionGenerator>(frame: &mut Frame, app: &App<S, G>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Home => welcome::render(frame, area, app.has_live_test()),
        AppState::TutorLogin => login::render(frame, area, app),
        AppState::TutorDashboard => dashboard::render(frame, area, app),
        AppState::StudentPortal => portal::render(frame, area, app),
        AppState::StudentTest => quiz::render(frame, area, app),
        AppState::StudentResults => result::render(frame, area, app),
    }
}

/// Fixed-size rectangle centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, cell, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(row);
    cell
}

/// Bordered popup drawn over whatever is underneath.
fn render_popup(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line>, color: Color) {
    let popup = centered(area, 54.min(area.width), (lines.len() as u16 + 2).min(area.height));
    frame.render_widget(Clear, popup);

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(color),
        );
    frame.render_widget(widget, popup);
}

fn render_controls(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
