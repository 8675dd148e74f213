use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::data::ConfigStore;
use crate::generate::QuestionGenerator;

use super::{centered, render_controls};

pub fn render<S: ConfigStore, G: QuestionGenerator>(frame: &mut Frame, area: Rect, app: &App<S, G>) {
    let [form_area, controls] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).margin(1).areas(area);
    let form = centered(form_area, 44.min(form_area.width), 9);

    let masked: String = "*".repeat(app.login_input.chars().count());
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TUTOR LOGIN",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("Enter the secret code".fg(Color::DarkGray)),
        Line::from(vec![
            Span::styled(masked, Style::default().fg(Color::White).bold()),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
    ];
    if let Some(error) = &app.login_error {
        content.push(Line::from(error.as_str().fg(Color::Red)));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, form);

    render_controls(frame, controls, "enter log in  ·  esc back");
}
