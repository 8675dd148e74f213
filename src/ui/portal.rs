use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::data::ConfigStore;
use crate::generate::QuestionGenerator;

use super::{centered, render_controls};

pub fn render<S: ConfigStore, G: QuestionGenerator>(frame: &mut Frame, area: Rect, app: &App<S, G>) {
    let [body, controls] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).margin(1).areas(area);
    let card = centered(body, 56.min(body.width), 10);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "STUDENT PORTAL",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
    ];

    let hint = match app.live_test() {
        Some(config) => {
            content.push(Line::from(format!(
                "{} questions  ·  {} minutes",
                config.questions().len(),
                config.time_limit_minutes()
            )));
            content.push(Line::from(""));
            content.push(Line::from(Span::styled(
                "ENTER to start the test",
                Style::default().fg(Color::Green).bold(),
            )));
            "enter start  ·  esc back"
        }
        None => {
            content.push(Line::from(
                "The tutor has not activated a test yet. Please wait.".fg(Color::Yellow),
            ));
            content.push(Line::from(""));
            content.push(Line::from("ENTER to check again".fg(Color::DarkGray)));
            "enter check again  ·  esc back"
        }
    };

    if let Some(message) = &app.portal_message {
        content.push(Line::from(message.as_str().fg(Color::Red)));
    }

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(widget, card);

    render_controls(frame, controls, hint);
}
