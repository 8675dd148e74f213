use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::dashboard::{Dashboard, Field};
use crate::data::ConfigStore;
use crate::generate::QuestionGenerator;
use crate::models::OPTION_LABELS;

use super::render_controls;

pub fn render<S: ConfigStore, G: QuestionGenerator>(frame: &mut Frame, area: Rect, app: &App<S, G>) {
    let dash = &app.dashboard;
    let [header, form, messages, draft, controls] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .areas(area);

    render_header(frame, header, app.has_live_test());
    render_form(frame, form, dash);
    render_messages(frame, messages, dash);
    render_draft(frame, draft, dash);
    render_controls(
        frame,
        controls,
        "tab next field  ·  enter load/generate  ·  ctrl+s save  ·  ctrl+r reset  ·  esc log out",
    );
}

fn render_header(frame: &mut Frame, area: Rect, live: bool) {
    let status = if live {
        Span::styled("● live test active", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ no live test", Style::default().fg(Color::DarkGray))
    };
    let line = Line::from(vec![
        Span::styled("TUTOR DASHBOARD   ", Style::default().fg(Color::Cyan).bold()),
        status,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let marker = if focused { ">" } else { " " };

    Line::from(vec![
        Span::styled(format!(" {} ", marker), style),
        Span::styled(format!("{:<22}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, style),
        Span::styled(if focused { "_" } else { "" }, Style::default().fg(Color::DarkGray)),
    ])
}

fn render_form(frame: &mut Frame, area: Rect, dash: &Dashboard) {
    let lines = vec![
        field_line("File (.xlsx/.json)", &dash.source_path, dash.focus == Field::Source),
        field_line("AI topic", &dash.topic, dash.focus == Field::Topic),
        field_line("Number of questions", &dash.count, dash.focus == Field::Count),
        field_line("Time limit (minutes)", &dash.time_limit, dash.focus == Field::TimeLimit),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_messages(frame: &mut Frame, area: Rect, dash: &Dashboard) {
    let line = match (&dash.error, &dash.status) {
        (Some(error), _) => Line::from(error.as_str().fg(Color::Red)),
        (None, Some(status)) => Line::from(status.as_str().fg(Color::Green)),
        (None, None) => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
}

fn render_draft(frame: &mut Frame, area: Rect, dash: &Dashboard) {
    let questions = dash.questions();
    let title = format!(" Draft: {} questions ", questions.len());

    let lines: Vec<Line> = if questions.is_empty() {
        vec![Line::from(
            "Load a spreadsheet or generate questions to build the test.".fg(Color::DarkGray),
        )]
    } else {
        questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:2}. ", index + 1),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(question.text(), Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("  [{}]", OPTION_LABELS[question.correct_answer()]),
                        Style::default().fg(Color::Green),
                    ),
                ])
            })
            .collect()
    };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
