use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::data::ConfigStore;
use crate::generate::QuestionGenerator;
use crate::models::OPTION_LABELS;
use crate::session::{format_time, TestSession};

use super::{render_controls, render_popup};

/// Countdown turns red below this many seconds.
const LOW_TIME_SECS: u32 = 60;

pub fn render<S: ConfigStore, G: QuestionGenerator>(frame: &mut Frame, area: Rect, app: &App<S, G>) {
    let Some(session) = app.session() else {
        return;
    };

    let [header, question, options, nav, controls] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .areas(area);

    render_header(frame, header, session);
    render_question_text(frame, question, session.current_question().text());
    render_options(frame, options, session, app.highlighted_option());
    render_navigation(frame, nav, session);
    render_controls(
        frame,
        controls,
        "j/k move  ·  enter/a-d answer  ·  h/l prev/next  ·  s submit",
    );

    if app.is_confirming_submit() {
        render_confirmation(frame, area, session.unanswered_count());
    }
}

fn render_header(frame: &mut Frame, area: Rect, session: &TestSession) {
    let [progress_area, timer_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).areas(area);

    let progress = format!(
        "Question {} of {}",
        session.current_index() + 1,
        session.total_questions()
    );
    frame.render_widget(Paragraph::new(progress).fg(Color::DarkGray), progress_area);

    let remaining = session.remaining_secs();
    let color = if remaining < LOW_TIME_SECS {
        Color::Red
    } else {
        Color::Cyan
    };
    let timer = Paragraph::new(format_time(remaining))
        .alignment(Alignment::Right)
        .fg(color)
        .bold();
    frame.render_widget(timer, timer_area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, session: &TestSession, highlighted: usize) {
    let options = session.current_question().options();
    let answer = session.current_answer();
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_chosen = answer == Some(index);
        let is_highlighted = index == highlighted;

        let style = match (is_chosen, is_highlighted) {
            (true, _) => Style::default().fg(Color::Green).bold(),
            (false, true) => Style::default().fg(Color::Cyan).bold(),
            (false, false) => Style::default().fg(Color::Gray),
        };
        let marker = if is_highlighted { ">" } else { " " };
        let check = if is_chosen { "●" } else { "○" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} {} ", marker, check), style),
            Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_navigation(frame: &mut Frame, area: Rect, session: &TestSession) {
    let enabled = Style::default().fg(Color::Gray);
    let disabled = Style::default().fg(Color::DarkGray);

    let previous = if session.is_first() { disabled } else { enabled };
    let next = if session.is_last() { disabled } else { enabled };

    let line = Line::from(vec![
        Span::styled("< Previous", previous),
        Span::raw("      "),
        Span::styled(
            format!("{} answered", session.total_questions() - session.unanswered_count()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("      "),
        Span::styled("Next >", next),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_confirmation(frame: &mut Frame, area: Rect, unanswered: usize) {
    let mut lines = vec![
        Line::from(""),
        Line::from("Are you sure you want to submit?".bold()),
    ];
    if unanswered > 0 {
        lines.push(Line::from(Span::styled(
            format!("{} questions are still unanswered.", unanswered),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("y submit  ·  n keep going".fg(Color::DarkGray)));

    render_popup(frame, area, " Submit ", lines, Color::Cyan);
}
