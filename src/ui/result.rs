use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{App, Outcome, TIME_UP_NOTICE};
use crate::data::ConfigStore;
use crate::generate::QuestionGenerator;
use crate::scoring::ReviewEntry;

use super::render_controls;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render<S: ConfigStore, G: QuestionGenerator>(frame: &mut Frame, area: Rect, app: &App<S, G>) {
    let Some(outcome) = app.outcome() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], outcome);
    render_review(frame, chunks[2], &outcome.review, app.result_scroll());
    render_controls(frame, chunks[3], "j/k scroll  ·  enter home  ·  q quit");
}

fn get_grade_color(percentage: u32) -> Color {
    match percentage {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, outcome: &Outcome) {
    let score = outcome.score;
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "You scored {} out of {}  ({}%)",
                score.correct, score.total, score.percentage
            ),
            Style::default().fg(get_grade_color(score.percentage)).bold(),
        )),
    ];
    if outcome.timed_out() {
        content.push(Line::from(TIME_UP_NOTICE.fg(Color::Yellow)));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_review(frame: &mut Frame, area: Rect, review: &[ReviewEntry], scroll: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(review.len() * 4);

    for (index, entry) in review.iter().enumerate() {
        let (symbol, color) = if entry.is_correct {
            ("+", Color::Green)
        } else {
            ("-", Color::Red)
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:2}. ", index + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                truncate_question(&entry.question_text),
                Style::default().fg(Color::Gray),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw("       Your answer: "),
            Span::styled(entry.your_answer_label().to_string(), Style::default().fg(color)),
        ]));
        if !entry.is_correct {
            lines.push(Line::from(vec![
                Span::raw("       Correct answer: "),
                Span::styled(entry.correct_option.clone(), Style::default().fg(Color::Green)),
            ]));
        }
        lines.push(Line::from(""));
    }

    let offset: usize = review
        .iter()
        .take(scroll)
        .map(|entry| if entry.is_correct { 3 } else { 4 })
        .sum();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((offset as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_question() {
        assert_eq!(truncate_question("short"), "short");
        let long = "x".repeat(60);
        let truncated = truncate_question(&long);
        assert_eq!(truncated.chars().count(), QUESTION_PREVIEW_LENGTH + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_grade_color() {
        assert_eq!(get_grade_color(100), Color::Green);
        assert_eq!(get_grade_color(75), Color::Cyan);
        assert_eq!(get_grade_color(50), Color::Yellow);
        assert_eq!(get_grade_color(0), Color::Red);
    }
}
