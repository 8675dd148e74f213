use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub fn render(frame: &mut Frame, area: Rect, has_live_test: bool) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Fill(1),
    ])
    .split(area);

    let live = if has_live_test {
        Line::from("A test is live".fg(Color::Green))
    } else {
        Line::from("No test is live yet".fg(Color::DarkGray))
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUESTIONNAIRE",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        live,
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled("T", Style::default().fg(Color::Green).bold()),
            Span::styled("  I'm a tutor", Style::default().fg(Color::Gray)),
        ]),
        Line::from(vec![
            Span::styled("S", Style::default().fg(Color::Green).bold()),
            Span::styled("  I'm a student", Style::default().fg(Color::Gray)),
        ]),
        Line::from(""),
        Line::from("q to quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}
