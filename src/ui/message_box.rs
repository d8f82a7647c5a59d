//! Modal box for errors and validation notices

use ratatui::{
    layout::Alignment,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::colors;
use super::help_overlay::centered_rect;

pub fn render(frame: &mut Frame, text: &str) {
    let area = centered_rect(64, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(colors::PRIMARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter or Esc to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Message ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::ERROR));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}
