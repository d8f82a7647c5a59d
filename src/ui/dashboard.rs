//! Main dashboard screen
//!
//! Layout, top to bottom: city search bar, current conditions and forecast
//! beside the map, the temperature chart, and a key hint footer.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{chart, colors, map};
use crate::app::InputMode;
use crate::dashboard::{CurrentPanel, Dashboard, ForecastPanel};
use crate::data::TemperatureUnit;

pub fn render(frame: &mut Frame, dashboard: &Dashboard, input_mode: InputMode) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(12),
            Constraint::Length(1),
        ])
        .split(area);

    render_search_bar(frame, rows[0], &dashboard.city_input, input_mode);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(4)])
        .split(middle[0]);

    render_current(frame, left[0], &dashboard.current, dashboard.unit);
    render_forecast(frame, left[1], &dashboard.forecast, dashboard.unit);
    map::render(frame, middle[1], &dashboard.map);
    chart::render(frame, rows[2], &dashboard.chart, dashboard.unit);
    render_footer(frame, rows[3], input_mode);
}

fn render_search_bar(frame: &mut Frame, area: Rect, input: &str, input_mode: InputMode) {
    let (border, text) = match input_mode {
        InputMode::Editing => (
            Style::default().fg(colors::EDITING),
            Line::from(vec![
                Span::styled(input.to_string(), Style::default().fg(colors::PRIMARY)),
                Span::styled("▏", Style::default().fg(colors::EDITING)),
            ]),
        ),
        InputMode::Normal if input.is_empty() => (
            Style::default().fg(colors::HEADER),
            Line::from(Span::styled(
                "Press / to search for a city",
                Style::default().fg(colors::UNKNOWN),
            )),
        ),
        InputMode::Normal => (
            Style::default().fg(colors::HEADER),
            Line::from(Span::styled(input.to_string(), Style::default().fg(colors::SECONDARY))),
        ),
    };

    let block = Block::default()
        .title(" City ")
        .borders(Borders::ALL)
        .border_style(border);

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_current(frame: &mut Frame, area: Rect, panel: &CurrentPanel, unit: TemperatureUnit) {
    let icon = panel
        .icon()
        .map(|icon| format!("{} ", icon.glyph()))
        .unwrap_or_default();

    let value_style = match panel {
        CurrentPanel::Ready(_) => Style::default().fg(colors::PRIMARY),
        _ => Style::default().fg(colors::UNKNOWN),
    };

    let lines = vec![
        Line::from(Span::styled(
            panel.city_name_text().to_string(),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            panel.description_text().to_string(),
            Style::default().fg(colors::SECONDARY),
        )),
        Line::from(vec![
            Span::raw(icon),
            Span::styled(
                panel.temperature_text(unit),
                Style::default()
                    .fg(colors::TEMPERATURE)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Humidity: ", Style::default().fg(colors::SECONDARY)),
            Span::styled(panel.humidity_text(), value_style),
        ]),
        Line::from(vec![
            Span::styled("Wind:     ", Style::default().fg(colors::SECONDARY)),
            Span::styled(panel.wind_text(), value_style),
        ]),
    ];

    let block = Block::default()
        .title(" Current Weather ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_forecast(frame: &mut Frame, area: Rect, panel: &ForecastPanel, unit: TemperatureUnit) {
    let block = Block::default()
        .title(" 5-Day Forecast ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));

    let paragraph = match panel {
        ForecastPanel::Ready(days) => {
            let lines: Vec<Line> = days
                .iter()
                .map(|day| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:<12}", day.label()),
                            Style::default().fg(colors::PRIMARY),
                        ),
                        Span::raw(format!("{} ", day.icon().glyph())),
                        Span::styled(
                            format!("{:>8}", unit.format(day.temperature_c)),
                            Style::default().fg(colors::TEMPERATURE),
                        ),
                        Span::styled(
                            format!("  {}", day.description),
                            Style::default().fg(colors::SECONDARY),
                        ),
                    ])
                })
                .collect();
            Paragraph::new(lines)
        }
        ForecastPanel::Loading => Paragraph::new(Span::styled(
            "Loading forecast...",
            Style::default().fg(colors::SECONDARY),
        ))
        .alignment(Alignment::Center),
        ForecastPanel::Failed(message) => Paragraph::new(Span::styled(
            message.clone(),
            Style::default().fg(colors::ERROR),
        ))
        .alignment(Alignment::Center),
        ForecastPanel::Empty => Paragraph::new(""),
    };

    frame.render_widget(paragraph.block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, input_mode: InputMode) {
    let hint = match input_mode {
        InputMode::Editing => "Enter search · Esc cancel",
        InputMode::Normal => "/ search · l locate · r reload · u °C/°F · +/- zoom · ? help · q quit",
    };
    let footer = Paragraph::new(Span::styled(hint, Style::default().fg(colors::UNKNOWN)))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
