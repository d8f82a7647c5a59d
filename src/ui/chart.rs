//! Temperature trend chart
//!
//! Plots the sampled forecast series as a line in the current display unit.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::colors;
use crate::dashboard::ChartPanel;
use crate::data::{ChartSeries, TemperatureUnit};

pub fn render(frame: &mut Frame, area: Rect, panel: &ChartPanel, unit: TemperatureUnit) {
    let block = Block::default()
        .title(" Temperature Trend ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));

    match panel {
        ChartPanel::Ready(series) if !series.is_empty() => {
            render_series(frame, area, block, series, unit);
        }
        ChartPanel::Ready(_) => render_note(frame, area, block, "No forecast data", colors::UNKNOWN),
        ChartPanel::Empty => render_note(frame, area, block, "", colors::UNKNOWN),
        ChartPanel::Loading => render_note(frame, area, block, "Loading chart...", colors::SECONDARY),
        ChartPanel::Failed(message) => render_note(frame, area, block, message, colors::ERROR),
    }
}

fn render_note(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    text: &str,
    color: ratatui::style::Color,
) {
    let paragraph = Paragraph::new(Span::styled(text.to_string(), Style::default().fg(color)))
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_series(frame: &mut Frame, area: Rect, block: Block, series: &ChartSeries, unit: TemperatureUnit) {
    let data = chart_data(series, unit);
    let (y_min, y_max) = y_bounds(&data);
    let x_max = (data.len().saturating_sub(1) as f64).max(1.0);

    let dataset = Dataset::default()
        .name(format!("Temperature ({})", unit.symbol()))
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(colors::TEMPERATURE))
        .data(&data);

    let x_labels: Vec<Span> = series
        .points
        .iter()
        .map(|point| Span::styled(point.label.clone(), Style::default().fg(colors::SECONDARY)))
        .collect();

    let y_labels = vec![
        Span::raw(format!("{:.1}", y_min)),
        Span::raw(format!("{:.1}", (y_min + y_max) / 2.0)),
        Span::raw(format!("{:.1}", y_max)),
    ];

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(colors::SECONDARY))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Line::from(Span::styled(
                    unit.symbol(),
                    Style::default().add_modifier(Modifier::BOLD),
                )))
                .style(Style::default().fg(colors::SECONDARY))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

/// Points indexed by position, with temperatures in the display unit
fn chart_data(series: &ChartSeries, unit: TemperatureUnit) -> Vec<(f64, f64)> {
    series
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| (i as f64, unit.from_celsius(point.temperature_c)))
        .collect()
}

/// Y range with one degree of padding on each side
fn y_bounds(data: &[(f64, f64)]) -> (f64, f64) {
    let min = data.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let max = data.iter().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    ((min - 1.0).floor(), (max + 1.0).ceil())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ChartPoint;
    use ratatui::{backend::TestBackend, Terminal};

    fn series() -> ChartSeries {
        ChartSeries {
            points: vec![
                ChartPoint {
                    label: "Jul 15".to_string(),
                    timestamp: 1_721_001_600,
                    temperature_c: 10.0,
                },
                ChartPoint {
                    label: "Jul 16".to_string(),
                    timestamp: 1_721_088_000,
                    temperature_c: 20.0,
                },
            ],
        }
    }

    fn render_to_string(panel: &ChartPanel, unit: TemperatureUnit) -> String {
        let backend = TestBackend::new(60, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), panel, unit))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_chart_data_uses_display_unit() {
        let data = chart_data(&series(), TemperatureUnit::Fahrenheit);
        assert_eq!(data.len(), 2);
        assert!((data[0].1 - 50.0).abs() < 1e-9);
        assert!((data[1].1 - 68.0).abs() < 1e-9);
        assert_eq!(data[1].0, 1.0);
    }

    #[test]
    fn test_y_bounds_pad_range() {
        assert_eq!(y_bounds(&[(0.0, 10.2), (1.0, 19.6)]), (9.0, 21.0));
        assert_eq!(y_bounds(&[]), (0.0, 1.0));
    }

    #[test]
    fn test_chart_renders_labels() {
        let content = render_to_string(&ChartPanel::Ready(series()), TemperatureUnit::Celsius);
        assert!(content.contains("Temperature Trend"));
        assert!(content.contains("Jul 15"));
    }

    #[test]
    fn test_failed_chart_shows_message() {
        let content = render_to_string(
            &ChartPanel::Failed("Failed to load chart data.".to_string()),
            TemperatureUnit::Celsius,
        );
        assert!(content.contains("Failed to load chart data."));
    }
}
