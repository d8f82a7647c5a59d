//! Map panel
//!
//! Draws world coastlines around the current center with the location
//! marker and its popup. The tile layers that a raster map would stack are
//! listed along the bottom border.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use super::colors;
use crate::map::MapView;

pub fn render(frame: &mut Frame, area: Rect, map: &MapView) {
    let block = Block::default()
        .title(map_title(map))
        .title_bottom(layers_line(map))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));

    let Some(viewport) = map.viewport() else {
        let paragraph = Paragraph::new(Span::styled(
            "Waiting for a location...",
            Style::default().fg(colors::SECONDARY),
        ))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    };

    let marker = map.marker().map(|marker| {
        (
            marker.coordinate.longitude,
            marker.coordinate.latitude,
            marker.popup.clone(),
        )
    });

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds(viewport.x_bounds)
        .y_bounds(viewport.y_bounds)
        .paint(move |ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: colors::UNKNOWN,
            });
            ctx.layer();

            if let Some((x, y, popup)) = &marker {
                ctx.draw(&Points {
                    coords: &[(*x, *y)],
                    color: colors::MARKER,
                });
                ctx.print(
                    *x,
                    *y,
                    Span::styled(format!("● {}", popup), Style::default().fg(colors::PRIMARY)),
                );
            }
        });

    frame.render_widget(canvas, area);
}

/// Title with zoom level and the center tile
fn map_title(map: &MapView) -> String {
    match map.center_tile() {
        Some((zoom, x, y)) => format!(" Map · z{} · tile {}/{}/{} ", zoom, zoom, x, y),
        None => format!(" Map · z{} ", map.zoom()),
    }
}

fn layers_line(map: &MapView) -> Line<'static> {
    let names: Vec<&str> = map.layers().iter().map(|layer| layer.name.as_str()).collect();
    if names.is_empty() {
        return Line::default();
    }
    Line::from(Span::styled(
        format!(" {} ", names.join(" + ")),
        Style::default().fg(colors::SECONDARY),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Coordinate;
    use crate::map::{OverlaySettings, DEFAULT_ZOOM};
    use ratatui::{backend::TestBackend, Terminal};

    fn map() -> MapView {
        MapView::new(
            OverlaySettings {
                tile_base_url: "http://tiles.test".to_string(),
                layer: "temp_new".to_string(),
                api_key: "KEY".to_string(),
            },
            DEFAULT_ZOOM,
        )
    }

    fn render_to_string(map: &MapView) -> String {
        let backend = TestBackend::new(70, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), map))
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
    fn test_uninitialized_map_waits() {
        let content = render_to_string(&map());
        assert!(content.contains("Waiting for a location"));
        assert!(content.contains("z10"));
    }

    #[test]
    fn test_map_shows_marker_popup_and_layers() {
        let mut map = map();
        map.show(Coordinate::new(48.85, 2.35));
        map.place_marker(Coordinate::new(48.85, 2.35), "Paris: clear sky, 15.2°C");

        let content = render_to_string(&map);
        assert!(content.contains("Paris: clear sky"));
        assert!(content.contains("tile 10/518/352"));
        assert!(content.contains("OpenStreetMap + temp_new"));
    }

    #[test]
    fn test_map_title_without_center() {
        assert_eq!(map_title(&map()), " Map · z10 ");
    }
}
