//! Derivations from the provider's 3-hour forecast list
//!
//! The forecast panel shows one reading per calendar day and the trend chart
//! samples the list at roughly daily spacing. Both work on the same
//! chronologically ordered entries.

use chrono::{NaiveDate, NaiveTime};

use super::{ChartPoint, ChartSeries, ForecastDay, ForecastEntry};

/// Maximum number of days shown in the forecast panel
pub const MAX_FORECAST_DAYS: usize = 5;

/// Minimum spacing between two chart samples, in seconds
pub const CHART_SAMPLE_SPACING_SECS: i64 = 24 * 60 * 60;

fn is_noon(entry: &ForecastEntry) -> bool {
    entry.local_time.time() == NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

/// Picks one entry per calendar date, preferring the reading at exactly noon.
///
/// Dates keep the order in which they first appear and at most
/// [`MAX_FORECAST_DAYS`] are returned. When a date has no noon reading the
/// first entry seen for that date is used.
pub fn select_daily_forecast(entries: &[ForecastEntry]) -> Vec<ForecastDay> {
    let mut days: Vec<(NaiveDate, &ForecastEntry)> = Vec::new();

    for entry in entries {
        let date = entry.local_time.date();
        match days.iter_mut().find(|(day, _)| *day == date) {
            Some(slot) => {
                if is_noon(entry) {
                    slot.1 = entry;
                }
            }
            None => days.push((date, entry)),
        }
    }

    days.into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, entry)| ForecastDay {
            date,
            temperature_c: entry.temperature_c,
            condition: entry.condition.clone(),
            description: entry.description.clone(),
            icon_code: entry.icon_code.clone(),
        })
        .collect()
}

/// Samples entries for the trend chart.
///
/// The first entry is always kept; every later entry is kept when at least
/// [`CHART_SAMPLE_SPACING_SECS`] have passed since the last kept one.
pub fn sample_chart_series(entries: &[ForecastEntry]) -> ChartSeries {
    let mut points: Vec<ChartPoint> = Vec::new();
    let mut last_kept: Option<i64> = None;

    for entry in entries {
        let keep = match last_kept {
            None => true,
            Some(last) => entry.timestamp - last >= CHART_SAMPLE_SPACING_SECS,
        };

        if keep {
            points.push(ChartPoint {
                label: entry.local_time.format("%b %-d").to_string(),
                timestamp: entry.timestamp,
                temperature_c: entry.temperature_c,
            });
            last_kept = Some(entry.timestamp);
        }
    }

    ChartSeries { points }
}
