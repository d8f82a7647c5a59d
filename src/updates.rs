//! Messages sent from background fetch tasks to the controller
//!
//! Each fetch runs as its own tokio task and reports back over a channel.
//! Messages carry the generation of the request that started them so results
//! belonging to a superseded request can be dropped.

use crate::data::{ChartSeries, Coordinate, CurrentConditions, ForecastDay, WeatherError};
use crate::location::LocationError;

/// Identifies one issued request; later requests have larger generations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues generations and remembers the latest one
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: Generation,
}

impl GenerationCounter {
    /// Issues a new generation, superseding all earlier ones
    pub fn advance(&mut self) -> Generation {
        self.latest = Generation(self.latest.0 + 1);
        self.latest
    }

    pub fn latest(&self) -> Generation {
        self.latest
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.latest
    }
}

/// Result of one background task
#[derive(Debug)]
pub enum Update {
    /// Location source answered
    LocationAcquired {
        generation: Generation,
        result: Result<Coordinate, LocationError>,
    },
    /// City lookup answered
    CityResolved {
        generation: Generation,
        city: String,
        result: Result<Coordinate, WeatherError>,
    },
    /// Current conditions for a coordinate
    CurrentLoaded {
        generation: Generation,
        coordinate: Coordinate,
        result: Result<CurrentConditions, WeatherError>,
    },
    /// Daily forecast derived from the forecast list
    ForecastLoaded {
        generation: Generation,
        result: Result<Vec<ForecastDay>, WeatherError>,
    },
    /// Chart series derived from the forecast list
    ChartLoaded {
        generation: Generation,
        result: Result<ChartSeries, WeatherError>,
    },
}

impl Update {
    pub fn generation(&self) -> Generation {
        match self {
            Update::LocationAcquired { generation, .. }
            | Update::CityResolved { generation, .. }
            | Update::CurrentLoaded { generation, .. }
            | Update::ForecastLoaded { generation, .. }
            | Update::ChartLoaded { generation, .. } => *generation,
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Update::LocationAcquired { .. } => "location",
            Update::CityResolved { .. } => "city",
            Update::CurrentLoaded { .. } => "current",
            Update::ForecastLoaded { .. } => "forecast",
            Update::ChartLoaded { .. } => "chart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_at_zero() {
        let counter = GenerationCounter::default();
        assert_eq!(counter.latest().value(), 0);
    }

    #[test]
    fn test_advance_is_monotonic_and_supersedes() {
        let mut counter = GenerationCounter::default();
        let first = counter.advance();
        assert!(counter.is_current(first));

        let second = counter.advance();
        assert!(second > first);
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
        assert_eq!(counter.latest(), second);
    }

    #[test]
    fn test_update_generation_and_kind() {
        let mut counter = GenerationCounter::default();
        let generation = counter.advance();
        let update = Update::ChartLoaded {
            generation,
            result: Ok(ChartSeries::default()),
        };

        assert_eq!(update.generation(), generation);
        assert_eq!(update.kind(), "chart");
    }
}
