//! Mapping from provider icon codes to dashboard icons

use serde::{Deserialize, Serialize};

/// Icons shown next to current conditions and forecast days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherIcon {
    Sun,
    Moon,
    CloudSun,
    Cloud,
    BrokenClouds,
    HeavyShowers,
    SunRain,
    Bolt,
    Snowflake,
    Smog,
    /// Fallback for codes the provider adds later
    Unknown,
}

impl WeatherIcon {
    /// Maps a provider icon code such as "10d" to an icon.
    ///
    /// Every input maps to some icon; unrecognized codes give `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "01d" => WeatherIcon::Sun,
            "01n" => WeatherIcon::Moon,
            "02d" | "02n" => WeatherIcon::CloudSun,
            "03d" | "03n" => WeatherIcon::Cloud,
            "04d" | "04n" => WeatherIcon::BrokenClouds,
            "09d" | "09n" => WeatherIcon::HeavyShowers,
            "10d" | "10n" => WeatherIcon::SunRain,
            "11d" | "11n" => WeatherIcon::Bolt,
            "13d" | "13n" => WeatherIcon::Snowflake,
            "50d" | "50n" => WeatherIcon::Smog,
            _ => WeatherIcon::Unknown,
        }
    }

    /// Stable identifier for the icon
    pub fn identifier(self) -> &'static str {
        match self {
            WeatherIcon::Sun => "sun",
            WeatherIcon::Moon => "moon",
            WeatherIcon::CloudSun => "cloud-sun",
            WeatherIcon::Cloud => "cloud",
            WeatherIcon::BrokenClouds => "cloud-broken",
            WeatherIcon::HeavyShowers => "cloud-showers-heavy",
            WeatherIcon::SunRain => "cloud-sun-rain",
            WeatherIcon::Bolt => "bolt",
            WeatherIcon::Snowflake => "snowflake",
            WeatherIcon::Smog => "smog",
            WeatherIcon::Unknown => "question",
        }
    }

    /// Single-width glyph for terminal display
    pub fn glyph(self) -> &'static str {
        match self {
            WeatherIcon::Sun => "☀",
            WeatherIcon::Moon => "☾",
            WeatherIcon::CloudSun => "⛅",
            WeatherIcon::Cloud | WeatherIcon::BrokenClouds => "☁",
            WeatherIcon::HeavyShowers => "☔",
            WeatherIcon::SunRain => "☂",
            WeatherIcon::Bolt => "⚡",
            WeatherIcon::Snowflake => "❄",
            WeatherIcon::Smog => "≋",
            WeatherIcon::Unknown => "?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_and_night_clear_sky() {
        assert_eq!(WeatherIcon::from_code("01d"), WeatherIcon::Sun);
        assert_eq!(WeatherIcon::from_code("01n"), WeatherIcon::Moon);
    }

    #[test]
    fn test_day_and_night_share_icon_for_other_codes() {
        let pairs = [
            ("02", WeatherIcon::CloudSun),
            ("03", WeatherIcon::Cloud),
            ("04", WeatherIcon::BrokenClouds),
            ("09", WeatherIcon::HeavyShowers),
            ("10", WeatherIcon::SunRain),
            ("11", WeatherIcon::Bolt),
            ("13", WeatherIcon::Snowflake),
            ("50", WeatherIcon::Smog),
        ];

        for (prefix, expected) in pairs {
            assert_eq!(WeatherIcon::from_code(&format!("{prefix}d")), expected);
            assert_eq!(WeatherIcon::from_code(&format!("{prefix}n")), expected);
        }
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        for code in ["", "99d", "01", "01D", "rain", "10x"] {
            let icon = WeatherIcon::from_code(code);
            assert_eq!(icon, WeatherIcon::Unknown, "code {:?}", code);
            assert_eq!(icon.identifier(), "question");
        }
    }

    #[test]
    fn test_identifiers_are_distinct() {
        let icons = [
            WeatherIcon::Sun,
            WeatherIcon::Moon,
            WeatherIcon::CloudSun,
            WeatherIcon::Cloud,
            WeatherIcon::BrokenClouds,
            WeatherIcon::HeavyShowers,
            WeatherIcon::SunRain,
            WeatherIcon::Bolt,
            WeatherIcon::Snowflake,
            WeatherIcon::Smog,
            WeatherIcon::Unknown,
        ];

        for (i, a) in icons.iter().enumerate() {
            for (j, b) in icons.iter().enumerate() {
                if i != j {
                    assert_ne!(a.identifier(), b.identifier());
                }
            }
            assert!(!a.glyph().is_empty());
        }
    }
}
