//! Weather codes and forecast compression

use serde::{Deserialize, Serialize};

use super::events::PacketSessionData;

/// Game weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Weather {
    Clear,
    LightCloud,
    Overcast,
    LightRain,
    HeavyRain,
    Storm,
    Unknown(u8),
}

impl Weather {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Weather::Clear,
            1 => Weather::LightCloud,
            2 => Weather::Overcast,
            3 => Weather::LightRain,
            4 => Weather::HeavyRain,
            5 => Weather::Storm,
            other => Weather::Unknown(other),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::LightCloud => "light cloud",
            Weather::Overcast => "overcast",
            Weather::LightRain => "light rain",
            Weather::HeavyRain => "heavy rain",
            Weather::Storm => "storm",
            Weather::Unknown(_) => "unknown",
        }
    }

    pub fn is_wet(self) -> bool {
        matches!(self, Weather::LightRain | Weather::HeavyRain | Weather::Storm)
    }
}

/// A point in the forecast where the weather changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct WeatherChange {
    /// Minutes into the session
    pub time_offset: u8,
    /// Raw weather code
    pub weather_code: u8,
}

impl WeatherChange {
    pub fn weather(&self) -> Weather {
        Weather::from_code(self.weather_code)
    }

    /// Collapse the session forecast into its transitions.
    ///
    /// Only samples for the current session type are considered, and only
    /// the first of a run of identical samples is kept. The run preceding
    /// the first change is the current weather, so it is never reported.
    pub fn from_forecast(session: &PacketSessionData) -> Vec<WeatherChange> {
        let count = usize::from(session.num_weather_forecast_samples);
        let mut current = session.weather;
        let mut changes = Vec::new();

        for sample in session.weather_forecast_samples.iter().take(count) {
            if sample.session_type != session.session_type || sample.weather == current {
                continue;
            }
            current = sample.weather;
            changes.push(WeatherChange {
                time_offset: sample.time_offset,
                weather_code: sample.weather,
            });
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::events::WeatherForecastSample;

    fn sample(session_type: u8, time_offset: u8, weather: u8) -> WeatherForecastSample {
        WeatherForecastSample { session_type, time_offset, weather, ..Default::default() }
    }

    #[test]
    fn collapses_runs_to_their_first_sample() {
        let session = PacketSessionData {
            weather: 0,
            session_type: 10,
            num_weather_forecast_samples: 7,
            weather_forecast_samples: vec![
                sample(10, 0, 0),
                sample(10, 5, 1),
                sample(10, 10, 1),
                sample(10, 15, 3),
                sample(10, 30, 3),
                sample(10, 45, 1),
                sample(10, 60, 1),
            ],
            ..Default::default()
        };

        let changes = WeatherChange::from_forecast(&session);
        assert_eq!(
            changes,
            vec![
                WeatherChange { time_offset: 5, weather_code: 1 },
                WeatherChange { time_offset: 15, weather_code: 3 },
                WeatherChange { time_offset: 45, weather_code: 1 },
            ]
        );
        assert!(changes[1].weather().is_wet());
    }

    #[test]
    fn ignores_other_session_types_and_padding() {
        let session = PacketSessionData {
            weather: 2,
            session_type: 5,
            num_weather_forecast_samples: 2,
            weather_forecast_samples: vec![sample(6, 0, 4), sample(5, 10, 2), sample(5, 20, 5)],
            ..Default::default()
        };

        assert!(WeatherChange::from_forecast(&session).is_empty());
    }

    #[test]
    fn weather_labels() {
        assert_eq!(Weather::from_code(4).label(), "heavy rain");
        assert_eq!(Weather::from_code(9), Weather::Unknown(9));
    }
}
