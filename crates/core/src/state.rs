use serde::{Deserialize, Serialize};

/// Outcome of the provider's last weather refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherStatus {
    Success,
    Failure,
    #[default]
    Pending,
}

/// A point-in-time weather reading pushed by the weather provider.
///
/// The strip never mutates it; it only keeps the latest one around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WeatherSnapshot {
    pub status: WeatherStatus,
    pub temperature_celsius: i32,
    pub temperature_fahrenheit: i32,
    /// Provider-specific name of the condition glyph, e.g. `"partly-cloudy"`.
    pub condition_icon: String,
}

impl WeatherSnapshot {
    /// Snapshot reported when the provider could not produce data.
    pub fn failed() -> Self {
        Self {
            status: WeatherStatus::Failure,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == WeatherStatus::Success
    }

    /// Temperature formatted for display, e.g. `"21°C"` or `"70°F"`.
    pub fn temperature(&self, unit: TemperatureUnit) -> String {
        match unit {
            TemperatureUnit::Metric => format!("{}°C", self.temperature_celsius),
            TemperatureUnit::Imperial => format!("{}°F", self.temperature_fahrenheit),
        }
    }
}

/// Unit system used for the temperature readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    Metric,
    #[default]
    Imperial,
}

impl TemperatureUnit {
    /// Decode the `weather_lockscreen_unit` setting (non-zero = imperial).
    pub fn from_flag(flag: i64) -> Self {
        if flag != 0 {
            Self::Imperial
        } else {
            Self::Metric
        }
    }
}

/// One entry of the ambient song-recognition history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongEntry {
    pub song_title: String,
    pub artist_title: String,
}

impl SongEntry {
    pub fn new(song_title: impl Into<String>, artist_title: impl Into<String>) -> Self {
        Self {
            song_title: song_title.into(),
            artist_title: artist_title.into(),
        }
    }
}
