use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

pub const TEMPERATURE_WARNING: &str = "Temperature exceeds maximum threshold!";

/// Sky condition reported for a city.
///
/// Serialized as its label; deserialized from either the label or the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Condition {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Clear,
    Rainy,
    Snowy,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Sunny => "sunny",
            Condition::PartlyCloudy => "partly_cloudy",
            Condition::Cloudy => "cloudy",
            Condition::Clear => "clear",
            Condition::Rainy => "rainy",
            Condition::Snowy => "snowy",
        }
    }

    /// Human-readable label, also used as the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Sunny => "Sunny",
            Condition::PartlyCloudy => "Partly Cloudy",
            Condition::Cloudy => "Cloudy",
            Condition::Clear => "Clear",
            Condition::Rainy => "Rainy",
            Condition::Snowy => "Snowy",
        }
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Sunny,
            Condition::PartlyCloudy,
            Condition::Cloudy,
            Condition::Clear,
            Condition::Rainy,
            Condition::Snowy,
        ]
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Condition> for &'static str {
    fn from(value: Condition) -> Self {
        value.label()
    }
}

impl TryFrom<&str> for Condition {
    type Error = anyhow::Error;

    /// Accepts either the id (`partly_cloudy`) or the label (`Partly Cloudy`), any case.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let wanted = value.trim().to_lowercase();

        Condition::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted || c.label().to_lowercase() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown weather condition '{value}'"))
    }
}

impl TryFrom<String> for Condition {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Condition::try_from(value.as_str())
    }
}

/// Canned weather for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    /// Degrees Fahrenheit.
    #[serde(rename = "temp")]
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: u8,
    pub condition: Condition,
    pub description: String,
}

impl WeatherRecord {
    pub fn new(
        city: impl Into<String>,
        temperature: f64,
        humidity: u8,
        condition: Condition,
        description: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            temperature,
            humidity,
            condition,
            description: description.into(),
        }
    }
}

/// A record as handed out to callers: stamped with the time of the request and
/// flagged when it exceeds the configured temperature bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(flatten)]
    pub record: WeatherRecord,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl WeatherReport {
    pub fn new(record: &WeatherRecord, max_temperature: f64, timestamp: DateTime<Utc>) -> Self {
        let warning =
            (record.temperature > max_temperature).then(|| TEMPERATURE_WARNING.to_string());

        Self {
            record: record.clone(),
            timestamp,
            warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub app_name: String,
    pub version: String,
    pub debug_mode: bool,
}
