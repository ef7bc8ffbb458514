//! Error types returned by the weather query operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// A parameter was blank, malformed or outside its allowed range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Weather data not found for city: {0}")]
    CityNotFound(String),

    /// Two catalog records normalize to the same city key.
    #[error("Duplicate city in catalog: {0}")]
    DuplicateCity(String),
}

impl WeatherError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Message suitable for showing to the caller that made the request.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) => format!("Invalid input: {msg}"),
            Self::CityNotFound(city) => format!(
                "Weather data not found for city: {city}. See the list of available cities."
            ),
            Self::DuplicateCity(_) => "Weather catalog is misconfigured".to_string(),
        }
    }

    /// Whether the caller can fix this error by changing its request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::CityNotFound(_))
    }
}
