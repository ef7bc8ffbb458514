//! Single entry point for the weather operations.
//!
//! The service owns the settings and the catalog and never mutates either, so
//! one instance can be shared across request handlers behind an `Arc`.

use chrono::Utc;

use crate::{
    catalog::Catalog,
    config::Settings,
    error::WeatherError,
    heat_index::compute_heat_index,
    model::{ServiceInfo, WeatherRecord, WeatherReport},
};

#[derive(Debug, Clone)]
pub struct WeatherService {
    settings: Settings,
    catalog: Catalog,
}

impl WeatherService {
    /// Service over the built-in catalog.
    pub fn new(settings: Settings) -> Result<Self, WeatherError> {
        Ok(Self::with_catalog(settings, Catalog::builtin()?))
    }

    pub fn with_catalog(settings: Settings, catalog: Catalog) -> Self {
        Self { settings, catalog }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Look up the weather for `city`.
    ///
    /// # Errors
    ///
    /// [`WeatherError::InvalidInput`] for a blank name,
    /// [`WeatherError::CityNotFound`] when the catalog has no match.
    pub fn get_weather(&self, city: &str) -> Result<&WeatherRecord, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            tracing::debug!("rejected blank city name");
            return Err(WeatherError::invalid_input("city must not be blank"));
        }

        match self.catalog.lookup(city) {
            Some(record) => {
                tracing::debug!(city, "weather lookup hit");
                Ok(record)
            }
            None => {
                tracing::debug!(city, "weather lookup miss");
                Err(WeatherError::CityNotFound(city.to_string()))
            }
        }
    }

    /// Like [`Self::get_weather`], stamped with the current time and flagged when
    /// the temperature is above the configured bound.
    pub fn report(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let record = self.get_weather(city)?;
        Ok(WeatherReport::new(record, self.settings.max_temperature, Utc::now()))
    }

    pub fn list_cities(&self) -> Vec<&str> {
        self.catalog.list_cities()
    }

    /// Heat index for the given conditions, after checking them against the
    /// configured temperature bounds.
    pub fn get_heat_index(&self, temperature: f64, humidity: i32) -> Result<f64, WeatherError> {
        if !(0..=100).contains(&humidity) {
            tracing::debug!(humidity, "rejected humidity");
            return Err(WeatherError::invalid_input(format!(
                "humidity must be between 0 and 100, got {humidity}"
            )));
        }

        let Settings {
            min_temperature,
            max_temperature,
            ..
        } = self.settings;

        if temperature > max_temperature {
            tracing::debug!(temperature, max_temperature, "rejected temperature");
            return Err(WeatherError::invalid_input(format!(
                "temperature {temperature} exceeds the maximum of {max_temperature}"
            )));
        }
        if temperature < min_temperature {
            tracing::debug!(temperature, min_temperature, "rejected temperature");
            return Err(WeatherError::invalid_input(format!(
                "temperature {temperature} is below the minimum of {min_temperature}"
            )));
        }

        compute_heat_index(temperature, humidity)
    }

    pub fn get_info(&self) -> ServiceInfo {
        ServiceInfo {
            app_name: self.settings.app_name.clone(),
            version: self.settings.api_version.clone(),
            debug_mode: self.settings.debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, TEMPERATURE_WARNING};
    use rstest::rstest;

    fn service() -> WeatherService {
        service_with(Settings::default())
    }

    fn service_with(settings: Settings) -> WeatherService {
        WeatherService::new(settings).expect("built-in catalog")
    }

    #[rstest]
    #[case("New York")]
    #[case("London")]
    #[case("Tokyo")]
    #[case("Sydney")]
    fn all_cities_have_weather(#[case] city: &str) {
        let svc = service();
        let record = svc.get_weather(city).expect("city should exist");
        assert_eq!(record.city, city);
        assert!((0..=100).contains(&record.humidity));
    }

    #[test]
    fn get_weather_normalizes() {
        let svc = service();
        let a = svc.get_weather("new york").expect("found");
        let b = svc.get_weather(" New York ").expect("found");
        let c = svc.get_weather("NEW YORK").expect("found");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.condition, Condition::PartlyCloudy);
    }

    #[test]
    fn unknown_city_not_found() {
        let err = service().get_weather("Nonexistent City").unwrap_err();
        assert_eq!(err, WeatherError::CityNotFound("Nonexistent City".into()));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_city_is_invalid(#[case] city: &str) {
        let err = service().get_weather(city).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidInput(_)));
    }

    #[test]
    fn list_cities_matches_catalog() {
        let svc = service();
        let cities = svc.list_cities();
        assert!(!cities.is_empty());
        assert_eq!(cities.len(), svc.catalog().len());
        assert!(cities.contains(&"New York"));
    }

    #[test]
    fn report_uses_configured_bound() {
        let svc = service_with(Settings {
            max_temperature: 70.0,
            ..Settings::default()
        });

        let report = svc.report("new york").expect("found");
        assert_eq!(report.record.city, "New York");
        assert_eq!(report.warning.as_deref(), Some(TEMPERATURE_WARNING));

        let report = svc.report("london").expect("found");
        assert!(report.warning.is_none());
    }

    #[test]
    fn heat_index_below_threshold_is_stable() {
        let svc = service();
        for _ in 0..5 {
            assert_eq!(svc.get_heat_index(75.0, 60), Ok(75.0));
        }
    }

    #[test]
    fn heat_index_hot_day() {
        let hi = service().get_heat_index(95.0, 60).expect("valid");
        assert!((hi - 113.1).abs() <= 0.1);
    }

    #[rstest]
    #[case(-5)]
    #[case(150)]
    fn heat_index_bad_humidity(#[case] humidity: i32) {
        let svc = service();
        for t in [-40.0, 0.0, 75.0, 95.0, 500.0] {
            let err = svc.get_heat_index(t, humidity).unwrap_err();
            assert!(matches!(err, WeatherError::InvalidInput(_)), "t={t}");
        }
    }

    #[test]
    fn heat_index_respects_temperature_bounds() {
        let svc = service();
        assert!(matches!(
            svc.get_heat_index(200.0, 60),
            Err(WeatherError::InvalidInput(_))
        ));
        assert!(matches!(
            svc.get_heat_index(-60.0, 60),
            Err(WeatherError::InvalidInput(_))
        ));
        assert!(svc.get_heat_index(100.0, 60).is_ok());

        let lenient = service_with(Settings {
            max_temperature: 150.0,
            ..Settings::default()
        });
        assert!(lenient.get_heat_index(120.0, 60).is_ok());
    }

    #[test]
    fn info_reflects_settings_regardless_of_prior_calls() {
        let settings = Settings {
            app_name: "Forecast Hub".into(),
            debug: true,
            api_version: "v2".into(),
            ..Settings::default()
        };
        let svc = service_with(settings);
        let before = svc.get_info();

        let _ = svc.get_weather("Tokyo");
        let _ = svc.get_weather("Atlantis");
        let _ = svc.get_heat_index(95.0, 60);
        let _ = svc.get_heat_index(95.0, 150);
        let _ = svc.list_cities();

        let after = svc.get_info();
        assert_eq!(before, after);
        assert_eq!(
            after,
            ServiceInfo {
                app_name: "Forecast Hub".into(),
                version: "v2".into(),
                debug_mode: true,
            }
        );
    }

    #[test]
    fn service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WeatherService>();
    }
}
