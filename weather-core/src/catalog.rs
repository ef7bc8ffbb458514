//! Read-only store of the cities we have weather for.
//!
//! Records keep their insertion order for listing; lookups go through an index
//! keyed by the normalized city name, so `"new york"`, `" New  York "` and
//! `"NEW YORK"` all resolve to the same record.

use anyhow::Context;
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};

use crate::{
    error::WeatherError,
    model::{Condition, WeatherRecord},
};

/// Trim, collapse runs of whitespace into a single space and lowercase.
pub fn normalize_city(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    city: Vec<WeatherRecord>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<WeatherRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from `records`, rejecting names that collide after normalization.
    pub fn new(records: impl IntoIterator<Item = WeatherRecord>) -> Result<Self, WeatherError> {
        let mut catalog = Self {
            records: Vec::new(),
            index: HashMap::new(),
        };

        for record in records {
            let key = normalize_city(&record.city);
            if key.is_empty() {
                return Err(WeatherError::invalid_input("catalog city name must not be blank"));
            }
            if catalog.index.contains_key(&key) {
                return Err(WeatherError::DuplicateCity(record.city));
            }
            catalog.index.insert(key, catalog.records.len());
            catalog.records.push(record);
        }

        Ok(catalog)
    }

    /// The canned catalog served by default.
    pub fn builtin() -> Result<Self, WeatherError> {
        Self::new([
            WeatherRecord::new(
                "New York",
                72.5,
                65,
                Condition::PartlyCloudy,
                "Mild with scattered clouds over Manhattan",
            ),
            WeatherRecord::new(
                "London",
                59.0,
                78,
                Condition::Rainy,
                "Steady drizzle with a light breeze",
            ),
            WeatherRecord::new("Tokyo", 68.3, 55, Condition::Sunny, "Bright and pleasant"),
            WeatherRecord::new(
                "Sydney",
                77.9,
                60,
                Condition::Clear,
                "Clear skies over the harbour",
            ),
        ])
    }

    /// Read a catalog from a TOML file of `[[city]]` tables.
    ///
    /// ```toml
    /// [[city]]
    /// city = "Paris"
    /// temp = 64.0
    /// humidity = 55
    /// condition = "partly_cloudy"
    /// description = "Soft light over the Seine"
    /// ```
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

        let file: CatalogFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;

        let catalog = Self::new(file.city)
            .with_context(|| format!("Invalid catalog file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), cities = catalog.len(), "loaded catalog file");
        Ok(catalog)
    }

    /// `path` when given, otherwise the built-in catalog.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()?),
        }
    }

    /// City names in insertion order.
    pub fn list_cities(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.city.as_str()).collect()
    }

    pub fn lookup(&self, name: &str) -> Option<&WeatherRecord> {
        self.index
            .get(&normalize_city(name))
            .map(|&i| &self.records[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeatherRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
