use anyhow::{Context, Result, anyhow, bail};
use config::{Config, Environment, File, FileFormat, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Dotenv file read from the working directory, below the real environment.
pub const DOTENV_FILE: &str = ".env";

/// Process-wide settings, resolved once at startup and then only read.
///
/// Example TOML:
/// ```toml
/// app_name = "Weather API"
/// debug = false
/// api_version = "v1"
/// max_temperature = 100.0
/// min_temperature = -50.0
/// # catalog_file = "/etc/weather/cities.toml"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app_name: String,
    pub debug: bool,
    pub api_version: String,
    /// Upper bound (°F) for temperatures accepted by the heat index query.
    pub max_temperature: f64,
    /// Lower bound (°F) for temperatures accepted by the heat index query.
    pub min_temperature: f64,
    /// Cities to serve instead of the built-in catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Weather API".to_string(),
            debug: false,
            api_version: "v1".to_string(),
            max_temperature: 100.0,
            min_temperature: -50.0,
            catalog_file: None,
        }
    }
}

impl Settings {
    /// Defaults, then the settings file (`path` or the platform default), then
    /// `.env`, then the process environment. Variable names are matched
    /// case-insensitively against the field names (`MAX_TEMPERATURE`, `DEBUG`, ...).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        let dotenv = read_dotenv(Path::new(DOTENV_FILE))?;

        Self::build(
            &path,
            [
                Environment::default().source(Some(dotenv)).try_parsing(true),
                Environment::default().try_parsing(true),
            ],
        )
    }

    /// Defaults overlaid with the settings file only; missing file gives defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::build(path, [])
    }

    /// Sources are layered in order; later ones win.
    fn build(path: &Path, overrides: impl IntoIterator<Item = Environment>) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("app_name", defaults.app_name)?
            .set_default("debug", defaults.debug)?
            .set_default("api_version", defaults.api_version)?
            .set_default("max_temperature", defaults.max_temperature)?
            .set_default("min_temperature", defaults.min_temperature)?
            .add_source(File::from(path).required(false).format(FileFormat::Toml));

        for env in overrides {
            builder = builder.add_source(env);
        }

        let settings: Settings = builder
            .build()
            .and_then(Config::try_deserialize::<Settings>)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?;

        settings.validate()?;
        tracing::debug!(path = %path.display(), "settings loaded");

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            bail!("app_name must not be empty");
        }
        if !self.max_temperature.is_finite() || !self.min_temperature.is_finite() {
            bail!("temperature bounds must be finite numbers");
        }
        if self.min_temperature >= self.max_temperature {
            bail!(
                "min_temperature ({}) must be below max_temperature ({})",
                self.min_temperature,
                self.max_temperature
            );
        }
        Ok(())
    }

    /// Save settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the default settings file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-api", "weather-api")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Variables from a dotenv file, without touching the process environment.
fn read_dotenv(path: &Path) -> Result<Map<String, String>> {
    if !path.exists() {
        return Ok(Map::new());
    }

    dotenvy::from_path_iter(path)
        .and_then(|iter| iter.collect::<Result<Map<_, _>, _>>())
        .with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(map)).try_parsing(true)
    }

    fn missing_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope.toml");
        (dir, path)
    }

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.app_name, "Weather API");
        assert!(!s.debug);
        assert_eq!(s.api_version, "v1");
        assert_eq!(s.max_temperature, 100.0);
        assert_eq!(s.min_temperature, -50.0);
        assert!(s.catalog_file.is_none());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let (_dir, path) = missing_file();
        let s = Settings::from_file(&path).expect("defaults");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn env_overrides_defaults() {
        let (_dir, path) = missing_file();
        let s = Settings::build(
            &path,
            [env(&[
                ("APP_NAME", "Test Weather"),
                ("DEBUG", "true"),
                ("MAX_TEMPERATURE", "120.5"),
                ("PATH", "/usr/bin"),
            ])],
        )
        .expect("valid overrides");

        assert_eq!(s.app_name, "Test Weather");
        assert!(s.debug);
        assert_eq!(s.max_temperature, 120.5);
        assert_eq!(s.api_version, "v1");
    }

    #[test]
    fn later_sources_win() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "app_name = \"From File\"\nmax_temperature = 110.0\n").expect("write");

        let s = Settings::build(
            &path,
            [
                env(&[("APP_NAME", "From Dotenv"), ("DEBUG", "true")]),
                env(&[("APP_NAME", "From Env")]),
            ],
        )
        .expect("load");

        assert_eq!(s.app_name, "From Env");
        assert!(s.debug);
        assert_eq!(s.max_temperature, 110.0);
    }

    #[test]
    fn env_rejects_garbage() {
        let (_dir, path) = missing_file();

        let err = Settings::build(&path, [env(&[("MAX_TEMPERATURE", "hot")])]).unwrap_err();
        assert!(err.to_string().contains("Failed to load settings"));

        assert!(Settings::build(&path, [env(&[("DEBUG", "maybe")])]).is_err());
    }

    #[test]
    fn env_values_are_validated() {
        let (_dir, path) = missing_file();
        let err = Settings::build(&path, [env(&[("MIN_TEMPERATURE", "150")])]).unwrap_err();
        assert!(err.to_string().contains("must be below max_temperature"));
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let s = Settings {
            min_temperature: 100.0,
            max_temperature: 0.0,
            ..Settings::default()
        };
        assert!(s.validate().is_err());

        let s = Settings {
            app_name: "  ".into(),
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn save_then_read_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let s = Settings {
            app_name: "Saved".into(),
            debug: true,
            max_temperature: 110.0,
            catalog_file: Some(dir.path().join("cities.toml")),
            ..Settings::default()
        };
        s.save(&path).expect("save");

        assert_eq!(Settings::from_file(&path).expect("read"), s);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "debug = true\n").expect("write");

        let s = Settings::from_file(&path).expect("read");
        assert!(s.debug);
        assert_eq!(s.app_name, "Weather API");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_temperature = \"very\"\n").expect("write");

        let err = Settings::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to load settings"));
    }

    #[test]
    fn dotenv_file_is_parsed_without_touching_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(&path, "# local overrides\nAPP_NAME=\"Dotenv Weather\"\nDEBUG=true\n")
            .expect("write");

        let vars = read_dotenv(&path).expect("parse");
        assert_eq!(vars.get("APP_NAME").map(String::as_str), Some("Dotenv Weather"));

        let (_cfg_dir, cfg) = missing_file();
        let s = Settings::build(
            &cfg,
            [Environment::default().source(Some(vars)).try_parsing(true)],
        )
        .expect("load");
        assert_eq!(s.app_name, "Dotenv Weather");
        assert!(s.debug);
    }

    #[test]
    fn missing_dotenv_is_empty() {
        let (_dir, path) = missing_file();
        assert!(read_dotenv(&path).expect("empty").is_empty());
    }
}
