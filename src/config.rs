use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::frames::Atmosphere;
use crate::predict::GroundStation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid station coordinates: {0:?}")]
    Station(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    /// `"lat,lon"` in degrees.
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionConfig {
    #[serde(default = "default_step", deserialize_with = "human_duration")]
    pub step: Duration,
    #[serde(default)]
    pub min_elevation_deg: f64,
    #[serde(default = "default_refine")]
    pub refine: bool,
    #[serde(default)]
    pub refraction: Option<Atmosphere>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            min_elevation_deg: 0.0,
            refine: default_refine(),
            refraction: None,
        }
    }
}

fn default_step() -> Duration {
    Duration::from_secs(30)
}

fn default_refine() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    pub eop_file: Option<PathBuf>,
    pub space_weather_file: Option<PathBuf>,
    #[serde(default)]
    pub drag_scaling: bool,
}

fn human_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    pub fn ground_station(&self) -> Result<GroundStation, ConfigError> {
        let name = self.station.name.as_deref().unwrap_or("station");
        GroundStation::from_coordinates(
            name,
            &self.station.coordinates,
            Some(self.station.altitude_m),
        )
        .ok_or_else(|| ConfigError::Station(self.station.coordinates.clone()))
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_yaml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config() {
        let yaml = r#"
station:
  name: Garching
  coordinates: "48.2656, 11.6712"
  altitude_m: 480
prediction:
  step: 15s
  min_elevation_deg: 10
  refine: false
  refraction:
    pressure_mbar: 950
    temperature_c: -5
environment:
  eop_file: /var/lib/iers/finals2000A.all
  drag_scaling: true
"#;
        let config: Config = yaml.parse().unwrap();
        assert_eq!(config.prediction.step, Duration::from_secs(15));
        assert_eq!(config.prediction.min_elevation_deg, 10.0);
        assert!(!config.prediction.refine);
        assert_eq!(
            config.prediction.refraction,
            Some(Atmosphere {
                pressure_mbar: 950.0,
                temperature_c: -5.0
            })
        );
        assert!(config.environment.drag_scaling);
        assert!(config.environment.space_weather_file.is_none());

        let gs = config.ground_station().unwrap();
        assert_eq!(gs.name, "Garching");
        assert!((gs.location().altitude_km - 0.48).abs() < 1e-12);
    }

    #[test]
    fn defaults_apply() {
        let config: Config = "station:\n  coordinates: \"0,0\"\n".parse().unwrap();
        assert_eq!(config.prediction.step, Duration::from_secs(30));
        assert!(config.prediction.refine);
        assert!(config.prediction.refraction.is_none());
        assert!(!config.environment.drag_scaling);
        assert_eq!(config.ground_station().unwrap().name, "station");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            "station:\n  coordinates: \"0,0\"\nprediction:\n  step: soon\n".parse::<Config>(),
            Err(ConfigError::Yaml(_))
        ));
        let config: Config = "station:\n  coordinates: \"north\"\n".parse().unwrap();
        assert!(matches!(
            config.ground_station(),
            Err(ConfigError::Station(_))
        ));
    }
}
