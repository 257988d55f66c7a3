//! Application configuration.
//!
//! Every field has a default matching the deployed Fraiburgo setup, so an
//! empty JSON object (or no file at all) is a complete configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use terezinha_transit::{Coordinate, StopCatalog, TransitError};

/// Environment variable that overrides `routing.api_key`
pub const API_KEY_ENV: &str = "TEREZINHA_ROUTING_API_KEY";

pub const DEFAULT_CENTER: Coordinate = Coordinate::new_unchecked(-27.0233, -50.9185);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to load stop catalog: {0}")]
    Catalog(#[from] TransitError),
}

/// Which backing map renderer the front-end draws with
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MapProvider {
    /// Commercial provider with its own directions and static map APIs
    Primary,
    /// OpenStreetMap tiles drawn by a Leaflet/MapLibre client
    #[default]
    OpenData,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Id of the rendering surface in the host page
    pub container_id: String,
    /// Initial view center, and the origin used when positioning fails
    pub center: Coordinate,
    pub zoom: u8,
    /// Zoom applied when the view recenters on the user
    pub origin_zoom: u8,
    pub provider: MapProvider,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: "mapaContainer".to_owned(),
            center: DEFAULT_CENTER,
            zoom: 13,
            origin_zoom: 14,
            provider: MapProvider::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub base_url: String,
    /// Routing profile path segment, e.g. `foot-walking`
    pub profile: String,
    pub api_key: Option<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_owned(),
            profile: "foot-walking".to_owned(),
            api_key: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EstimateConfig {
    /// Minutes per kilometer of great-circle distance.
    pub walking_factor: f64,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            walking_factor: 1.5,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub segments: usize,
    /// Maximum jitter, in degrees, applied to each intermediate point
    pub jitter_degrees: f64,
    /// Fixed seed for reproducible approximate paths; entropy when absent
    pub seed: Option<u64>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            segments: 5,
            jitter_degrees: 0.0005,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    pub routing: RoutingConfig,
    pub estimate: EstimateConfig,
    pub fallback: FallbackConfig,
    pub proximity_radius_m: f64,
    /// JSON stop list replacing the compiled-in catalog
    pub stops: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            routing: RoutingConfig::default(),
            estimate: EstimateConfig::default(),
            fallback: FallbackConfig::default(),
            proximity_radius_m: 1000.0,
            stops: None,
        }
    }
}

impl AppConfig {
    /// Read `path` when given, apply environment overrides, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_owned(),
                    source,
                })?;
                tracing::info!("loaded configuration from {}", path.display());
                Self::from_json_str(&text)?
            }
            None => Self::default(),
        };

        let config = config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            tracing::debug!("routing api key taken from {API_KEY_ENV}");
            self.routing.api_key = Some(key);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_owned()));

        if !self.estimate.walking_factor.is_finite() || self.estimate.walking_factor < 0.0 {
            return invalid("estimate.walking_factor must be a finite, non-negative number");
        }
        if self.fallback.segments == 0 {
            return invalid("fallback.segments must be at least 1");
        }
        if !self.fallback.jitter_degrees.is_finite() || self.fallback.jitter_degrees < 0.0 {
            return invalid("fallback.jitter_degrees must be a finite, non-negative number");
        }
        if !self.proximity_radius_m.is_finite() || self.proximity_radius_m <= 0.0 {
            return invalid("proximity_radius_m must be positive");
        }
        if self.routing.base_url.trim().is_empty() {
            return invalid("routing.base_url must not be empty");
        }
        Ok(())
    }

    /// The configured stop list, or the compiled-in catalog.
    pub fn load_catalog(&self) -> Result<StopCatalog, ConfigError> {
        match &self.stops {
            Some(path) => {
                let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(StopCatalog::from_json(&bytes)?)
            }
            None => Ok(StopCatalog::builtin()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config.map.container_id, "mapaContainer");
        assert_eq!(config.map.center, DEFAULT_CENTER);
        assert_eq!(config.map.provider, MapProvider::OpenData);
        assert_eq!(config.routing.profile, "foot-walking");
        assert_eq!(config.estimate.walking_factor, 1.5);
        assert_eq!(config.fallback.segments, 5);
        assert_eq!(config.proximity_radius_m, 1000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document() {
        let config = AppConfig::from_json_str(
            r#"{
                "map": { "provider": "primary", "center": { "lat": -27.02, "lng": -50.92 } },
                "fallback": { "seed": 7 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.map.provider, MapProvider::Primary);
        assert_eq!(config.map.center.latitude(), -27.02);
        assert_eq!(config.map.zoom, 13);
        assert_eq!(config.fallback.seed, Some(7));
        assert_eq!(config.fallback.segments, 5);
    }

    #[test]
    fn test_out_of_range_center_rejected() {
        let result =
            AppConfig::from_json_str(r#"{ "map": { "center": { "lat": 123.0, "lng": 0.0 } } }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.fallback.segments = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.estimate.walking_factor = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.proximity_radius_m = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_override() {
        let config = AppConfig::default().apply_overrides(|key| {
            (key == API_KEY_ENV).then(|| "from-env".to_owned())
        });
        assert_eq!(config.routing.api_key.as_deref(), Some("from-env"));

        let config = AppConfig::default().apply_overrides(|_| Some("  ".to_owned()));
        assert_eq!(config.routing.api_key, None);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("open-data".parse::<MapProvider>().unwrap(), MapProvider::OpenData);
        assert_eq!("primary".parse::<MapProvider>().unwrap(), MapProvider::Primary);
        assert_eq!(MapProvider::OpenData.to_string(), "open-data");
        assert!("google".parse::<MapProvider>().is_err());
    }

    #[test]
    fn test_builtin_catalog_by_default() {
        let catalog = AppConfig::default().load_catalog().unwrap();
        assert_eq!(catalog.len(), 13);
    }
}
