//! Municipality definition: boundary, districts, and export PIN.
//!
//! The deployment's definition is embedded at compile time from
//! `config/municipality.toml`. A different file can be supplied with
//! `--config` or the [`CONFIG_ENV_VAR`] environment variable; explicit
//! paths win over the environment, which wins over the embedded file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use flood_map_geography_models::{GeoPoint, Polygon};
use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::pin::ExportPin;

/// Environment variable naming an override config file.
pub const CONFIG_ENV_VAR: &str = "FLOOD_MAP_CONFIG";

const EMBEDDED_CONFIG: &str = include_str!("../config/municipality.toml");

/// A district (barangay).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    /// Identifier as stored on records, in camel case.
    pub id: String,
    /// Display name when title-casing the id isn't right.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional district boundary, used to suggest a district for a point.
    #[serde(default)]
    pub boundary: Option<Polygon>,
}

/// The municipality this deployment serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityConfig {
    /// Municipality name.
    pub name: String,
    /// Province, if recorded.
    #[serde(default)]
    pub province: Option<String>,
    /// Outer boundary used to validate locations.
    pub boundary: Polygon,
    /// Districts in display order.
    #[serde(default)]
    pub districts: Vec<District>,
    /// PIN required before exporting or printing. No gate when absent.
    #[serde(default)]
    pub export_pin: Option<ExportPin>,
}

impl MunicipalityConfig {
    /// Parses and validates a TOML definition.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or the definition
    /// is invalid (see [`Self::validate`]).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// The definition compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded file is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(EMBEDDED_CONFIG)
    }

    /// Reads a definition from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be read or is invalid.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Resolves the active definition: `explicit`, then
    /// [`CONFIG_ENV_VAR`], then the embedded file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the chosen source can't be read or is
    /// invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => {
                log::info!("Loading municipality config from {}", path.display());
                Self::load_from_path(&path)
            }
            None => {
                log::debug!("Using embedded municipality config");
                Self::embedded()
            }
        }
    }

    /// Checks the boundary has an interior and district ids are present
    /// and unique.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_boundary(&self.name, &self.boundary)?;

        let mut seen = BTreeSet::new();
        for district in &self.districts {
            if district.id.trim().is_empty() {
                return Err(ConfigError::EmptyDistrictId);
            }
            if !seen.insert(district.id.as_str()) {
                return Err(ConfigError::DuplicateDistrict {
                    id: district.id.clone(),
                });
            }
            if let Some(boundary) = &district.boundary {
                check_boundary(&district.id, boundary)?;
            }
        }

        Ok(())
    }

    /// Looks up a district by id.
    #[must_use]
    pub fn district(&self, id: &str) -> Option<&District> {
        self.districts.iter().find(|d| d.id == id)
    }

    /// Looks up a district by id, failing if it isn't registered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownDistrict`] if no district has `id`.
    pub fn require_district(&self, id: &str) -> Result<&District, ConfigError> {
        self.district(id).ok_or_else(|| ConfigError::UnknownDistrict { id: id.to_string() })
    }

    /// The first district whose boundary contains `point`, if any.
    #[must_use]
    pub fn district_at(&self, point: GeoPoint) -> Option<&District> {
        self.districts.iter().find(|d| {
            d.boundary
                .as_ref()
                .is_some_and(|b| flood_map_spatial::contains(point, b))
        })
    }

    /// Returns `true` if export and print require a PIN.
    #[must_use]
    pub const fn requires_pin(&self) -> bool {
        self.export_pin.is_some()
    }
}

/// A boundary needs an interior and only finite points.
fn check_boundary(owner: &str, boundary: &Polygon) -> Result<(), ConfigError> {
    if boundary.has_interior() && boundary.points().iter().all(GeoPoint::is_finite) {
        Ok(())
    } else {
        Err(ConfigError::InvalidBoundary {
            owner: owner.to_string(),
            points: boundary.len(),
        })
    }
}
