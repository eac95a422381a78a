//! TOML-based agent configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ModelError;
use crate::model::{Apartment, Flat};

/// Top-level agent configuration parsed from TOML.
///
/// All fields have defaults matching the baseline bootstrap. Load from
/// TOML with [`AgentConfig::from_toml_file`] or use
/// [`AgentConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Apartment-level scalar bootstrap values.
    #[serde(default)]
    pub apartment: ApartmentConfig,
    /// Flat telemetry rows, in table order.
    #[serde(default = "default_flats")]
    pub flats: Vec<FlatConfig>,
}

/// Apartment-level scalar bootstrap values.
///
/// Energy figures are integers in TOML and string-encoded at the
/// managed-object boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApartmentConfig {
    /// Apartment device id (read-only on the wire).
    pub device_id: String,
    /// Total energy consumption (demand).
    pub consumption: i64,
    /// Initial energy storage usage.
    pub storage: i64,
    /// Initial solar generation.
    pub generation_by_solar: i64,
    /// Initial hydro generation.
    pub generation_by_hydro: i64,
}

impl Default for ApartmentConfig {
    fn default() -> Self {
        Self {
            device_id: "62TerenureEast".to_string(),
            consumption: 150,
            storage: 10,
            generation_by_solar: 20,
            generation_by_hydro: 120,
        }
    }
}

/// One flat's bootstrap readings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlatConfig {
    /// Flat device id (natural key within the apartment).
    pub device_id: String,
    /// Total energy consumption of the flat.
    pub consumption: i64,
    /// Consumption by heating and cooling.
    pub heating_cooling: i64,
    /// Consumption by lighting.
    pub lighting: i64,
    /// Consumption by miscellaneous loads.
    pub misc: i64,
}

fn default_flats() -> Vec<FlatConfig> {
    (1..6)
        .map(|i| FlatConfig {
            device_id: format!("FlatNo_{i}"),
            consumption: 30,
            heating_cooling: 15,
            lighting: 5,
            misc: 10,
        })
        .collect()
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"apartment.device_id"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl AgentConfig {
    /// Returns the baseline bootstrap: one apartment, five identical flats.
    pub fn baseline() -> Self {
        Self {
            apartment: ApartmentConfig::default(),
            flats: default_flats(),
        }
    }

    /// Returns the highrise preset: a larger building with eight flats.
    pub fn highrise() -> Self {
        Self {
            apartment: ApartmentConfig {
                device_id: "11DartmouthSquare".to_string(),
                consumption: 320,
                storage: 25,
                generation_by_solar: 60,
                generation_by_hydro: 235,
            },
            flats: (1..9)
                .map(|i| FlatConfig {
                    device_id: format!("FlatNo_{i}"),
                    consumption: 40,
                    heating_cooling: 20,
                    lighting: 8,
                    misc: 12,
                })
                .collect(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "highrise"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "highrise" => Ok(Self::highrise()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let a = &self.apartment;

        if a.device_id.trim().is_empty() {
            errors.push(ConfigError {
                field: "apartment.device_id".into(),
                message: "must not be empty".into(),
            });
        }
        for (field, value) in [
            ("apartment.consumption", a.consumption),
            ("apartment.storage", a.storage),
            ("apartment.generation_by_solar", a.generation_by_solar),
            ("apartment.generation_by_hydro", a.generation_by_hydro),
        ] {
            if value < 0 {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be >= 0".into(),
                });
            }
        }

        for (i, flat) in self.flats.iter().enumerate() {
            if flat.device_id.trim().is_empty() {
                errors.push(ConfigError {
                    field: format!("flats[{i}].device_id"),
                    message: "must not be empty".into(),
                });
            }
            if self.flats[..i]
                .iter()
                .any(|other| other.device_id == flat.device_id)
            {
                errors.push(ConfigError {
                    field: format!("flats[{i}].device_id"),
                    message: format!("duplicate device id \"{}\"", flat.device_id),
                });
            }
            for (name, value) in [
                ("consumption", flat.consumption),
                ("heating_cooling", flat.heating_cooling),
                ("lighting", flat.lighting),
                ("misc", flat.misc),
            ] {
                if value < 0 {
                    errors.push(ConfigError {
                        field: format!("flats[{i}].{name}"),
                        message: "must be >= 0".into(),
                    });
                }
            }
        }

        errors
    }

    /// Builds and bootstraps an apartment from this configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`ModelError::IncompleteFlat`]; unreachable for a
    /// configuration that passed [`AgentConfig::validate`].
    pub fn build_apartment(&self) -> Result<Apartment, ModelError> {
        let mut apartment = Apartment::new();
        let a = &self.apartment;
        apartment.set_device_id(a.device_id.clone());
        apartment.set_consumption(a.consumption.to_string());
        apartment.set_storage(a.storage.to_string());
        apartment.set_generation_by_solar(a.generation_by_solar.to_string());
        apartment.set_generation_by_hydro(a.generation_by_hydro.to_string());

        for fc in &self.flats {
            let mut flat = Flat::new();
            flat.set_device_id(fc.device_id.clone());
            flat.set_consumption(fc.consumption.to_string());
            flat.set_consumption_heating_cooling(fc.heating_cooling.to_string());
            flat.set_consumption_lighting(fc.lighting.to_string());
            flat.set_consumption_misc(fc.misc.to_string());
            apartment.add_flat(flat)?;
        }
        Ok(apartment)
    }
}
