//! TOML-based run configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::model::engine::YieldEngine;
use crate::model::types::PanelParameters;

/// Top-level run configuration parsed from TOML.
///
/// All fields have defaults matching the `residential` preset. Load from
/// TOML with [`RunConfig::from_toml_file`] or use
/// [`RunConfig::residential`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Panel and plant parameters.
    #[serde(default)]
    pub panel: PanelConfig,
    /// Site selection.
    #[serde(default)]
    pub site: SiteConfig,
    /// Calculation mode.
    #[serde(default)]
    pub run: RunSection,
}

/// Panel and plant parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    /// Module area (m², must be > 0).
    pub area: f64,
    /// Nominal efficiency, in (0, 1].
    pub efficiency: f64,
    /// Power temperature coefficient (1/°C, must be >= 0).
    pub temp_coeff: f64,
    /// Nominal operating cell temperature (°C).
    pub noct: f64,
    /// Performance ratio for the proportional model, in (0, 1].
    pub performance_ratio: f64,
    /// Nominal capacity (kWp); derived as `area * efficiency` when unset.
    pub nominal_capacity_kwp: Option<f64>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            area: 100.0,
            efficiency: 0.18,
            temp_coeff: 0.0045,
            noct: 45.0,
            performance_ratio: 0.8,
            nominal_capacity_kwp: None,
        }
    }
}

/// Site selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Region name in the climate store.
    pub region: String,
    /// Month for hourly mode (0-based, 0..=11).
    pub month: usize,
    /// Day of year for hourly mode; `month * 30 + 15` when unset.
    pub day_of_year: Option<u32>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            region: "Hồ Chí Minh".to_string(),
            month: 0,
            day_of_year: None,
        }
    }
}

/// Calculation mode selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    /// `"hourly"`, `"monthly"`, `"proportional"` or `"analysis"`.
    pub mode: String,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            mode: "hourly".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"panel.area"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl RunConfig {
    /// Accepted values of `run.mode`.
    pub const MODES: &[&str] = &["hourly", "monthly", "proportional", "analysis"];

    /// Available preset names.
    pub const PRESETS: &[&str] = &["residential", "utility"];

    /// Returns the residential preset: a 100 m² rooftop array, hourly mode.
    pub fn residential() -> Self {
        Self {
            panel: PanelConfig::default(),
            site: SiteConfig::default(),
            run: RunSection::default(),
        }
    }

    /// Returns the utility preset: a 250 000 m² plant analysed month by month.
    pub fn utility() -> Self {
        Self {
            panel: PanelConfig {
                area: 250_000.0,
                ..PanelConfig::default()
            },
            site: SiteConfig::default(),
            run: RunSection {
                mode: "analysis".to_string(),
            },
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "residential" => Ok(Self::residential()),
            "utility" => Ok(Self::utility()),
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
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
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
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Panel parameters for the engine.
    pub fn panel_parameters(&self) -> PanelParameters {
        let p = &self.panel;
        PanelParameters::new(p.area, p.efficiency, p.temp_coeff, p.noct, p.performance_ratio)
    }

    /// Builds the yield engine, applying an explicit capacity if configured.
    pub fn engine(&self) -> YieldEngine {
        let engine = YieldEngine::new(self.panel_parameters());
        match self.panel.nominal_capacity_kwp {
            Some(kwp) => engine.with_nominal_capacity(kwp),
            None => engine,
        }
    }

    /// Day of year used by hourly mode.
    pub fn day_of_year(&self) -> u32 {
        self.site
            .day_of_year
            .unwrap_or(self.site.month as u32 * 30 + 15)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let p = &self.panel;

        if !(p.area > 0.0 && p.area.is_finite()) {
            errors.push(ConfigError {
                field: "panel.area".into(),
                message: "must be > 0".into(),
            });
        }
        if !(p.efficiency > 0.0 && p.efficiency <= 1.0) {
            errors.push(ConfigError {
                field: "panel.efficiency".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
        if !(p.temp_coeff >= 0.0 && p.temp_coeff.is_finite()) {
            errors.push(ConfigError {
                field: "panel.temp_coeff".into(),
                message: "must be >= 0".into(),
            });
        }
        if !p.noct.is_finite() {
            errors.push(ConfigError {
                field: "panel.noct".into(),
                message: "must be a finite temperature".into(),
            });
        }
        if !(p.performance_ratio > 0.0 && p.performance_ratio <= 1.0) {
            errors.push(ConfigError {
                field: "panel.performance_ratio".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
        if let Some(kwp) = p.nominal_capacity_kwp {
            if !(kwp > 0.0 && kwp.is_finite()) {
                errors.push(ConfigError {
                    field: "panel.nominal_capacity_kwp".into(),
                    message: "must be > 0".into(),
                });
            }
        }

        let s = &self.site;
        if s.region.trim().is_empty() {
            errors.push(ConfigError {
                field: "site.region".into(),
                message: "must not be empty".into(),
            });
        }
        if s.month > 11 {
            errors.push(ConfigError {
                field: "site.month".into(),
                message: format!("must be in 0..=11, got {}", s.month),
            });
        }
        if let Some(n) = s.day_of_year {
            if !(1..=365).contains(&n) {
                errors.push(ConfigError {
                    field: "site.day_of_year".into(),
                    message: format!("must be in 1..=365, got {n}"),
                });
            }
        }

        if !Self::MODES.contains(&self.run.mode.as_str()) {
            errors.push(ConfigError {
                field: "run.mode".into(),
                message: format!(
                    "must be one of {}, got \"{}\"",
                    Self::MODES.join(", "),
                    self.run.mode
                ),
            });
        }

        errors
    }
}
