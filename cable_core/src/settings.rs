//! # Engine Settings
//!
//! Tunables that are not part of a single sizing request. Loaded from TOML;
//! every field has a default, so an empty file is a valid configuration.
//!
//! ```toml
//! drop_convention = "tabulated_per_circuit"
//! default_max_voltage_drop_percent = 5.0
//! max_parallel_runs = 4
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcResult, SizingError};

/// How tabulated mV/A/m figures are scaled for three-phase circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropConvention {
    /// Tables already give the drop for the circuit type (line-to-line for
    /// three-phase), so no further scaling applies.
    #[default]
    TabulatedPerCircuit,
    /// Tables give per-conductor values; three-phase drops are multiplied
    /// by √3.
    PhaseFactorRoot3,
}

impl DropConvention {
    pub const ALL: [DropConvention; 2] = [
        DropConvention::TabulatedPerCircuit,
        DropConvention::PhaseFactorRoot3,
    ];

    /// Multiplier applied to the drop of a circuit
    pub fn phase_scale(&self, three_phase: bool) -> f64 {
        match (self, three_phase) {
            (DropConvention::PhaseFactorRoot3, true) => 3f64.sqrt(),
            _ => 1.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DropConvention::TabulatedPerCircuit => "Tabulated per circuit",
            DropConvention::PhaseFactorRoot3 => "Per conductor × √3",
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    pub drop_convention: DropConvention,
    /// Limit used by front-ends when a request does not state one
    pub default_max_voltage_drop_percent: f64,
    /// Upper bound on parallel runs suggested when no single size suffices
    pub max_parallel_runs: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            drop_convention: DropConvention::default(),
            default_max_voltage_drop_percent: 5.0,
            max_parallel_runs: 4,
        }
    }
}

impl EngineSettings {
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let settings: EngineSettings =
            toml::from_str(text).map_err(|e| SizingError::settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| SizingError::settings(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> CalcResult<()> {
        let limit = self.default_max_voltage_drop_percent;
        if !limit.is_finite() || limit <= 0.0 || limit > 100.0 {
            return Err(SizingError::settings(format!(
                "default_max_voltage_drop_percent must be in (0, 100], got {}",
                limit
            )));
        }
        if self.max_parallel_runs == 0 {
            return Err(SizingError::settings("max_parallel_runs must be at least 1"));
        }
        Ok(())
    }
}
