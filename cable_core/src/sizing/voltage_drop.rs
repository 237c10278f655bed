//! # Voltage-Drop Sizing Stage
//!
//! Checks the drop at the ampacity size and escalates through larger sizes
//! until the drop is within the limit:
//!
//! ```text
//! V_drop = (mV/A/m) × I × L / 1000 × phase_scale
//! %drop  = V_drop / V_system × 100
//! ```
//!
//! Escalation only moves upward through the sizes of the capacity table
//! in use. It stops at the first size that passes, at the first size with no
//! drop data, or at the largest size.

use serde::{Deserialize, Serialize};

use crate::catalog::{DropFactor, VoltageDropTable};
use crate::sizes::StandardSize;

/// Circuit figures the drop calculation needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropInputs {
    pub design_current_a: f64,
    pub cable_length_m: f64,
    pub system_voltage_v: f64,
    pub max_voltage_drop_percent: f64,
    /// Multiplier from the drop convention (1.0 or √3)
    pub phase_scale: f64,
}

impl DropInputs {
    pub fn drop_volts(&self, factor: &DropFactor) -> f64 {
        factor.mv_per_a_m * self.design_current_a * self.cable_length_m / 1000.0 * self.phase_scale
    }

    pub fn drop_percent(&self, drop_volts: f64) -> f64 {
        drop_volts / self.system_voltage_v * 100.0
    }

    /// Drop at `size`, or `None` when the table has no entry for it
    pub fn evaluate(&self, size: StandardSize, table: &VoltageDropTable) -> Option<DropFigures> {
        let factor = table.factor(size)?;
        let drop_volts = self.drop_volts(&factor);
        Some(DropFigures {
            size,
            factor,
            drop_volts,
            drop_percent: self.drop_percent(drop_volts),
        })
    }

    pub fn within_limit(&self, figures: &DropFigures) -> bool {
        figures.drop_percent <= self.max_voltage_drop_percent
    }
}

/// Voltage drop evaluated at one size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropFigures {
    pub size: StandardSize,
    pub factor: DropFactor,
    pub drop_volts: f64,
    pub drop_percent: f64,
}

/// Voltage-drop standing of a size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum VoltageDropStatus {
    /// Drop at the ampacity size is within the limit
    Acceptable,
    /// A larger size was needed to bring the drop within the limit
    IncreasedForVoltageDrop,
    /// No drop data for this size; the drop was not checked
    DataUnavailable { size: StandardSize },
    /// Even the largest size exceeds the limit
    TooHigh {
        largest: StandardSize,
        /// Percentage points over the limit
        excess_percent: f64,
    },
}

impl VoltageDropStatus {
    /// One-line description for reports
    pub fn message(&self) -> String {
        match self {
            VoltageDropStatus::Acceptable => "Voltage drop acceptable".to_string(),
            VoltageDropStatus::IncreasedForVoltageDrop => "Size increased for voltage drop".to_string(),
            VoltageDropStatus::DataUnavailable { size } => format!("VD data unavailable for size {}", size),
            VoltageDropStatus::TooHigh { largest, excess_percent } => format!(
                "Voltage drop too high: {} exceeds the limit by {:.2}%",
                largest, excess_percent
            ),
        }
    }

    /// True when the drop was checked and passed
    pub fn is_satisfied(&self) -> bool {
        matches!(
            self,
            VoltageDropStatus::Acceptable | VoltageDropStatus::IncreasedForVoltageDrop
        )
    }
}

/// Result of the voltage-drop stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageDropOutcome {
    /// Last size evaluated
    pub size: StandardSize,
    /// Drop at `size`, when data existed
    pub drop: Option<DropFigures>,
    pub status: VoltageDropStatus,
    /// Sizes evaluated, in order
    pub examined: Vec<StandardSize>,
}

/// Size for voltage drop, starting at `start`.
///
/// `candidates` are the sizes available in the capacity table; only those
/// larger than `start` are escalated through, smallest first. With no drop
/// table at all the outcome is `DataUnavailable` at `start`.
pub fn size_for_voltage_drop(
    start: StandardSize,
    inputs: &DropInputs,
    candidates: &[StandardSize],
    table: Option<&VoltageDropTable>,
) -> VoltageDropOutcome {
    let Some(table) = table else {
        return VoltageDropOutcome {
            size: start,
            drop: None,
            status: VoltageDropStatus::DataUnavailable { size: start },
            examined: Vec::new(),
        };
    };

    let mut ladder: Vec<StandardSize> = candidates.iter().copied().filter(|s| *s > start).collect();
    ladder.sort();
    ladder.dedup();

    let mut examined = Vec::with_capacity(ladder.len() + 1);
    let mut last = None;

    for size in std::iter::once(start).chain(ladder) {
        examined.push(size);
        let Some(figures) = inputs.evaluate(size, table) else {
            return VoltageDropOutcome {
                size,
                drop: None,
                status: VoltageDropStatus::DataUnavailable { size },
                examined,
            };
        };
        if inputs.within_limit(&figures) {
            let status = if size == start {
                VoltageDropStatus::Acceptable
            } else {
                VoltageDropStatus::IncreasedForVoltageDrop
            };
            return VoltageDropOutcome {
                size,
                drop: Some(figures),
                status,
                examined,
            };
        }
        last = Some(figures);
    }

    // The ladder always holds `start`, so at least one size was evaluated
    match last {
        Some(figures) => VoltageDropOutcome {
            size: figures.size,
            drop: Some(figures),
            status: VoltageDropStatus::TooHigh {
                largest: figures.size,
                excess_percent: figures.drop_percent - inputs.max_voltage_drop_percent,
            },
            examined,
        },
        None => VoltageDropOutcome {
            size: start,
            drop: None,
            status: VoltageDropStatus::DataUnavailable { size: start },
            examined,
        },
    }
}
