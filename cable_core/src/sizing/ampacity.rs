//! # Ampacity Sizing Stage
//!
//! Finds the smallest conductor whose tabulated capacity covers the
//! derated requirement:
//!
//! ```text
//! I_required = I_design / (Ca × Cg)
//! size = min { s : It(s) ≥ I_required }
//! ```
//!
//! Tables are held in catalog order, so the stage sorts by size before
//! scanning. When no size is large enough the outcome is `Exhausted`, which
//! is reported back to the caller rather than treated as an error.

use serde::{Deserialize, Serialize};

use crate::catalog::CapacityTable;
use crate::errors::{CalcResult, SizingError};
use crate::sizes::StandardSize;

/// Result of the ampacity scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum AmpacityOutcome {
    /// Smallest size whose capacity meets the requirement
    Selected { size: StandardSize, capacity_a: f64 },
    /// No size is large enough
    Exhausted {
        largest: StandardSize,
        largest_capacity_a: f64,
        /// required − largest capacity (A), always positive
        shortfall_a: f64,
    },
}

impl AmpacityOutcome {
    /// Size carried forward: the selected size, or the largest when exhausted
    pub fn size(&self) -> StandardSize {
        match self {
            AmpacityOutcome::Selected { size, .. } => *size,
            AmpacityOutcome::Exhausted { largest, .. } => *largest,
        }
    }

    pub fn capacity_a(&self) -> f64 {
        match self {
            AmpacityOutcome::Selected { capacity_a, .. } => *capacity_a,
            AmpacityOutcome::Exhausted { largest_capacity_a, .. } => *largest_capacity_a,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, AmpacityOutcome::Exhausted { .. })
    }
}

/// Current the tabulated rating must reach after derating
pub fn required_current_a(design_current_a: f64, temperature_factor: f64, grouping_factor: f64) -> f64 {
    design_current_a / (temperature_factor * grouping_factor)
}

/// Scan a capacity table smallest to largest for the first size that carries
/// `required_current_a`.
pub fn size_for_ampacity(required_current_a: f64, table: &CapacityTable) -> CalcResult<AmpacityOutcome> {
    let sorted = table.sorted();

    if let Some((size, capacity_a)) = sorted.iter().find(|(_, amps)| *amps >= required_current_a) {
        return Ok(AmpacityOutcome::Selected {
            size: *size,
            capacity_a: *capacity_a,
        });
    }

    let (largest, largest_capacity_a) = sorted
        .last()
        .copied()
        .ok_or_else(|| SizingError::internal("capacity table has no entries"))?;

    Ok(AmpacityOutcome::Exhausted {
        largest,
        largest_capacity_a,
        shortfall_a: required_current_a - largest_capacity_a,
    })
}

/// Identical cables run in parallel to share a current no single size can carry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParallelRuns {
    pub runs: u32,
    pub size: StandardSize,
    /// runs × tabulated capacity (A)
    pub combined_capacity_a: f64,
}

/// Fewest parallel runs of the largest size that meet the requirement.
///
/// Returns `None` when the outcome was not exhausted or when more than
/// `max_runs` would be needed. Each run is rated at the full tabulated value;
/// the extra grouping of the parallel runs themselves is left to the designer.
pub fn suggest_parallel_runs(
    outcome: &AmpacityOutcome,
    required_current_a: f64,
    max_runs: u32,
) -> Option<ParallelRuns> {
    let AmpacityOutcome::Exhausted {
        largest,
        largest_capacity_a,
        ..
    } = *outcome
    else {
        return None;
    };

    (2..=max_runs)
        .find(|runs| f64::from(*runs) * largest_capacity_a >= required_current_a)
        .map(|runs| ParallelRuns {
            runs,
            size: largest,
            combined_capacity_a: f64::from(runs) * largest_capacity_a,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mm2(value: f64) -> StandardSize {
        StandardSize::new(value).unwrap()
    }

    fn table(entries: &[(f64, f64)]) -> CapacityTable {
        CapacityTable::new(entries.iter().map(|&(s, a)| (mm2(s), a)).collect()).unwrap()
    }

    #[test]
    fn test_required_current() {
        let required = required_current_a(100.0, 1.0, 0.70);
        assert!((required - 142.857).abs() < 0.01);
    }

    #[test]
    fn test_selects_first_adequate_size() {
        let t = table(&[(70.0, 119.0), (95.0, 149.0)]);
        let outcome = size_for_ampacity(142.857, &t).unwrap();
        assert_eq!(
            outcome,
            AmpacityOutcome::Selected {
                size: mm2(95.0),
                capacity_a: 149.0
            }
        );
    }

    #[test]
    fn test_exact_match_is_adequate() {
        let t = table(&[(70.0, 119.0), (95.0, 149.0)]);
        assert_eq!(size_for_ampacity(119.0, &t).unwrap().size(), mm2(70.0));
    }

    #[test]
    fn test_scans_numerically_not_in_catalog_order() {
        // Catalog order puts 10 before 2.5; 10mm² must not win over 2.5mm²
        let t = table(&[(10.0, 57.0), (2.5, 24.0), (4.0, 32.0)]);
        assert_eq!(size_for_ampacity(20.0, &t).unwrap().size(), mm2(2.5));
        assert_eq!(size_for_ampacity(30.0, &t).unwrap().size(), mm2(4.0));
    }

    #[test]
    fn test_exhausted_reports_shortfall() {
        let t = table(&[(500.0, 580.0), (630.0, 630.0)]);
        let outcome = size_for_ampacity(1000.0, &t).unwrap();
        match outcome {
            AmpacityOutcome::Exhausted {
                largest,
                largest_capacity_a,
                shortfall_a,
            } => {
                assert_eq!(largest, mm2(630.0));
                assert_eq!(largest_capacity_a, 630.0);
                assert!((shortfall_a - 370.0).abs() < 1e-9);
            }
            other => panic!("expected Exhausted, got {:?}", other),
        }
        assert!(outcome.is_exhausted());
        assert_eq!(outcome.size(), mm2(630.0));
    }

    #[test]
    fn test_parallel_runs() {
        let t = table(&[(630.0, 630.0)]);
        let outcome = size_for_ampacity(1000.0, &t).unwrap();
        let runs = suggest_parallel_runs(&outcome, 1000.0, 4).unwrap();
        assert_eq!(runs.runs, 2);
        assert_eq!(runs.size, mm2(630.0));
        assert_eq!(runs.combined_capacity_a, 1260.0);

        let heavy = size_for_ampacity(3000.0, &t).unwrap();
        assert_eq!(suggest_parallel_runs(&heavy, 3000.0, 4), None);
        assert_eq!(suggest_parallel_runs(&heavy, 3000.0, 5).unwrap().runs, 5);
    }

    #[test]
    fn test_no_parallel_runs_when_selected() {
        let t = table(&[(95.0, 149.0)]);
        let outcome = size_for_ampacity(100.0, &t).unwrap();
        assert_eq!(suggest_parallel_runs(&outcome, 100.0, 4), None);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = AmpacityOutcome::Exhausted {
            largest: mm2(630.0),
            largest_capacity_a: 630.0,
            shortfall_a: 370.0,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"Exhausted\""));
        let roundtrip: AmpacityOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(outcome, roundtrip);
    }
}
