//! Reconciliation of the ampacity and voltage-drop candidates.
//!
//! The final size is the larger of the two, with ties going to the
//! ampacity size. Whenever the final size is not the size the voltage-drop
//! stage last evaluated, the drop is worked out again at the final size and
//! the status follows from that figure.

use serde::{Deserialize, Serialize};

use super::voltage_drop::{DropFigures, DropInputs, VoltageDropOutcome, VoltageDropStatus};
use crate::catalog::VoltageDropTable;
use crate::sizes::StandardSize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reconciled {
    pub final_size: StandardSize,
    pub drop: Option<DropFigures>,
    pub status: VoltageDropStatus,
    /// Drop was recomputed at the final size
    pub recomputed: bool,
}

/// Larger candidate; the ampacity size wins a tie
pub fn final_size(ampacity_size: StandardSize, voltage_drop_size: StandardSize) -> StandardSize {
    if voltage_drop_size > ampacity_size {
        voltage_drop_size
    } else {
        ampacity_size
    }
}

pub fn reconcile(
    ampacity_size: StandardSize,
    outcome: &VoltageDropOutcome,
    inputs: &DropInputs,
    table: Option<&VoltageDropTable>,
) -> Reconciled {
    let final_size = final_size(ampacity_size, outcome.size);

    if final_size == outcome.size {
        return Reconciled {
            final_size,
            drop: outcome.drop,
            status: outcome.status,
            recomputed: false,
        };
    }

    let drop = table.and_then(|t| inputs.evaluate(final_size, t));
    let status = match &drop {
        None => VoltageDropStatus::DataUnavailable { size: final_size },
        Some(figures) if inputs.within_limit(figures) => VoltageDropStatus::Acceptable,
        Some(figures) => VoltageDropStatus::TooHigh {
            largest: final_size,
            excess_percent: figures.drop_percent - inputs.max_voltage_drop_percent,
        },
    };

    Reconciled {
        final_size,
        drop,
        status,
        recomputed: true,
    }
}
