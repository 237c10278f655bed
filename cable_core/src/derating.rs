//! # Derating Factors
//!
//! Correction factors applied to tabulated current-carrying capacity (Iz).
//!
//! ## Overview
//!
//! Tabulated ampacities assume a 30 °C ambient and a single circuit. The
//! current a cable must be able to carry at reference conditions is:
//!
//! ```text
//! It = Ib / (Ca × Cg)
//! ```
//!
//! | Factor | Description                 | Typical Values |
//! |--------|-----------------------------|----------------|
//! | Ca     | Ambient temperature         | 0.41 - 1.22    |
//! | Cg     | Grouping                    | 0.38 - 1.00    |
//!
//! ## Reference
//!
//! BS 7671:2018, Appendix 4, Tables 4B1 and 4C1

use serde::{Deserialize, Serialize};

use crate::construction::{InstallationMethod, InsulationClass};

/// BS 7671 Appendix 4 references for the factors and checks.
pub mod bs7671_ref {
    /// Ambient temperature factor Ca
    pub const CA: &str = "BS 7671 Table 4B1";
    /// Grouping factor Cg
    pub const CG: &str = "BS 7671 Table 4C1";
    /// Current-carrying capacity tables
    pub const IZ: &str = "BS 7671 Appendix 4, Tables 4D-4E (A)";
    /// Voltage drop tables
    pub const VD: &str = "BS 7671 Appendix 4, Tables 4D-4E (B)";
    /// Voltage drop limits
    pub const VD_LIMIT: &str = "BS 7671 Appendix 4, Table 4Ab";
}

/// (upper bound °C inclusive, Ca) for 70 °C thermoplastic
const THERMOPLASTIC_70_BANDS: [(f64, f64); 11] = [
    (10.0, 1.22),
    (15.0, 1.17),
    (20.0, 1.12),
    (25.0, 1.06),
    (30.0, 1.00),
    (35.0, 0.94),
    (40.0, 0.87),
    (45.0, 0.79),
    (50.0, 0.71),
    (55.0, 0.61),
    (60.0, 0.50),
];

/// (upper bound °C inclusive, Ca) for 90 °C thermosetting
const THERMOSETTING_90_BANDS: [(f64, f64); 15] = [
    (10.0, 1.15),
    (15.0, 1.12),
    (20.0, 1.08),
    (25.0, 1.04),
    (30.0, 1.00),
    (35.0, 0.96),
    (40.0, 0.91),
    (45.0, 0.87),
    (50.0, 0.82),
    (55.0, 0.76),
    (60.0, 0.71),
    (65.0, 0.65),
    (70.0, 0.58),
    (75.0, 0.50),
    (80.0, 0.41),
];

/// (max circuits inclusive, Cg), bunched / enclosed
const ENCLOSED_GROUPING: [(u32, f64); 12] = [
    (1, 1.00),
    (2, 0.80),
    (3, 0.70),
    (4, 0.65),
    (5, 0.60),
    (6, 0.57),
    (7, 0.54),
    (8, 0.52),
    (9, 0.50),
    (12, 0.45),
    (16, 0.41),
    (20, 0.38),
];

/// Single layer on a wall or floor, touching
const SURFACE_TOUCHING_GROUPING: [(u32, f64); 9] = [
    (1, 1.00),
    (2, 0.85),
    (3, 0.79),
    (4, 0.75),
    (5, 0.73),
    (6, 0.72),
    (7, 0.72),
    (8, 0.71),
    (9, 0.70),
];

/// Single layer on tray, ladder or in free air
const SPACED_FREE_AIR_GROUPING: [(u32, f64); 9] = [
    (1, 1.00),
    (2, 0.88),
    (3, 0.82),
    (4, 0.77),
    (5, 0.75),
    (6, 0.73),
    (7, 0.73),
    (8, 0.72),
    (9, 0.72),
];

impl InsulationClass {
    /// Ambient temperature bands for this insulation, ascending
    pub fn temperature_bands(&self) -> &'static [(f64, f64)] {
        match self {
            InsulationClass::Thermoplastic70 => &THERMOPLASTIC_70_BANDS,
            InsulationClass::Thermosetting90 => &THERMOSETTING_90_BANDS,
        }
    }
}

/// Ambient temperature factor Ca per BS 7671 Table 4B1.
///
/// The lowest band whose upper bound is at or above the ambient applies.
/// Above the last band the class's smallest factor is returned; nothing is
/// extrapolated.
pub fn temperature_factor(insulation: InsulationClass, ambient_c: f64) -> f64 {
    let bands = insulation.temperature_bands();
    bands
        .iter()
        .find(|(upper, _)| ambient_c <= *upper)
        .or_else(|| bands.last())
        .map(|(_, factor)| *factor)
        .unwrap_or(1.0)
}

/// Installation category for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupingCategory {
    /// Bunched, enclosed in conduit/trunking, or buried
    Enclosed,
    /// Single layer clipped to a wall or floor
    SurfaceTouching,
    /// Single layer on tray, ladder or in free air
    SpacedFreeAir,
}

impl GroupingCategory {
    pub const ALL: [GroupingCategory; 3] = [
        GroupingCategory::Enclosed,
        GroupingCategory::SurfaceTouching,
        GroupingCategory::SpacedFreeAir,
    ];

    /// Category for an installation method
    pub fn for_method(method: InstallationMethod) -> Self {
        match method {
            InstallationMethod::A1
            | InstallationMethod::A2
            | InstallationMethod::B1
            | InstallationMethod::B2
            | InstallationMethod::Trunking
            | InstallationMethod::D1
            | InstallationMethod::D2 => GroupingCategory::Enclosed,
            InstallationMethod::C => GroupingCategory::SurfaceTouching,
            InstallationMethod::E
            | InstallationMethod::F
            | InstallationMethod::G
            | InstallationMethod::PerforatedTray
            | InstallationMethod::Ladder => GroupingCategory::SpacedFreeAir,
        }
    }

    /// Circuit-count bands, ascending
    pub fn bands(&self) -> &'static [(u32, f64)] {
        match self {
            GroupingCategory::Enclosed => &ENCLOSED_GROUPING,
            GroupingCategory::SurfaceTouching => &SURFACE_TOUCHING_GROUPING,
            GroupingCategory::SpacedFreeAir => &SPACED_FREE_AIR_GROUPING,
        }
    }

    /// Factor applied beyond the largest banded circuit count
    pub fn floor(&self) -> f64 {
        self.bands().last().map(|(_, factor)| *factor).unwrap_or(1.0)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GroupingCategory::Enclosed => "Bunched / enclosed",
            GroupingCategory::SurfaceTouching => "Single layer, touching",
            GroupingCategory::SpacedFreeAir => "Tray / ladder / free air",
        }
    }
}

impl std::fmt::Display for GroupingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Grouping factor Cg per BS 7671 Table 4C1.
///
/// Always in (0, 1]. A count of 0 or 1 means no grouping.
pub fn grouping_factor(category: GroupingCategory, circuit_count: u32) -> f64 {
    if circuit_count <= 1 {
        return 1.0;
    }
    category
        .bands()
        .iter()
        .find(|(max_count, _)| circuit_count <= *max_count)
        .map(|(_, factor)| *factor)
        .unwrap_or_else(|| category.floor())
}

/// Derating factors applied to one circuit, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeratingSummary {
    pub insulation: InsulationClass,
    pub ambient_temp_c: f64,
    pub temperature_factor: f64,
    pub grouping_category: GroupingCategory,
    pub circuit_count: u32,
    pub grouping_factor: f64,
}

impl DeratingSummary {
    pub fn new(
        insulation: InsulationClass,
        ambient_temp_c: f64,
        method: InstallationMethod,
        circuit_count: u32,
    ) -> Self {
        let grouping_category = GroupingCategory::for_method(method);
        DeratingSummary {
            insulation,
            ambient_temp_c,
            temperature_factor: temperature_factor(insulation, ambient_temp_c),
            grouping_category,
            circuit_count,
            grouping_factor: grouping_factor(grouping_category, circuit_count),
        }
    }

    /// Ca × Cg
    pub fn combined(&self) -> f64 {
        self.temperature_factor * self.grouping_factor
    }

    /// Current the cable must carry at reference conditions
    pub fn required_current_a(&self, design_current_a: f64) -> f64 {
        crate::sizing::ampacity::required_current_a(
            design_current_a,
            self.temperature_factor,
            self.grouping_factor,
        )
    }

    /// Format as a multi-line string for reports
    pub fn format_report(&self) -> String {
        format!(
            "Derating Factors\n\
             ================================================\n\
             Ca (Ambient {:.0}°C, {}) = {:.2}    {}\n\
             Cg ({} circuit(s), {}) = {:.2}    {}\n\
             ------------------------------------------------\n\
             Net factor Ca × Cg = {:.3}",
            self.ambient_temp_c,
            self.insulation,
            self.temperature_factor,
            bs7671_ref::CA,
            self.circuit_count,
            self.grouping_category,
            self.grouping_factor,
            bs7671_ref::CG,
            self.combined(),
        )
    }
}
