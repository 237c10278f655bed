//! # Cable Construction Selections
//!
//! The categorical description of a cable and how it is installed. Together
//! these form the [`ConstructionKey`] that picks a branch of the reference
//! catalog. Coverage is sparse: plenty of combinations are valid to describe
//! but have no table.
//!
//! Each enum exposes `code()` (the string used as a catalog path segment),
//! `display_name()` for UI, and `from_str_flexible()` for loosely formatted
//! input.
//!
//! ## Example
//!
//! ```rust
//! use cable_core::construction::*;
//!
//! let key = ConstructionKey {
//!     insulation: InsulationClass::Thermosetting90,
//!     armour: ArmourClass::Armoured,
//!     arrangement: CoreArrangement::Multicore,
//!     phases: PhaseCount::Three,
//!     installation_method: InstallationMethod::C,
//!     configuration: CableConfiguration::Standard,
//!     system: SystemType::Ac,
//! };
//! assert_eq!(key.to_string(), "thermosetting_90/armoured/multicore/three_phase/C/standard/ac");
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcResult, SizingError};

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace([' ', '-', '.'], "_")
}

/// Conductor insulation, which fixes the maximum operating temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InsulationClass {
    /// Thermoplastic (PVC), 70 °C conductor operating temperature
    #[default]
    Thermoplastic70,
    /// Thermosetting (XLPE / EPR), 90 °C conductor operating temperature
    Thermosetting90,
}

impl InsulationClass {
    pub const ALL: [InsulationClass; 2] = [InsulationClass::Thermoplastic70, InsulationClass::Thermosetting90];

    pub fn code(&self) -> &'static str {
        match self {
            InsulationClass::Thermoplastic70 => "thermoplastic_70",
            InsulationClass::Thermosetting90 => "thermosetting_90",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InsulationClass::Thermoplastic70 => "Thermoplastic 70°C (PVC)",
            InsulationClass::Thermosetting90 => "Thermosetting 90°C (XLPE)",
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match normalize(s).as_str() {
            "thermoplastic_70" | "thermoplastic" | "pvc" | "70" => Ok(InsulationClass::Thermoplastic70),
            "thermosetting_90" | "thermosetting" | "xlpe" | "epr" | "90" => Ok(InsulationClass::Thermosetting90),
            _ => Err(SizingError::invalid_input("insulation", s, "Expected PVC or XLPE")),
        }
    }
}

impl std::fmt::Display for InsulationClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Whether the cable carries steel wire armour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ArmourClass {
    #[default]
    Unarmoured,
    Armoured,
}

impl ArmourClass {
    pub const ALL: [ArmourClass; 2] = [ArmourClass::Unarmoured, ArmourClass::Armoured];

    pub fn code(&self) -> &'static str {
        match self {
            ArmourClass::Unarmoured => "unarmoured",
            ArmourClass::Armoured => "armoured",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ArmourClass::Unarmoured => "Non-armoured",
            ArmourClass::Armoured => "Armoured (SWA)",
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match normalize(s).as_str() {
            "unarmoured" | "unarmored" | "non_armoured" | "no" => Ok(ArmourClass::Unarmoured),
            "armoured" | "armored" | "swa" | "yes" => Ok(ArmourClass::Armoured),
            _ => Err(SizingError::invalid_input("armour", s, "Expected armoured or unarmoured")),
        }
    }
}

impl std::fmt::Display for ArmourClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Single-core cables laid as a group, or one multicore cable per circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CoreArrangement {
    SingleCore,
    #[default]
    Multicore,
}

impl CoreArrangement {
    pub const ALL: [CoreArrangement; 2] = [CoreArrangement::SingleCore, CoreArrangement::Multicore];

    pub fn code(&self) -> &'static str {
        match self {
            CoreArrangement::SingleCore => "single_core",
            CoreArrangement::Multicore => "multicore",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CoreArrangement::SingleCore => "Single-core",
            CoreArrangement::Multicore => "Multicore",
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match normalize(s).as_str() {
            "single_core" | "singlecore" | "single" | "1c" => Ok(CoreArrangement::SingleCore),
            "multicore" | "multi_core" | "multi" | "2c" | "3c" | "4c" => Ok(CoreArrangement::Multicore),
            _ => Err(SizingError::invalid_input("arrangement", s, "Expected single-core or multicore")),
        }
    }
}

impl std::fmt::Display for CoreArrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Number of phases in the circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PhaseCount {
    #[default]
    Single,
    Three,
}

impl PhaseCount {
    pub const ALL: [PhaseCount; 2] = [PhaseCount::Single, PhaseCount::Three];

    pub fn code(&self) -> &'static str {
        match self {
            PhaseCount::Single => "single_phase",
            PhaseCount::Three => "three_phase",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PhaseCount::Single => "Single-phase",
            PhaseCount::Three => "Three-phase",
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match normalize(s).as_str() {
            "1" | "single" | "single_phase" | "1ph" => Ok(PhaseCount::Single),
            "3" | "three" | "three_phase" | "3ph" => Ok(PhaseCount::Three),
            _ => Err(SizingError::invalid_input("phases", s, "Expected 1 or 3")),
        }
    }
}

impl std::fmt::Display for PhaseCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Supply system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SystemType {
    #[default]
    Ac,
    Dc,
}

impl SystemType {
    pub const ALL: [SystemType; 2] = [SystemType::Ac, SystemType::Dc];

    pub fn code(&self) -> &'static str {
        match self {
            SystemType::Ac => "ac",
            SystemType::Dc => "dc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SystemType::Ac => "AC",
            SystemType::Dc => "DC",
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match normalize(s).as_str() {
            "ac" => Ok(SystemType::Ac),
            "dc" => Ok(SystemType::Dc),
            _ => Err(SizingError::invalid_input("system", s, "Expected AC or DC")),
        }
    }
}

impl std::fmt::Display for SystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Installation method.
///
/// Reference methods A1..G follow BS 7671 Table 4A2. The descriptive
/// variants (`Trunking`, `PerforatedTray`, `Ladder`) are what users usually
/// pick; the resolver maps them onto a reference method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InstallationMethod {
    /// Enclosed in conduit in a thermally insulating wall
    A1,
    /// Multicore in conduit in a thermally insulating wall
    A2,
    /// Enclosed in conduit on a wall
    B1,
    /// Multicore in conduit on a wall
    B2,
    /// Clipped direct
    #[default]
    C,
    /// In ducts in the ground
    D1,
    /// Direct in the ground
    D2,
    /// Multicore in free air
    E,
    /// Single-core touching in free air
    F,
    /// Single-core spaced in free air
    G,
    /// In trunking on a wall
    Trunking,
    /// On perforated cable tray
    PerforatedTray,
    /// On cable ladder
    Ladder,
}

impl InstallationMethod {
    pub const ALL: [InstallationMethod; 13] = [
        InstallationMethod::A1,
        InstallationMethod::A2,
        InstallationMethod::B1,
        InstallationMethod::B2,
        InstallationMethod::C,
        InstallationMethod::D1,
        InstallationMethod::D2,
        InstallationMethod::E,
        InstallationMethod::F,
        InstallationMethod::G,
        InstallationMethod::Trunking,
        InstallationMethod::PerforatedTray,
        InstallationMethod::Ladder,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            InstallationMethod::A1 => "A1",
            InstallationMethod::A2 => "A2",
            InstallationMethod::B1 => "B1",
            InstallationMethod::B2 => "B2",
            InstallationMethod::C => "C",
            InstallationMethod::D1 => "D1",
            InstallationMethod::D2 => "D2",
            InstallationMethod::E => "E",
            InstallationMethod::F => "F",
            InstallationMethod::G => "G",
            InstallationMethod::Trunking => "trunking",
            InstallationMethod::PerforatedTray => "perforated_tray",
            InstallationMethod::Ladder => "ladder",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InstallationMethod::A1 => "A1 - In conduit in insulated wall",
            InstallationMethod::A2 => "A2 - Multicore in conduit in insulated wall",
            InstallationMethod::B1 => "B1 - In conduit on wall",
            InstallationMethod::B2 => "B2 - Multicore in conduit on wall",
            InstallationMethod::C => "C - Clipped direct",
            InstallationMethod::D1 => "D1 - In duct in ground",
            InstallationMethod::D2 => "D2 - Direct in ground",
            InstallationMethod::E => "E - Multicore in free air",
            InstallationMethod::F => "F - Single-core touching in free air",
            InstallationMethod::G => "G - Single-core spaced in free air",
            InstallationMethod::Trunking => "In trunking",
            InstallationMethod::PerforatedTray => "On perforated tray",
            InstallationMethod::Ladder => "On cable ladder",
        }
    }

    /// True for methods where the cable sits inside conduit or trunking
    pub fn is_enclosed(&self) -> bool {
        matches!(
            self,
            InstallationMethod::A1
                | InstallationMethod::A2
                | InstallationMethod::B1
                | InstallationMethod::B2
                | InstallationMethod::Trunking
        )
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let upper = s.trim().to_uppercase();
        if let Some(method) = InstallationMethod::ALL.iter().find(|m| m.code() == upper) {
            return Ok(*method);
        }
        match normalize(s).as_str() {
            "trunking" => Ok(InstallationMethod::Trunking),
            "tray" | "perforated_tray" => Ok(InstallationMethod::PerforatedTray),
            "ladder" | "cable_ladder" => Ok(InstallationMethod::Ladder),
            "clipped" | "clipped_direct" => Ok(InstallationMethod::C),
            _ => Err(SizingError::invalid_input(
                "installation_method",
                s,
                "Expected a reference method (A1..G), trunking, tray or ladder",
            )),
        }
    }
}

impl std::fmt::Display for InstallationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How single-core cables of one circuit are laid relative to each other.
///
/// Ignored for multicore cables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CableConfiguration {
    /// No particular formation (enclosed, clipped, or multicore)
    #[default]
    Standard,
    Trefoil,
    FlatTouching,
    FlatSpaced,
}

impl CableConfiguration {
    pub const ALL: [CableConfiguration; 4] = [
        CableConfiguration::Standard,
        CableConfiguration::Trefoil,
        CableConfiguration::FlatTouching,
        CableConfiguration::FlatSpaced,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CableConfiguration::Standard => "standard",
            CableConfiguration::Trefoil => "trefoil",
            CableConfiguration::FlatTouching => "flat_touching",
            CableConfiguration::FlatSpaced => "flat_spaced",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CableConfiguration::Standard => "Standard",
            CableConfiguration::Trefoil => "Trefoil",
            CableConfiguration::FlatTouching => "Flat, touching",
            CableConfiguration::FlatSpaced => "Flat, spaced",
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match normalize(s).as_str() {
            "" | "standard" | "none" => Ok(CableConfiguration::Standard),
            "trefoil" => Ok(CableConfiguration::Trefoil),
            "flat" | "flat_touching" | "touching" => Ok(CableConfiguration::FlatTouching),
            "spaced" | "flat_spaced" => Ok(CableConfiguration::FlatSpaced),
            _ => Err(SizingError::invalid_input(
                "configuration",
                s,
                "Expected standard, trefoil, flat or spaced",
            )),
        }
    }
}

impl std::fmt::Display for CableConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The full categorical selection for one circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ConstructionKey {
    pub insulation: InsulationClass,
    pub armour: ArmourClass,
    pub arrangement: CoreArrangement,
    pub phases: PhaseCount,
    pub installation_method: InstallationMethod,
    pub configuration: CableConfiguration,
    pub system: SystemType,
}

impl std::fmt::Display for ConstructionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}/{}/{}",
            self.insulation.code(),
            self.armour.code(),
            self.arrangement.code(),
            self.phases.code(),
            self.installation_method.code(),
            self.configuration.code(),
            self.system.code(),
        )
    }
}
