//! # Construction Key Resolver
//!
//! Turns a raw [`ConstructionKey`] into the key used to look up a table in
//! the reference catalog. The capacity and voltage-drop catalogs are laid out
//! along different axes, so each concern has its own resolver:
//!
//! - **Ampacity**: aliases the installation method onto a reference method
//!   that actually has a column (e.g. a multicore cable on a ladder is rated
//!   as method E), then picks the loaded-conductor column from phase count
//!   and formation.
//! - **Voltage drop**: ignores the method except to classify the layout
//!   (enclosed, touching, trefoil, flat, spaced). Multicore and DC tables
//!   have a single layout.
//!
//! Combinations known to have no coverage resolve to a [`ResolutionGap`]
//! naming the reason, so they can be told apart from an unexpected missing
//! table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::construction::{
    ArmourClass, CableConfiguration, ConstructionKey, CoreArrangement, InstallationMethod,
    InsulationClass, PhaseCount, SystemType,
};
use crate::errors::SizingError;

/// Which table family a key is being resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Concern {
    Ampacity,
    VoltageDrop,
}

/// Reference method column in the capacity tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceMethod {
    A1,
    B1,
    B2,
    C,
    D1,
    E,
    F,
    G,
}

impl ReferenceMethod {
    pub const ALL: [ReferenceMethod; 8] = [
        ReferenceMethod::A1,
        ReferenceMethod::B1,
        ReferenceMethod::B2,
        ReferenceMethod::C,
        ReferenceMethod::D1,
        ReferenceMethod::E,
        ReferenceMethod::F,
        ReferenceMethod::G,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ReferenceMethod::A1 => "A1",
            ReferenceMethod::B1 => "B1",
            ReferenceMethod::B2 => "B2",
            ReferenceMethod::C => "C",
            ReferenceMethod::D1 => "D1",
            ReferenceMethod::E => "E",
            ReferenceMethod::F => "F",
            ReferenceMethod::G => "G",
        }
    }
}

/// Loaded-conductor column within a capacity table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapacityColumn {
    /// Single-phase AC or DC: two loaded conductors
    TwoLoaded,
    /// Two single-core cables spaced apart
    TwoLoadedSpaced,
    /// Three-phase: three loaded conductors
    ThreeLoaded,
    ThreeLoadedTrefoil,
    ThreeLoadedFlatTouching,
    ThreeLoadedFlatSpaced,
}

impl CapacityColumn {
    pub const ALL: [CapacityColumn; 6] = [
        CapacityColumn::TwoLoaded,
        CapacityColumn::TwoLoadedSpaced,
        CapacityColumn::ThreeLoaded,
        CapacityColumn::ThreeLoadedTrefoil,
        CapacityColumn::ThreeLoadedFlatTouching,
        CapacityColumn::ThreeLoadedFlatSpaced,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CapacityColumn::TwoLoaded => "two_loaded",
            CapacityColumn::TwoLoadedSpaced => "two_loaded_spaced",
            CapacityColumn::ThreeLoaded => "three_loaded",
            CapacityColumn::ThreeLoadedTrefoil => "three_loaded_trefoil",
            CapacityColumn::ThreeLoadedFlatTouching => "three_loaded_flat_touching",
            CapacityColumn::ThreeLoadedFlatSpaced => "three_loaded_flat_spaced",
        }
    }

    /// Columns to try, in order, when this one is absent from a table.
    ///
    /// Every fallback gives a rating no higher than the primary column.
    pub fn fallbacks(&self) -> &'static [CapacityColumn] {
        match self {
            CapacityColumn::ThreeLoadedFlatSpaced => &[
                CapacityColumn::ThreeLoadedFlatTouching,
                CapacityColumn::ThreeLoaded,
            ],
            CapacityColumn::ThreeLoadedFlatTouching | CapacityColumn::ThreeLoadedTrefoil => {
                &[CapacityColumn::ThreeLoaded]
            }
            CapacityColumn::TwoLoadedSpaced => &[CapacityColumn::TwoLoaded],
            CapacityColumn::TwoLoaded | CapacityColumn::ThreeLoaded => &[],
        }
    }
}

/// Fully resolved key into the capacity catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapacityKey {
    pub insulation: InsulationClass,
    pub armour: ArmourClass,
    pub arrangement: CoreArrangement,
    pub method: ReferenceMethod,
    pub column: CapacityColumn,
}

impl CapacityKey {
    /// Catalog path segments, outermost first
    pub fn segments(&self) -> [&'static str; 5] {
        [
            self.insulation.code(),
            self.armour.code(),
            self.arrangement.code(),
            self.method.code(),
            self.column.code(),
        ]
    }

    /// Dotted catalog path, e.g. `capacity.thermoplastic_70.unarmoured.multicore.C.two_loaded`
    pub fn path(&self) -> String {
        format!("capacity.{}", self.segments().join("."))
    }

    /// Primary key followed by its fallback keys, in lookup order
    pub fn lookup_order(&self) -> Vec<CapacityKey> {
        std::iter::once(*self)
            .chain(
                self.column
                    .fallbacks()
                    .iter()
                    .map(|column| CapacityKey { column: *column, ..*self }),
            )
            .collect()
    }
}

/// Circuit type axis of the voltage-drop tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropCircuit {
    Dc,
    AcSinglePhase,
    AcThreePhase,
}

impl DropCircuit {
    pub const ALL: [DropCircuit; 3] = [DropCircuit::Dc, DropCircuit::AcSinglePhase, DropCircuit::AcThreePhase];

    pub fn code(&self) -> &'static str {
        match self {
            DropCircuit::Dc => "dc",
            DropCircuit::AcSinglePhase => "ac_single_phase",
            DropCircuit::AcThreePhase => "ac_three_phase",
        }
    }

    pub fn is_three_phase(&self) -> bool {
        matches!(self, DropCircuit::AcThreePhase)
    }
}

/// Cable layout axis of the voltage-drop tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropLayout {
    /// Multicore cables and DC circuits: one column regardless of layout
    Any,
    Enclosed,
    Touching,
    Trefoil,
    FlatTouching,
    Spaced,
}

impl DropLayout {
    pub const ALL: [DropLayout; 6] = [
        DropLayout::Any,
        DropLayout::Enclosed,
        DropLayout::Touching,
        DropLayout::Trefoil,
        DropLayout::FlatTouching,
        DropLayout::Spaced,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DropLayout::Any => "any",
            DropLayout::Enclosed => "enclosed",
            DropLayout::Touching => "touching",
            DropLayout::Trefoil => "trefoil",
            DropLayout::FlatTouching => "flat_touching",
            DropLayout::Spaced => "spaced",
        }
    }

    /// Layouts to try, in order, when this one is absent
    pub fn fallbacks(&self) -> &'static [DropLayout] {
        match self {
            DropLayout::Trefoil | DropLayout::Touching => &[DropLayout::Enclosed],
            DropLayout::Any | DropLayout::Enclosed | DropLayout::FlatTouching | DropLayout::Spaced => &[],
        }
    }
}

/// Fully resolved key into the voltage-drop catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoltageDropKey {
    pub insulation: InsulationClass,
    pub armour: ArmourClass,
    pub arrangement: CoreArrangement,
    pub circuit: DropCircuit,
    pub layout: DropLayout,
}

impl VoltageDropKey {
    pub fn segments(&self) -> [&'static str; 5] {
        [
            self.insulation.code(),
            self.armour.code(),
            self.arrangement.code(),
            self.circuit.code(),
            self.layout.code(),
        ]
    }

    pub fn path(&self) -> String {
        format!("voltage_drop.{}", self.segments().join("."))
    }

    pub fn lookup_order(&self) -> Vec<VoltageDropKey> {
        std::iter::once(*self)
            .chain(
                self.layout
                    .fallbacks()
                    .iter()
                    .map(|layout| VoltageDropKey { layout: *layout, ..*self }),
            )
            .collect()
    }
}

/// Output of [`resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolvedKey {
    Capacity(CapacityKey),
    VoltageDrop(VoltageDropKey),
}

impl ResolvedKey {
    pub fn path(&self) -> String {
        match self {
            ResolvedKey::Capacity(key) => key.path(),
            ResolvedKey::VoltageDrop(key) => key.path(),
        }
    }

    pub fn capacity(self) -> Option<CapacityKey> {
        match self {
            ResolvedKey::Capacity(key) => Some(key),
            ResolvedKey::VoltageDrop(_) => None,
        }
    }

    pub fn voltage_drop(self) -> Option<VoltageDropKey> {
        match self {
            ResolvedKey::VoltageDrop(key) => Some(key),
            ResolvedKey::Capacity(_) => None,
        }
    }
}

/// A construction known to have no table coverage
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{key} ({concern:?}): {reason}")]
pub struct ResolutionGap {
    pub key: ConstructionKey,
    pub concern: Concern,
    pub reason: String,
}

impl ResolutionGap {
    fn new(key: &ConstructionKey, concern: Concern, reason: &str) -> Self {
        ResolutionGap {
            key: *key,
            concern,
            reason: reason.to_string(),
        }
    }
}

impl From<ResolutionGap> for SizingError {
    fn from(gap: ResolutionGap) -> Self {
        SizingError::resolution_gap(gap.key.to_string(), gap.reason)
    }
}

/// Resolve a selection for one concern
pub fn resolve(selection: &ConstructionKey, concern: Concern) -> Result<ResolvedKey, ResolutionGap> {
    match concern {
        Concern::Ampacity => resolve_capacity_key(selection).map(ResolvedKey::Capacity),
        Concern::VoltageDrop => resolve_voltage_drop_key(selection).map(ResolvedKey::VoltageDrop),
    }
}

fn check_system(selection: &ConstructionKey, concern: Concern) -> Result<(), ResolutionGap> {
    match (selection.system, selection.phases) {
        (SystemType::Dc, PhaseCount::Three) => Err(ResolutionGap::new(
            selection,
            concern,
            "DC circuits are two-wire; a three-phase arrangement does not apply",
        )),
        _ => Ok(()),
    }
}

/// Resolve the capacity-table key for a selection
pub fn resolve_capacity_key(selection: &ConstructionKey) -> Result<CapacityKey, ResolutionGap> {
    check_system(selection, Concern::Ampacity)?;
    let method = capacity_method(selection)?;
    Ok(CapacityKey {
        insulation: selection.insulation,
        armour: selection.armour,
        arrangement: selection.arrangement,
        method,
        column: capacity_column(selection, method),
    })
}

fn capacity_method(selection: &ConstructionKey) -> Result<ReferenceMethod, ResolutionGap> {
    use ArmourClass::{Armoured, Unarmoured};
    use CoreArrangement::{Multicore, SingleCore};
    use InstallationMethod as M;

    let gap = |reason: &str| Err(ResolutionGap::new(selection, Concern::Ampacity, reason));

    match (selection.armour, selection.arrangement, selection.installation_method) {
        (Armoured, _, M::A1 | M::A2 | M::B1 | M::B2 | M::Trunking) => {
            gap("armoured cables have no rating for installation in conduit or trunking")
        }
        (Armoured, SingleCore, M::G) => gap(
            "armoured single-core cables spaced in free air carry armour circulating currents \
             and have no tabulated rating",
        ),
        (Unarmoured, _, M::D2) => gap("unarmoured cables are not rated for direct burial"),
        (Armoured, _, M::D1 | M::D2) => Ok(ReferenceMethod::D1),
        (Unarmoured, _, M::D1) => Ok(ReferenceMethod::D1),

        (_, SingleCore, M::A1 | M::A2) => Ok(ReferenceMethod::A1),
        (_, SingleCore, M::B1 | M::B2 | M::Trunking) => Ok(ReferenceMethod::B1),
        (_, SingleCore, M::C) => Ok(ReferenceMethod::C),
        (_, SingleCore, M::E | M::F | M::PerforatedTray | M::Ladder) => Ok(ReferenceMethod::F),
        (_, SingleCore, M::G) => Ok(ReferenceMethod::G),

        (_, Multicore, M::A1 | M::A2) => Ok(ReferenceMethod::A1),
        (_, Multicore, M::B1 | M::B2 | M::Trunking) => Ok(ReferenceMethod::B2),
        (_, Multicore, M::C) => Ok(ReferenceMethod::C),
        (_, Multicore, M::E | M::F | M::G | M::PerforatedTray | M::Ladder) => Ok(ReferenceMethod::E),
    }
}

fn capacity_column(selection: &ConstructionKey, method: ReferenceMethod) -> CapacityColumn {
    use CableConfiguration as Cfg;

    let two_loaded = selection.system == SystemType::Dc || selection.phases == PhaseCount::Single;
    let single_core = selection.arrangement == CoreArrangement::SingleCore;

    match (single_core, method, two_loaded, selection.configuration) {
        (true, ReferenceMethod::G, true, _) => CapacityColumn::TwoLoadedSpaced,
        (true, ReferenceMethod::G, false, _) => CapacityColumn::ThreeLoadedFlatSpaced,
        (true, ReferenceMethod::F, true, Cfg::FlatSpaced) => CapacityColumn::TwoLoadedSpaced,
        (true, ReferenceMethod::F, false, Cfg::Trefoil) => CapacityColumn::ThreeLoadedTrefoil,
        (true, ReferenceMethod::F, false, Cfg::Standard | Cfg::FlatTouching) => {
            CapacityColumn::ThreeLoadedFlatTouching
        }
        (true, ReferenceMethod::F, false, Cfg::FlatSpaced) => CapacityColumn::ThreeLoadedFlatSpaced,
        (_, _, true, _) => CapacityColumn::TwoLoaded,
        (_, _, false, _) => CapacityColumn::ThreeLoaded,
    }
}

/// Resolve the voltage-drop-table key for a selection
pub fn resolve_voltage_drop_key(selection: &ConstructionKey) -> Result<VoltageDropKey, ResolutionGap> {
    check_system(selection, Concern::VoltageDrop)?;
    let circuit = match (selection.system, selection.phases) {
        (SystemType::Dc, _) => DropCircuit::Dc,
        (SystemType::Ac, PhaseCount::Single) => DropCircuit::AcSinglePhase,
        (SystemType::Ac, PhaseCount::Three) => DropCircuit::AcThreePhase,
    };
    Ok(VoltageDropKey {
        insulation: selection.insulation,
        armour: selection.armour,
        arrangement: selection.arrangement,
        circuit,
        layout: drop_layout(selection, circuit),
    })
}

fn drop_layout(selection: &ConstructionKey, circuit: DropCircuit) -> DropLayout {
    if selection.arrangement == CoreArrangement::Multicore || circuit == DropCircuit::Dc {
        return DropLayout::Any;
    }
    if selection.installation_method.is_enclosed() {
        return DropLayout::Enclosed;
    }
    let spaced = selection.installation_method == InstallationMethod::G
        || selection.configuration == CableConfiguration::FlatSpaced;

    match (circuit, spaced, selection.configuration) {
        (_, true, _) => DropLayout::Spaced,
        (DropCircuit::AcSinglePhase, false, _) => DropLayout::Touching,
        (_, false, CableConfiguration::Trefoil) => DropLayout::Trefoil,
        (_, false, _) => DropLayout::FlatTouching,
    }
}
