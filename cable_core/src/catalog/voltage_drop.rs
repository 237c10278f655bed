//! Voltage-drop tables and their accessor.
//!
//! Entries are in mV/A/m. Small conductors are resistive and list only `r`;
//! larger ones list the resistive, reactive and impedance components.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::capacity::first_repeated;
use super::ReferenceCatalog;
use crate::errors::{CalcResult, SizingError};
use crate::resolver::VoltageDropKey;
use crate::sizes::StandardSize;

/// One row of a voltage-drop table (mV/A/m)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DropEntry {
    #[serde(default)]
    pub r: Option<f64>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
}

/// Which component a drop factor came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactorKind {
    Impedance,
    Resistive,
}

impl FactorKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            FactorKind::Impedance => "impedance (z)",
            FactorKind::Resistive => "resistance (r)",
        }
    }
}

/// The mV/A/m figure used in a drop calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropFactor {
    pub mv_per_a_m: f64,
    pub kind: FactorKind,
}

impl DropEntry {
    /// Impedance when tabulated, otherwise resistance
    pub fn factor(&self) -> Option<DropFactor> {
        match (self.z, self.r) {
            (Some(z), _) => Some(DropFactor {
                mv_per_a_m: z,
                kind: FactorKind::Impedance,
            }),
            (None, Some(r)) => Some(DropFactor {
                mv_per_a_m: r,
                kind: FactorKind::Resistive,
            }),
            (None, None) => None,
        }
    }

    fn validate(&self, size: StandardSize) -> CalcResult<()> {
        if self.r.is_none() && self.z.is_none() {
            return Err(SizingError::catalog_invalid(format!(
                "voltage-drop entry for {} has neither r nor z",
                size
            )));
        }
        for (name, value) in [("r", self.r), ("x", self.x), ("z", self.z)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(SizingError::catalog_invalid(format!(
                        "voltage-drop {} for {} must be positive, got {}",
                        name, size, v
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Size → drop entry, in catalog order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, DropEntry>")]
pub struct VoltageDropTable {
    entries: Vec<(StandardSize, DropEntry)>,
}

impl VoltageDropTable {
    pub fn new(entries: Vec<(StandardSize, DropEntry)>) -> CalcResult<Self> {
        if entries.is_empty() {
            return Err(SizingError::catalog_invalid("voltage-drop table is empty"));
        }
        for (size, entry) in &entries {
            entry.validate(*size)?;
        }
        if let Some(size) = first_repeated(entries.iter().map(|(size, _)| *size)) {
            return Err(SizingError::catalog_invalid(format!("voltage-drop table lists {} twice", size)));
        }
        Ok(VoltageDropTable { entries })
    }

    pub fn entry(&self, size: StandardSize) -> Option<&DropEntry> {
        self.entries.iter().find(|(s, _)| *s == size).map(|(_, e)| e)
    }

    /// Drop factor for a size, `None` when the size is not tabulated
    pub fn factor(&self, size: StandardSize) -> Option<DropFactor> {
        self.entry(size).and_then(DropEntry::factor)
    }

    pub fn sizes(&self) -> impl Iterator<Item = StandardSize> + '_ {
        self.entries.iter().map(|(size, _)| *size)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<BTreeMap<String, DropEntry>> for VoltageDropTable {
    type Error = SizingError;

    fn try_from(raw: BTreeMap<String, DropEntry>) -> Result<Self, Self::Error> {
        let entries = raw
            .into_iter()
            .map(|(key, entry)| Ok((StandardSize::parse_key(&key)?, entry)))
            .collect::<CalcResult<Vec<_>>>()?;
        VoltageDropTable::new(entries)
    }
}

#[derive(Debug, Clone)]
pub struct VoltageDropLookup<'a> {
    pub requested: VoltageDropKey,
    pub resolved: VoltageDropKey,
    pub table: &'a VoltageDropTable,
}

impl VoltageDropLookup<'_> {
    pub fn used_fallback(&self) -> bool {
        self.requested != self.resolved
    }

    pub fn path(&self) -> String {
        self.resolved.path()
    }
}

/// Look up the voltage-drop table for a resolved key, trying layout
/// fallbacks in order
pub fn get_vd_table<'a>(
    catalog: &'a ReferenceCatalog,
    key: &VoltageDropKey,
) -> CalcResult<VoltageDropLookup<'a>> {
    let mut attempted = Vec::new();
    for candidate in key.lookup_order() {
        if let Some(table) = catalog.voltage_drop_node(candidate.segments()) {
            if candidate != *key {
                debug!(requested = %key.path(), resolved = %candidate.path(), "voltage-drop fallback used");
            }
            return Ok(VoltageDropLookup {
                requested: *key,
                resolved: candidate,
                table,
            });
        }
        attempted.push(candidate.path());
    }
    Err(SizingError::table_not_found(key.path(), attempted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use crate::construction::{ArmourClass, CoreArrangement, InsulationClass};
    use crate::resolver::{DropCircuit, DropLayout};

    fn mm2(value: f64) -> StandardSize {
        StandardSize::new(value).unwrap()
    }

    #[test]
    fn test_factor_prefers_impedance() {
        let table: VoltageDropTable = toml::from_str(
            r#""2.5" = { r = 18.0 }
"95" = { r = 0.41, x = 0.135, z = 0.43 }"#,
        )
        .unwrap();
        let small = table.factor(mm2(2.5)).unwrap();
        assert_eq!(small.kind, FactorKind::Resistive);
        assert_eq!(small.mv_per_a_m, 18.0);

        let large = table.factor(mm2(95.0)).unwrap();
        assert_eq!(large.kind, FactorKind::Impedance);
        assert_eq!(large.mv_per_a_m, 0.43);

        assert!(table.factor(mm2(70.0)).is_none());
    }

    #[test]
    fn test_rejects_entry_without_r_or_z() {
        let result = toml::from_str::<VoltageDropTable>(r#""95" = { x = 0.135 }"#);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("neither r nor z"));
    }

    #[test]
    fn test_rejects_unknown_component() {
        assert!(toml::from_str::<VoltageDropTable>(r#""95" = { r = 0.41, q = 1.0 }"#).is_err());
    }

    #[test]
    fn test_rejects_duplicate_size() {
        let entry = DropEntry {
            r: None,
            x: None,
            z: Some(0.41),
        };
        assert!(VoltageDropTable::new(vec![(mm2(95.0), entry), (mm2(95.0), entry)]).is_err());

        let err = toml::from_str::<VoltageDropTable>(r#""95" = { z = 0.41 }
"95.0" = { z = 0.90 }"#)
        .unwrap_err();
        assert!(err.to_string().contains("95mm² twice"));
    }

    #[test]
    fn test_layout_fallback_to_enclosed() {
        let catalog = ReferenceCatalog::from_toml_str(fixtures::FALLBACK_CATALOG).unwrap();
        let key = VoltageDropKey {
            insulation: InsulationClass::Thermoplastic70,
            armour: ArmourClass::Unarmoured,
            arrangement: CoreArrangement::SingleCore,
            circuit: DropCircuit::AcThreePhase,
            layout: DropLayout::Trefoil,
        };
        let lookup = get_vd_table(&catalog, &key).unwrap();
        assert!(lookup.used_fallback());
        assert_eq!(lookup.resolved.layout, DropLayout::Enclosed);
        assert_eq!(lookup.table.factor(mm2(95.0)).unwrap().mv_per_a_m, 0.41);

        let flat = VoltageDropKey {
            layout: DropLayout::FlatTouching,
            ..key
        };
        let err = get_vd_table(&catalog, &flat).unwrap_err();
        assert_eq!(err.error_code(), "TABLE_NOT_FOUND");
    }
}
