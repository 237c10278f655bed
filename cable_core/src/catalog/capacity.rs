//! Current-carrying capacity tables and their accessor.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use super::ReferenceCatalog;
use crate::errors::{CalcResult, SizingError};
use crate::resolver::CapacityKey;
use crate::sizes::StandardSize;

/// Size → tabulated ampacity (A) at reference conditions.
///
/// Entries keep catalog order, which is the string order of the TOML keys
/// ("10" sorts before "2.5"). Use [`CapacityTable::sorted`] for a numeric
/// scan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct CapacityTable {
    entries: Vec<(StandardSize, f64)>,
}

impl CapacityTable {
    /// Build from (size, amps) pairs; must be non-empty with positive ratings
    pub fn new(entries: Vec<(StandardSize, f64)>) -> CalcResult<Self> {
        if entries.is_empty() {
            return Err(SizingError::catalog_invalid("capacity table is empty"));
        }
        if let Some((size, amps)) = entries.iter().find(|(_, amps)| !amps.is_finite() || *amps <= 0.0) {
            return Err(SizingError::catalog_invalid(format!(
                "capacity for {} must be a positive number of amps, got {}",
                size, amps
            )));
        }
        if let Some(size) = first_repeated(entries.iter().map(|(size, _)| *size)) {
            return Err(SizingError::catalog_invalid(format!("capacity table lists {} twice", size)));
        }
        Ok(CapacityTable { entries })
    }

    /// Entries in catalog order
    pub fn entries(&self) -> &[(StandardSize, f64)] {
        &self.entries
    }

    /// Entries in ascending size order
    pub fn sorted(&self) -> Vec<(StandardSize, f64)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted
    }

    /// Sizes in ascending order
    pub fn sorted_sizes(&self) -> Vec<StandardSize> {
        self.sorted().into_iter().map(|(size, _)| size).collect()
    }

    pub fn capacity_a(&self, size: StandardSize) -> Option<f64> {
        self.entries.iter().find(|(s, _)| *s == size).map(|(_, amps)| *amps)
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

/// First size that appears more than once, e.g. under both "95" and "95.0"
pub(crate) fn first_repeated(sizes: impl Iterator<Item = StandardSize>) -> Option<StandardSize> {
    let mut sorted: Vec<StandardSize> = sizes.collect();
    sorted.sort();
    sorted.windows(2).find(|pair| pair[0] == pair[1]).map(|pair| pair[0])
}

impl TryFrom<BTreeMap<String, f64>> for CapacityTable {
    type Error = SizingError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let entries = raw
            .into_iter()
            .map(|(key, amps)| Ok((StandardSize::parse_key(&key)?, amps)))
            .collect::<CalcResult<Vec<_>>>()?;
        CapacityTable::new(entries)
    }
}

/// A capacity table found for a key
#[derive(Debug, Clone)]
pub struct CapacityLookup<'a> {
    /// Key that was asked for
    pub requested: CapacityKey,
    /// Key whose table was found (differs from `requested` after a fallback)
    pub resolved: CapacityKey,
    pub table: &'a CapacityTable,
}

impl CapacityLookup<'_> {
    pub fn used_fallback(&self) -> bool {
        self.requested != self.resolved
    }

    pub fn path(&self) -> String {
        self.resolved.path()
    }
}

/// Look up the capacity table for a resolved key.
///
/// Tries the key itself, then its column fallbacks in order; the first hit
/// wins. A miss on every path is `TableNotFound` listing each path tried.
pub fn get_capacity_table<'a>(
    catalog: &'a ReferenceCatalog,
    key: &CapacityKey,
) -> CalcResult<CapacityLookup<'a>> {
    let mut attempted = Vec::new();
    for candidate in key.lookup_order() {
        if let Some(table) = catalog.capacity_node(candidate.segments()) {
            if candidate != *key {
                debug!(requested = %key.path(), resolved = %candidate.path(), "capacity fallback used");
            }
            return Ok(CapacityLookup {
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
    use crate::resolver::{CapacityColumn, ReferenceMethod};

    fn mm2(value: f64) -> StandardSize {
        StandardSize::new(value).unwrap()
    }

    fn key(arrangement: CoreArrangement, method: ReferenceMethod, column: CapacityColumn) -> CapacityKey {
        CapacityKey {
            insulation: InsulationClass::Thermoplastic70,
            armour: ArmourClass::Unarmoured,
            arrangement,
            method,
            column,
        }
    }

    #[test]
    fn test_catalog_order_is_not_numeric() {
        let table: CapacityTable = toml::from_str(r#""10" = 57.0
"2.5" = 24.0
"95" = 232.0
"120" = 269.0"#)
        .unwrap();
        let catalog_order: Vec<f64> = table.entries().iter().map(|(s, _)| s.mm2()).collect();
        assert_eq!(catalog_order, vec![10.0, 120.0, 2.5, 95.0]);
        assert_eq!(table.sorted_sizes(), vec![mm2(2.5), mm2(10.0), mm2(95.0), mm2(120.0)]);
        assert_eq!(table.capacity_a(mm2(95.0)), Some(232.0));
        assert_eq!(table.capacity_a(mm2(70.0)), None);
    }

    #[test]
    fn test_table_validation() {
        assert!(CapacityTable::new(vec![]).is_err());
        assert!(CapacityTable::new(vec![(mm2(10.0), 0.0)]).is_err());
        assert!(CapacityTable::new(vec![(mm2(10.0), f64::NAN)]).is_err());
        assert!(toml::from_str::<CapacityTable>(r#""ten" = 57.0"#).is_err());
    }

    #[test]
    fn test_rejects_duplicate_size() {
        assert!(CapacityTable::new(vec![(mm2(95.0), 10.0), (mm2(70.0), 119.0), (mm2(95.0), 149.0)]).is_err());

        // "95" and "95.0" are distinct TOML keys for the same conductor
        let text = format!(
            "{}\n[capacity.thermoplastic_70.unarmoured.multicore.B2]\nthree_loaded = {{ \"95\" = 10.0, \"95.0\" = 149.0, \"70\" = 119.0 }}\n",
            fixtures::HEADER
        );
        let err = ReferenceCatalog::from_toml_str(&text).unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_INVALID");
        assert!(err.to_string().contains("95mm² twice"));
    }

    #[test]
    fn test_primary_hit() {
        let catalog = ReferenceCatalog::from_toml_str(fixtures::SCENARIO_CATALOG).unwrap();
        let lookup = get_capacity_table(
            &catalog,
            &key(CoreArrangement::Multicore, ReferenceMethod::B2, CapacityColumn::ThreeLoaded),
        )
        .unwrap();
        assert!(!lookup.used_fallback());
        assert_eq!(lookup.table.capacity_a(mm2(95.0)), Some(149.0));
    }

    #[test]
    fn test_fallback_first_match_wins() {
        let catalog = ReferenceCatalog::from_toml_str(fixtures::FALLBACK_CATALOG).unwrap();
        let requested = key(
            CoreArrangement::SingleCore,
            ReferenceMethod::F,
            CapacityColumn::ThreeLoadedFlatSpaced,
        );
        let lookup = get_capacity_table(&catalog, &requested).unwrap();
        assert!(lookup.used_fallback());
        // Both flat touching and generic three-loaded exist; flat touching comes first
        assert_eq!(lookup.resolved.column, CapacityColumn::ThreeLoadedFlatTouching);
        assert_eq!(lookup.table.capacity_a(mm2(95.0)), Some(300.0));
    }

    #[test]
    fn test_not_found_lists_every_path() {
        let catalog = ReferenceCatalog::from_toml_str(fixtures::SCENARIO_CATALOG).unwrap();
        let requested = key(
            CoreArrangement::SingleCore,
            ReferenceMethod::F,
            CapacityColumn::ThreeLoadedTrefoil,
        );
        match get_capacity_table(&catalog, &requested) {
            Err(SizingError::TableNotFound { attempted_key, attempted_paths }) => {
                assert_eq!(attempted_key, requested.path());
                assert_eq!(attempted_paths.len(), 2);
                assert!(attempted_paths[1].ends_with("F.three_loaded"));
            }
            other => panic!("expected TableNotFound, got {:?}", other),
        }
    }
}
