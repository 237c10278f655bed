//! # Reference Catalog
//!
//! Current-carrying capacity and voltage-drop tables, loaded once from TOML
//! and read-only afterwards. The engine borrows a catalog at construction,
//! so tests and alternative standards can substitute their own.
//!
//! ## Layout
//!
//! ```text
//! [meta]                      name, version, published
//! sizes = [...]               the standard size list, ascending
//! [capacity.<insulation>.<armour>.<arrangement>.<method>]
//! <column> = { "<size>" = <amps>, ... }
//! [voltage_drop.<insulation>.<armour>.<arrangement>.<circuit>]
//! <layout> = { "<size>" = { r = .., x = .., z = .. }, ... }
//! ```
//!
//! Both trees are exactly five named levels deep. Path segments are the
//! `code()` strings of the construction and resolver enums; unknown segments
//! are rejected at load time rather than silently becoming unreachable.
//!
//! ## Example
//!
//! ```rust
//! use cable_core::catalog::ReferenceCatalog;
//!
//! let catalog = ReferenceCatalog::builtin().unwrap();
//! assert!(catalog.capacity_table_count() > 0);
//! println!("{} v{}", catalog.info().name, catalog.info().version);
//! ```

pub mod capacity;
pub mod voltage_drop;

#[cfg(test)]
pub(crate) mod fixtures;

pub use capacity::{get_capacity_table, CapacityLookup, CapacityTable};
pub use voltage_drop::{get_vd_table, DropEntry, DropFactor, FactorKind, VoltageDropLookup, VoltageDropTable};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::construction::{ArmourClass, CoreArrangement, InsulationClass};
use crate::errors::{CalcResult, SizingError};
use crate::resolver::{CapacityColumn, DropCircuit, DropLayout, ReferenceMethod};
use crate::sizes::{SizeCatalog, StandardSize};

/// Built-in BS 7671 copper conductor tables
pub const BUILTIN_CATALOG_TOML: &str = include_str!("../../data/bs7671_copper.toml");

static BUILTIN: Lazy<CalcResult<ReferenceCatalog>> =
    Lazy::new(|| ReferenceCatalog::from_toml_str(BUILTIN_CATALOG_TOML));

type Level<T> = BTreeMap<String, T>;

/// Five named levels, then the table
pub(crate) type Tree<T> = Level<Level<Level<Level<Level<T>>>>>;

/// Catalog header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogInfo {
    /// Standard and table set, e.g. "BS 7671:2018+A2:2022 Appendix 4"
    pub name: String,
    /// Data revision
    pub version: String,
    /// Publication date of the source tables
    pub published: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    meta: CatalogInfo,
    sizes: SizeCatalog,
    #[serde(default)]
    capacity: Tree<CapacityTable>,
    #[serde(default)]
    voltage_drop: Tree<VoltageDropTable>,
}

/// Immutable, versioned reference data
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    info: CatalogInfo,
    sizes: SizeCatalog,
    capacity: Tree<CapacityTable>,
    voltage_drop: Tree<VoltageDropTable>,
}

impl ReferenceCatalog {
    /// Parse and validate a catalog from TOML text
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let raw: RawCatalog =
            toml::from_str(text).map_err(|e| SizingError::catalog_invalid(e.to_string()))?;

        let catalog = ReferenceCatalog {
            info: raw.meta,
            sizes: raw.sizes,
            capacity: raw.capacity,
            voltage_drop: raw.voltage_drop,
        };
        catalog.validate()?;

        info!(
            name = %catalog.info.name,
            version = %catalog.info.version,
            capacity_tables = catalog.capacity_table_count(),
            voltage_drop_tables = catalog.voltage_drop_table_count(),
            "reference catalog loaded"
        );
        Ok(catalog)
    }

    /// The embedded BS 7671 catalog, parsed on first use
    pub fn builtin() -> CalcResult<&'static ReferenceCatalog> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    pub fn info(&self) -> &CatalogInfo {
        &self.info
    }

    pub fn sizes(&self) -> &SizeCatalog {
        &self.sizes
    }

    pub fn capacity_table_count(&self) -> usize {
        flatten("capacity", &self.capacity).len()
    }

    pub fn voltage_drop_table_count(&self) -> usize {
        flatten("voltage_drop", &self.voltage_drop).len()
    }

    /// Dotted paths of every capacity table, in catalog order
    pub fn capacity_paths(&self) -> Vec<String> {
        flatten("capacity", &self.capacity).into_iter().map(|(path, _)| path).collect()
    }

    pub(crate) fn capacity_node(&self, segments: [&str; 5]) -> Option<&CapacityTable> {
        traverse(&self.capacity, segments)
    }

    pub(crate) fn voltage_drop_node(&self, segments: [&str; 5]) -> Option<&VoltageDropTable> {
        traverse(&self.voltage_drop, segments)
    }

    fn validate(&self) -> CalcResult<()> {
        let capacity_levels: [Vec<&'static str>; 5] = [
            InsulationClass::ALL.iter().map(|v| v.code()).collect(),
            ArmourClass::ALL.iter().map(|v| v.code()).collect(),
            CoreArrangement::ALL.iter().map(|v| v.code()).collect(),
            ReferenceMethod::ALL.iter().map(|v| v.code()).collect(),
            CapacityColumn::ALL.iter().map(|v| v.code()).collect(),
        ];
        let drop_levels: [Vec<&'static str>; 5] = [
            InsulationClass::ALL.iter().map(|v| v.code()).collect(),
            ArmourClass::ALL.iter().map(|v| v.code()).collect(),
            CoreArrangement::ALL.iter().map(|v| v.code()).collect(),
            DropCircuit::ALL.iter().map(|v| v.code()).collect(),
            DropLayout::ALL.iter().map(|v| v.code()).collect(),
        ];

        for (path, table) in flatten("capacity", &self.capacity) {
            check_segments(&path, &capacity_levels)?;
            self.check_sizes(&path, table.sizes())?;
        }
        for (path, table) in flatten("voltage_drop", &self.voltage_drop) {
            check_segments(&path, &drop_levels)?;
            self.check_sizes(&path, table.sizes())?;
        }
        Ok(())
    }

    fn check_sizes(&self, path: &str, sizes: impl Iterator<Item = StandardSize>) -> CalcResult<()> {
        for size in sizes {
            if !self.sizes.contains(size) {
                return Err(SizingError::catalog_invalid(format!(
                    "{} uses {} which is not in the size list",
                    path, size
                )));
            }
        }
        Ok(())
    }
}

fn check_segments(path: &str, levels: &[Vec<&'static str>; 5]) -> CalcResult<()> {
    // First segment is the tree name
    for (segment, allowed) in path.split('.').skip(1).zip(levels.iter()) {
        if !allowed.iter().any(|code| *code == segment) {
            return Err(SizingError::catalog_invalid(format!(
                "{}: unknown segment '{}' (expected one of {})",
                path,
                segment,
                allowed.join(", ")
            )));
        }
    }
    Ok(())
}

/// Walk the five levels; any missing node is a miss
fn traverse<'a, T>(tree: &'a Tree<T>, [a, b, c, d, e]: [&str; 5]) -> Option<&'a T> {
    tree.get(a)?.get(b)?.get(c)?.get(d)?.get(e)
}

fn flatten<'a, T>(root: &str, tree: &'a Tree<T>) -> Vec<(String, &'a T)> {
    let mut out = Vec::new();
    for (a, l1) in tree {
        for (b, l2) in l1 {
            for (c, l3) in l2 {
                for (d, l4) in l3 {
                    for (e, table) in l4 {
                        out.push((format!("{root}.{a}.{b}.{c}.{d}.{e}"), table));
                    }
                }
            }
        }
    }
    out
}
