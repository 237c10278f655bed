//! Standard Conductor Sizes
//!
//! Nominal conductor cross-sectional areas in mm² per IEC 60228. Every table
//! in the reference catalog is keyed by one of these sizes, and every scan
//! over them runs smallest to largest.
//!
//! ## Example
//!
//! ```rust
//! use cable_core::sizes::{SizeCatalog, StandardSize};
//!
//! let catalog = SizeCatalog::standard();
//! let size = StandardSize::new(95.0).unwrap();
//! assert!(catalog.contains(size));
//! assert_eq!(size.to_string(), "95mm²");
//! ```

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcResult, SizingError};

/// Standard copper conductor sizes (mm²), ascending
pub const STANDARD_SIZES_MM2: [f64; 20] = [
    1.0, 1.5, 2.5, 4.0, 6.0, 10.0, 16.0, 25.0, 35.0, 50.0, 70.0, 95.0, 120.0, 150.0, 185.0, 240.0,
    300.0, 400.0, 500.0, 630.0,
];

/// A conductor cross-sectional area in mm².
///
/// Always finite and positive, so it is totally ordered and usable as a map
/// key. Serializes as a bare number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct StandardSize(f64);

impl StandardSize {
    /// Create a size, rejecting non-finite and non-positive areas
    pub fn new(mm2: f64) -> CalcResult<Self> {
        if !mm2.is_finite() || mm2 <= 0.0 {
            return Err(SizingError::invalid_input(
                "size_mm2",
                mm2.to_string(),
                "Conductor size must be a positive, finite area",
            ));
        }
        Ok(StandardSize(mm2))
    }

    /// Parse a catalog table key such as `"2.5"` or `"95"`
    pub fn parse_key(key: &str) -> CalcResult<Self> {
        let mm2: f64 = key.trim().parse().map_err(|_| {
            SizingError::catalog_invalid(format!("'{}' is not a conductor size", key))
        })?;
        StandardSize::new(mm2).map_err(|_| {
            SizingError::catalog_invalid(format!("'{}' is not a positive conductor size", key))
        })
    }

    /// Area in mm²
    pub fn mm2(&self) -> f64 {
        self.0
    }
}

impl PartialEq for StandardSize {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for StandardSize {}

impl PartialOrd for StandardSize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StandardSize {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for StandardSize {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl TryFrom<f64> for StandardSize {
    type Error = SizingError;

    fn try_from(mm2: f64) -> Result<Self, Self::Error> {
        StandardSize::new(mm2)
    }
}

impl From<StandardSize> for f64 {
    fn from(size: StandardSize) -> Self {
        size.0
    }
}

impl std::fmt::Display for StandardSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}mm²", self.0)
    }
}

/// The fixed, strictly ascending set of sizes a catalog may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StandardSize>", into = "Vec<StandardSize>")]
pub struct SizeCatalog {
    sizes: Vec<StandardSize>,
}

impl SizeCatalog {
    /// Build from a list that must be non-empty and strictly ascending
    pub fn new(sizes: Vec<StandardSize>) -> CalcResult<Self> {
        if sizes.is_empty() {
            return Err(SizingError::catalog_invalid("size list is empty"));
        }
        if let Some(pair) = sizes.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(SizingError::catalog_invalid(format!(
                "size list must be strictly ascending ({} is followed by {})",
                pair[0], pair[1]
            )));
        }
        Ok(SizeCatalog { sizes })
    }

    /// IEC 60228 copper sizes from 1 mm² to 630 mm²
    pub fn standard() -> Self {
        SizeCatalog {
            sizes: STANDARD_SIZES_MM2.iter().map(|&mm2| StandardSize(mm2)).collect(),
        }
    }

    pub fn contains(&self, size: StandardSize) -> bool {
        self.sizes.binary_search(&size).is_ok()
    }

    pub fn smallest(&self) -> StandardSize {
        self.sizes[0]
    }

    pub fn largest(&self) -> StandardSize {
        self.sizes[self.sizes.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl TryFrom<Vec<StandardSize>> for SizeCatalog {
    type Error = SizingError;

    fn try_from(sizes: Vec<StandardSize>) -> Result<Self, Self::Error> {
        SizeCatalog::new(sizes)
    }
}

impl From<SizeCatalog> for Vec<StandardSize> {
    fn from(catalog: SizeCatalog) -> Self {
        catalog.sizes
    }
}
