//! # cable_core - Conductor Sizing Engine
//!
//! `cable_core` resolves the minimum standard conductor size for a circuit
//! against two constraints: the derated current-carrying capacity and the
//! permitted voltage drop. Reference data comes from a versioned, read-only
//! catalog of BS 7671 Appendix 4 tables. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: each sizing call is a pure function of request, catalog and settings
//! - **Injected data**: the catalog is passed to the engine, never read from globals
//! - **No guessing**: a construction without a table is an error, never an estimate
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use cable_core::construction::{ConstructionKey, InstallationMethod, PhaseCount};
//! use cable_core::{calculate, SizingRequest};
//!
//! let request = SizingRequest {
//!     design_current_a: 100.0,
//!     cable_length_m: 50.0,
//!     ambient_temp_c: 30.0,
//!     max_voltage_drop_percent: 4.0,
//!     system_voltage_v: 400.0,
//!     grouping_circuit_count: 3,
//!     construction: ConstructionKey {
//!         phases: PhaseCount::Three,
//!         installation_method: InstallationMethod::B2,
//!         ..ConstructionKey::default()
//!     },
//! };
//!
//! let result = calculate(&request).unwrap();
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! println!("{}", json);
//! ```
//!
//! ## Modules
//!
//! - [`sizing`] - The engine: ampacity, voltage-drop and reconciliation stages
//! - [`catalog`] - Reference tables and their accessors
//! - [`resolver`] - Construction selection → catalog key, per concern
//! - [`construction`] - Categorical cable and installation selections
//! - [`derating`] - Ambient temperature and grouping factors
//! - [`sizes`] - Standard conductor sizes
//! - [`settings`] - Engine configuration
//! - [`errors`] - Structured error types

pub mod catalog;
pub mod construction;
pub mod derating;
pub mod errors;
pub mod resolver;
pub mod settings;
pub mod sizes;
pub mod sizing;

// Re-export commonly used types at crate root for convenience
pub use catalog::ReferenceCatalog;
pub use construction::ConstructionKey;
pub use errors::{CalcResult, SizingError};
pub use settings::{DropConvention, EngineSettings};
pub use sizes::StandardSize;
pub use sizing::{calculate, SizingEngine, SizingRequest, SizingResult, VoltageDropStatus};
