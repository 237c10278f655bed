//! # Conductor Sizing
//!
//! Sizes a conductor against two constraints at once: it must carry the
//! derated design current (ampacity), and the voltage drop over its length
//! must stay within the limit.
//!
//! ## Pipeline
//!
//! 1. Validate the request
//! 2. Derating factors (Ca, Cg) and the required tabulated current
//! 3. Resolve the capacity key and fetch its table (terminal on failure)
//! 4. Ampacity stage
//! 5. Resolve the voltage-drop key and fetch its table (missing ⇒ data unavailable)
//! 6. Voltage-drop stage, escalating from the ampacity size
//! 7. Reconcile: the larger size wins
//!
//! ## Example
//!
//! ```rust
//! use cable_core::construction::*;
//! use cable_core::sizing::{calculate, SizingRequest};
//!
//! let request = SizingRequest {
//!     design_current_a: 32.0,
//!     cable_length_m: 25.0,
//!     ambient_temp_c: 30.0,
//!     max_voltage_drop_percent: 5.0,
//!     system_voltage_v: 230.0,
//!     grouping_circuit_count: 1,
//!     construction: ConstructionKey {
//!         insulation: InsulationClass::Thermoplastic70,
//!         armour: ArmourClass::Unarmoured,
//!         arrangement: CoreArrangement::Multicore,
//!         phases: PhaseCount::Single,
//!         installation_method: InstallationMethod::C,
//!         configuration: CableConfiguration::Standard,
//!         system: SystemType::Ac,
//!     },
//! };
//!
//! let result = calculate(&request).unwrap();
//! println!("Final size: {}", result.final_size);
//! println!("{}", result.status_message());
//! ```

pub mod ampacity;
pub mod reconcile;
pub mod voltage_drop;

pub use ampacity::{size_for_ampacity, suggest_parallel_runs, AmpacityOutcome, ParallelRuns};
pub use reconcile::{reconcile, Reconciled};
pub use voltage_drop::{size_for_voltage_drop, DropFigures, DropInputs, VoltageDropOutcome, VoltageDropStatus};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{get_capacity_table, get_vd_table, DropFactor, ReferenceCatalog};
use crate::construction::ConstructionKey;
use crate::derating::{bs7671_ref, DeratingSummary};
use crate::errors::{CalcResult, SizingError};
use crate::resolver::{resolve, Concern};
use crate::settings::{DropConvention, EngineSettings};
use crate::sizes::StandardSize;

/// Ambient temperatures outside this range are rejected as input errors
const AMBIENT_RANGE_C: (f64, f64) = (-50.0, 100.0);

/// Largest accepted design current (A)
const MAX_DESIGN_CURRENT_A: f64 = 100_000.0;

/// Largest accepted cable length (m)
const MAX_CABLE_LENGTH_M: f64 = 100_000.0;

/// One circuit to size.
///
/// ## JSON Example
///
/// ```json
/// {
///   "design_current_a": 100.0,
///   "cable_length_m": 50.0,
///   "ambient_temp_c": 30.0,
///   "max_voltage_drop_percent": 4.0,
///   "system_voltage_v": 400.0,
///   "grouping_circuit_count": 3,
///   "construction": {
///     "insulation": "Thermoplastic70",
///     "armour": "Unarmoured",
///     "arrangement": "Multicore",
///     "phases": "Three",
///     "installation_method": "B2",
///     "configuration": "Standard",
///     "system": "Ac"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingRequest {
    /// Design current Ib (A)
    pub design_current_a: f64,

    /// Route length (m)
    pub cable_length_m: f64,

    /// Ambient temperature (°C)
    pub ambient_temp_c: f64,

    /// Permitted voltage drop as a percentage of system voltage
    pub max_voltage_drop_percent: f64,

    /// Nominal system voltage (V); line-to-line for three-phase
    pub system_voltage_v: f64,

    /// Circuits grouped together, including this one
    pub grouping_circuit_count: u32,

    pub construction: ConstructionKey,
}

impl SizingRequest {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        positive("design_current_a", self.design_current_a, "Design current must be positive")?;
        at_most(
            "design_current_a",
            self.design_current_a,
            MAX_DESIGN_CURRENT_A,
            "Design current exceeds the largest accepted value",
        )?;
        positive("cable_length_m", self.cable_length_m, "Cable length must be positive")?;
        at_most(
            "cable_length_m",
            self.cable_length_m,
            MAX_CABLE_LENGTH_M,
            "Cable length exceeds the largest accepted value",
        )?;
        positive("system_voltage_v", self.system_voltage_v, "System voltage must be positive")?;

        let (low, high) = AMBIENT_RANGE_C;
        if !self.ambient_temp_c.is_finite() || self.ambient_temp_c < low || self.ambient_temp_c > high {
            return Err(SizingError::invalid_input(
                "ambient_temp_c",
                self.ambient_temp_c.to_string(),
                format!("Ambient temperature must be between {} and {} °C", low, high),
            ));
        }

        let limit = self.max_voltage_drop_percent;
        if !limit.is_finite() || limit <= 0.0 || limit > 100.0 {
            return Err(SizingError::invalid_input(
                "max_voltage_drop_percent",
                limit.to_string(),
                "Voltage drop limit must be greater than 0 and at most 100%",
            ));
        }

        if self.grouping_circuit_count == 0 {
            return Err(SizingError::invalid_input(
                "grouping_circuit_count",
                "0",
                "At least one circuit must be counted",
            ));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f64, reason: &str) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SizingError::invalid_input(field, value.to_string(), reason));
    }
    Ok(())
}

fn at_most(field: &str, value: f64, max: f64, reason: &str) -> CalcResult<()> {
    if value > max {
        return Err(SizingError::invalid_input(field, value.to_string(), format!("{} ({})", reason, max)));
    }
    Ok(())
}

/// Outcome of sizing one circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    // === Sizes ===
    /// Smallest size meeting the ampacity requirement (largest when exhausted)
    pub ampacity_size: StandardSize,

    /// Size the voltage-drop stage settled on
    pub voltage_drop_size: StandardSize,

    /// max(ampacity_size, voltage_drop_size)
    pub final_size: StandardSize,

    // === Derating ===
    pub temperature_factor: f64,
    pub grouping_factor: f64,

    /// Ib / (Ca × Cg)
    pub required_current_a: f64,

    // === Ampacity ===
    pub ampacity: AmpacityOutcome,

    /// Tabulated capacity at the final size
    pub tabulated_capacity_a: Option<f64>,

    /// Tabulated capacity × Ca × Cg at the final size
    pub derated_capacity_a: Option<f64>,

    /// Suggested parallel runs when no single size carries the current
    pub parallel_runs: Option<ParallelRuns>,

    // === Voltage drop at the final size ===
    pub drop_volts: Option<f64>,
    pub drop_percent: Option<f64>,
    pub drop_factor: Option<DropFactor>,
    pub max_voltage_drop_percent: f64,
    pub status: VoltageDropStatus,

    /// Sizes evaluated during escalation, ascending
    pub examined_sizes: Vec<StandardSize>,

    /// Voltage drop was recomputed at the final size during reconciliation
    pub drop_recomputed: bool,

    // === Traceability ===
    pub capacity_path: String,
    pub capacity_fallback_used: bool,
    pub voltage_drop_path: Option<String>,
    pub voltage_drop_fallback_used: bool,
    pub drop_convention: DropConvention,
    pub catalog_name: String,
    pub catalog_version: String,
}

impl SizingResult {
    /// Both constraints are met by a single conductor
    pub fn is_satisfactory(&self) -> bool {
        !self.ampacity.is_exhausted() && self.status.is_satisfied()
    }

    /// One-line status, e.g. "VD data unavailable for size 95mm²"
    pub fn status_message(&self) -> String {
        match self.ampacity {
            AmpacityOutcome::Exhausted {
                largest,
                shortfall_a,
                ..
            } => format!(
                "Ampacity exhausted: {} is {:.1} A short; {}",
                largest,
                shortfall_a,
                self.status.message()
            ),
            AmpacityOutcome::Selected { .. } => self.status.message(),
        }
    }

    /// Format as a multi-line string for reports
    pub fn format_report(&self) -> String {
        let mut lines = vec![
            "Conductor Sizing".to_string(),
            "================================================".to_string(),
            format!("Catalog: {} (v{})", self.catalog_name, self.catalog_version),
            String::new(),
            format!("Ca = {:.2}    {}", self.temperature_factor, bs7671_ref::CA),
            format!("Cg = {:.2}    {}", self.grouping_factor, bs7671_ref::CG),
            format!("It required = {:.1} A", self.required_current_a),
            String::new(),
            format!(
                "Capacity table: {}{}    {}",
                self.capacity_path,
                if self.capacity_fallback_used { " (fallback)" } else { "" },
                bs7671_ref::IZ
            ),
        ];

        match self.ampacity {
            AmpacityOutcome::Selected { size, capacity_a } => {
                lines.push(format!("Ampacity size: {} (It = {:.0} A)", size, capacity_a));
            }
            AmpacityOutcome::Exhausted {
                largest,
                largest_capacity_a,
                shortfall_a,
            } => {
                lines.push(format!(
                    "Ampacity exhausted: {} carries {:.0} A, short by {:.1} A",
                    largest, largest_capacity_a, shortfall_a
                ));
                if let Some(runs) = &self.parallel_runs {
                    lines.push(format!(
                        "  Consider {} × {} in parallel ({:.0} A combined)",
                        runs.runs, runs.size, runs.combined_capacity_a
                    ));
                }
            }
        }

        lines.push(String::new());
        match &self.voltage_drop_path {
            Some(path) => lines.push(format!(
                "Voltage-drop table: {}{}    {}",
                path,
                if self.voltage_drop_fallback_used { " (fallback)" } else { "" },
                bs7671_ref::VD
            )),
            None => lines.push("Voltage-drop table: none".to_string()),
        }
        lines.push(format!(
            "Limit: {:.1}% ({})    {}",
            self.max_voltage_drop_percent,
            self.drop_convention.display_name(),
            bs7671_ref::VD_LIMIT
        ));
        if let (Some(volts), Some(percent), Some(factor)) = (self.drop_volts, self.drop_percent, self.drop_factor) {
            lines.push(format!(
                "Drop at {}: {:.2} V ({:.2}%), {} {:.3} mV/A/m",
                self.final_size,
                volts,
                percent,
                factor.kind.display_name(),
                factor.mv_per_a_m
            ));
        }
        if !self.examined_sizes.is_empty() {
            let examined: Vec<String> = self.examined_sizes.iter().map(|s| s.to_string()).collect();
            lines.push(format!("Sizes examined: {}", examined.join(", ")));
        }

        lines.push("------------------------------------------------".to_string());
        lines.push(format!("Final size: {}", self.final_size));
        if let Some(derated) = self.derated_capacity_a {
            lines.push(format!("Derated capacity Iz = {:.1} A", derated));
        }
        lines.push(format!("Status: {}", self.status_message()));
        lines.join("\n")
    }
}

/// Sizing engine bound to one reference catalog.
///
/// The catalog is borrowed read-only, so one engine (or many) can serve
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct SizingEngine<'a> {
    catalog: &'a ReferenceCatalog,
    settings: EngineSettings,
}

impl<'a> SizingEngine<'a> {
    pub fn new(catalog: &'a ReferenceCatalog, settings: EngineSettings) -> Self {
        SizingEngine { catalog, settings }
    }

    pub fn catalog(&self) -> &'a ReferenceCatalog {
        self.catalog
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Size one circuit.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - a request field is out of range
    /// * `KeyResolutionGap` - the construction has no table coverage
    /// * `TableNotFound` - no capacity table for the resolved key
    ///
    /// Ampacity exhaustion and voltage-drop problems are reported in the
    /// result, not as errors.
    pub fn size(&self, request: &SizingRequest) -> CalcResult<SizingResult> {
        request.validate()?;
        let selection = &request.construction;

        let derating = DeratingSummary::new(
            selection.insulation,
            request.ambient_temp_c,
            selection.installation_method,
            request.grouping_circuit_count,
        );
        let required = derating.required_current_a(request.design_current_a);
        if !required.is_finite() {
            return Err(SizingError::invalid_input(
                "design_current_a",
                request.design_current_a.to_string(),
                "Derated current is not a finite number",
            ));
        }
        debug!(
            construction = %selection,
            ca = derating.temperature_factor,
            cg = derating.grouping_factor,
            required_a = required,
            "derating applied"
        );

        // Ampacity
        let capacity_key = resolve(selection, Concern::Ampacity)?
            .capacity()
            .ok_or_else(|| SizingError::internal("ampacity resolution returned a voltage-drop key"))?;
        let capacity = get_capacity_table(self.catalog, &capacity_key)?;
        let ampacity = size_for_ampacity(required, capacity.table)?;
        debug!(path = %capacity.path(), outcome = ?ampacity, "ampacity stage");
        if let AmpacityOutcome::Exhausted { largest, shortfall_a, .. } = ampacity {
            warn!(construction = %selection, largest = %largest, shortfall_a, "no single size carries the required current");
        }
        let parallel_runs = suggest_parallel_runs(&ampacity, required, self.settings.max_parallel_runs);

        // Voltage drop
        let drop_key = resolve(selection, Concern::VoltageDrop)?
            .voltage_drop()
            .ok_or_else(|| SizingError::internal("voltage-drop resolution returned a capacity key"))?;
        let drop_lookup = match get_vd_table(self.catalog, &drop_key) {
            Ok(lookup) => Some(lookup),
            Err(SizingError::TableNotFound { attempted_paths, .. }) => {
                warn!(key = %drop_key.path(), tried = attempted_paths.len(), "no voltage-drop table");
                None
            }
            Err(e) => return Err(e),
        };
        let drop_table = drop_lookup.as_ref().map(|lookup| lookup.table);

        let inputs = DropInputs {
            design_current_a: request.design_current_a,
            cable_length_m: request.cable_length_m,
            system_voltage_v: request.system_voltage_v,
            max_voltage_drop_percent: request.max_voltage_drop_percent,
            phase_scale: self
                .settings
                .drop_convention
                .phase_scale(drop_key.circuit.is_three_phase()),
        };
        let candidates = capacity.table.sorted_sizes();
        let vd = size_for_voltage_drop(ampacity.size(), &inputs, &candidates, drop_table);
        debug!(size = %vd.size, status = ?vd.status, examined = vd.examined.len(), "voltage-drop stage");

        // Reconcile
        let reconciled = reconcile(ampacity.size(), &vd, &inputs, drop_table);
        match reconciled.status {
            VoltageDropStatus::DataUnavailable { size } => {
                warn!(size = %size, "voltage drop not checked: no data");
            }
            VoltageDropStatus::TooHigh { largest, excess_percent } => {
                warn!(largest = %largest, excess_percent, "voltage drop above limit at largest size");
            }
            VoltageDropStatus::Acceptable | VoltageDropStatus::IncreasedForVoltageDrop => {}
        }

        let tabulated_capacity_a = capacity.table.capacity_a(reconciled.final_size);
        let info = self.catalog.info();

        Ok(SizingResult {
            ampacity_size: ampacity.size(),
            voltage_drop_size: vd.size,
            final_size: reconciled.final_size,
            temperature_factor: derating.temperature_factor,
            grouping_factor: derating.grouping_factor,
            required_current_a: required,
            ampacity,
            tabulated_capacity_a,
            derated_capacity_a: tabulated_capacity_a.map(|amps| amps * derating.combined()),
            parallel_runs,
            drop_volts: reconciled.drop.map(|d| d.drop_volts),
            drop_percent: reconciled.drop.map(|d| d.drop_percent),
            drop_factor: reconciled.drop.map(|d| d.factor),
            max_voltage_drop_percent: request.max_voltage_drop_percent,
            status: reconciled.status,
            examined_sizes: vd.examined,
            drop_recomputed: reconciled.recomputed,
            capacity_path: capacity.path(),
            capacity_fallback_used: capacity.used_fallback(),
            voltage_drop_path: drop_lookup.as_ref().map(|lookup| lookup.path()),
            voltage_drop_fallback_used: drop_lookup.as_ref().is_some_and(|lookup| lookup.used_fallback()),
            drop_convention: self.settings.drop_convention,
            catalog_name: info.name.clone(),
            catalog_version: info.version.clone(),
        })
    }
}

/// Size a circuit against the built-in catalog with default settings.
pub fn calculate(request: &SizingRequest) -> CalcResult<SizingResult> {
    let catalog = ReferenceCatalog::builtin()?;
    SizingEngine::new(catalog, EngineSettings::default()).size(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use crate::construction::{
        ArmourClass, CableConfiguration, CoreArrangement, InstallationMethod, InsulationClass, PhaseCount,
        SystemType,
    };

    fn mm2(value: f64) -> StandardSize {
        StandardSize::new(value).unwrap()
    }

    fn multicore(method: InstallationMethod, phases: PhaseCount) -> ConstructionKey {
        ConstructionKey {
            insulation: InsulationClass::Thermoplastic70,
            armour: ArmourClass::Unarmoured,
            arrangement: CoreArrangement::Multicore,
            phases,
            installation_method: method,
            configuration: CableConfiguration::Standard,
            system: SystemType::Ac,
        }
    }

    /// 100 A, three grouped circuits in conduit, 50 m at 380 V, 4% limit
    fn scenario_request() -> SizingRequest {
        SizingRequest {
            design_current_a: 100.0,
            cable_length_m: 50.0,
            ambient_temp_c: 30.0,
            max_voltage_drop_percent: 4.0,
            system_voltage_v: 380.0,
            grouping_circuit_count: 3,
            construction: multicore(InstallationMethod::B2, PhaseCount::Three),
        }
    }

    fn size_with(catalog_toml: &str, request: &SizingRequest) -> CalcResult<SizingResult> {
        let catalog = ReferenceCatalog::from_toml_str(catalog_toml).unwrap();
        SizingEngine::new(&catalog, EngineSettings::default()).size(request)
    }

    #[test]
    fn test_scenario_ampacity_selection() {
        let result = size_with(fixtures::SCENARIO_CATALOG, &scenario_request()).unwrap();
        assert_eq!(result.temperature_factor, 1.0);
        assert_eq!(result.grouping_factor, 0.70);
        assert!((result.required_current_a - 142.857).abs() < 0.01);
        assert_eq!(result.ampacity_size, mm2(95.0));
        assert_eq!(result.tabulated_capacity_a, Some(149.0));
        assert!(!result.capacity_fallback_used);
    }

    #[test]
    fn test_scenario_voltage_drop_acceptable() {
        let result = size_with(fixtures::SCENARIO_CATALOG, &scenario_request()).unwrap();
        assert!((result.drop_volts.unwrap() - 2.05).abs() < 1e-9);
        assert!((result.drop_percent.unwrap() - 0.54).abs() < 0.01);
        assert_eq!(result.status, VoltageDropStatus::Acceptable);
        assert_eq!(result.final_size, mm2(95.0));
        assert!(result.is_satisfactory());
        assert!(!result.drop_recomputed);
    }

    #[test]
    fn test_scenario_no_drop_table() {
        let result = size_with(fixtures::NO_DROP_CATALOG, &scenario_request()).unwrap();
        assert_eq!(result.status_message(), "VD data unavailable for size 95mm²");
        assert_eq!(result.final_size, result.ampacity_size);
        assert_eq!(result.voltage_drop_path, None);
        assert_eq!(result.drop_volts, None);
        assert!(!result.is_satisfactory());
    }

    #[test]
    fn test_scenario_ampacity_exhausted() {
        let mut request = scenario_request();
        request.design_current_a = 1000.0;
        request.grouping_circuit_count = 1;
        request.system_voltage_v = 400.0;
        request.construction = multicore(InstallationMethod::C, PhaseCount::Three);

        let result = size_with(fixtures::EXHAUSTED_CATALOG, &request).unwrap();
        match result.ampacity {
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
        assert_eq!(result.final_size, mm2(630.0));
        assert_eq!(result.parallel_runs.unwrap().runs, 2);
        assert!(result.status_message().starts_with("Ampacity exhausted"));
        assert!(!result.is_satisfactory());
    }

    #[test]
    fn test_scenario_known_gap_is_distinct_from_not_found() {
        let mut request = scenario_request();
        request.construction = ConstructionKey {
            armour: ArmourClass::Armoured,
            arrangement: CoreArrangement::SingleCore,
            installation_method: InstallationMethod::G,
            configuration: CableConfiguration::FlatSpaced,
            ..request.construction
        };
        let err = calculate(&request).unwrap_err();
        assert_eq!(err.error_code(), "KEY_RESOLUTION_GAP");
        assert!(err.attempted_key().unwrap().contains("armoured/single_core"));

        // Unarmoured in ground ducts resolves, but the catalog has no D1 table for it
        request.construction = multicore(InstallationMethod::D1, PhaseCount::Three);
        let err = calculate(&request).unwrap_err();
        assert_eq!(err.error_code(), "TABLE_NOT_FOUND");
        assert_eq!(
            err.attempted_key(),
            Some("capacity.thermoplastic_70.unarmoured.multicore.D1.three_loaded")
        );
    }

    #[test]
    fn test_escalation_through_engine() {
        let request = SizingRequest {
            design_current_a: 100.0,
            cable_length_m: 200.0,
            ambient_temp_c: 30.0,
            max_voltage_drop_percent: 4.0,
            system_voltage_v: 400.0,
            grouping_circuit_count: 1,
            construction: multicore(InstallationMethod::C, PhaseCount::Three),
        };
        let result = size_with(fixtures::ESCALATION_CATALOG, &request).unwrap();
        assert_eq!(result.ampacity_size, mm2(25.0));
        assert_eq!(result.voltage_drop_size, mm2(70.0));
        assert_eq!(result.final_size, mm2(70.0));
        assert_eq!(result.status, VoltageDropStatus::IncreasedForVoltageDrop);
        assert_eq!(result.examined_sizes.len(), 4);
        assert_eq!(result.tabulated_capacity_a, Some(192.0));
    }

    #[test]
    fn test_data_gap_during_escalation() {
        let request = SizingRequest {
            design_current_a: 100.0,
            cable_length_m: 200.0,
            ambient_temp_c: 30.0,
            max_voltage_drop_percent: 5.0,
            system_voltage_v: 230.0,
            grouping_circuit_count: 1,
            construction: multicore(InstallationMethod::C, PhaseCount::Single),
        };
        let result = size_with(fixtures::ESCALATION_CATALOG, &request).unwrap();
        assert_eq!(result.ampacity_size, mm2(25.0));
        assert_eq!(result.status, VoltageDropStatus::DataUnavailable { size: mm2(50.0) });
        assert_eq!(result.final_size, mm2(50.0));
        assert_eq!(result.drop_volts, None);
        assert_eq!(result.status_message(), "VD data unavailable for size 50mm²");
    }

    #[test]
    fn test_root3_convention_scales_three_phase_drop() {
        let catalog = ReferenceCatalog::from_toml_str(fixtures::SCENARIO_CATALOG).unwrap();
        let settings = EngineSettings {
            drop_convention: DropConvention::PhaseFactorRoot3,
            ..EngineSettings::default()
        };
        let result = SizingEngine::new(&catalog, settings).size(&scenario_request()).unwrap();
        assert!((result.drop_volts.unwrap() - 2.05 * 3f64.sqrt()).abs() < 1e-9);
        assert_eq!(result.drop_convention, DropConvention::PhaseFactorRoot3);
    }

    #[test]
    fn test_invalid_inputs() {
        let catalog = ReferenceCatalog::from_toml_str(fixtures::SCENARIO_CATALOG).unwrap();
        let engine = SizingEngine::new(&catalog, EngineSettings::default());

        let cases: [(&str, fn(&mut SizingRequest)); 9] = [
            ("design_current_a", |r: &mut SizingRequest| r.design_current_a = 0.0),
            ("design_current_a", |r: &mut SizingRequest| r.design_current_a = f64::NAN),
            ("design_current_a", |r: &mut SizingRequest| r.design_current_a = 1e308),
            ("cable_length_m", |r: &mut SizingRequest| r.cable_length_m = -1.0),
            ("cable_length_m", |r: &mut SizingRequest| r.cable_length_m = 1e308),
            ("system_voltage_v", |r: &mut SizingRequest| r.system_voltage_v = 0.0),
            ("ambient_temp_c", |r: &mut SizingRequest| r.ambient_temp_c = 150.0),
            ("max_voltage_drop_percent", |r: &mut SizingRequest| r.max_voltage_drop_percent = 0.0),
            ("grouping_circuit_count", |r: &mut SizingRequest| r.grouping_circuit_count = 0),
        ];
        for (field, mutate) in cases {
            let mut request = scenario_request();
            mutate(&mut request);
            match engine.size(&request) {
                Err(SizingError::InvalidInput { field: f, .. }) => assert_eq!(f, field),
                other => panic!("{}: expected InvalidInput, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let request = scenario_request();
        let first = calculate(&request).unwrap();
        let second = calculate(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_final_size_monotone_in_design_current() {
        let mut request = SizingRequest {
            design_current_a: 5.0,
            cable_length_m: 20.0,
            ambient_temp_c: 30.0,
            max_voltage_drop_percent: 5.0,
            system_voltage_v: 400.0,
            grouping_circuit_count: 1,
            construction: multicore(InstallationMethod::C, PhaseCount::Three),
        };
        let mut previous = mm2(1.0);
        while request.design_current_a <= 600.0 {
            let result = calculate(&request).unwrap();
            assert!(
                result.final_size >= previous,
                "{} A gave {} after {}",
                request.design_current_a,
                result.final_size,
                previous
            );
            previous = result.final_size;
            request.design_current_a += 5.0;
        }
    }

    #[test]
    fn test_final_covers_both_candidates() {
        let catalog = ReferenceCatalog::builtin().unwrap();
        let engine = SizingEngine::new(catalog, EngineSettings::default());
        for method in InstallationMethod::ALL {
            for arrangement in CoreArrangement::ALL {
                for length in [10.0, 80.0, 400.0] {
                    let mut request = scenario_request();
                    request.cable_length_m = length;
                    request.construction.installation_method = method;
                    request.construction.arrangement = arrangement;
                    request.construction.configuration = CableConfiguration::Trefoil;
                    // Some combinations have no table; those are errors, not results
                    if let Ok(result) = engine.size(&request) {
                        assert!(result.final_size >= result.ampacity_size);
                        assert!(result.final_size >= result.voltage_drop_size);
                        assert!(result.examined_sizes.windows(2).all(|w| w[0] < w[1]));
                    }
                }
            }
        }
    }

    #[test]
    fn test_builtin_common_circuits() {
        // 32 A radial in twin and earth clipped direct, 25 m at 230 V
        let request = SizingRequest {
            design_current_a: 32.0,
            cable_length_m: 25.0,
            ambient_temp_c: 30.0,
            max_voltage_drop_percent: 5.0,
            system_voltage_v: 230.0,
            grouping_circuit_count: 1,
            construction: multicore(InstallationMethod::C, PhaseCount::Single),
        };
        let result = calculate(&request).unwrap();
        assert_eq!(result.final_size, mm2(4.0));
        assert_eq!(result.status, VoltageDropStatus::Acceptable);
        assert_eq!(result.drop_factor.unwrap().kind, crate::catalog::FactorKind::Resistive);

        // Single-core flat spaced on a ladder falls back to the flat touching column
        let mut feeder = request.clone();
        feeder.design_current_a = 200.0;
        feeder.system_voltage_v = 400.0;
        feeder.construction = ConstructionKey {
            arrangement: CoreArrangement::SingleCore,
            phases: PhaseCount::Three,
            installation_method: InstallationMethod::Ladder,
            configuration: CableConfiguration::FlatSpaced,
            ..feeder.construction
        };
        let result = calculate(&feeder).unwrap();
        assert!(result.capacity_fallback_used);
        assert!(result.capacity_path.ends_with("F.three_loaded_flat_touching"));
        assert_eq!(result.ampacity_size, mm2(70.0));
    }

    #[test]
    fn test_result_serialization() {
        let result = size_with(fixtures::SCENARIO_CATALOG, &scenario_request()).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let roundtrip: SizingResult = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.final_size, result.final_size);
        assert_eq!(roundtrip.status, result.status);
        assert_eq!(roundtrip.ampacity, result.ampacity);
        assert_eq!(roundtrip.capacity_path, result.capacity_path);
        assert!(json.contains("\"status\":\"Acceptable\""));

        let request_json = serde_json::to_string(&scenario_request()).unwrap();
        let request: SizingRequest = serde_json::from_str(&request_json).unwrap();
        assert_eq!(request, scenario_request());
    }

    #[test]
    fn test_report_mentions_key_figures() {
        let result = size_with(fixtures::SCENARIO_CATALOG, &scenario_request()).unwrap();
        let report = result.format_report();
        assert!(report.contains("Final size: 95mm²"));
        assert!(report.contains("Table 4C1"));
        assert!(report.contains(bs7671_ref::IZ));
        assert!(report.contains(bs7671_ref::VD));
        assert!(report.contains("Limit: 4.0%"));
        assert!(report.contains("Voltage drop acceptable"));
    }
}
