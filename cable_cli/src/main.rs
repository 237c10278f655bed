//! # Wirewise CLI Application
//!
//! Prompt-driven front end for the conductor sizing engine. Press Enter at
//! any prompt to accept the default shown in brackets.
//!
//! Engine settings are read from the TOML file named by `WIREWISE_SETTINGS`
//! when it is set; otherwise defaults apply.

mod logging;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use cable_core::construction::{
    ArmourClass, CableConfiguration, ConstructionKey, CoreArrangement, InstallationMethod, InsulationClass,
    PhaseCount, SystemType,
};
use cable_core::derating::DeratingSummary;
use cable_core::{CalcResult, EngineSettings, ReferenceCatalog, SizingEngine, SizingRequest};
use tracing::{error, info};

const SETTINGS_ENV: &str = "WIREWISE_SETTINGS";

fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    read_line(prompt)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn prompt_u32(prompt: &str, default: u32) -> u32 {
    read_line(prompt)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Prompt for a categorical choice, falling back to the default on empty or
/// unrecognised input.
fn prompt_choice<T: Copy + std::fmt::Display>(
    prompt: &str,
    default: T,
    parse: fn(&str) -> CalcResult<T>,
) -> T {
    match read_line(&format!("{} [{}]: ", prompt, default)) {
        Some(text) => parse(&text).unwrap_or_else(|e| {
            println!("  {} - using {}", e, default);
            default
        }),
        None => default,
    }
}

fn load_settings() -> CalcResult<EngineSettings> {
    match std::env::var(SETTINGS_ENV) {
        Ok(path) => {
            info!(path = %path, "loading engine settings");
            EngineSettings::load(Path::new(&path))
        }
        Err(_) => Ok(EngineSettings::default()),
    }
}

fn prompt_construction() -> ConstructionKey {
    let defaults = ConstructionKey::default();
    ConstructionKey {
        insulation: prompt_choice("Insulation (PVC/XLPE)", defaults.insulation, InsulationClass::from_str_flexible),
        armour: prompt_choice("Armour", defaults.armour, ArmourClass::from_str_flexible),
        arrangement: prompt_choice("Cores (single/multi)", defaults.arrangement, CoreArrangement::from_str_flexible),
        phases: prompt_choice("Phases (1/3)", defaults.phases, PhaseCount::from_str_flexible),
        installation_method: prompt_choice(
            "Installation method (A1..G, trunking, tray, ladder)",
            defaults.installation_method,
            InstallationMethod::from_str_flexible,
        ),
        configuration: prompt_choice(
            "Formation (standard/trefoil/flat/spaced)",
            defaults.configuration,
            CableConfiguration::from_str_flexible,
        ),
        system: prompt_choice("System (AC/DC)", defaults.system, SystemType::from_str_flexible),
    }
}

fn run() -> CalcResult<()> {
    let settings = load_settings()?;
    let catalog = ReferenceCatalog::builtin()?;

    println!("Wirewise CLI - Conductor Sizing");
    println!("================================================");
    println!(
        "Tables: {} (v{}, published {})",
        catalog.info().name,
        catalog.info().version,
        catalog.info().published
    );
    println!(
        "Sizes: {} to {} ({} standard sizes)",
        catalog.sizes().smallest(),
        catalog.sizes().largest(),
        catalog.sizes().len()
    );
    println!();

    let design_current_a = prompt_f64("Design current Ib (A) [32.0]: ", 32.0);
    let cable_length_m = prompt_f64("Cable length (m) [25.0]: ", 25.0);
    let system_voltage_v = prompt_f64("System voltage (V) [230.0]: ", 230.0);
    let max_voltage_drop_percent = prompt_f64(
        &format!(
            "Max voltage drop (%) [{:.1}]: ",
            settings.default_max_voltage_drop_percent
        ),
        settings.default_max_voltage_drop_percent,
    );
    let ambient_temp_c = prompt_f64("Ambient temperature (°C) [30.0]: ", 30.0);
    let grouping_circuit_count = prompt_u32("Circuits grouped together [1]: ", 1);
    println!();
    let construction = prompt_construction();

    let request = SizingRequest {
        design_current_a,
        cable_length_m,
        ambient_temp_c,
        max_voltage_drop_percent,
        system_voltage_v,
        grouping_circuit_count,
        construction,
    };

    let engine = SizingEngine::new(catalog, settings);
    let result = engine.size(&request)?;

    println!();
    println!("═══════════════════════════════════════");
    println!("  CONDUCTOR SIZING RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Construction: {}", request.construction);
    println!();
    let derating = DeratingSummary::new(
        request.construction.insulation,
        request.ambient_temp_c,
        request.construction.installation_method,
        request.grouping_circuit_count,
    );
    println!("{}", derating.format_report());
    println!();
    println!("{}", result.format_report());
    println!();
    println!("Overall: {}", if result.is_satisfactory() { "✓ PASS" } else { "✗ CHECK" });

    println!();
    println!("JSON Output:");
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("  (could not serialize result: {})", e),
    }
    Ok(())
}

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), "sizing failed");
            eprintln!("Error [{}]: {}", e.error_code(), e);
            ExitCode::FAILURE
        }
    }
}
