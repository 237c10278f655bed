//! Small catalogs for unit tests.

macro_rules! with_header {
    ($body:literal) => {
        concat!(
            r#"sizes = [1.0, 1.5, 2.5, 4.0, 6.0, 10.0, 16.0, 25.0, 35.0, 50.0, 70.0, 95.0, 120.0, 150.0, 185.0, 240.0, 300.0, 400.0, 500.0, 630.0]

[meta]
name = "Test tables"
version = "test-1"
published = "2022-03-28"
"#,
            $body
        )
    };
}

/// Header only, no tables
pub const HEADER: &str = with_header!("");

/// Multicore PVC in conduit on a wall, three-phase
pub const SCENARIO_CATALOG: &str = with_header!(
    r#"
[capacity.thermoplastic_70.unarmoured.multicore.B2]
three_loaded = { "70" = 119.0, "95" = 149.0 }

[voltage_drop.thermoplastic_70.unarmoured.multicore.ac_three_phase]
any = { "70" = { r = 0.55, x = 0.14, z = 0.57 }, "95" = { r = 0.39, x = 0.125, z = 0.41 } }
"#
);

/// Same capacity data with no voltage-drop tables at all
pub const NO_DROP_CATALOG: &str = with_header!(
    r#"
[capacity.thermoplastic_70.unarmoured.multicore.B2]
three_loaded = { "70" = 119.0, "95" = 149.0 }
"#
);

/// Largest size carries 630 A
pub const EXHAUSTED_CATALOG: &str = with_header!(
    r#"
[capacity.thermoplastic_70.unarmoured.multicore.C]
three_loaded = { "400" = 525.0, "500" = 580.0, "630" = 630.0 }

[voltage_drop.thermoplastic_70.unarmoured.multicore.ac_three_phase]
any = { "400" = { r = 0.10, x = 0.135, z = 0.17 }, "500" = { r = 0.085, x = 0.135, z = 0.16 }, "630" = { r = 0.068, x = 0.13, z = 0.15 } }
"#
);

/// Columns and layouts reachable only through fallbacks
pub const FALLBACK_CATALOG: &str = with_header!(
    r#"
[capacity.thermoplastic_70.unarmoured.single_core.F]
three_loaded_flat_touching = { "95" = 300.0 }
three_loaded = { "95" = 280.0 }

[voltage_drop.thermoplastic_70.unarmoured.single_core.ac_three_phase]
enclosed = { "95" = { r = 0.38, x = 0.15, z = 0.41 } }
"#
);

/// Multicore PVC clipped direct. The single-phase drop table has no 50mm² row.
pub const ESCALATION_CATALOG: &str = with_header!(
    r#"
[capacity.thermoplastic_70.unarmoured.multicore.C]
three_loaded = { "25" = 101.0, "35" = 125.0, "50" = 151.0, "70" = 192.0, "95" = 232.0 }
two_loaded = { "25" = 108.0, "35" = 135.0, "50" = 164.0, "70" = 211.0, "95" = 257.0 }

[voltage_drop.thermoplastic_70.unarmoured.multicore.ac_three_phase]
any = { "25" = { r = 1.50, x = 0.145, z = 1.50 }, "35" = { r = 1.10, x = 0.145, z = 1.10 }, "50" = { r = 0.80, x = 0.14, z = 0.81 }, "70" = { r = 0.55, x = 0.14, z = 0.57 }, "95" = { r = 0.40, x = 0.135, z = 0.42 } }

[voltage_drop.thermoplastic_70.unarmoured.multicore.ac_single_phase]
any = { "25" = { r = 1.75, x = 0.17, z = 1.75 }, "35" = { r = 1.25, x = 0.165, z = 1.25 }, "70" = { r = 0.63, x = 0.165, z = 0.65 }, "95" = { r = 0.46, x = 0.155, z = 0.48 } }
"#
);
