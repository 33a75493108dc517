//! Range validation for incoming sensor payloads.
//!
//! Hard violations are reported as `<field>_out_of_range` and make the packet
//! invalid. Soft warnings (currently only `critical_battery`) are recorded
//! alongside them but never affect validity.

use crate::constants::{AlgorithmConstants, FieldRange, TIER_A};
use crate::models::{PacketStatus, SensorPayload, ValidationResult};

// ---

pub const OUT_OF_RANGE_SUFFIX: &str = "_out_of_range";
pub const CRITICAL_BATTERY_FLAG: &str = "critical_battery";

/// Validate a payload against the default Tier A range table.
pub fn validate_packet(payload: &SensorPayload) -> ValidationResult {
    // ---
    validate_with(&TIER_A, payload)
}

/// Validate a payload against an explicit set of constants.
pub fn validate_with(constants: &AlgorithmConstants, payload: &SensorPayload) -> ValidationResult {
    // ---
    let ranges = &constants.ranges;
    let checks: [(&str, Option<f64>, FieldRange); 5] = [
        (
            "volumetric_water_content",
            payload.volumetric_water_content,
            ranges.volumetric_water_content,
        ),
        (
            "electrical_conductivity",
            payload.electrical_conductivity,
            ranges.electrical_conductivity,
        ),
        ("temperature", payload.temperature, ranges.temperature),
        ("ph", payload.ph, ranges.ph),
        ("battery", payload.battery, ranges.battery),
    ];

    let mut flags: Vec<String> = checks
        .iter()
        .filter_map(|(field, value, range)| match value {
            Some(v) if !range.contains(*v) => Some(format!("{field}{OUT_OF_RANGE_SUFFIX}")),
            _ => None,
        })
        .collect();

    if payload
        .battery
        .is_some_and(|level| level < constants.battery.critical)
    {
        flags.push(CRITICAL_BATTERY_FLAG.to_string());
    }

    let is_valid = !flags.iter().any(|f| is_hard_violation(f));
    let status = if is_valid {
        PacketStatus::Valid
    } else {
        PacketStatus::Invalid
    };

    ValidationResult {
        is_valid,
        flags,
        status,
    }
}

/// `true` for flags that invalidate a packet.
pub fn is_hard_violation(flag: &str) -> bool {
    flag.ends_with(OUT_OF_RANGE_SUFFIX)
}
