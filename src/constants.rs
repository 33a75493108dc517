//! Fixed ranges, thresholds and dosage factors used by the Tier A heuristics.
//!
//! The values are grouped into one immutable [`AlgorithmConstants`] snapshot
//! that is built once at startup and handed to the engine. Only the
//! temperature stress band is overridable from configuration.

// ---

/// Inclusive physical bounds for a single measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `true` when `value` lies within `[min, max]`. NaN is never in range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Physical plausibility limits; anything outside is a hardware or transport fault.
///
/// `battery` is range-checked too, against its 0.0-1.0 fraction unit, on top
/// of the four soil measurements. A charge outside that span is a reporting
/// fault and yields `battery_out_of_range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranges {
    pub volumetric_water_content: FieldRange,
    pub electrical_conductivity: FieldRange,
    pub temperature: FieldRange,
    pub ph: FieldRange,
    pub battery: FieldRange,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoistureThresholds {
    pub deficit: f64,
    pub target: f64,
    pub excess: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhThresholds {
    pub acidic: f64,
    pub target: f64,
    pub alkaline: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryThresholds {
    pub low: f64,
    pub critical: f64,
}

/// Remediation quantity per unit of deviation from target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DosageFactors {
    /// mm of water per % moisture below target.
    pub water_per_percent_deficit: f64,
    /// tons/ha of lime per pH unit below target.
    pub lime_per_ph_unit: f64,
    /// tons/ha of sulfur per pH unit above target.
    pub sulfur_per_ph_unit: f64,
}

/// Score penalty applied for each abnormal dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penalties {
    pub moisture_deficit: i32,
    pub moisture_excess: i32,
    pub salinity: i32,
    pub ph: i32,
    pub temperature_stress: i32,
    pub low_battery: i32,
}

/// Complete, immutable parameter set for the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlgorithmConstants {
    pub ranges: Ranges,
    pub moisture: MoistureThresholds,
    /// Electrical conductivity above which salinity harms the crop, dS/m.
    pub ec_risk: f64,
    pub ph: PhThresholds,
    pub battery: BatteryThresholds,
    /// Soil temperature band outside of which the crop is stressed, °C.
    pub temperature_stress: FieldRange,
    pub dosage: DosageFactors,
    pub penalties: Penalties,
}

pub const TIER_A: AlgorithmConstants = AlgorithmConstants {
    ranges: Ranges {
        volumetric_water_content: FieldRange::new(0.0, 60.0),
        electrical_conductivity: FieldRange::new(0.0, 10.0),
        temperature: FieldRange::new(-10.0, 60.0),
        ph: FieldRange::new(3.5, 9.5),
        battery: FieldRange::new(0.0, 1.0),
    },
    moisture: MoistureThresholds {
        deficit: 25.0,
        target: 35.0,
        excess: 45.0,
    },
    ec_risk: 4.0,
    ph: PhThresholds {
        acidic: 5.5,
        target: 6.5,
        alkaline: 7.5,
    },
    battery: BatteryThresholds {
        low: 0.20,
        critical: 0.10,
    },
    temperature_stress: FieldRange::new(5.0, 40.0),
    dosage: DosageFactors {
        water_per_percent_deficit: 4.0,
        lime_per_ph_unit: 1.2,
        sulfur_per_ph_unit: 0.8,
    },
    penalties: Penalties {
        moisture_deficit: 20,
        moisture_excess: 10,
        salinity: 30,
        ph: 15,
        temperature_stress: 10,
        low_battery: 5,
    },
};

impl Default for AlgorithmConstants {
    fn default() -> Self {
        TIER_A
    }
}

impl AlgorithmConstants {
    /// Copy of these constants with a different temperature stress band.
    pub fn with_temperature_stress(mut self, min_c: f64, max_c: f64) -> Self {
        // ---
        self.temperature_stress = FieldRange::new(min_c, max_c);
        self
    }
}
