//! Configuration loader for the `soilflow` analysis service.
//!
//! All runtime settings are read once at startup from environment variables
//! (the caller may load a `.env` file first). Keeping the lookups here means
//! the rest of the crate never touches `env::var` directly.
//!
use std::env;
use std::net::SocketAddr;

use anyhow::{anyhow, bail, Result};

use crate::constants::{AlgorithmConstants, TIER_A};
use crate::engine::DEFAULT_CROP_TYPE;

/// Parse an optional typed variable from `$lookup`, falling back to `$default`.
macro_rules! parse_var {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string variable from `$lookup`, falling back to `$default`.
macro_rules! string_var {
    ($lookup:expr, $var_name:expr, $default:expr) => {
        $lookup($var_name)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| $default.to_string())
    };
}

/// Strongly typed service configuration.
///
/// Immutable after loading, so every request sees the same snapshot.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,

    /// Crop type used when a request does not name one.
    pub default_crop: String,

    /// Lower edge of the soil temperature stress band, °C.
    pub temp_stress_min_c: f64,

    /// Upper edge of the soil temperature stress band, °C.
    pub temp_stress_max_c: f64,

    /// Maximum number of packets accepted by one batch request.
    pub max_batch: u32,
}

/// Load configuration from the process environment.
///
/// Optional:
/// - `BIND_ADDR` – listen address (default: `0.0.0.0:8080`)
/// - `DEFAULT_CROP_TYPE` – crop used when none is given (default: `Corn`)
/// - `TEMP_STRESS_MIN_C` / `TEMP_STRESS_MAX_C` – stress band (default: 5 / 40)
/// - `ANALYSIS_MAX_BATCH` – batch size limit (default: 500)
///
/// Returns an error if a variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    load_with(|name| env::var(name).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let bind_addr = parse_var!(lookup, "BIND_ADDR", SocketAddr, ([0, 0, 0, 0], 8080).into());
    let default_crop = string_var!(lookup, "DEFAULT_CROP_TYPE", DEFAULT_CROP_TYPE);
    let temp_stress_min_c = parse_var!(
        lookup,
        "TEMP_STRESS_MIN_C",
        f64,
        TIER_A.temperature_stress.min
    );
    let temp_stress_max_c = parse_var!(
        lookup,
        "TEMP_STRESS_MAX_C",
        f64,
        TIER_A.temperature_stress.max
    );
    let max_batch = parse_var!(lookup, "ANALYSIS_MAX_BATCH", u32, 500);

    if !temp_stress_min_c.is_finite() || !temp_stress_max_c.is_finite() {
        bail!("TEMP_STRESS_MIN_C and TEMP_STRESS_MAX_C must be finite numbers");
    }
    if temp_stress_min_c >= temp_stress_max_c {
        bail!(
            "TEMP_STRESS_MIN_C ({}) must be below TEMP_STRESS_MAX_C ({})",
            temp_stress_min_c,
            temp_stress_max_c
        );
    }
    if max_batch == 0 {
        bail!("ANALYSIS_MAX_BATCH must be at least 1");
    }

    Ok(Config {
        bind_addr,
        default_crop,
        temp_stress_min_c,
        temp_stress_max_c,
        max_batch,
    })
}

impl Config {
    /// Engine constants with this configuration's overrides applied.
    pub fn algorithm_constants(&self) -> AlgorithmConstants {
        TIER_A.with_temperature_stress(self.temp_stress_min_c, self.temp_stress_max_c)
    }

    /// Log the loaded configuration.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  BIND_ADDR          : {}", self.bind_addr);
        tracing::info!("  DEFAULT_CROP_TYPE  : {}", self.default_crop);
        tracing::info!(
            "  TEMP_STRESS_C      : {} .. {}",
            self.temp_stress_min_c,
            self.temp_stress_max_c
        );
        tracing::info!("  ANALYSIS_MAX_BATCH : {}", self.max_batch);
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        // ---
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_with(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        // ---
        let cfg = load(&[]).unwrap();

        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.default_crop, "Corn");
        assert_eq!(cfg.temp_stress_min_c, 5.0);
        assert_eq!(cfg.temp_stress_max_c, 40.0);
        assert_eq!(cfg.max_batch, 500);
        assert_eq!(cfg.algorithm_constants(), TIER_A);
    }

    #[test]
    fn test_overrides() {
        // ---
        let cfg = load(&[
            ("BIND_ADDR", "127.0.0.1:9090"),
            ("DEFAULT_CROP_TYPE", "Wheat"),
            ("TEMP_STRESS_MIN_C", "2.5"),
            ("TEMP_STRESS_MAX_C", " 35 "),
            ("ANALYSIS_MAX_BATCH", "20"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr.port(), 9090);
        assert_eq!(cfg.default_crop, "Wheat");
        assert_eq!(cfg.max_batch, 20);
        let constants = cfg.algorithm_constants();
        assert_eq!(constants.temperature_stress.min, 2.5);
        assert_eq!(constants.temperature_stress.max, 35.0);
    }

    #[test]
    fn test_blank_crop_uses_default() {
        // ---
        let cfg = load(&[("DEFAULT_CROP_TYPE", "  ")]).unwrap();
        assert_eq!(cfg.default_crop, "Corn");
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        // ---
        let err = load(&[("ANALYSIS_MAX_BATCH", "lots")]).unwrap_err();
        assert!(err.to_string().contains("ANALYSIS_MAX_BATCH"));
    }

    #[test]
    fn test_inverted_stress_band_is_rejected() {
        // ---
        let err = load(&[("TEMP_STRESS_MIN_C", "30"), ("TEMP_STRESS_MAX_C", "10")]).unwrap_err();
        assert!(err.to_string().contains("must be below"));
    }

    #[test]
    fn test_zero_batch_is_rejected() {
        // ---
        assert!(load(&[("ANALYSIS_MAX_BATCH", "0")]).is_err());
    }

    #[test]
    fn test_bad_bind_addr_is_rejected() {
        // ---
        let err = load(&[("BIND_ADDR", "not-an-address")]).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }
}
