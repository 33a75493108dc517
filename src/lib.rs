//! `soilflow`: validation and Tier A scoring for agronomic soil sensor packets.
//!
//! The engine is a pure function over one [`SensorPacket`]: it checks the
//! payload against physical ranges, then derives a 0-100 soil health score
//! and a priority-ordered list of remediation steps with dosages. The
//! `routes` gateway exposes it over HTTP for the `soilflow` binary.
//!
//! Module layout follows the Explicit Module Boundary Pattern (EMBP):
//! - `models` – packet, payload and analysis types
//! - `constants` – ranges, thresholds and dosage factors
//! - `validator` – hard range checks and soft warnings
//! - `engine` – per-dimension evaluators and aggregation
//! - `ids` – analysis identifiers
//! - `config` / `routes` – service configuration and HTTP surface

pub mod config;
pub mod constants;
pub mod engine;
pub mod ids;
pub mod models;
pub mod routes;
pub mod validator;

pub use config::Config;
pub use constants::{AlgorithmConstants, TIER_A};
pub use engine::{generate_analysis, SoilEngine, DEFAULT_CROP_TYPE};
pub use models::{
    AnalysisStatus, MoistureStatus, PacketStatus, Priority, Recommendation, SensorPacket,
    SensorPayload, SoilAnalysis, ValidationResult,
};
pub use validator::{validate_packet, validate_with};
