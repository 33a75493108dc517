//! Data models shared by the validator, the scoring engine and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---

/// Physical measurements carried by one reading. Every field is optional;
/// absent fields are skipped by both validation and scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorPayload {
    // ---
    /// Volumetric water content, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumetric_water_content: Option<f64>,

    /// Electrical conductivity, dS/m.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electrical_conductivity: Option<f64>,

    /// Soil temperature, °C.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,

    /// Battery charge as a fraction of full (0.0 - 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacketStatus {
    #[default]
    Pending,
    Valid,
    Invalid,
}

/// One timestamped reading from a field device, as handed over by ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorPacket {
    // ---
    pub id: String,
    pub sensor_id: String,
    pub farm_id: String,
    pub timestamp: DateTime<Utc>,
    pub payload: SensorPayload,
    #[serde(default)]
    pub validation_flags: Vec<String>,
    #[serde(default)]
    pub status: PacketStatus,
}

/// Outcome of checking a payload against the physical range table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub flags: Vec<String>,
    pub status: PacketStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort weight; larger sorts first.
    pub fn rank(self) -> u8 {
        // ---
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// A single suggested remediation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    // ---
    pub action: String,
    pub priority: Priority,
    /// Human-readable reason, always quoting the measured value and its target.
    pub rationale: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Reserved for callers tracking in-flight work; the engine never emits it.
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoistureStatus {
    Deficit,
    #[default]
    Optimal,
    Excess,
}

/// Result of running the engine over one packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilAnalysis {
    // ---
    pub id: Uuid,
    pub packet_id: String,
    pub created_at: DateTime<Utc>,
    pub status: AnalysisStatus,
    pub crop_type: String,
    pub soil_health_score: u8,
    pub moisture_status: MoistureStatus,
    pub recommendations: Vec<Recommendation>,
    pub explanation: String,
}
