//! Tier A scoring and recommendation engine.
//!
//! Each measured dimension is evaluated on its own and contributes a score
//! penalty plus at most one recommendation. The findings are then summed into
//! a 0-100 health score and ranked by priority. The engine holds no mutable
//! state; one [`SoilEngine`] can serve any number of concurrent callers.

use chrono::Utc;
use tracing::{debug, warn};

use crate::constants::AlgorithmConstants;
use crate::ids::new_analysis_id;
use crate::models::{
    AnalysisStatus, MoistureStatus, Priority, Recommendation, SensorPacket, SensorPayload,
    SoilAnalysis,
};
use crate::validator::validate_with;

// ---

pub const DEFAULT_CROP_TYPE: &str = "Corn";
pub const OPTIMAL_EXPLANATION: &str = "Soil conditions and sensor health are optimal.";

const BASELINE_SCORE: i32 = 100;

/// Analyze a packet with the default Tier A constants.
///
/// `crop_type` falls back to [`DEFAULT_CROP_TYPE`] when `None`.
pub fn generate_analysis(packet: &SensorPacket, crop_type: Option<&str>) -> SoilAnalysis {
    // ---
    SoilEngine::default().analyze(packet, crop_type.unwrap_or(DEFAULT_CROP_TYPE))
}

/// Scoring engine bound to one immutable set of constants.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoilEngine {
    constants: AlgorithmConstants,
}

/// Penalty and recommendation produced by one evaluator.
#[derive(Debug)]
struct Finding {
    penalty: i32,
    recommendation: Recommendation,
}

impl SoilEngine {
    // ---
    pub fn new(constants: AlgorithmConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &AlgorithmConstants {
        &self.constants
    }

    /// Produce a fresh analysis for `packet`. The packet is only read.
    ///
    /// Hard validation failures yield a `failed` analysis with score 0 and no
    /// recommendations; nothing is evaluated on such data.
    pub fn analyze(&self, packet: &SensorPacket, crop_type: &str) -> SoilAnalysis {
        // ---
        let validation = validate_with(&self.constants, &packet.payload);
        if !validation.is_valid {
            warn!(
                packet_id = %packet.id,
                sensor_id = %packet.sensor_id,
                flags = ?validation.flags,
                "Packet rejected by range validation"
            );
            return SoilAnalysis {
                id: new_analysis_id(),
                packet_id: packet.id.clone(),
                created_at: Utc::now(),
                status: AnalysisStatus::Failed,
                crop_type: crop_type.to_string(),
                soil_health_score: 0,
                moisture_status: MoistureStatus::Optimal,
                recommendations: Vec::new(),
                explanation: format!(
                    "Packet failed validation: {}.",
                    validation.flags.join(", ")
                ),
            };
        }

        let payload = &packet.payload;
        let (moisture_status, moisture_finding) = self.evaluate_moisture(payload);

        let findings: Vec<Finding> = [
            moisture_finding,
            self.evaluate_salinity(payload),
            self.evaluate_ph(payload),
            self.evaluate_temperature(payload),
            self.evaluate_battery(payload),
        ]
        .into_iter()
        .flatten()
        .collect();

        let total_penalty: i32 = findings.iter().map(|f| f.penalty).sum();
        let soil_health_score = (BASELINE_SCORE - total_penalty).clamp(0, 100) as u8;

        let mut recommendations: Vec<Recommendation> =
            findings.into_iter().map(|f| f.recommendation).collect();
        // sort_by is stable, so equal priorities keep evaluation order
        recommendations.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));

        let explanation = explain(&recommendations);

        debug!(
            packet_id = %packet.id,
            crop_type,
            soil_health_score,
            recommendations = recommendations.len(),
            "Analysis completed"
        );

        SoilAnalysis {
            id: new_analysis_id(),
            packet_id: packet.id.clone(),
            created_at: Utc::now(),
            status: AnalysisStatus::Completed,
            crop_type: crop_type.to_string(),
            soil_health_score,
            moisture_status,
            recommendations,
            explanation,
        }
    }

    fn evaluate_moisture(&self, payload: &SensorPayload) -> (MoistureStatus, Option<Finding>) {
        // ---
        let Some(vwc) = payload.volumetric_water_content else {
            return (MoistureStatus::Optimal, None);
        };
        let m = &self.constants.moisture;

        if vwc < m.deficit {
            let water_mm =
                ((m.target - vwc) * self.constants.dosage.water_per_percent_deficit).ceil();
            let finding = Finding {
                penalty: self.constants.penalties.moisture_deficit,
                recommendation: Recommendation {
                    action: "Initiate Irrigation".to_string(),
                    priority: Priority::High,
                    rationale: format!(
                        "Moisture at {}% is below the {}% deficit threshold (target {}%).",
                        vwc, m.deficit, m.target
                    ),
                    confidence: 0.9,
                    dosage: Some(format!("{} mm", water_mm as i64)),
                },
            };
            (MoistureStatus::Deficit, Some(finding))
        } else if vwc > m.excess {
            let finding = Finding {
                penalty: self.constants.penalties.moisture_excess,
                recommendation: Recommendation {
                    action: "Pause Irrigation".to_string(),
                    priority: Priority::Medium,
                    rationale: format!(
                        "Moisture at {}% exceeds the {}% excess threshold (target {}%).",
                        vwc, m.excess, m.target
                    ),
                    confidence: 0.8,
                    dosage: Some("Skip next scheduled cycle".to_string()),
                },
            };
            (MoistureStatus::Excess, Some(finding))
        } else {
            (MoistureStatus::Optimal, None)
        }
    }

    fn evaluate_salinity(&self, payload: &SensorPayload) -> Option<Finding> {
        // ---
        let ec = payload.electrical_conductivity?;
        let risk = self.constants.ec_risk;
        if ec <= risk {
            return None;
        }

        Some(Finding {
            penalty: self.constants.penalties.salinity,
            recommendation: Recommendation {
                action: "Flush Soil".to_string(),
                priority: Priority::High,
                rationale: format!(
                    "EC at {} dS/m exceeds the {:.1} dS/m salinity risk threshold.",
                    ec, risk
                ),
                confidence: 0.85,
                dosage: Some("Apply leaching fraction (+15% water)".to_string()),
            },
        })
    }

    fn evaluate_ph(&self, payload: &SensorPayload) -> Option<Finding> {
        // ---
        let ph = payload.ph?;
        let t = &self.constants.ph;
        let dosage = &self.constants.dosage;

        let recommendation = if ph < t.acidic {
            let lime = (t.target - ph) * dosage.lime_per_ph_unit;
            Recommendation {
                action: "Apply Lime".to_string(),
                priority: Priority::Medium,
                rationale: format!(
                    "pH {} is below the acidic threshold {} (target {}).",
                    ph, t.acidic, t.target
                ),
                confidence: 0.8,
                dosage: Some(format!("{lime:.1} tons/ha")),
            }
        } else if ph > t.alkaline {
            let sulfur = (ph - t.target) * dosage.sulfur_per_ph_unit;
            Recommendation {
                action: "Apply Sulfur".to_string(),
                priority: Priority::Medium,
                rationale: format!(
                    "pH {} is above the alkaline threshold {} (target {}).",
                    ph, t.alkaline, t.target
                ),
                confidence: 0.8,
                dosage: Some(format!("{sulfur:.1} tons/ha")),
            }
        } else {
            return None;
        };

        Some(Finding {
            penalty: self.constants.penalties.ph,
            recommendation,
        })
    }

    fn evaluate_temperature(&self, payload: &SensorPayload) -> Option<Finding> {
        // ---
        let temp = payload.temperature?;
        let band = self.constants.temperature_stress;
        if band.contains(temp) {
            return None;
        }

        let advice = if temp < band.min {
            "Consider mulching or row covers to retain soil heat"
        } else {
            "Consider shade cloth or mulching to cool the root zone"
        };

        Some(Finding {
            penalty: self.constants.penalties.temperature_stress,
            recommendation: Recommendation {
                action: "Adjust Microclimate".to_string(),
                priority: Priority::Medium,
                rationale: format!(
                    "Soil temperature {}°C is outside the {}-{}°C stress band.",
                    temp, band.min, band.max
                ),
                confidence: 0.7,
                dosage: Some(advice.to_string()),
            },
        })
    }

    fn evaluate_battery(&self, payload: &SensorPayload) -> Option<Finding> {
        // ---
        let level = payload.battery?;
        let b = &self.constants.battery;
        if level >= b.low {
            return None;
        }

        let percent = (level * 100.0).round() as i64;
        let low_percent = (b.low * 100.0).round() as i64;
        let rationale = if level < b.critical {
            format!(
                "Battery at {percent}% is below the {}% critical threshold; replace before next reading.",
                (b.critical * 100.0).round() as i64
            )
        } else {
            format!("Battery at {percent}% is below the {low_percent}% low threshold.")
        };

        Some(Finding {
            penalty: self.constants.penalties.low_battery,
            recommendation: Recommendation {
                action: "Sensor Maintenance".to_string(),
                priority: Priority::Low,
                rationale,
                confidence: 0.95,
                dosage: None,
            },
        })
    }
}

fn explain(recommendations: &[Recommendation]) -> String {
    // ---
    match recommendations.len() {
        0 => OPTIMAL_EXPLANATION.to_string(),
        1 => "1 actionable item identified using Tier A heuristics.".to_string(),
        n => format!("{n} actionable items identified using Tier A heuristics."),
    }
}
