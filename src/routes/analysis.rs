//! Analysis endpoints: run the engine over one packet or a batch of packets,
//! or validate a bare payload.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{AnalysisStatus, SensorPacket, SensorPayload, SoilAnalysis};
use crate::validator::validate_with;
use crate::{Config, SoilEngine};

// ---

pub fn router() -> Router<(SoilEngine, Config)> {
    // ---
    Router::new()
        .route("/analysis", post(analyze))
        .route("/analysis/batch", post(analyze_batch))
        .route("/validate", post(validate))
}

/// Body of `POST /analysis`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    packet: SensorPacket,
    #[serde(default)]
    crop_type: Option<String>,
}

/// Body of `POST /analysis/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    packets: Vec<SensorPacket>,
    #[serde(default)]
    crop_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

async fn analyze(
    State((engine, config)): State<(SoilEngine, Config)>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    // ---
    let crop = resolve_crop(request.crop_type.as_deref(), &config);
    info!(
        "POST /analysis - packet {} from sensor {}",
        request.packet.id, request.packet.sensor_id
    );

    let analysis = engine.analyze(&request.packet, crop);

    debug!(
        "POST /analysis - {:?}, score {}",
        analysis.status, analysis.soil_health_score
    );
    (StatusCode::OK, Json(analysis)).into_response()
}

async fn analyze_batch(
    State((engine, config)): State<(SoilEngine, Config)>,
    Json(request): Json<BatchRequest>,
) -> impl IntoResponse {
    // ---
    let count = request.packets.len();
    info!("POST /analysis/batch - {} packets", count);

    if count > config.max_batch as usize {
        warn!(
            "Batch of {} packets exceeds limit of {}",
            count, config.max_batch
        );
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorBody {
                error: format!(
                    "batch of {} packets exceeds limit of {}",
                    count, config.max_batch
                ),
            }),
        )
            .into_response();
    }

    let crop = resolve_crop(request.crop_type.as_deref(), &config);
    let analyses: Vec<SoilAnalysis> = request
        .packets
        .iter()
        .map(|packet| engine.analyze(packet, crop))
        .collect();

    let failed = analyses
        .iter()
        .filter(|a| a.status == AnalysisStatus::Failed)
        .count();
    info!(
        "Batch complete, {} analyses ({} failed validation)",
        analyses.len(),
        failed
    );
    (StatusCode::OK, Json(analyses)).into_response()
}

async fn validate(
    State((engine, _config)): State<(SoilEngine, Config)>,
    Json(payload): Json<SensorPayload>,
) -> impl IntoResponse {
    // ---
    let result = validate_with(engine.constants(), &payload);
    debug!("POST /validate - valid={} flags={:?}", result.is_valid, result.flags);
    (StatusCode::OK, Json(result)).into_response()
}

/// Pick the request's crop type, or the configured default when absent or blank.
fn resolve_crop<'a>(requested: Option<&'a str>, config: &'a Config) -> &'a str {
    // ---
    requested
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(config.default_crop.as_str())
}
