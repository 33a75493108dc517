use std::net::SocketAddr;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use soilflow::{config, routes, SoilEngine};

#[derive(Debug, Deserialize)]
struct Recommendation {
    action: String,
    priority: String,
    rationale: String,
    dosage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SoilAnalysis {
    id: String,
    packet_id: String,
    status: String,
    crop_type: String,
    soil_health_score: u8,
    moisture_status: String,
    recommendations: Vec<Recommendation>,
    explanation: String,
}

/// Serve the router on an ephemeral local port and return its base URL.
async fn spawn_app(vars: &'static [(&'static str, &'static str)]) -> Result<String> {
    // ---
    let cfg = config::load_with(|name| {
        vars.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
    })?;
    let app = routes::router(SoilEngine::new(cfg.algorithm_constants()), cfg);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://{}", addr))
}

fn packet_json(id: &str, payload: Value) -> Value {
    // ---
    json!({
        "id": id,
        "sensor_id": "probe-12",
        "farm_id": "farm-west",
        "timestamp": "2025-04-18T05:00:00Z",
        "payload": payload
    })
}

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    // ---
    let base = spawn_app(&[]).await?;
    let body: Value = Client::new()
        .get(format!("{}/health", base))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["engine"], "tier_a");
    Ok(())
}

#[tokio::test]
async fn analysis_endpoint_scores_packet() -> Result<()> {
    // ---
    let base = spawn_app(&[]).await?;
    let request = json!({
        "packet": packet_json("pkt-100", json!({ "volumetric_water_content": 10.0, "ph": 4.5 })),
        "crop_type": "Sorghum"
    });

    let resp = Client::new()
        .post(format!("{}/analysis", base))
        .json(&request)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let analysis: SoilAnalysis = resp.json().await?;

    assert!(!analysis.id.is_empty());
    assert_eq!(analysis.packet_id, "pkt-100");
    assert_eq!(analysis.status, "completed");
    assert_eq!(analysis.crop_type, "Sorghum");
    assert_eq!(analysis.soil_health_score, 65);
    assert_eq!(analysis.moisture_status, "deficit");
    assert_eq!(analysis.recommendations.len(), 2);

    let first = &analysis.recommendations[0];
    assert_eq!(first.action, "Initiate Irrigation");
    assert_eq!(first.priority, "high");
    assert_eq!(first.dosage.as_deref(), Some("100 mm"));

    let second = &analysis.recommendations[1];
    assert_eq!(second.action, "Apply Lime");
    assert_eq!(second.dosage.as_deref(), Some("2.4 tons/ha"));
    assert!(second.rationale.contains("pH 4.5 "));

    assert_eq!(
        analysis.explanation,
        "2 actionable items identified using Tier A heuristics."
    );
    Ok(())
}

#[tokio::test]
async fn invalid_packet_returns_failed_analysis() -> Result<()> {
    // ---
    let base = spawn_app(&[]).await?;
    let request = json!({ "packet": packet_json("pkt-bad", json!({ "ph": 15.0 })) });

    let resp = Client::new()
        .post(format!("{}/analysis", base))
        .json(&request)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let analysis: SoilAnalysis = resp.json().await?;

    assert_eq!(analysis.status, "failed");
    assert_eq!(analysis.soil_health_score, 0);
    assert!(analysis.recommendations.is_empty());
    assert!(analysis.explanation.contains("ph_out_of_range"));
    assert_eq!(analysis.crop_type, "Corn");
    Ok(())
}

#[tokio::test]
async fn configured_default_crop_and_stress_band_apply() -> Result<()> {
    // ---
    let base = spawn_app(&[
        ("DEFAULT_CROP_TYPE", "Rice"),
        ("TEMP_STRESS_MIN_C", "15"),
        ("TEMP_STRESS_MAX_C", "35"),
    ])
    .await?;
    let request = json!({ "packet": packet_json("pkt-cool", json!({ "temperature": 10.0 })) });

    let analysis: SoilAnalysis = Client::new()
        .post(format!("{}/analysis", base))
        .json(&request)
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(analysis.crop_type, "Rice");
    assert_eq!(analysis.soil_health_score, 90);
    assert_eq!(analysis.recommendations[0].action, "Adjust Microclimate");
    assert!(analysis.recommendations[0].rationale.contains("15-35°C"));
    Ok(())
}

#[tokio::test]
async fn batch_preserves_input_order() -> Result<()> {
    // ---
    let base = spawn_app(&[]).await?;
    let request = json!({
        "packets": [
            packet_json("pkt-a", json!({ "volumetric_water_content": 35.0, "ph": 6.5 })),
            packet_json("pkt-b", json!({ "electrical_conductivity": 11.0 })),
            packet_json("pkt-c", json!({ "volumetric_water_content": 50.0 }))
        ]
    });

    let analyses: Vec<SoilAnalysis> = Client::new()
        .post(format!("{}/analysis/batch", base))
        .json(&request)
        .send()
        .await?
        .json()
        .await?;

    let ids: Vec<&str> = analyses.iter().map(|a| a.packet_id.as_str()).collect();
    assert_eq!(ids, vec!["pkt-a", "pkt-b", "pkt-c"]);
    assert_eq!(analyses[0].soil_health_score, 100);
    assert_eq!(analyses[1].status, "failed");
    assert_eq!(analyses[2].moisture_status, "excess");
    assert_eq!(analyses[2].recommendations[0].action, "Pause Irrigation");
    Ok(())
}

#[tokio::test]
async fn oversized_batch_is_rejected() -> Result<()> {
    // ---
    let base = spawn_app(&[("ANALYSIS_MAX_BATCH", "2")]).await?;
    let packets: Vec<Value> = (0..3)
        .map(|i| packet_json(&format!("pkt-{i}"), json!({ "ph": 6.8 })))
        .collect();

    let resp = Client::new()
        .post(format!("{}/analysis/batch", base))
        .json(&json!({ "packets": packets }))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = resp.json().await?;
    assert!(body["error"].as_str().unwrap_or_default().contains("limit of 2"));
    Ok(())
}

#[tokio::test]
async fn validate_endpoint_reports_flags() -> Result<()> {
    // ---
    let base = spawn_app(&[]).await?;
    let body: Value = Client::new()
        .post(format!("{}/validate", base))
        .json(&json!({ "temperature": 75.0, "battery": 0.04 }))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["is_valid"], false);
    assert_eq!(body["status"], "invalid");
    assert_eq!(
        body["flags"],
        json!(["temperature_out_of_range", "critical_battery"])
    );
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_client_error() -> Result<()> {
    // ---
    let base = spawn_app(&[]).await?;
    let resp = Client::new()
        .post(format!("{}/analysis", base))
        .header("content-type", "application/json")
        .body("{\"packet\": 42}")
        .send()
        .await?;

    assert!(resp.status().is_client_error());
    Ok(())
}
