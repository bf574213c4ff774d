//! Integration tests for the REST endpoints

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

use sim_telemetry::api::{create_router, AppState};
use sim_telemetry::{PipelineConfig, RawBatch};

const START_TAIL: &str = "16;1;Default;200;2;MCS1_0;0.3;2;1000;256;102400;run;3.76;8;false;200;60;udp;0;536;65535;1;1000;20;5;128;32;300;1024;64;0.01;0.1;32;1;0";

fn stats_line(ns: u64, id: usize, transmit_time: f64) -> String {
    format!(
        "{};nodestats;{};{};2.5;100;50;7;1;9;0;20;18;2;1.25;64.5;3;17;4.5;10;1;0;0;2;3;;;200;4;5;0.75;6;1;1;32768;12.5;40;0;11;2;3.5;1.5;1.25;0",
        ns, id, transmit_time
    )
}

/// Two streams: `a` with an AP and two stations, `b` with one station
fn seeded_app() -> Router {
    let state = Arc::new(AppState::new(PipelineConfig::default(), 64));

    state.pipeline.receive_batch(&RawBatch::new(
        "a",
        vec![
            format!("1000000;start;{}", START_TAIL),
            "2000000;apnodeadd;0.0;0.0".to_string(),
            "3000000;stanodeadd;1;3.0;4.0;1".to_string(),
            "3000000;stanodeadd;2;6.0;8.0;2".to_string(),
            stats_line(4_000_000, 0, 20.0),
            stats_line(4_000_000, 1, 10.0),
            stats_line(5_000_000, 1, 14.0),
            stats_line(4_000_000, 2, 30.0),
            "6000000;slotstatsAP;100;300".to_string(),
        ],
    ));
    state.pipeline.receive_batch(&RawBatch::new(
        "b",
        vec![
            format!("1000000;start;{}", START_TAIL),
            "2000000;stanodeadd;0;1.0;1.0;0".to_string(),
            stats_line(3_000_000, 0, 5.0),
        ],
    ));
    state.pipeline.tick();

    create_router(state)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_list_streams() {
    let (status, json) = get_json(seeded_app(), "/api/streams").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);
    assert_eq!(json["data"][0]["stream"], "a");
    assert_eq!(json["data"][0]["nodeCount"], 3);
    assert_eq!(json["data"][1]["stream"], "b");
    assert!(json["sequence_id"].as_u64().unwrap() >= 2);
}

#[tokio::test]
async fn test_get_stream_snapshot() {
    let (status, json) = get_json(seeded_app(), "/api/streams/a").await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["config"]["name"], "run");
    assert_eq!(data["apNode"], 0);
    assert_eq!(data["totalTraffic"], 400);
    assert_eq!(data["currentTime"], 6.0);
    assert_eq!(data["totalSlotUsageAp"][1], 300.0);
    assert_eq!(data["nodes"][1]["type"], "station");
    assert!(data["metrics"].as_array().unwrap().len() > 1);
}

#[tokio::test]
async fn test_unknown_stream_is_404() {
    let (status, json) = get_json(seeded_app(), "/api/streams/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_node() {
    let (status, json) = get_json(seeded_app(), "/api/streams/a/nodes/1?history=1").await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["id"], 1);
    assert_eq!(data["distanceToAp"], 5.0);
    assert_eq!(data["valueCount"], 2);
    assert_eq!(data["history"].as_array().unwrap().len(), 1);
    assert_eq!(data["history"][0]["totalTransmitTime"], 14.0);

    let (status, _) = get_json(seeded_app(), "/api/streams/a/nodes/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_metric() {
    let (status, json) =
        get_json(seeded_app(), "/api/streams/a/metrics/totalTransmitTime").await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["metric"], "totalTransmitTime");
    let mean = data["stats"]["mean"].as_f64().unwrap();
    assert!((mean - 64.0 / 3.0).abs() < 1e-9);
    assert_eq!(data["stats"]["count"], 3);
    assert_eq!(data["range"]["min"], 14.0);
    assert_eq!(data["range"]["max"], 30.0);
    assert_eq!(data["averageOfOthers"], 5.0);
    assert_eq!(data["comparison"], "higher");
    assert_eq!(data["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(data["nodes"][0]["averageOfOthers"], 5.0);
}

#[tokio::test]
async fn test_metric_deltas() {
    let (_, json) = get_json(
        seeded_app(),
        "/api/streams/a/metrics/totalTransmitTime?deltas=true",
    )
    .await;
    assert_eq!(json["data"]["range"]["min"], 4.0);
    assert_eq!(json["data"]["range"]["max"], 30.0);
}

#[tokio::test]
async fn test_unknown_metric_is_400() {
    let (status, json) = get_json(seeded_app(), "/api/streams/a/metrics/bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_not_applicable_node_has_no_z_score() {
    let state = Arc::new(AppState::new(PipelineConfig::default(), 64));
    state.pipeline.receive_batch(&RawBatch::new(
        "c",
        vec![
            format!("1000000;start;{}", START_TAIL),
            "2000000;stanodeadd;0;1.0;1.0;0".to_string(),
            "2000000;stanodeadd;1;2.0;2.0;1".to_string(),
            stats_line(3_000_000, 0, -1.0),
            stats_line(3_000_000, 1, 12.0),
        ],
    ));
    state.pipeline.tick();

    let (status, json) = get_json(
        create_router(state),
        "/api/streams/c/metrics/totalTransmitTime",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let nodes = &json["data"]["nodes"];
    assert_eq!(nodes[0]["value"], -1.0);
    assert!(nodes[0].get("zScore").is_none());
    assert!(nodes[0].get("heat").is_none());
    assert_eq!(nodes[1]["zScore"], 0.0);
    assert_eq!(nodes[1]["heat"], 0.5);
    assert_eq!(json["data"]["stats"]["count"], 1);
}
