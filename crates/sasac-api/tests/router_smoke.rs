use axum::{body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use sasac_api::directory::SeedFile;

#[tokio::test]
async fn health_is_open_and_latest_reports_never_run() {
    let app = sasac_api::create_router(sasac_api::test_state(SeedFile::default()));

    let health = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let latest = app
        .oneshot(
            Request::builder()
                .uri("/api/allocation/latest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(latest.status(), StatusCode::NOT_FOUND);

    let bytes = latest.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["code"], "not_found");
}

#[tokio::test]
async fn running_without_evaluations_is_informational() {
    let app = sasac_api::create_router(sasac_api::test_state(SeedFile::default()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/allocation/run")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "no_evaluations");
}

#[tokio::test]
async fn config_round_trips_through_the_api() {
    let app = sasac_api::create_router(sasac_api::test_state(SeedFile::default()));

    let update = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/config")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "preparation_weight": 0.7,
                        "preference_bonus": 0.2,
                        "item_weights": { "c1": 2.0 }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::OK);

    let entries = app
        .oneshot(
            Request::builder()
                .uri("/api/config")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = entries.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["preparation_weight"], 0.7);
    assert!((json["affinity_weight"].as_f64().unwrap() - 0.3).abs() < 1e-9);
    assert_eq!(json["preference_bonus"], 0.2);
    assert_eq!(json["c1"], 2.0);
}
