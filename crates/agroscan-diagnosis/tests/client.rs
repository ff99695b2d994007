//! Integration tests for `DiagnosisClient` against a wiremock backend.

use std::path::PathBuf;

use agroscan_core::GeoPoint;
use agroscan_diagnosis::{DiagnosisClient, DiagnosisError};
use wiremock::matchers::{header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> DiagnosisClient {
    DiagnosisClient::new(&format!("{}/api", server.uri()), 5, "agroscan-test/0.1")
        .expect("client construction should not fail")
}

/// Writes a small fake image into the system temp dir and returns its path.
fn temp_image(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("agroscan-{}-{name}", std::process::id()));
    std::fs::write(&path, b"\xFF\xD8\xFF\xE0fake-jpeg").expect("write temp image");
    path
}

fn diagnosis_body() -> serde_json::Value {
    serde_json::json!({
        "disease_name": "Late Blight (Phytophthora infestans)",
        "confidence_score": 94.7,
        "timeline": [
            { "day": "1", "title": "Urgent Treatment", "detail": "Spray Mancozeb - 2g/L water" },
            { "day": "3", "title": "Follow-up Application", "detail": "Apply Chlorothalonil - 1.5g/L water" },
            { "day": "7", "title": "Prevention Protocol", "detail": "Apply Copper Oxychloride - 3g/L water" }
        ],
        "recommended_product": "Mancozeb 75% WP"
    })
}

#[tokio::test]
async fn diagnose_image_uploads_multipart_and_parses_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/diagnose"))
        .and(header_regex("content-type", "^multipart/form-data; boundary=.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(diagnosis_body()))
        .expect(1)
        .mount(&server)
        .await;

    let image = temp_image("leaf.jpg");
    let client = test_client(&server);
    let resp = client.diagnose_image(&image).await.expect("diagnosis");
    let _ = std::fs::remove_file(&image);

    assert_eq!(resp.disease_name, "Late Blight (Phytophthora infestans)");
    assert!((resp.confidence() - 94.7).abs() < 1e-9);
    assert_eq!(resp.treatment_steps().len(), 3);
    assert_eq!(resp.recommended_product, "Mancozeb 75% WP");
}

#[tokio::test]
async fn diagnose_image_missing_file_is_io_error() {
    let server = MockServer::start().await;
    let client = test_client(&server);
    let err = client
        .diagnose_image(std::path::Path::new("/definitely/not/here.jpg"))
        .await
        .unwrap_err();
    assert!(matches!(err, DiagnosisError::Io { .. }), "got: {err:?}");
}

#[tokio::test]
async fn diagnose_image_retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/diagnose"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/diagnose"))
        .respond_with(ResponseTemplate::new(200).set_body_json(diagnosis_body()))
        .mount(&server)
        .await;

    let image = temp_image("retry.png");
    let client = test_client(&server).with_retry_policy(2, 0);
    let resp = client.diagnose_image(&image).await;
    let _ = std::fs::remove_file(&image);

    assert!(resp.is_ok(), "expected success after retry, got: {resp:?}");
}

#[tokio::test]
async fn diagnose_image_does_not_retry_client_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/diagnose"))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&server)
        .await;

    let image = temp_image("reject.jpg");
    let client = test_client(&server).with_retry_policy(3, 0);
    let err = client.diagnose_image(&image).await.unwrap_err();
    let _ = std::fs::remove_file(&image);

    assert!(matches!(
        err,
        DiagnosisError::UnexpectedStatus { status: 422, .. }
    ));
}

#[tokio::test]
async fn get_dealers_sends_location_and_product() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "id": "1", "name": "Krishi Seva Kendra", "address": "Main Road, Pune",
            "distance": "2.3 km", "hasStock": true, "lat": 18.5204, "lng": 73.8567
        },
        {
            "id": "3", "name": "Farm Solutions Center", "address": "Highway Road, Pune",
            "distance": "5.8 km", "hasStock": false, "lat": 18.5074, "lng": 73.8077
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/dealers"))
        .and(query_param("lat", "18.52"))
        .and(query_param("long", "73.86"))
        .and(query_param("product", "Mancozeb 75% WP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let dealers = client
        .get_dealers(GeoPoint::new(18.52, 73.86), "Mancozeb 75% WP")
        .await
        .expect("dealers");

    assert_eq!(dealers.len(), 2);
    assert_eq!(dealers[0].name, "Krishi Seva Kendra");
    assert!(!dealers[1].has_stock);
}

#[tokio::test]
async fn get_dealers_rate_limited_without_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dealers"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .get_dealers(GeoPoint::origin(), "Mancozeb")
        .await
        .unwrap_err();
    assert!(matches!(err, DiagnosisError::RateLimited { .. }));
}
