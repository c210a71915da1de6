//! Ticket API integration tests against the in-process router.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestConfig, TestFixture};

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_new_ticket_returns_id() {
    let fixture = TestFixture::new();
    let id = fixture.new_ticket().await;
    assert_eq!(id.len(), 19);
    assert_eq!(id.split('-').count(), 4);

    let response = fixture
        .get(&format!("/api/ticket/status?ticket-id={}", id))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body, json!({}));
}

#[tokio::test]
async fn test_request_reports_dependencies_then_completes() {
    let fixture = TestFixture::new();
    let id = fixture.ticket_with_video().await;

    let response = fixture
        .post(&format!("/api/ticket/analyze?ticket-id={}&type=metrics", id))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"status": "success", "request-deps": ["transcription"]})
    );

    // In flight: redacted view shows fractions
    let response = fixture
        .get(&format!("/api/ticket/status?ticket-id={}", id))
        .await;
    assert_eq!(response.body, json!({"metrics": 0.0, "transcription": 0.0}));

    fixture.tick(1);
    let response = fixture
        .get(&format!("/api/ticket/status?ticket-id={}", id))
        .await;
    assert_eq!(response.body["metrics"], json!(0.25));

    fixture.tick(fixture.ticks_to_complete());

    let response = fixture
        .get(&format!("/api/ticket/status?ticket-id={}", id))
        .await;
    assert_eq!(response.body, json!({"metrics": {}, "transcription": {}}));

    let response = fixture
        .get(&format!(
            "/api/ticket/status?ticket-id={}&send-results=true",
            id
        ))
        .await;
    assert!(response.body["transcription"]["words"].is_array());
    assert!(response.body["metrics"].is_object());
}

#[tokio::test]
async fn test_send_results_only_for_literal_true() {
    let fixture = TestFixture::new();
    let id = fixture.ticket_with_video().await;
    fixture
        .post(&format!("/api/ticket/analyze?ticket-id={}&type=audio", id))
        .await;
    fixture.tick(fixture.ticks_to_complete());

    let response = fixture
        .get(&format!("/api/ticket/status?ticket-id={}&send-results=1", id))
        .await;
    assert_eq!(response.body, json!({"audio": {}}));
}

#[tokio::test]
async fn test_request_all_lists_queued_kinds() {
    let fixture = TestFixture::new();
    let id = fixture.new_ticket().await;

    let response = fixture
        .post(&format!("/api/ticket/analyze?ticket-id={}", id))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "success");
    assert_eq!(response.body["queued"].as_array().unwrap().len(), 20);
    assert!(response.body.get("request-deps").is_none());

    // Asking for everything again is fine, nothing new is queued
    let response = fixture
        .post(&format!("/api/ticket/analyze?ticket-id={}", id))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["queued"], json!([]));
}

#[tokio::test]
async fn test_request_twice_conflicts() {
    let fixture = TestFixture::new();
    let id = fixture.new_ticket().await;
    let path = format!("/api/ticket/analyze?ticket-id={}&type=jargon", id);

    assert_status!(fixture.post(&path).await, StatusCode::OK);
    let response = fixture.post(&path).await;
    assert_status!(response, StatusCode::CONFLICT);
    assert_eq!(response.body["status"], "already-analyzing");
}

#[tokio::test]
async fn test_bad_ticket_and_bad_type() {
    let fixture = TestFixture::new();

    let response = fixture
        .post("/api/ticket/analyze?ticket-id=nope&type=transcription")
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["status"], "bad-ticket");

    // Unknown ticket wins over unknown kind
    let response = fixture
        .post("/api/ticket/analyze?ticket-id=nope&type=astrology")
        .await;
    assert_eq!(response.body["status"], "bad-ticket");

    let response = fixture.post("/api/ticket/analyze").await;
    assert_status!(response, StatusCode::NOT_FOUND);

    let id = fixture.new_ticket().await;
    let response = fixture
        .post(&format!("/api/ticket/analyze?ticket-id={}&type=astrology", id))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], "bad-type");

    let response = fixture.get("/api/ticket/status?ticket-id=nope").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_single_and_all() {
    let fixture = TestFixture::new();
    let id = fixture.ticket_with_video().await;
    fixture
        .post(&format!("/api/ticket/analyze?ticket-id={}&type=transcription", id))
        .await;

    let response = fixture
        .post(&format!("/api/ticket/cancel?ticket-id={}&type=transcription", id))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body, json!({"status": "success"}));

    let response = fixture
        .get(&format!("/api/ticket/status?ticket-id={}&send-results=true", id))
        .await;
    assert_eq!(response.body, json!({}));

    // Not requested any more
    let response = fixture
        .post(&format!("/api/ticket/cancel?ticket-id={}&type=transcription", id))
        .await;
    assert_status!(response, StatusCode::CONFLICT);
    assert_eq!(response.body["status"], "not-analyzed");

    fixture
        .post(&format!("/api/ticket/analyze?ticket-id={}", id))
        .await;
    let response = fixture
        .post(&format!("/api/ticket/cancel?ticket-id={}", id))
        .await;
    assert_status!(response, StatusCode::OK);
    let response = fixture
        .get(&format!("/api/ticket/status?ticket-id={}", id))
        .await;
    assert_eq!(response.body, json!({}));
}

#[tokio::test]
async fn test_frozen_until_upload() {
    let fixture = TestFixture::new();
    let id = fixture.new_ticket().await;
    fixture
        .post(&format!("/api/ticket/analyze?ticket-id={}&type=volume", id))
        .await;

    fixture.tick(20);
    let response = fixture
        .get(&format!("/api/ticket/status?ticket-id={}", id))
        .await;
    assert_eq!(response.body["volume"], json!(0.0));

    let response = fixture
        .post_bytes(
            &format!("/api/ticket/video?ticket-id={}", id),
            b"not really a video".to_vec(),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["bytes"], 18);

    fixture.tick(1);
    let response = fixture
        .get(&format!("/api/ticket/status?ticket-id={}", id))
        .await;
    assert_eq!(response.body["volume"], json!(0.25));
}

#[tokio::test]
async fn test_upload_limits() {
    let fixture = TestFixture::with_config(TestConfig::with_upload_limit(16));
    let id = fixture.new_ticket().await;

    let response = fixture
        .post_bytes(&format!("/api/ticket/video?ticket-id={}", id), vec![1u8; 17])
        .await;
    assert_status!(response, StatusCode::PAYLOAD_TOO_LARGE);
    let ticket = fixture.state.store().snapshot(&id).unwrap();
    assert!(!ticket.has_video);

    let response = fixture
        .post_bytes("/api/ticket/video?ticket-id=nope", vec![1u8; 4])
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_ticket() {
    let fixture = TestFixture::new();
    let id = fixture.new_ticket().await;

    let response = fixture
        .post(&format!("/api/ticket/delete?ticket-id={}", id))
        .await;
    assert_status!(response, StatusCode::OK);

    let response = fixture
        .post(&format!("/api/ticket/delete?ticket-id={}", id))
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
    let response = fixture
        .get(&format!("/api/ticket/status?ticket-id={}", id))
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_analyses() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/analyses").await;
    assert_status!(response, StatusCode::OK);

    let entries = response.body.as_array().unwrap();
    assert_eq!(entries.len(), 20);
    let summary = entries
        .iter()
        .find(|e| e["kind"] == "quality_summary")
        .unwrap();
    assert_eq!(
        summary["dependencies"],
        json!(["transcription", "audio_gaps", "noise_detection"])
    );
}

#[tokio::test]
async fn test_engine_status_and_metrics() {
    let fixture = TestFixture::new();
    let id = fixture.new_ticket().await;
    fixture
        .post(&format!("/api/ticket/analyze?ticket-id={}&type=silence", id))
        .await;

    let response = fixture.get("/api/engine").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["running"], false);
    assert_eq!(response.body["in_flight"], 2);
    assert_eq!(response.body["frozen_tickets"], 1);

    let (status, text) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("orator_tickets_created_total"));
    assert!(text.contains("orator_analyses_in_flight"));
    assert!(text.contains("orator_http_requests_total"));
}
