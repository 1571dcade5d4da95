//! Upload notification integration tests.
//!
//! Run with: `cargo test -p mediaguard-api --test events_test`

mod helpers;

use base64::Engine;
use helpers::{
    setup_test_app, storage_object, ACCOUNT_ID, BUCKET, CLOUDFLARE_TOKEN, GOOGLE_API_KEY,
    IMAGE_PLACEHOLDER, VIDEO_PLACEHOLDER,
};
use mockito::Matcher;
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};

const OPERATION: &str = "projects/p/locations/us-east1/operations/42";

/// The signed reference points at the upload and expires one hour from now.
fn expires_within_an_hour(url: &str) -> bool {
    let Some((target, expires)) = url.split_once("?expires=") else {
        return false;
    };
    let Ok(expires) = expires.parse::<u64>() else {
        return false;
    };
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    target.ends_with("/videos/b.mp4") && expires >= now + 3600 - 5 && expires <= now + 3600
}

#[tokio::test]
async fn test_flagged_image_is_replaced_with_placeholder() {
    let mut app = setup_test_app().await;
    app.put_object("photos/a.jpg", b"original jpeg", "image/jpeg")
        .await;

    let vision = app
        .vendor
        .mock("POST", "/v1/images:annotate")
        .match_query(Matcher::UrlEncoded("key".into(), GOOGLE_API_KEY.into()))
        .match_body(Matcher::PartialJson(json!({
            "requests": [{ "image": { "source": { "imageUri": format!("gs://{}/photos/a.jpg", BUCKET) } } }]
        })))
        .with_status(200)
        .with_body(
            json!({
                "responses": [{
                    "safeSearchAnnotation": { "adult": "LIKELY", "violence": "VERY_UNLIKELY" }
                }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let response = app
        .client()
        .post("/events/image")
        .json(&storage_object("photos/a.jpg", "image/jpeg"))
        .await;

    assert_eq!(response.status_code(), 204);
    vision.assert_async().await;
    assert_eq!(app.object("photos/a.jpg").await, IMAGE_PLACEHOLDER.to_vec());
    assert!(!app.scratch_dir.path().join("photos/a.jpg").exists());
}

#[tokio::test]
async fn test_clear_video_is_sent_for_transcoding() {
    let mut app = setup_test_app().await;
    app.put_object("videos/b.mp4", b"original mp4", "video/mp4")
        .await;

    let submit = app
        .vendor
        .mock("POST", "/v1/videos:annotate")
        .match_query(Matcher::UrlEncoded("key".into(), GOOGLE_API_KEY.into()))
        .match_body(Matcher::PartialJson(json!({
            "inputUri": format!("gs://{}/videos/b.mp4", BUCKET),
            "features": ["EXPLICIT_CONTENT_DETECTION"]
        })))
        .with_status(200)
        .with_body(json!({ "name": OPERATION }).to_string())
        .create_async()
        .await;
    let poll = app
        .vendor
        .mock("GET", format!("/v1/{}", OPERATION).as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "name": OPERATION,
                "done": true,
                "response": { "annotationResults": [{ "explicitAnnotation": { "frames": [] } }] }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let copy = app
        .vendor
        .mock(
            "POST",
            format!("/client/v4/accounts/{}/stream/copy", ACCOUNT_ID).as_str(),
        )
        .match_header(
            "authorization",
            format!("Bearer {}", CLOUDFLARE_TOKEN).as_str(),
        )
        .match_body(Matcher::PartialJson(json!({
            "meta": {
                "name": "b",
                "path": "videos/b.mp4",
                "contentRef": "videos/b.mp4"
            }
        })))
        .match_request(|request| {
            let Ok(body) = request.body() else {
                return false;
            };
            let Ok(body) = serde_json::from_slice::<serde_json::Value>(body) else {
                return false;
            };
            let url = body["url"].as_str().unwrap_or_default();
            url == body["meta"]["contentURI"].as_str().unwrap_or("-")
                && expires_within_an_hour(url)
        })
        .with_status(200)
        .with_body(r#"{"success":true,"result":{"uid":"abc123"}}"#)
        .expect(1)
        .create_async()
        .await;

    let response = app
        .client()
        .post("/events/video")
        .json(&storage_object("videos/b.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 204);
    submit.assert_async().await;
    poll.assert_async().await;
    copy.assert_async().await;
    assert_eq!(app.object("videos/b.mp4").await, b"original mp4".to_vec());
}

#[tokio::test]
async fn test_non_image_upload_is_ignored() {
    let mut app = setup_test_app().await;
    app.put_object("notes/readme.txt", b"hello", "text/plain")
        .await;

    let vision = app
        .vendor
        .mock("POST", "/v1/images:annotate")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let response = app
        .client()
        .post("/events/image")
        .json(&storage_object("notes/readme.txt", "text/plain"))
        .await;

    assert_eq!(response.status_code(), 204);
    vision.assert_async().await;
    assert_eq!(app.object("notes/readme.txt").await, b"hello".to_vec());
}

#[tokio::test]
async fn test_push_envelope_is_unwrapped() {
    let mut app = setup_test_app().await;
    app.put_object("photos/a.jpg", b"original jpeg", "image/jpeg")
        .await;

    let vision = app
        .vendor
        .mock("POST", "/v1/images:annotate")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "responses": [{
                    "safeSearchAnnotation": { "adult": "VERY_UNLIKELY", "violence": "UNLIKELY" }
                }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let data = base64::engine::general_purpose::STANDARD
        .encode(storage_object("photos/a.jpg", "image/jpeg").to_string());
    let response = app
        .client()
        .post("/events/image")
        .json(&json!({
            "message": {
                "data": data,
                "attributes": { "eventType": "OBJECT_FINALIZE" },
                "messageId": "99"
            },
            "subscription": "projects/p/subscriptions/moderate-images"
        }))
        .await;

    assert_eq!(response.status_code(), 204);
    vision.assert_async().await;
    // Clear images are left untouched
    assert_eq!(app.object("photos/a.jpg").await, b"original jpeg".to_vec());
}

#[tokio::test]
async fn test_undecodable_body_is_bad_request() {
    let app = setup_test_app().await;

    let response = app.client().post("/events/image").text("not json").await;

    assert_eq!(response.status_code(), 400);
    let data: serde_json::Value = response.json();
    assert_eq!(data["code"], "INVALID_INPUT");
    assert_eq!(data["recoverable"], false);
}

#[tokio::test]
async fn test_classifier_failure_is_reported_for_redelivery() {
    let mut app = setup_test_app().await;
    app.put_object("photos/a.jpg", b"original jpeg", "image/jpeg")
        .await;

    app.vendor
        .mock("POST", "/v1/images:annotate")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("quota exceeded")
        .create_async()
        .await;

    let response = app
        .client()
        .post("/events/image")
        .json(&storage_object("photos/a.jpg", "image/jpeg"))
        .await;

    assert_eq!(response.status_code(), 502);
    let data: serde_json::Value = response.json();
    assert_eq!(data["code"], "CLASSIFICATION_FAILED");
    assert_eq!(data["recoverable"], true);
    // Non-production responses carry the vendor failure
    assert!(data["details"].as_str().unwrap().contains("429"));
    assert_eq!(app.object("photos/a.jpg").await, b"original jpeg".to_vec());
}

#[tokio::test]
async fn test_missing_source_object_fails_remediation() {
    let mut app = setup_test_app().await;

    app.vendor
        .mock("POST", "/v1/videos:annotate")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "name": OPERATION }).to_string())
        .create_async()
        .await;
    app.vendor
        .mock("GET", format!("/v1/{}", OPERATION).as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "name": OPERATION,
                "done": true,
                "response": { "annotationResults": [{ "explicitAnnotation": { "frames": [
                    { "pornographyLikelihood": "VERY_LIKELY" }
                ] } }] }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let response = app
        .client()
        .post("/events/video")
        .json(&storage_object("videos/gone.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    let data: serde_json::Value = response.json();
    assert_eq!(data["code"], "REMEDIATION_FAILED");
    assert!(!app.storage.exists("videos/gone.mp4").await.unwrap());
    // The placeholder itself is untouched
    assert_eq!(app.object("annotate.mp4").await, VIDEO_PLACEHOLDER.to_vec());
}
