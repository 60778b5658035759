//! HTTP contract tests over the assembled router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

mod common;

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn start_session(app: &Router, user_id: &str, session_type: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/sessions",
        json!({"userId": user_id, "languageKey": "sv", "sessionType": session_type}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_scorer_details() {
    let (app, _) = common::create_test_app().await;
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["scorerVersion"], "test-fixture");
    assert_eq!(body["vocabularySize"], 8);
}

#[tokio::test]
async fn session_start_validates_user_and_language() {
    let (app, _) = common::create_test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/sessions",
        json!({"userId": "  ", "languageKey": "sv", "sessionType": "read"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = post_json(
        &app,
        "/api/sessions",
        json!({"userId": "u1", "languageKey": "xx", "sessionType": "read"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn trace_batches_are_validated() {
    let (app, units) = common::create_test_app().await;

    let (status, _) = post_json(
        &app,
        "/api/tracking/traces",
        json!({"sessionId": Uuid::new_v4(), "unitIds": [units[0].id], "mode": "seen"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let session_id = start_session(&app, "u1", "read").await;
    let (status, body) = post_json(
        &app,
        "/api/tracking/traces",
        json!({"sessionId": session_id, "unitIds": [], "mode": "seen"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_units_in_a_batch_are_skipped_and_reported() {
    let (app, units) = common::create_test_app().await;
    let session_id = start_session(&app, "u1", "read").await;
    let ghost = Uuid::new_v4();

    let (status, body) = post_json(
        &app,
        "/api/tracking/traces",
        json!({
            "sessionId": session_id,
            "unitIds": [units[0].id, ghost, units[0].id],
            "mode": "seen"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["applied"], 1);
    assert_eq!(body["skippedUnitIds"], json!([ghost.to_string()]));
}

#[tokio::test]
async fn full_test_flow_over_http() {
    let (app, units) = common::create_test_app().await;

    // Not enough traced words yet: info says so, compose reports progress.
    let (status, body) = get_json(&app, "/api/wordtest/info?userId=u1&languageKey=sv").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["wordsTraced"], 0);
    assert_eq!(body["data"]["eligible"], false);

    let read_id = start_session(&app, "u1", "read").await;
    let all_ids: Vec<String> = units.iter().map(|u| u.id.to_string()).collect();
    let (status, _) = post_json(
        &app,
        "/api/tracking/traces",
        json!({"sessionId": read_id, "unitIds": all_ids, "mode": "seen"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app, "/api/wordtest/info?userId=u1&languageKey=sv").await;
    assert_eq!(body["data"]["wordsTraced"], 8);
    assert_eq!(body["data"]["eligible"], true);

    // A user with no traces gets the progress payload, not an error.
    let (status, body) = post_json(
        &app,
        "/api/wordtest/compose",
        json!({"userId": "stranger", "languageKey": "sv"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kind"], "insufficientCandidates");
    assert_eq!(body["data"]["wordsTraced"], 0);
    assert_eq!(body["data"]["wordsRequired"], 7);

    let (status, body) = post_json(
        &app,
        "/api/wordtest/compose",
        json!({"userId": "u1", "languageKey": "sv"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kind"], "test");
    let unit_ids = body["data"]["unitIds"].as_array().unwrap();
    assert_eq!(unit_ids.len(), 7);
    let mut distinct: Vec<_> = unit_ids.iter().map(|v| v.as_str().unwrap()).collect();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), 7);

    // Grade a batch: one exact, one plural typo, one wrong, one unknown id.
    let test_id = start_session(&app, "u1", "test").await;
    let dog = units.iter().find(|u| u.english_word == "dog").unwrap();
    let cat = units.iter().find(|u| u.english_word == "cat").unwrap();
    let fox = units.iter().find(|u| u.english_word == "fox").unwrap();
    let ghost = Uuid::new_v4();

    let (status, body) = post_json(
        &app,
        &format!("/api/wordtest/{test_id}/answers"),
        json!({"answers": [
            {"unitId": dog.id, "userEnglish": "dog"},
            {"unitId": cat.id, "userEnglish": "cats"},
            {"unitId": fox.id, "userEnglish": "badger"},
            {"unitId": ghost, "userEnglish": "anything"}
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["correct"], true);
    assert_eq!(results[0]["typo"], false);
    assert_eq!(results[1]["correct"], true);
    assert_eq!(results[1]["typo"], true);
    assert_eq!(results[2]["correct"], false);
    assert_eq!(body["notFoundUnitIds"], json!([ghost.to_string()]));
}

#[tokio::test]
async fn answer_submission_is_validated() {
    let (app, _) = common::create_test_app().await;

    let (status, _) = post_json(
        &app,
        &format!("/api/wordtest/{}/answers", Uuid::new_v4()),
        json!({"answers": [{"unitId": Uuid::new_v4(), "userEnglish": "dog"}]}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let session_id = start_session(&app, "u1", "test").await;
    let (status, body) = post_json(
        &app,
        &format!("/api/wordtest/{session_id}/answers"),
        json!({"answers": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}
