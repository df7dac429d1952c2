//! Integration tests for the public `/api/hallpass` endpoint.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, get, post_json, post_raw, send};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: claim → wrong release → release → status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn claim_and_release_scenario() {
    let app = build_test_app();

    let response = post_json(
        &app.router,
        "/api/hallpass",
        json!({ "action": "claim", "studentId": "1234" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let claimed = body_json(response).await;
    assert_eq!(claimed["status"], "claimed");
    let token = claimed["token"].as_str().unwrap().to_string();
    let started_at = claimed["startedAt"].as_i64().unwrap();

    let denied = body_json(
        post_json(
            &app.router,
            "/api/hallpass",
            json!({ "action": "release", "token": "x" }),
        )
        .await,
    )
    .await;
    assert_eq!(denied["status"], "denied");
    assert_eq!(denied["startedAt"], started_at);

    let released = body_json(
        post_json(
            &app.router,
            "/api/hallpass",
            json!({ "action": "release", "token": token }),
        )
        .await,
    )
    .await;
    assert_eq!(released["status"], "released");

    let status = body_json(get(&app.router, "/api/hallpass").await).await;
    assert_eq!(status["status"], "available");
    assert_eq!(status["blocked"], false);
}

// ---------------------------------------------------------------------------
// Test: second claim does not replace the holder
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_claim_returns_in_use() {
    let app = build_test_app();

    let first = body_json(post_json(&app.router, "/api/hallpass", json!({ "action": "claim" })).await).await;
    let second = body_json(post_json(&app.router, "/api/hallpass", json!({ "action": "claim" })).await).await;

    assert_eq!(second["status"], "in_use");
    assert_eq!(second["startedAt"], first["startedAt"]);
    assert!(second.get("token").is_none());

    // The original token still releases the pass.
    let released = body_json(
        post_json(
            &app.router,
            "/api/hallpass",
            json!({ "action": "release", "token": first["token"] }),
        )
        .await,
    )
    .await;
    assert_eq!(released["status"], "released");
}

// ---------------------------------------------------------------------------
// Test: GET ?token= personalizes isHolder
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_reports_holder_by_query_token() {
    let app = build_test_app();
    let claimed = body_json(post_json(&app.router, "/api/hallpass", json!({ "action": "claim" })).await).await;
    let token = claimed["token"].as_str().unwrap();

    let mine = body_json(get(&app.router, &format!("/api/hallpass?token={token}")).await).await;
    assert_eq!(mine["status"], "in_use");
    assert_eq!(mine["isHolder"], true);
    assert_eq!(mine["startedAt"], claimed["startedAt"]);

    let theirs = body_json(get(&app.router, "/api/hallpass?token=other").await).await;
    assert_eq!(theirs["isHolder"], false);

    let via_post = body_json(
        post_json(
            &app.router,
            "/api/hallpass",
            json!({ "action": "status", "token": token }),
        )
        .await,
    )
    .await;
    assert_eq!(via_post["isHolder"], true);
}

// ---------------------------------------------------------------------------
// Test: responses carry JSON content type and no-store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn responses_are_json_and_not_cached() {
    let app = build_test_app();
    let response = get(&app.router, "/api/hallpass").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/json; charset=utf-8"
    );
    assert_eq!(response.headers()["cache-control"], "no-store");
}

// ---------------------------------------------------------------------------
// Test: invalid student id is rejected without claiming
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_student_id_is_rejected() {
    let app = build_test_app();

    let response = post_json(
        &app.router,
        "/api/hallpass",
        json!({ "action": "claim", "studentId": "12ab" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "invalid_student_id");

    let status = body_json(get(&app.router, "/api/hallpass").await).await;
    assert_eq!(status["status"], "available");
}

// ---------------------------------------------------------------------------
// Test: admin-only actions are forbidden on the public route
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_actions_are_forbidden_publicly() {
    let app = build_test_app();
    post_json(&app.router, "/api/hallpass", json!({ "action": "claim" })).await;

    for action in ["force_release", "block", "unblock", "log", "admin_status"] {
        let response = post_json(&app.router, "/api/hallpass", json!({ "action": action })).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "action {action}");
        assert_eq!(body_json(response).await["status"], "forbidden");
    }

    // Still held.
    let status = body_json(get(&app.router, "/api/hallpass").await).await;
    assert_eq!(status["status"], "in_use");
}

// ---------------------------------------------------------------------------
// Test: malformed body is 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let app = build_test_app();

    let response = post_raw(&app.router, "/api/hallpass", "{oops".into(), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["cache-control"], "no-store");
    assert_eq!(body_json(response).await["status"], "bad_request");

    let response = post_json(&app.router, "/api/hallpass", json!({ "action": "release", "token": 5 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: a JSON array body is malformed and does not claim
// ---------------------------------------------------------------------------

#[tokio::test]
async fn array_body_is_rejected_without_claiming() {
    let app = build_test_app();

    for uri in ["/api/hallpass", "/admin/api/hallpass"] {
        let response = post_raw(
            &app.router,
            uri,
            r#"["claim"]"#.into(),
            Some(common::admin_auth()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["status"], "bad_request");
    }

    let status = body_json(get(&app.router, "/api/hallpass").await).await;
    assert_eq!(status["status"], "available");
}

// ---------------------------------------------------------------------------
// Test: unknown or missing action is forbidden publicly
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_or_missing_action_is_forbidden() {
    let app = build_test_app();

    for body in [json!({ "action": "teleport" }), json!({}), json!({ "action": "" })] {
        let response = post_json(&app.router, "/api/hallpass", body.clone()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{body}");
        assert_eq!(response.headers()["cache-control"], "no-store");
        assert_eq!(body_json(response).await["status"], "forbidden");
    }
}

// ---------------------------------------------------------------------------
// Test: rejected query string is a JSON 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_query_is_json_bad_request() {
    let app = build_test_app();

    let response = get(&app.router, "/api/hallpass?token=a&token=b").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()["content-type"],
        "application/json; charset=utf-8"
    );
    assert_eq!(response.headers()["cache-control"], "no-store");
    assert_eq!(body_json(response).await["status"], "bad_request");
}

// ---------------------------------------------------------------------------
// Test: pass routes are not cut off by the request timeout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn claim_is_not_subject_to_request_timeout() {
    let mut config = common::test_config();
    config.request_timeout_secs = 0;
    let app = common::build_test_app_with(config);

    let response = post_json(&app.router, "/api/hallpass", json!({ "action": "claim" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let claimed = body_json(response).await;
    assert_eq!(claimed["status"], "claimed");
    assert!(claimed["token"].is_string());
}

// ---------------------------------------------------------------------------
// Test: unsupported method is 405 with JSON body
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unsupported_method_is_405() {
    let app = build_test_app();
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/hallpass")
        .body(Body::empty())
        .unwrap();

    let response = send(&app.router, request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await["status"], "method_not_allowed");
}

// ---------------------------------------------------------------------------
// Test: missing pass store is a 500 configuration error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_store_is_500() {
    let router = common::build_app_without_store(common::test_config());

    let response = get(&router, "/api/hallpass").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Pass store is not configured.");
}

// ---------------------------------------------------------------------------
// Test: health reports store state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_store() {
    let app = build_test_app();
    let response = get(&app.router, "/health").await;
    assert_eq!(response.headers()["cache-control"], "no-store");
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storeHealthy"], true);
    assert!(json["version"].is_string());

    let router = common::build_app_without_store(common::test_config());
    let json = body_json(get(&router, "/health").await).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["storeHealthy"], false);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app();
    let response = get(&app.router, "/api/hallpass").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
