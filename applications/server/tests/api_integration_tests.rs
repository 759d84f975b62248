/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::http::{header, Request, StatusCode};
use axum::body::Body;
use chrono::Utc;
use common::*;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use std::collections::HashSet;
use vibe_server::services::{auth::Claims, AuthService};
use vibe_server::ServerError;

async fn count_rows(pool: &sqlx::SqlitePool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

// =============================================================================
// Health and reference data
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send(get_request("/api/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_emotion_types_are_public_and_seeded() {
    let app = TestApp::new().await;
    let (status, body) = app.send(get_request("/api/emotions/types", None)).await;

    assert_eq!(status, StatusCode::OK);
    let names: HashSet<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    for expected in ["happy", "sad", "angry", "fear", "surprised", "disgust", "neutral"] {
        assert!(names.contains(expected), "missing {expected}");
    }
}

// =============================================================================
// Registration and login
// =============================================================================

/// register -> login -> analyze -> history
#[tokio::test]
async fn test_manual_entry_scenario() {
    let app = TestApp::new().await;

    let (status, body) = app.register(TEST_EMAIL, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], TEST_EMAIL);
    assert!(body["message"].is_string());
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = app.login(TEST_EMAIL, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["email"], TEST_EMAIL);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/emotion/analyze",
            Some(&token),
            &json!({ "emotion": "happy", "confidence": 0.9 }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "happy");
    assert_eq!(body["confidence"], 0.9);
    assert_eq!(body["source"], "manual");
    assert_eq!(body["feedback"], serde_json::Value::Null);
    assert_eq!(body["label_resolution"], "resolved");
    assert_eq!(body["recommendations"], "no_collection");
    assert_eq!(body["tracks"], json!([]));
    assert!(body["timestamp"].is_string());

    let (status, body) = app
        .send(get_request("/api/emotion/history", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["records"].as_array().unwrap().len(), 1);
    assert_eq!(body["records"][0]["emotion"], "happy");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;

    let (status, _) = app.register("not-an-email", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.register(TEST_EMAIL, "12345").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(json_request("POST", "/api/auth/register", None, &json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new().await;

    let (status, _) = app.register(TEST_EMAIL, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::CREATED);

    // Emails are normalized before the uniqueness check
    let (status, body) = app.register("  A@B.COM ", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn test_register_rejects_malformed_json() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = TestApp::new().await;
    app.register(TEST_EMAIL, TEST_PASSWORD).await;

    let (status, wrong_password) = app.login(TEST_EMAIL, "wrongpassword").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = app.login("nobody@example.com", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password["error"], unknown_user["error"]);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::new().await;
    let (status, _) = app.login("", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_token_resolves_to_user() {
    let app = TestApp::new().await;
    let (_, registered) = app.register(TEST_EMAIL, TEST_PASSWORD).await;
    let (_, body) = app.login(TEST_EMAIL, TEST_PASSWORD).await;

    let user_id = app
        .auth_service
        .verify_token(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(user_id.get(), registered["user"]["id"].as_i64().unwrap());
}

// =============================================================================
// Bearer token handling
// =============================================================================

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::new().await;
    let (status, body) = app.send(get_request("/api/emotion/history", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization token is missing");
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/api/emotion/history")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization token is malformed");

    let (status, body) = app
        .send(get_request("/api/emotion/history", Some("garbage")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization token is malformed");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new().await;
    let (_, registered) = app.register(TEST_EMAIL, TEST_PASSWORD).await;

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: registered["user"]["id"].as_i64().unwrap().to_string(),
        exp: now - 3600,
        iat: now - 7200,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let (status, body) = app
        .send(get_request("/api/emotion/history", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization token has expired");
}

#[tokio::test]
async fn test_token_with_foreign_signature_is_rejected() {
    let app = TestApp::new().await;
    let (_, registered) = app.register(TEST_EMAIL, TEST_PASSWORD).await;

    let forger = AuthService::new("some-other-secret".to_string(), 7, 4);
    let user_id = vibe_core::UserId::new(registered["user"]["id"].as_i64().unwrap());
    let token = forger.issue_token(user_id).unwrap();

    let (status, body) = app
        .send(get_request("/api/emotion/history", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization token signature is invalid");
}

// =============================================================================
// Manual entries
// =============================================================================

#[tokio::test]
async fn test_manual_confidence_out_of_range() {
    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;

    for confidence in [1.5, -0.1, 100.0] {
        let (status, _) = app
            .send(json_request(
                "POST",
                "/api/emotion/analyze",
                Some(&token),
                &json!({ "emotion": "happy", "confidence": confidence }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "confidence {confidence}");
    }

    assert_eq!(count_rows(&app.pool, "observations").await, 0);
}

#[tokio::test]
async fn test_manual_confidence_defaults_to_certain() {
    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/emotion/analyze",
            Some(&token),
            &json!({ "emotion": "sad" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["confidence"], 1.0);
}

#[tokio::test]
async fn test_manual_unknown_emotion() {
    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/emotion/analyze",
            Some(&token),
            &json!({ "emotion": "joy" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("joy"));
}

#[tokio::test]
async fn test_manual_label_round_trips() {
    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;

    for emotion in ["surprised", "disgust", "fear"] {
        let id = app.record(&token, emotion).await;
        let (status, body) = app
            .send(get_request(&format!("/api/emotion/{id}"), Some(&token)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["emotion"], emotion);
        assert_eq!(body["id"], id);
    }
}

#[tokio::test]
async fn test_analyze_rejects_other_content_types() {
    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/emotion/analyze")
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("happy"))
        .unwrap();

    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Image uploads
// =============================================================================

#[tokio::test]
async fn test_image_upload_normalizes_label() {
    let app = TestApp::with(FakeClassifier::Label("surprise", 0.734), FakeCatalog::default()).await;
    let token = app.token_for(TEST_EMAIL).await;

    let (status, body) = app
        .send(multipart_request(&token, "image", PNG_BYTES))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["emotion"], "surprised");
    assert_eq!(body["source"], "image");
    assert_eq!(body["confidence"], 0.734);
    assert_eq!(body["label_resolution"], "resolved");
}

#[tokio::test]
async fn test_image_upload_unknown_label_defaults_to_neutral() {
    let app = TestApp::with(FakeClassifier::Label("contempt", 0.5), FakeCatalog::default()).await;
    let token = app.token_for(TEST_EMAIL).await;

    let (status, body) = app
        .send(multipart_request(&token, "image", PNG_BYTES))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "neutral");
    assert_eq!(body["label_resolution"], "defaulted");
}

#[tokio::test]
async fn test_image_without_face_is_bad_request() {
    let app = TestApp::with(FakeClassifier::NoFace, FakeCatalog::default()).await;
    let token = app.token_for(TEST_EMAIL).await;

    let (status, body) = app
        .send(multipart_request(&token, "image", PNG_BYTES))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Could not detect face or emotion in the image");
    assert_eq!(count_rows(&app.pool, "observations").await, 0);
}

#[tokio::test]
async fn test_multipart_without_image_field() {
    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;

    let (status, body) = app
        .send(multipart_request(&token, "photo", PNG_BYTES))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No image provided");
}

// =============================================================================
// Recommendations
// =============================================================================

#[tokio::test]
async fn test_recommendations_are_sampled_from_collection() {
    let app = TestApp::with(
        FakeClassifier::Label("happy", 0.9),
        FakeCatalog::with_collection("happy-mix", 12),
    )
    .await;
    vibe_storage::collections::upsert(&app.pool, "happy", "happy-mix", "Happy Mix", None)
        .await
        .unwrap();
    let token = app.token_for(TEST_EMAIL).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/emotion/analyze",
            Some(&token),
            &json!({ "emotion": "happy" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendations"], "sampled");
    assert_eq!(body["collection_id"], "happy-mix");

    let tracks = body["tracks"].as_array().unwrap();
    assert_eq!(tracks.len(), 5);
    let ids: HashSet<&str> = tracks
        .iter()
        .map(|t| t["catalog_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 5);
    let positions: Vec<i64> = tracks.iter().map(|t| t["position"].as_i64().unwrap()).collect();
    assert_eq!(positions, vec![0, 1, 2, 3, 4]);

    assert_eq!(count_rows(&app.pool, "recommended_tracks").await, 5);
}

#[tokio::test]
async fn test_small_collection_is_returned_whole() {
    let app = TestApp::with(
        FakeClassifier::Label("happy", 0.9),
        FakeCatalog::with_collection("sad-mix", 3),
    )
    .await;
    vibe_storage::collections::upsert(&app.pool, "sad", "sad-mix", "Sad Mix", Some("rainy"))
        .await
        .unwrap();
    let token = app.token_for(TEST_EMAIL).await;

    let (_, body) = app
        .send(json_request(
            "POST",
            "/api/emotion/analyze",
            Some(&token),
            &json!({ "emotion": "sad" }),
        ))
        .await;
    assert_eq!(body["tracks"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_catalog_failure_degrades_to_fallback() {
    let app = TestApp::with(FakeClassifier::Label("happy", 0.9), FakeCatalog::unavailable()).await;
    vibe_storage::collections::upsert(&app.pool, "happy", "happy-mix", "Happy Mix", None)
        .await
        .unwrap();
    let token = app.token_for(TEST_EMAIL).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/emotion/analyze",
            Some(&token),
            &json!({ "emotion": "happy" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendations"], "catalog_unavailable");
    assert_eq!(body["tracks"], json!([]));
    assert_eq!(body["collection_id"], serde_json::Value::Null);
}

// =============================================================================
// History, lookup, feedback, delete
// =============================================================================

#[tokio::test]
async fn test_history_paging_and_limit_cap() {
    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;

    let first = app.record(&token, "happy").await;
    let second = app.record(&token, "sad").await;
    let third = app.record(&token, "angry").await;

    let (_, body) = app
        .send(get_request("/api/emotion/history?limit=500", Some(&token)))
        .await;
    assert_eq!(body["limit"], 100);
    assert_eq!(body["total"], 3);
    let ids: Vec<i64> = body["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![third, second, first]);

    let (_, body) = app
        .send(get_request("/api/emotion/history?limit=2&offset=1", Some(&token)))
        .await;
    let ids: Vec<i64> = body["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(body["total"], 3);

    let (status, body) = app
        .send(get_request("/api/emotion/history?limit=-5&offset=-2", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 0);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["records"], json!([]));

    let (status, _) = app
        .send(get_request("/api/emotion/history?limit=abc", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_observations_are_private_to_owner() {
    let app = TestApp::new().await;
    let owner = app.token_for(TEST_EMAIL).await;
    let other = app.token_for("other@example.com").await;

    let id = app.record(&owner, "happy").await;

    let (status, _) = app
        .send(get_request(&format!("/api/emotion/{id}"), Some(&other)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(json_request(
            "POST",
            &format!("/api/emotion/{id}/feedback"),
            Some(&other),
            &json!({ "agrees": true }),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(bare_request("DELETE", &format!("/api/emotion/{id}"), Some(&other)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .send(get_request("/api/emotion/history", Some(&other)))
        .await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_get_missing_observation() {
    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;

    let (status, body) = app
        .send(get_request("/api/emotion/9999", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Emotion record not found");

    let (status, _) = app
        .send(get_request("/api/emotion/not-a-number", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_can_be_overwritten() {
    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;
    let id = app.record(&token, "happy").await;
    let uri = format!("/api/emotion/{id}/feedback");

    let (status, body) = app
        .send(json_request("POST", &uri, Some(&token), &json!({ "agrees": true })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedback"], true);

    let (_, body) = app
        .send(json_request("POST", &uri, Some(&token), &json!({ "agrees": false })))
        .await;
    assert_eq!(body["feedback"], false);

    let (status, _) = app
        .send(json_request("POST", &uri, Some(&token), &json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(json_request("POST", &uri, Some(&token), &json!({ "agrees": "yes" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_observation_removes_tracks() {
    let app = TestApp::with(
        FakeClassifier::Label("happy", 0.9),
        FakeCatalog::with_collection("happy-mix", 8),
    )
    .await;
    vibe_storage::collections::upsert(&app.pool, "happy", "happy-mix", "Happy Mix", None)
        .await
        .unwrap();
    let token = app.token_for(TEST_EMAIL).await;
    let id = app.record(&token, "happy").await;
    assert_eq!(count_rows(&app.pool, "recommended_tracks").await, 5);

    let (status, body) = app
        .send(bare_request("DELETE", &format!("/api/emotion/{id}"), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = app
        .send(get_request(&format!("/api/emotion/{id}"), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(count_rows(&app.pool, "recommended_tracks").await, 0);
}

// =============================================================================
// Account deletion
// =============================================================================

#[tokio::test]
async fn test_delete_account_cascades() {
    let app = TestApp::with(
        FakeClassifier::Label("happy", 0.9),
        FakeCatalog::with_collection("happy-mix", 8),
    )
    .await;
    vibe_storage::collections::upsert(&app.pool, "happy", "happy-mix", "Happy Mix", None)
        .await
        .unwrap();
    let token = app.token_for(TEST_EMAIL).await;
    let survivor = app.token_for("keep@example.com").await;

    app.record(&token, "happy").await;
    app.record(&token, "sad").await;
    app.record(&survivor, "happy").await;

    let (status, _) = app
        .send(json_request("DELETE", "/api/auth/account", Some(&token), &json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(json_request(
            "DELETE",
            "/api/auth/account",
            Some(&token),
            &json!({ "password": "wrongpassword" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(json_request(
            "DELETE",
            "/api/auth/account",
            Some(&token),
            &json!({ "password": TEST_PASSWORD }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(count_rows(&app.pool, "users").await, 1);
    assert_eq!(count_rows(&app.pool, "observations").await, 1);
    assert_eq!(count_rows(&app.pool, "recommended_tracks").await, 5);

    // The token is still well-formed but its user is gone
    let (status, body) = app
        .send(get_request("/api/emotion/history", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User for this token no longer exists");

    let (status, _) = app.login(TEST_EMAIL, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_account_reports_user_removed_concurrently() {
    use axum::{extract::State, Json};
    use vibe_server::api::auth::{delete_account, DeleteAccountRequest};
    use vibe_server::middleware::AuthenticatedUser;

    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;
    let user_id = app.auth_service.verify_token(&token).unwrap();
    let user = vibe_storage::users::get_by_id(&app.pool, user_id)
        .await
        .unwrap()
        .unwrap();

    // Another request removes the account after this one authenticated
    assert!(vibe_storage::users::delete(&app.pool, user_id).await.unwrap());

    let result = delete_account(
        State(app.state.clone()),
        AuthenticatedUser(user),
        Ok(Json(DeleteAccountRequest {
            password: Some(TEST_PASSWORD.to_string()),
        })),
    )
    .await;

    assert!(matches!(result, Err(ServerError::Auth(_))));
    assert_eq!(count_rows(&app.pool, "users").await, 0);
}

// =============================================================================
// Analytics
// =============================================================================

#[tokio::test]
async fn test_analytics_for_new_user_are_empty() {
    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;

    let (status, body) = app
        .send(get_request("/api/analytics/distribution", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "distribution": {} }));

    let (_, body) = app
        .send(get_request("/api/analytics/by-hour", Some(&token)))
        .await;
    assert_eq!(body, json!({ "by_hour": {} }));

    let (_, body) = app
        .send(get_request("/api/analytics/by-day", Some(&token)))
        .await;
    assert_eq!(body, json!({ "by_day": {} }));
}

#[tokio::test]
async fn test_analytics_reflect_recorded_observations() {
    let app = TestApp::new().await;
    let token = app.token_for(TEST_EMAIL).await;

    app.record(&token, "happy").await;
    app.record(&token, "happy").await;
    app.record(&token, "sad").await;

    let (_, body) = app
        .send(get_request("/api/analytics/distribution", Some(&token)))
        .await;
    assert_eq!(body["distribution"]["happy"], 66.67);
    assert_eq!(body["distribution"]["sad"], 33.33);

    for (uri, key) in [
        ("/api/analytics/by-hour", "by_hour"),
        ("/api/analytics/by-day", "by_day"),
    ] {
        let (status, body) = app.send(get_request(uri, Some(&token))).await;
        assert_eq!(status, StatusCode::OK);

        let total: i64 = body[key]
            .as_object()
            .unwrap()
            .values()
            .flat_map(|per_label| per_label.as_object().unwrap().values())
            .map(|count| count.as_i64().unwrap())
            .sum();
        assert_eq!(total, 3, "{uri}");
    }
}

#[tokio::test]
async fn test_analytics_require_auth() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(get_request("/api/analytics/by-hour", None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
