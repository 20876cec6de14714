//! Admin API tests.
//!
//! Auth and validation tests run in-process without a database: every
//! rejection they exercise happens before the first query. The
//! `#[ignore]`d tests need a `PostgreSQL` database in `DATABASE_URL`.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

use nature_pharmacy_admin::db::{MIGRATOR, ZoneRepository};
use nature_pharmacy_admin::state::AppState;
use nature_pharmacy_core::Locale;
use nature_pharmacy_core::shipping::ZoneDraft;
use nature_pharmacy_integration_tests::{
    ADMIN_TOKEN, admin_app, admin_config, body_json, empty_request, json_request, send,
};

fn zone_body() -> Value {
    json!({
        "name": { "fr": "Dakar", "en": "Dakar", "es": "Dakar" },
        "countries": ["sn"],
        "regions": ["  Dakar "],
        "shippingCost": 1000,
        "estimatedDeliveryDays": { "min": 1, "max": 2 },
        "priority": 2
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let response = send(admin_app(), empty_request("GET", "/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_requires_token() {
    for (method, uri) in [
        ("GET", "/api/shipping-zones"),
        ("GET", "/api/shipping-zones/1"),
        ("DELETE", "/api/shipping-zones/1"),
        ("GET", "/api/coupons"),
        ("POST", "/api/coupons/1/deactivate"),
    ] {
        let response = send(admin_app(), empty_request(method, uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(response.headers().get("www-authenticate").unwrap(), "Bearer");
    }
}

#[tokio::test]
async fn test_api_rejects_wrong_token() {
    let response = send(
        admin_app(),
        empty_request("GET", "/api/shipping-zones", Some("not-the-token")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "invalid bearer token");
}

#[tokio::test]
async fn test_create_zone_rejects_inverted_delivery_window() {
    let mut body = zone_body();
    body["estimatedDeliveryDays"] = json!({ "min": 5, "max": 2 });

    let response = send(
        admin_app(),
        json_request("POST", "/api/shipping-zones", &body, Some(ADMIN_TOKEN)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Bad request: delivery window is inverted (min 5 > max 2)"
    );
}

#[tokio::test]
async fn test_create_zone_rejects_duplicate_country() {
    let mut body = zone_body();
    body["countries"] = json!(["SN", "sn"]);

    let response = send(
        admin_app(),
        json_request("POST", "/api/shipping-zones", &body, Some(ADMIN_TOKEN)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_zone_rejects_malformed_country() {
    let mut body = zone_body();
    body["countries"] = json!(["SEN"]);

    let response = send(
        admin_app(),
        json_request("POST", "/api/shipping-zones", &body, Some(ADMIN_TOKEN)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Bad request: "));
}

#[tokio::test]
async fn test_non_json_body_is_bad_request() {
    let mut request = empty_request("POST", "/api/coupons", Some(ADMIN_TOKEN));
    *request.body_mut() = axum::body::Body::from("code=SPRING");

    let response = send(admin_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_reorder_rejects_duplicates() {
    let body = json!({ "ids": [3, 1, 3] });
    let response = send(
        admin_app(),
        json_request("POST", "/api/shipping-zones/reorder", &body, Some(ADMIN_TOKEN)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_coupon_rejects_bad_discounts() {
    for discount in [
        json!({ "type": "percentage", "value": 0 }),
        json!({ "type": "percentage", "value": 10001 }),
        json!({ "type": "fixed_amount", "value": 0 }),
    ] {
        let body = json!({ "code": "SPRING", "discount": discount });
        let response = send(
            admin_app(),
            json_request("POST", "/api/coupons", &body, Some(ADMIN_TOKEN)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{discount}");
    }
}

#[tokio::test]
async fn test_create_coupon_rejects_inverted_window() {
    let body = json!({
        "code": "SPRING",
        "discount": { "type": "percentage", "value": 1500 },
        "startsAt": "2026-05-01T00:00:00Z",
        "expiresAt": "2026-04-01T00:00:00Z"
    });
    let response = send(
        admin_app(),
        json_request("POST", "/api/coupons", &body, Some(ADMIN_TOKEN)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_database_failure_is_hidden() {
    let response = send(
        admin_app(),
        empty_request("GET", "/api/shipping-zones", Some(ADMIN_TOKEN)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Internal server error");
}

#[tokio::test]
async fn test_security_headers() {
    let response = send(admin_app(), empty_request("GET", "/health", None)).await;
    let headers = response.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("referrer-policy").unwrap(), "no-referrer");
}

// ============================================================================
// Database-backed tests
// ============================================================================

async fn database_app() -> axum::Router {
    let url = std::env::var("DATABASE_URL").unwrap();
    let pool = PgPool::connect(&url).await.unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    nature_pharmacy_admin::app(AppState::new(admin_config(&url), pool))
}

#[tokio::test]
#[ignore = "Requires PostgreSQL in DATABASE_URL"]
async fn test_zone_lifecycle() {
    let app = database_app().await;

    let response = send(
        app.clone(),
        json_request("POST", "/api/shipping-zones", &zone_body(), Some(ADMIN_TOKEN)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["countries"], json!(["SN"]));
    assert_eq!(created["regions"], json!(["Dakar"]));

    let mut update = zone_body();
    update["shippingCost"] = json!(1500);
    update["isActive"] = json!(false);
    let response = send(
        app.clone(),
        json_request(
            "PUT",
            &format!("/api/shipping-zones/{id}"),
            &update,
            Some(ADMIN_TOKEN),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["shippingCost"], 1500);
    assert_eq!(updated["isActive"], false);

    let response = send(
        app.clone(),
        empty_request(
            "DELETE",
            &format!("/api/shipping-zones/{id}"),
            Some(ADMIN_TOKEN),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        app,
        empty_request(
            "GET",
            &format!("/api/shipping-zones/{id}"),
            Some(ADMIN_TOKEN),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL in DATABASE_URL"]
async fn test_reorder_assigns_list_priorities() {
    let app = database_app().await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let response = send(
            app.clone(),
            json_request("POST", "/api/shipping-zones", &zone_body(), Some(ADMIN_TOKEN)),
        )
        .await;
        ids.push(body_json(response).await["id"].as_i64().unwrap());
    }
    let [first, second, third]: [i64; 3] = ids.try_into().unwrap();

    // Only two of the three zones are named; the third must not tie with them.
    let response = send(
        app.clone(),
        json_request(
            "POST",
            "/api/shipping-zones/reorder",
            &json!({ "ids": [third, second] }),
            Some(ADMIN_TOKEN),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let zones = body_json(response).await;
    let priority_of = |id: i64| {
        zones
            .as_array()
            .unwrap()
            .iter()
            .find(|z| z["id"] == id)
            .and_then(|z| z["priority"].as_i64())
            .unwrap()
    };
    assert_eq!(priority_of(third), 1);
    assert_eq!(priority_of(second), 2);
    assert!(priority_of(first) > 2);

    let order: Vec<i64> = zones
        .as_array()
        .unwrap()
        .iter()
        .map(|z| z["id"].as_i64().unwrap())
        .collect();
    let position = |id: i64| order.iter().position(|&z| z == id).unwrap();
    assert!(position(third) < position(second));
    assert!(position(second) < position(first));

    let response = send(
        app,
        json_request(
            "POST",
            "/api/shipping-zones/reorder",
            &json!({ "ids": [i32::MAX] }),
            Some(ADMIN_TOKEN),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL in DATABASE_URL"]
async fn test_create_all_is_all_or_nothing() {
    let url = std::env::var("DATABASE_URL").unwrap();
    let pool = PgPool::connect(&url).await.unwrap();
    MIGRATOR.run(&pool).await.unwrap();

    let label = format!("Batch {}", chrono::Utc::now().timestamp_micros());
    let mut body = zone_body();
    body["name"] = json!({ "fr": label, "en": label, "es": label });
    let good: ZoneDraft = serde_json::from_value(body).unwrap();
    // Skips validation, so the database CHECK on countries rejects it.
    let mut bad = good.clone();
    bad.countries.clear();

    let repo = ZoneRepository::new(&pool);
    assert!(repo.create_all(&[good.clone(), bad]).await.is_err());
    let leaked = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .any(|z| z.name.get(Locale::En) == label);
    assert!(!leaked);

    let created = repo.create_all(&[good]).await.unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name.get(Locale::En), label);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL in DATABASE_URL"]
async fn test_coupon_lifecycle() {
    let app = database_app().await;
    let code = format!("IT{}", chrono::Utc::now().timestamp_micros());
    let body = json!({
        "code": code.to_lowercase(),
        "discount": { "type": "fixed_amount", "value": 2500 },
        "usageLimit": 10
    });

    let response = send(
        app.clone(),
        json_request("POST", "/api/coupons", &body, Some(ADMIN_TOKEN)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["code"], code);
    assert_eq!(created["usedCount"], 0);
    assert_eq!(created["isActive"], true);

    let response = send(
        app.clone(),
        json_request("POST", "/api/coupons", &body, Some(ADMIN_TOKEN)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let id = created["id"].as_i64().unwrap();
    let response = send(
        app,
        empty_request(
            "POST",
            &format!("/api/coupons/{id}/deactivate"),
            Some(ADMIN_TOKEN),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["isActive"], false);
}
