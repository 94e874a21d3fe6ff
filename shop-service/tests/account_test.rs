mod common;

use axum::body::Body;
use axum::http::{header, StatusCode};
use serde_json::json;
use tower::util::ServiceExt;

use common::{json_request, read_json, request, spawn_app};
use shop_service::models::Product;

async fn register(app: &common::TestApp, email: &str) -> (String, String) {
    let response = app
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({ "name": "Asha", "email": email, "password": "correct-horse-9" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[tokio::test]
async fn profile_requires_authentication() {
    let app = spawn_app().await;

    let response = app
        .app
        .clone()
        .oneshot(request("GET", "/api/users/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .app
        .clone()
        .oneshot(
            request("GET", "/api/users/me")
                .header(header::AUTHORIZATION, "Bearer bogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    app.teardown().await;
}

#[tokio::test]
async fn profile_round_trip() {
    let app = spawn_app().await;
    let (access, _) = register(&app, "profile@example.com").await;

    let response = app
        .app
        .clone()
        .oneshot(
            request("GET", "/api/users/me")
                .header(header::AUTHORIZATION, bearer(&access))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["user"]["email"], "profile@example.com");
    assert!(body["user"].get("password_hash").is_none());

    let response = app
        .app
        .clone()
        .oneshot(
            request("PUT", "/api/users/me")
                .header(header::AUTHORIZATION, bearer(&access))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "name": "Asha K", "phone": "555-0101" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["name"], "Asha K");
    assert_eq!(body["phone"], "555-0101");

    app.teardown().await;
}

#[tokio::test]
async fn token_for_a_deleted_account_is_rejected() {
    let app = spawn_app().await;
    let (access, user_id) = register(&app, "gone@example.com").await;

    app.db
        .users()
        .delete_one(mongodb::bson::doc! { "_id": &user_id }, None)
        .await
        .unwrap();

    let response = app
        .app
        .clone()
        .oneshot(
            request("GET", "/api/users/me")
                .header(header::AUTHORIZATION, bearer(&access))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    app.teardown().await;
}

#[tokio::test]
async fn address_lifecycle() {
    let app = spawn_app().await;
    let (access, _) = register(&app, "address@example.com").await;

    let create = json!({
        "label": "home",
        "line1": "12 Craft Lane",
        "city": "Jaipur",
        "state": "Rajasthan",
        "postal_code": "302001",
        "is_default": true,
    });
    let response = app
        .app
        .clone()
        .oneshot(
            request("POST", "/api/users/address")
                .header(header::AUTHORIZATION, bearer(&access))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(create.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    let address_id = created["_id"].as_str().unwrap().to_string();
    assert_eq!(created["country"], "India");
    assert_eq!(created["is_default"], true);

    // Second default displaces the first
    let second = json!({
        "line1": "4 Loom Street",
        "city": "Kochi",
        "state": "Kerala",
        "postal_code": "682001",
        "is_default": true,
    });
    let response = app
        .app
        .clone()
        .oneshot(
            request("POST", "/api/users/address")
                .header(header::AUTHORIZATION, bearer(&access))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(second.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Addresses come back with the profile
    let response = app
        .app
        .clone()
        .oneshot(
            request("GET", "/api/users/me")
                .header(header::AUTHORIZATION, bearer(&access))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let profile = read_json(response).await;
    let addresses = profile["addresses"].as_array().unwrap();
    let defaults: Vec<_> = addresses
        .iter()
        .filter(|a| a["is_default"] == true)
        .collect();
    assert_eq!(addresses.len(), 2);
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["city"], "Kochi");

    // Update
    let response = app
        .app
        .clone()
        .oneshot(
            request("PUT", &format!("/api/users/address/{}", address_id))
                .header(header::AUTHORIZATION, bearer(&access))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "city": "Udaipur" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    assert_eq!(updated["city"], "Udaipur");

    // Delete
    let response = app
        .app
        .clone()
        .oneshot(
            request("DELETE", &format!("/api/users/address/{}", address_id))
                .header(header::AUTHORIZATION, bearer(&access))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .app
        .clone()
        .oneshot(
            request("DELETE", &format!("/api/users/address/{}", address_id))
                .header(header::AUTHORIZATION, bearer(&access))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.teardown().await;
}

#[tokio::test]
async fn addresses_are_scoped_to_their_owner() {
    let app = spawn_app().await;
    let (owner, _) = register(&app, "owner@example.com").await;
    let (intruder, _) = register(&app, "intruder@example.com").await;

    let create = json!({
        "line1": "12 Craft Lane",
        "city": "Jaipur",
        "state": "Rajasthan",
        "postal_code": "302001",
    });
    let response = app
        .app
        .clone()
        .oneshot(
            request("POST", "/api/users/address")
                .header(header::AUTHORIZATION, bearer(&owner))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(create.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let address_id = read_json(response).await["_id"].as_str().unwrap().to_string();

    let response = app
        .app
        .clone()
        .oneshot(
            request("PUT", &format!("/api/users/address/{}", address_id))
                .header(header::AUTHORIZATION, bearer(&intruder))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "city": "Elsewhere" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.teardown().await;
}

#[tokio::test]
async fn wishlist_add_is_idempotent_and_remove_is_lenient() {
    let app = spawn_app().await;
    let (access, _) = register(&app, "wishlist@example.com").await;

    let product = Product::new(
        "Terracotta Vase".to_string(),
        "terracotta-vase".to_string(),
        "Hand-thrown vase".to_string(),
        "SKU-001".to_string(),
        1200.0,
        "cat-1".to_string(),
    );
    app.db.products().insert_one(&product, None).await.unwrap();

    // Unknown product
    let response = app
        .app
        .clone()
        .oneshot(
            request("POST", "/api/users/wishlist")
                .header(header::AUTHORIZATION, bearer(&access))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "productId": "missing" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Add twice, stored once
    for _ in 0..2 {
        let response = app
            .app
            .clone()
            .oneshot(
                request("POST", "/api/users/wishlist")
                    .header(header::AUTHORIZATION, bearer(&access))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "productId": product.id }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["product_ids"], json!([product.id.clone()]));
    }

    // Remove, then remove again
    for _ in 0..2 {
        let response = app
            .app
            .clone()
            .oneshot(
                request("DELETE", &format!("/api/users/wishlist/{}", product.id))
                    .header(header::AUTHORIZATION, bearer(&access))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["product_ids"], json!([]));
    }

    app.teardown().await;
}
