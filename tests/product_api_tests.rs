mod common;

use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    Router,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use common::{body_json, body_text, expect_text, send, send_raw};
use product_demo::{product_repository, router, AppState, MemoryStore, Product, Repository};

fn create_test_app() -> (Router, Arc<MemoryStore<Product>>) {
    let store = Arc::new(MemoryStore::<Product>::new());
    let state = AppState::new(Arc::new(product_repository(store.clone())));
    (router(state), store)
}

#[tokio::test]
async fn test_create_get_all_get_update_delete() {
    let (app, store) = create_test_app();
    assert!(store.is_empty().await);

    // 创建
    let response = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "name1", "description": "desc1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/api/products/1");
    let created = body_json(response).await;
    assert_eq!(created, json!({ "id": 1, "name": "name1", "description": "desc1" }));
    assert_eq!(store.len().await, 1);

    // 获取全部
    let response = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([created.clone()]));

    // 按 id 获取
    let response = send(&app, Method::GET, "/api/products/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    // 更新
    let response = send(
        &app,
        Method::PUT,
        "/api/products/1",
        Some(json!({ "id": 1, "name": "new name1", "description": "new description1" })),
    )
    .await;
    expect_text(response, StatusCode::OK, "").await;

    let response = send(&app, Method::GET, "/api/products/1", None).await;
    assert_eq!(
        body_json(response).await,
        json!({ "id": 1, "name": "new name1", "description": "new description1" })
    );
    assert_eq!(store.len().await, 1);

    // 删除
    let response = send(&app, Method::DELETE, "/api/products/1", None).await;
    expect_text(response, StatusCode::OK, "").await;
    assert!(store.is_empty().await);

    let response = send(&app, Method::GET, "/api/products/1", None).await;
    expect_text(response, StatusCode::NOT_FOUND, "Product with Id = 1 not found").await;
}

#[tokio::test]
async fn test_empty_store_lists_empty_array() {
    let (app, _) = create_test_app();

    let response = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_created_ids_are_fresh_and_retrievable() {
    let (app, _) = create_test_app();
    let mut seen = Vec::new();

    for i in 0..5 {
        let response = send(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({ "name": format!("name{}", i) })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = body_json(response).await["id"].as_i64().unwrap();
        assert!(!seen.contains(&id));
        seen.push(id);

        let response = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // 删除后 id 不复用
    send(&app, Method::DELETE, "/api/products/5", None).await;
    let response = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "again" })),
    )
    .await;
    assert_eq!(body_json(response).await["id"], 6);
}

#[tokio::test]
async fn test_update_leaves_other_products_untouched() {
    let (app, _) = create_test_app();
    for name in ["first", "second"] {
        send(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({ "name": name, "description": "d" })),
        )
        .await;
    }

    let response = send(
        &app,
        Method::PUT,
        "/api/products/1",
        Some(json!({ "name": "new name1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(
        body_json(response).await,
        json!([
            { "id": 1, "name": "new name1", "description": null },
            { "id": 2, "name": "second", "description": "d" }
        ])
    );
}

#[tokio::test]
async fn test_create_encodes_markup() {
    let (app, store) = create_test_app();
    let attack = "<img src=x onerror=alert('XSS')>";

    let response = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": attack, "description": attack })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let returned = body_json(response).await;

    let repository = product_repository(store);
    let stored = repository
        .get_all(&CancellationToken::new())
        .await
        .unwrap()
        .remove(0);

    for value in [
        returned["name"].as_str().unwrap(),
        returned["description"].as_str().unwrap(),
        stored.name.as_str(),
        stored.description.as_deref().unwrap(),
    ] {
        assert!(!value.contains('<'));
        assert!(!value.contains('>'));
        assert!(!value.contains('\''));
    }
    assert_eq!(stored.name, "&lt;img src=x onerror=alert(&#39;XSS&#39;)&gt;");
}

#[tokio::test]
async fn test_update_encodes_markup() {
    let (app, _) = create_test_app();
    send(&app, Method::POST, "/api/products", Some(json!({ "name": "n" }))).await;

    let response = send(
        &app,
        Method::PUT,
        "/api/products/1",
        Some(json!({ "name": "<b>bold</b>", "description": "it's" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::GET, "/api/products/1", None).await;
    assert_eq!(
        body_json(response).await,
        json!({ "id": 1, "name": "&lt;b&gt;bold&lt;/b&gt;", "description": "it&#39;s" })
    );
}

#[tokio::test]
async fn test_invalid_bodies_are_rejected() {
    let (app, store) = create_test_app();

    let response = send_raw(&app, Method::POST, "/api/products", "null").await;
    expect_text(response, StatusCode::BAD_REQUEST, "Invalid model object").await;

    let response = send_raw(&app, Method::POST, "/api/products", "{not json").await;
    expect_text(response, StatusCode::BAD_REQUEST, "Invalid model object").await;

    let response = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "description": "no name" })),
    )
    .await;
    expect_text(response, StatusCode::BAD_REQUEST, "Invalid model object").await;

    let response = send(&app, Method::POST, "/api/products", Some(json!({ "name": "" }))).await;
    expect_text(response, StatusCode::BAD_REQUEST, "Invalid model object").await;

    let response = send(&app, Method::POST, "/api/products", None).await;
    expect_text(response, StatusCode::BAD_REQUEST, "Invalid model object").await;

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_update_validation_and_not_found() {
    let (app, _) = create_test_app();
    send(&app, Method::POST, "/api/products", Some(json!({ "name": "n" }))).await;

    let response = send(&app, Method::PUT, "/api/products/1", Some(json!({ "name": "" }))).await;
    expect_text(response, StatusCode::BAD_REQUEST, "Invalid model object").await;

    let response = send(
        &app,
        Method::PUT,
        "/api/products/1",
        Some(json!({ "id": 2, "name": "x" })),
    )
    .await;
    expect_text(response, StatusCode::BAD_REQUEST, "Product ID mismatch").await;

    let response = send(
        &app,
        Method::PUT,
        "/api/products/42",
        Some(json!({ "name": "x" })),
    )
    .await;
    expect_text(response, StatusCode::NOT_FOUND, "Product with Id = 42 not found").await;
}

#[tokio::test]
async fn test_delete_missing_product_is_not_found() {
    let (app, _) = create_test_app();

    let response = send(&app, Method::DELETE, "/api/products/-10", None).await;
    expect_text(response, StatusCode::NOT_FOUND, "Product with Id = -10 not found").await;
}

#[tokio::test]
async fn test_non_integer_id_does_not_match() {
    let (app, _) = create_test_app();

    for method in [Method::GET, Method::DELETE] {
        let response = send(&app, method, "/api/products/abc", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "");
    }
}
