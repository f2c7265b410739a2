//! Products API client against a mock API.

use std::sync::Arc;
use std::time::Duration;

use catalog_storefront::api::{ApiError, NewProduct, ProductClient};
use catalog_storefront::catalog::CollectionStore;
use catalog_storefront::config::ApiConfig;
use serde_json::json;

mod common;

fn client_for(base_url: String) -> ProductClient {
    ProductClient::new(&ApiConfig {
        base_url,
        request_timeout_secs: Some(5),
        ..ApiConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_list_decodes_products() {
    let api = common::MockApi::start(vec![
        common::product(1, "Chair", 50.0, "chair.png", "wooden"),
        json!({"id": 2, "title": "Lamp", "price": "20", "img": "lamp.png"}),
    ])
    .await;
    let client = client_for(api.base_url());

    let products = client.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].title, "Chair");
    assert_eq!(products[0].description, "wooden");
    assert_eq!(products[1].price, 20.0);
    assert_eq!(products[1].description, "");
    assert_eq!(api.count("GET", "/products"), 1);
}

#[tokio::test]
async fn test_get_missing_product_is_not_found() {
    let api = common::MockApi::start(vec![]).await;
    let client = client_for(api.base_url());

    let err = client.get_product(9).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(9)));
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let addr = common::start_programmable_backend(200, "{not json").await;
    let client = client_for(format!("http://{}", addr));

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }), "got {err:?}");
    assert_eq!(err.kind(), "decode");
}

#[tokio::test]
async fn test_server_error_status_is_reported() {
    let addr = common::start_programmable_backend(500, "").await;
    let client = client_for(format!("http://{}", addr));

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }), "got {err:?}");
}

#[tokio::test]
async fn test_create_sends_product_as_json() {
    let api = common::MockApi::start(vec![]).await;
    let client = client_for(api.base_url());

    let ack = client
        .create_product(&NewProduct {
            title: "Lamp".into(),
            price: 20.0,
            img: "lamp.png".into(),
            description: "desk lamp".into(),
        })
        .await
        .unwrap();
    assert_eq!(ack.0["id"], json!(1));

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(
        requests[0].content_type.as_deref(),
        Some("application/json; charset=UTF-8")
    );
    assert_eq!(
        requests[0].body,
        Some(json!({
            "title": "Lamp",
            "price": 20.0,
            "img": "lamp.png",
            "description": "desk lamp",
        }))
    );
}

#[tokio::test]
async fn test_delete_twice() {
    let api = common::MockApi::start(vec![common::product(1, "Chair", 50.0, "chair.png", "")]).await;
    let client = client_for(api.base_url());

    client.delete_product(1).await.unwrap();
    let err = client.delete_product(1).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(1)));
    assert_eq!(api.count("DELETE", "/products/1"), 2);
    assert!(api.products().is_empty());
}

#[tokio::test]
async fn test_empty_acknowledgement_is_accepted() {
    let addr = common::start_programmable_backend(200, "").await;
    let client = client_for(format!("http://{}", addr));

    let ack = client.delete_product(3).await.unwrap();
    assert!(ack.0.is_null());
}

#[tokio::test]
async fn test_last_resolved_list_wins() {
    let api = common::MockApi::start(vec![common::product(1, "Chair", 50.0, "chair.png", "")]).await;
    let client = client_for(api.base_url());
    let store = Arc::new(CollectionStore::new());

    api.delay_next_list(Duration::from_millis(400));
    let slow = store.reload(&client);
    let fast = async {
        // let the slow request reach the API first
        tokio::time::sleep(Duration::from_millis(100)).await;
        api.insert(common::product(2, "Lamp", 20.0, "lamp.png", ""));
        store.reload(&client).await
    };

    let (slow, fast) = tokio::join!(slow, fast);
    assert_eq!(fast.unwrap().len(), 2);
    assert_eq!(slow.unwrap().len(), 1);

    let current = store.snapshot();
    assert_eq!(current.len(), 1);
    assert_eq!(current.generation(), 2);
}
