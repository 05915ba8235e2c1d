//! Catalog client tests against a mock REST endpoint.

use reqwest::StatusCode;
use serde_json::json;
use storefront_catalog::{CatalogError, retry::RetryConfig};
use storefront_core::{LoadFailure, LoadState};
use storefront_types::{CategoryId, Money, Product, ProductId};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{
    ANON_KEY, catalog_client, catalog_client_with_retry, mount_products, product_row,
    start_catalog_mock,
};

#[tokio::test]
async fn list_products_sends_auth_and_embeds_category() {
    let server = start_catalog_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .and(query_param("select", "*,categories(name,slug)"))
        .and(query_param_is_missing("categories.slug"))
        .and(header("apikey", ANON_KEY))
        .and(header("authorization", format!("Bearer {ANON_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_row(1, "Ultrabook", 1299.99, 1),
            product_row(2, "Phone", 799.0, 2),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let products = catalog_client(&server).list_products(None).await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, ProductId::from("1"));
    assert_eq!(products[0].price, Money::from_cents(129_999));
    assert_eq!(
        products[0].categories.as_ref().map(|c| c.slug.as_str()),
        Some("laptops")
    );
}

#[tokio::test]
async fn category_filter_is_lowercased_and_inner_joined() {
    let server = start_catalog_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .and(query_param("select", "*,categories!inner(name,slug)"))
        .and(query_param("categories.slug", "eq.laptops"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product_row(1, "Ultrabook", 999.0, 1)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let products = catalog_client(&server)
        .list_products(Some("Laptops"))
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn empty_category_means_no_filter() {
    let server = start_catalog_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .and(query_param_is_missing("categories.slug"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let products = catalog_client(&server)
        .list_products(Some("  "))
        .await
        .unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn get_product_requests_single_object() {
    let server = start_catalog_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .and(query_param("id", "eq.42"))
        .and(header("accept", "application/vnd.pgrst.object+json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(product_row(42, "Camera", 450.5, 5)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let product = catalog_client(&server)
        .get_product(&ProductId::from("42"))
        .await
        .unwrap();
    assert_eq!(product.name, "Camera");
    assert_eq!(product.price, Money::from_cents(45_050));
    assert_eq!(product.category_id, Some(CategoryId::new("5")));
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let server = start_catalog_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(406).set_body_json(json!({
            "code": "PGRST116",
            "message": "JSON object requested, multiple (or no) rows returned"
        })))
        .mount(&server)
        .await;

    let err = catalog_client(&server)
        .get_product(&ProductId::from("404"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));

    let state: LoadState<Product> = LoadState::from_result(Err::<Product, _>(err));
    assert_eq!(state, LoadState::NotFound);
}

#[tokio::test]
async fn malformed_id_is_not_found() {
    let server = start_catalog_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "22P02",
            "message": "invalid input syntax for type uuid: \"abc\""
        })))
        .mount(&server)
        .await;

    let err = catalog_client(&server)
        .get_product(&ProductId::from("abc"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));
}

#[tokio::test]
async fn recommendations_exclude_current_and_limit_four() {
    let server = start_catalog_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .and(query_param("select", "*"))
        .and(query_param("category_id", "eq.3"))
        .and(query_param("id", "neq.7"))
        .and(query_param("limit", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_row(8, "Watch A", 199.0, 3),
            product_row(9, "Watch B", 249.0, 3),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let products = catalog_client(&server)
        .recommended_products(&CategoryId::new("3"), &ProductId::from("7"))
        .await
        .unwrap();
    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["8", "9"]);
}

#[tokio::test]
async fn string_ids_and_null_columns_decode() {
    let server = start_catalog_mock().await;
    mount_products(
        &server,
        json!([{
            "id": "5b0f7f0e-8a57-4c3f-9d61-8f0f5e0d2a11",
            "name": "Speaker",
            "description": null,
            "price": 59.9,
            "image_url": null,
            "category_id": "c-4",
            "stock": null,
            "rating": null,
            "reviews_count": null
        }]),
    )
    .await;

    let products = catalog_client(&server).list_products(None).await.unwrap();
    let speaker = &products[0];
    assert_eq!(speaker.id.as_str(), "5b0f7f0e-8a57-4c3f-9d61-8f0f5e0d2a11");
    assert_eq!(speaker.price, Money::from_cents(5990));
    assert_eq!(speaker.description, "");
    assert_eq!(speaker.stock, 0);
    assert!(speaker.categories.is_none());
}

#[tokio::test]
async fn server_error_is_http_error_with_message() {
    let server = start_catalog_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "message": "database offline" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = catalog_client(&server)
        .list_products(None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));

    match err.into_load_failure("products") {
        LoadFailure::Failed(message) => {
            assert!(message.as_str().starts_with("[Loading failed]"));
            assert!(message.as_str().contains("database offline"));
        }
        LoadFailure::NotFound => panic!("expected a failure message"),
    }
}

#[tokio::test]
async fn invalid_payload_is_decode_error() {
    let server = start_catalog_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = catalog_client(&server)
        .list_products(None)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Decode(_)));
}

#[tokio::test]
async fn retry_is_opt_in() {
    let server = start_catalog_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product_row(1, "Ultrabook", 10.0, 1)])),
        )
        .mount(&server)
        .await;

    // Default policy: the first failure is final.
    let err = catalog_client(&server)
        .list_products(None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product_row(1, "Ultrabook", 10.0, 1)])),
        )
        .mount(&server)
        .await;

    let products = catalog_client_with_retry(&server, RetryConfig::standard())
        .list_products(None)
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
}
