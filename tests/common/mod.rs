//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{Value, json};
use storefront_catalog::{CatalogClient, CatalogConfig, retry::RetryConfig};
use storefront_types::{Money, ProductId, ProductRef};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ANON_KEY: &str = "test-anon-key";

/// Start a mock server that simulates the catalog REST API
pub async fn start_catalog_mock() -> MockServer {
    MockServer::start().await
}

/// A client pointed at the mock server with the default (single attempt) policy
pub fn catalog_client(server: &MockServer) -> CatalogClient {
    catalog_client_with_retry(server, RetryConfig::default())
}

pub fn catalog_client_with_retry(server: &MockServer, retry: RetryConfig) -> CatalogClient {
    let retry = RetryConfig {
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        ..retry
    };
    let config = CatalogConfig::new(&server.uri(), ANON_KEY)
        .unwrap()
        .with_retry(retry);
    CatalogClient::new(config).unwrap()
}

/// A product row as the catalog returns it
pub fn product_row(id: u64, name: &str, price: f64, category_id: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "price": price,
        "image_url": format!("https://cdn.example/{id}.jpg"),
        "category_id": category_id,
        "created_at": "2024-01-01T00:00:00Z",
        "stock": 5,
        "rating": 4.2,
        "reviews_count": 12,
        "categories": { "name": "Laptops", "slug": "laptops" }
    })
}

/// Mount a product listing response
pub async fn mount_products(server: &MockServer, rows: Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

/// A cart line reference with a whole-unit price
pub fn item(id: &str, price: u64) -> ProductRef {
    ProductRef {
        id: ProductId::from(id),
        name: format!("Product {id}"),
        price: Money::from_major(price),
        image: format!("https://cdn.example/{id}.jpg"),
    }
}
