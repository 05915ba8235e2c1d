//! Listing filter over catalog results.

use serde_json::json;
use storefront_types::{PriceRange, Product, ProductFilter, SortBy};

use crate::common::{catalog_client, mount_products, product_row, start_catalog_mock};

fn names<'a>(products: &[&'a Product]) -> Vec<&'a str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn filter_and_sort_catalog_listing() {
    let server = start_catalog_mock().await;
    let mut rows = vec![
        product_row(1, "Budget", 49.0, 1),
        product_row(2, "Midrange", 450.0, 1),
        product_row(3, "Flagship", 1450.0, 1),
        product_row(4, "Popular", 300.0, 1),
    ];
    rows[3]["reviews_count"] = json!(900);
    mount_products(&server, json!(rows)).await;

    let products = catalog_client(&server).list_products(None).await.unwrap();

    // Default window is [0, 1000] in catalog order.
    let mut filter = ProductFilter::default();
    assert_eq!(
        names(&filter.apply(&products)),
        ["Budget", "Midrange", "Popular"]
    );

    filter.sort_by = SortBy::PriceHighLow;
    assert_eq!(
        names(&filter.apply(&products)),
        ["Midrange", "Popular", "Budget"]
    );

    filter.sort_by = SortBy::Popular;
    assert_eq!(names(&filter.apply(&products))[0], "Popular");

    filter.set_min(100);
    filter.sort_by = SortBy::PriceLowHigh;
    assert_eq!(names(&filter.apply(&products)), ["Popular", "Midrange"]);
}

#[test]
fn raising_min_past_max_drags_max_up() {
    let mut filter = ProductFilter::default();
    filter.set_max(200);
    filter.set_min(500);
    assert_eq!(filter.price_range, PriceRange::new(500, 500));

    filter.set_max(100);
    assert_eq!(filter.price_range, PriceRange::new(100, 100));

    filter.set_max(5000);
    assert_eq!(filter.price_range.max(), PriceRange::CEILING);
}
