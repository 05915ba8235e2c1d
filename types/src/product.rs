//! Catalog records and the fixed storefront category set.

use serde::{Deserialize, Serialize};

use crate::{CategoryId, Money, ProductId};

/// A product row as returned by the catalog service.
///
/// Only `id`, `name` and `price` are required; display and inventory columns
/// default when the row leaves them null or the query did not select them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub price: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews_count: u32,
    /// Embedded `categories(name, slug)` relation, when selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryRef>,
}

impl Product {
    /// The slice of this record the cart captures on `add`.
    #[must_use]
    pub fn as_cart_ref(&self) -> ProductRef {
        ProductRef {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image_url.clone(),
        }
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Number of filled stars (out of five) for the rating widget.
    #[must_use]
    pub fn full_stars(&self) -> u8 {
        self.rating.clamp(0.0, 5.0).floor() as u8
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Product data handed to the cart: no quantity, price captured as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub image: String,
}

/// Embedded category relation on a product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: String,
    pub slug: String,
}

/// Categories offered on the storefront landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Laptops,
    Phones,
    Watches,
    Speakers,
    Cameras,
    Headphones,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Laptops,
        Category::Phones,
        Category::Watches,
        Category::Speakers,
        Category::Cameras,
        Category::Headphones,
    ];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Category::Laptops => "Laptops",
            Category::Phones => "Phones",
            Category::Watches => "Watches",
            Category::Speakers => "Speakers",
            Category::Cameras => "Cameras",
            Category::Headphones => "Headphones",
        }
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Category::Laptops => "laptops",
            Category::Phones => "phones",
            Category::Watches => "watches",
            Category::Speakers => "speakers",
            Category::Cameras => "cameras",
            Category::Headphones => "headphones",
        }
    }

    /// Parse a slug or display name, ignoring case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.slug().eq_ignore_ascii_case(needle))
    }
}
