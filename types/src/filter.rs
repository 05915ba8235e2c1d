//! Listing filters: price window and sort order.

use std::cmp::Reverse;

use thiserror::Error;

use crate::{Money, Product};

/// Price window in whole currency units, bounded by the slider range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    min: u32,
    max: u32,
}

impl PriceRange {
    pub const FLOOR: u32 = 0;
    pub const CEILING: u32 = 1000;

    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.min(Self::CEILING);
        let max = max.clamp(min, Self::CEILING);
        Self { min, max }
    }

    #[must_use]
    pub const fn min(self) -> u32 {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> u32 {
        self.max
    }

    /// Raising the minimum drags the maximum up with it.
    #[must_use]
    pub fn with_min(self, value: u32) -> Self {
        let min = value.min(Self::CEILING);
        Self {
            min,
            max: self.max.max(min),
        }
    }

    /// Lowering the maximum drags the minimum down with it.
    #[must_use]
    pub fn with_max(self, value: u32) -> Self {
        let max = value.min(Self::CEILING);
        Self {
            min: self.min.min(max),
            max,
        }
    }

    /// Inclusive on both ends.
    #[must_use]
    pub fn contains(self, price: Money) -> bool {
        price >= Money::from_major(u64::from(self.min))
            && price <= Money::from_major(u64::from(self.max))
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Self::FLOOR,
            max: Self::CEILING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Catalog order.
    #[default]
    Newest,
    PriceLowHigh,
    PriceHighLow,
    /// Most reviewed first.
    Popular,
}

#[derive(Debug, Error)]
#[error("unknown sort order: {0}")]
pub struct SortByParseError(pub String);

impl SortBy {
    pub const ALL: [SortBy; 4] = [
        SortBy::Newest,
        SortBy::PriceLowHigh,
        SortBy::PriceHighLow,
        SortBy::Popular,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::PriceLowHigh => "price-low-high",
            SortBy::PriceHighLow => "price-high-low",
            SortBy::Popular => "popular",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SortBy::Newest => "Newest",
            SortBy::PriceLowHigh => "Price: Low to High",
            SortBy::PriceHighLow => "Price: High to Low",
            SortBy::Popular => "Most Popular",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, SortByParseError> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| SortByParseError(needle.to_string()))
    }
}

/// Filter state for the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProductFilter {
    pub price_range: PriceRange,
    pub sort_by: SortBy,
}

impl ProductFilter {
    pub fn set_min(&mut self, value: u32) {
        self.price_range = self.price_range.with_min(value);
    }

    pub fn set_max(&mut self, value: u32) {
        self.price_range = self.price_range.with_max(value);
    }

    /// Products inside the price window, in the selected order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut visible: Vec<&Product> = products
            .iter()
            .filter(|product| self.price_range.contains(product.price))
            .collect();

        match self.sort_by {
            SortBy::Newest => {}
            SortBy::PriceLowHigh => visible.sort_by_key(|product| product.price),
            SortBy::PriceHighLow => {
                visible.sort_by_key(|product| Reverse(product.price));
            }
            SortBy::Popular => {
                visible.sort_by_key(|product| Reverse(product.reviews_count));
            }
        }

        visible
    }
}
