//! Core domain types for the storefront.
//!
//! Catalog records, money, identifiers and listing filters. No IO and no
//! async; the cart, the catalog client and the CLI all build on these.

mod filter;
mod ids;
mod money;
mod product;
mod text;

pub use filter::{PriceRange, ProductFilter, SortBy, SortByParseError};
pub use ids::{CategoryId, ProductId};
pub use money::{Money, MoneyError};
pub use product::{Category, CategoryRef, Product, ProductRef};
pub use text::truncate_with_ellipsis;

use thiserror::Error;

/// Text that is non-blank after trimming.
///
/// Used for user-facing messages, where an empty string would render as a
/// silent failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

#[derive(Debug, Error)]
#[error("string must not be blank")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(EmptyStringError);
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NonEmptyStaticStr> for NonEmptyString {
    fn from(value: NonEmptyStaticStr) -> Self {
        Self(value.0.to_string())
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-empty literal, checked at compile time when used in a `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonEmptyStaticStr(&'static str);

impl NonEmptyStaticStr {
    #[must_use]
    pub const fn new(value: &'static str) -> Self {
        assert!(!value.is_empty(), "literal must not be empty");
        Self(value)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for NonEmptyStaticStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}
