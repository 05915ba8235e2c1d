//! View state for catalog-backed screens.
//!
//! Catalog calls can fail; the screens that issue them degrade to an empty or
//! error state instead of propagating. The cart never sees these failures.

use storefront_types::NonEmptyString;

/// Why a catalog-backed view has nothing to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    NotFound,
    /// User-facing description of a network or database failure.
    Failed(NonEmptyString),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Loaded(T),
    NotFound,
    Failed(NonEmptyString),
}

impl<T> LoadState<T> {
    pub fn from_result<E>(result: Result<T, E>) -> Self
    where
        E: Into<LoadFailure>,
    {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(err) => match err.into() {
                LoadFailure::NotFound => Self::NotFound,
                LoadFailure::Failed(message) => {
                    tracing::warn!(%message, "Catalog load failed");
                    Self::Failed(message)
                }
            },
        }
    }

    #[must_use]
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }
}
