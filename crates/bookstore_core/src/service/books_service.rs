//! External books proxy service.
//!
//! # Responsibility
//! - Front the active remote store for the external-books route.
//! - Keep callers unaware of which backend is selected.

use crate::envelope::ResponseEnvelope;
use crate::store::{BookStoreRegistry, StoreError, StoreRegistryError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures surfaced by the external proxy path.
#[derive(Debug)]
pub enum BooksServiceError {
    Registry(StoreRegistryError),
    Store(StoreError),
}

impl Display for BooksServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BooksServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreRegistryError> for BooksServiceError {
    fn from(value: StoreRegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<StoreError> for BooksServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Facade fetching book data through the active store.
pub struct BooksService {
    registry: BookStoreRegistry,
}

impl Default for BooksService {
    fn default() -> Self {
        Self::new()
    }
}

impl BooksService {
    /// Builds the service with the production store registered and active.
    pub fn new() -> Self {
        Self {
            registry: BookStoreRegistry::with_default_store(),
        }
    }

    /// Builds the service over a caller-configured registry.
    pub fn with_registry(registry: BookStoreRegistry) -> Self {
        Self { registry }
    }

    /// Fetches books from the active store, optionally filtered by name.
    ///
    /// Connection failures come back as `Ok` 500 envelopes per the store
    /// contract; selection and payload failures are `Err`.
    pub fn get_books(&self, name: Option<&str>) -> Result<ResponseEnvelope, BooksServiceError> {
        let store = self.registry.active_store()?;
        Ok(store.get_books(name)?)
    }
}
