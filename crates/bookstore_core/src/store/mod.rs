//! External book store contracts and active-store selection.
//!
//! # Responsibility
//! - Define the `BookStore` interface for remote catalog backends.
//! - Select one active backend at process start via a registry.
//!
//! # Invariants
//! - Store ids are non-empty, lowercase, and unique within a registry.
//! - Fetch paths are read-only; stores never touch local storage.

use crate::envelope::ResponseEnvelope;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod ice_and_fire;

pub use ice_and_fire::IceAndFireStore;

/// Unexpected failures raised by a store fetch.
///
/// Connection-level failures are not errors at this level: stores convert
/// them into 500 envelopes themselves. This type covers payloads the store
/// cannot interpret, which propagate to the caller.
#[derive(Debug)]
pub enum StoreError {
    UnexpectedPayload(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedPayload(message) => {
                write!(f, "unexpected remote payload: {message}")
            }
        }
    }
}

impl Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// Interface for remote book catalog backends.
pub trait BookStore: Send + Sync {
    /// Stable backend identifier used for registry selection.
    fn store_id(&self) -> &'static str;

    /// Fetches books from the backend, optionally filtered by name.
    ///
    /// # Contract
    /// - Issues one best-effort synchronous request, no retries.
    /// - Connection failure yields an `Ok` 500 error envelope.
    /// - Uninterpretable payloads yield `Err(StoreError)`.
    fn get_books(&self, name: Option<&str>) -> StoreResult<ResponseEnvelope>;
}

/// Registration/selection errors for the store registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRegistryError {
    InvalidStoreId(String),
    DuplicateStoreId(String),
    StoreNotFound(String),
    NoActiveStore,
}

impl Display for StoreRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStoreId(value) => write!(f, "store id is invalid: {value}"),
            Self::DuplicateStoreId(value) => write!(f, "store id already registered: {value}"),
            Self::StoreNotFound(value) => write!(f, "store not found: {value}"),
            Self::NoActiveStore => write!(f, "no active store selected"),
        }
    }
}

impl Error for StoreRegistryError {}

/// Runtime registry of book store backends.
///
/// Backends register at process start; exactly one is selected active and
/// serves all subsequent fetches.
#[derive(Default)]
pub struct BookStoreRegistry {
    stores: BTreeMap<String, Arc<dyn BookStore>>,
    active_store_id: Option<String>,
}

impl BookStoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with the production backend registered and active.
    pub fn with_default_store() -> Self {
        let mut registry = Self::new();
        let store = Arc::new(IceAndFireStore::new());
        let store_id = store.store_id().to_string();
        registry
            .register(store)
            .expect("default store id is valid and unique");
        registry
            .select_active(&store_id)
            .expect("default store was just registered");
        registry
    }

    /// Registers one store backend.
    pub fn register(&mut self, store: Arc<dyn BookStore>) -> Result<(), StoreRegistryError> {
        let store_id = store.store_id().trim().to_string();
        if !is_valid_store_id(&store_id) {
            return Err(StoreRegistryError::InvalidStoreId(store_id));
        }
        if self.stores.contains_key(store_id.as_str()) {
            return Err(StoreRegistryError::DuplicateStoreId(store_id));
        }

        self.stores.insert(store_id, store);
        Ok(())
    }

    /// Returns sorted store ids.
    pub fn store_ids(&self) -> Vec<String> {
        self.stores.keys().cloned().collect()
    }

    /// Selects one active store.
    pub fn select_active(&mut self, store_id: &str) -> Result<(), StoreRegistryError> {
        let normalized = store_id.trim();
        if !self.stores.contains_key(normalized) {
            return Err(StoreRegistryError::StoreNotFound(normalized.to_string()));
        }
        self.active_store_id = Some(normalized.to_string());
        Ok(())
    }

    /// Returns the active store id, if one is selected.
    pub fn active_store_id(&self) -> Option<&str> {
        self.active_store_id.as_deref()
    }

    /// Returns the active store handle.
    pub fn active_store(&self) -> Result<Arc<dyn BookStore>, StoreRegistryError> {
        let id = self
            .active_store_id()
            .ok_or(StoreRegistryError::NoActiveStore)?;
        self.stores
            .get(id)
            .cloned()
            .ok_or_else(|| StoreRegistryError::StoreNotFound(id.to_string()))
    }
}

fn is_valid_store_id(store_id: &str) -> bool {
    !store_id.is_empty()
        && store_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::{
        BookStore, BookStoreRegistry, StoreRegistryError, StoreResult,
    };
    use crate::envelope::ResponseEnvelope;
    use std::sync::Arc;

    struct StubStore {
        id: &'static str,
    }

    impl BookStore for StubStore {
        fn store_id(&self) -> &'static str {
            self.id
        }

        fn get_books(&self, _name: Option<&str>) -> StoreResult<ResponseEnvelope> {
            Ok(ResponseEnvelope::from_status_code(200))
        }
    }

    #[test]
    fn default_registry_has_ice_and_fire_active() {
        let registry = BookStoreRegistry::with_default_store();
        assert_eq!(registry.active_store_id(), Some("ice-and-fire"));
        assert_eq!(registry.store_ids(), vec!["ice-and-fire".to_string()]);
    }

    #[test]
    fn register_rejects_duplicate_and_invalid_ids() {
        let mut registry = BookStoreRegistry::new();
        registry.register(Arc::new(StubStore { id: "stub" })).unwrap();

        let duplicate = registry
            .register(Arc::new(StubStore { id: "stub" }))
            .unwrap_err();
        assert_eq!(
            duplicate,
            StoreRegistryError::DuplicateStoreId("stub".to_string())
        );

        let invalid = registry
            .register(Arc::new(StubStore { id: "Bad Id" }))
            .unwrap_err();
        assert_eq!(
            invalid,
            StoreRegistryError::InvalidStoreId("Bad Id".to_string())
        );
    }

    #[test]
    fn select_active_requires_registered_store() {
        let mut registry = BookStoreRegistry::new();
        assert_eq!(
            registry.active_store().err().unwrap(),
            StoreRegistryError::NoActiveStore
        );

        let missing = registry.select_active("nope").unwrap_err();
        assert_eq!(missing, StoreRegistryError::StoreNotFound("nope".to_string()));

        registry.register(Arc::new(StubStore { id: "stub" })).unwrap();
        registry.select_active("stub").unwrap();
        assert_eq!(registry.active_store().unwrap().store_id(), "stub");
    }
}
