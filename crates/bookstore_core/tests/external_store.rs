use bookstore_core::{
    BookStore, BookStoreRegistry, BooksService, BooksServiceError, IceAndFireStore,
    ResponseEnvelope, ResponseStatus, StoreResult,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Records the name filter it was called with and returns a canned envelope.
struct RecordingStore {
    calls: Mutex<Vec<Option<String>>>,
    envelope: ResponseEnvelope,
}

impl RecordingStore {
    fn new(envelope: ResponseEnvelope) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            envelope,
        }
    }
}

impl BookStore for RecordingStore {
    fn store_id(&self) -> &'static str {
        "recording"
    }

    fn get_books(&self, name: Option<&str>) -> StoreResult<ResponseEnvelope> {
        self.calls
            .lock()
            .unwrap()
            .push(name.map(|value| value.to_string()));
        Ok(self.envelope.clone())
    }
}

#[test]
fn connection_failure_becomes_a_500_error_envelope() {
    // Nothing listens on the discard port; the blocking GET is refused.
    let store = IceAndFireStore::with_base_url("http://127.0.0.1:9/api/books");

    let envelope = store.get_books(None).unwrap();
    assert_eq!(envelope.status_code, 500);
    assert_eq!(envelope.status, ResponseStatus::Error);
    assert!(envelope.data.is_none());
    assert!(!envelope.message.unwrap().is_empty());
}

#[test]
fn service_routes_through_the_active_store_passing_the_filter() {
    let canned = ResponseEnvelope::from_status_code(200).with_data(json!([]));
    let store = Arc::new(RecordingStore::new(canned));

    let mut registry = BookStoreRegistry::new();
    registry.register(store.clone()).unwrap();
    registry.select_active("recording").unwrap();
    let service = BooksService::with_registry(registry);

    let envelope = service.get_books(Some("Foo")).unwrap();
    assert!(envelope.is_success());
    assert_eq!(envelope.data.unwrap(), json!([]));

    let envelope = service.get_books(None).unwrap();
    assert!(envelope.is_success());

    let calls = store.calls.lock().unwrap();
    assert_eq!(*calls, vec![Some("Foo".to_string()), None]);
}

#[test]
fn service_without_active_store_is_an_error() {
    let service = BooksService::with_registry(BookStoreRegistry::new());
    let err = service.get_books(None).err().unwrap();
    assert!(matches!(err, BooksServiceError::Registry(_)));
}

#[test]
fn default_service_uses_the_ice_and_fire_backend() {
    let registry = BookStoreRegistry::with_default_store();
    assert_eq!(registry.active_store_id(), Some("ice-and-fire"));
}
