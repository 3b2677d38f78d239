//! Core domain logic for the bookstore catalog.
//! This crate is the single source of truth for catalog business invariants.

pub mod db;
pub mod envelope;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use envelope::{ResponseEnvelope, ResponseStatus};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookDraft, BookId, BookPatch, BookValidationError};
pub use model::external::{ExternalBookRecord, ExternalBookView};
pub use repo::book_repo::{
    BookListFilter, BookRepository, RepoError, RepoResult, SqliteBookRepository,
};
pub use service::books_service::{BooksService, BooksServiceError};
pub use service::catalog_service::CatalogService;
pub use store::{
    BookStore, BookStoreRegistry, IceAndFireStore, StoreError, StoreRegistryError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
