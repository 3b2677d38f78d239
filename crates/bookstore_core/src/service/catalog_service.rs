//! Local catalog gateway: CRUD over books, reshaped into envelopes.
//!
//! # Responsibility
//! - Provide list/retrieve/create/update/destroy entry points over the
//!   book repository.
//! - Translate the expected failure taxonomy (not-found, referential
//!   integrity, payload validation) into 4xx envelopes.
//!
//! # Invariants
//! - Every response body is a [`ResponseEnvelope`].
//! - Storage transport failures are never converted to envelopes; they
//!   propagate to the caller unchanged.
//! - Update/destroy messages carry the post-update / pre-deletion book name.

use crate::envelope::ResponseEnvelope;
use crate::model::book::{BookDraft, BookId, BookPatch};
use crate::repo::book_repo::{BookListFilter, BookRepository, RepoError, RepoResult};
use serde_json::json;

/// Gateway service over a book repository.
pub struct CatalogService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> CatalogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists books matching the filter, wrapped as `{data: [...]}`.
    pub fn list_books(&self, filter: &BookListFilter) -> RepoResult<ResponseEnvelope> {
        let books = self.repo.list_books(filter)?;
        Ok(ResponseEnvelope::from_status_code(200).with_data(json!(books)))
    }

    /// Retrieves one book by id; unknown ids yield a 404 envelope.
    pub fn retrieve_book(&self, id: BookId) -> RepoResult<ResponseEnvelope> {
        match self.repo.get_book(id)? {
            Some(book) => Ok(ResponseEnvelope::from_status_code(200).with_data(json!(book))),
            None => envelope_for_error(RepoError::NotFound(id)),
        }
    }

    /// Creates a book, echoing the persisted payload under `data.book`.
    ///
    /// The echo uses the identifier-free representation, matching the
    /// submitted shape.
    pub fn create_book(&mut self, draft: &BookDraft) -> RepoResult<ResponseEnvelope> {
        match self.repo.create_book(draft) {
            Ok(book) => Ok(ResponseEnvelope::from_status_code(201)
                .with_data(json!({ "book": book.to_minimal_value() }))),
            Err(err) => envelope_for_error(err),
        }
    }

    /// Applies a partial update and reports the outcome by name.
    pub fn update_book(&mut self, id: BookId, patch: &BookPatch) -> RepoResult<ResponseEnvelope> {
        match self.repo.update_book(id, patch) {
            Ok(book) => {
                let message = format!("The book {} was updated successfully", book.name);
                Ok(ResponseEnvelope::from_status_code(200)
                    .with_data(json!(book))
                    .with_message(message))
            }
            Err(err) => envelope_for_error(err),
        }
    }

    /// Deletes a book and reports the outcome by its pre-deletion name.
    pub fn destroy_book(&mut self, id: BookId) -> RepoResult<ResponseEnvelope> {
        match self.repo.delete_book(id) {
            Ok(book) => {
                let message = format!("The book {} was deleted successfully", book.name);
                Ok(ResponseEnvelope::from_status_code(204)
                    .with_data(json!([]))
                    .with_message(message))
            }
            Err(err) => envelope_for_error(err),
        }
    }
}

/// Maps the expected failure taxonomy onto error envelopes.
///
/// Not-found becomes 404, referential-integrity and payload validation
/// failures become 400 naming the offending value. Anything else is an
/// unexpected failure and stays an `Err`.
fn envelope_for_error(err: RepoError) -> RepoResult<ResponseEnvelope> {
    match err {
        RepoError::NotFound(_) => {
            Ok(ResponseEnvelope::from_status_code(404).with_message(err.to_string()))
        }
        RepoError::Validation(_)
        | RepoError::UnknownCountry(_)
        | RepoError::UnknownPublisher(_)
        | RepoError::DuplicateIsbn(_) => {
            Ok(ResponseEnvelope::from_status_code(400).with_message(err.to_string()))
        }
        other => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::envelope_for_error;
    use crate::db::DbError;
    use crate::repo::book_repo::RepoError;

    #[test]
    fn not_found_maps_to_404_envelope() {
        let envelope = envelope_for_error(RepoError::NotFound(7)).unwrap();
        assert_eq!(envelope.status_code, 404);
        assert_eq!(envelope.message.as_deref(), Some("book not found: 7"));
    }

    #[test]
    fn referential_failures_map_to_400_naming_the_value() {
        let envelope =
            envelope_for_error(RepoError::UnknownCountry("Atlantis".to_string())).unwrap();
        assert_eq!(envelope.status_code, 400);
        assert_eq!(
            envelope.message.as_deref(),
            Some("Country Atlantis does not exist.")
        );

        let envelope = envelope_for_error(RepoError::DuplicateIsbn("90-12".to_string())).unwrap();
        assert_eq!(envelope.status_code, 400);
        assert_eq!(
            envelope.message.as_deref(),
            Some("book with isbn 90-12 already exists")
        );
    }

    #[test]
    fn transport_failures_propagate_unchanged() {
        let err = RepoError::Db(DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 1,
        });
        assert!(envelope_for_error(err).is_err());
    }
}
