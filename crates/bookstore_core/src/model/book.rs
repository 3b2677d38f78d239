//! Book domain model and write payloads.
//!
//! # Responsibility
//! - Define the canonical book read model returned by the gateway.
//! - Define create/update payload shapes with their validation rules.
//!
//! # Invariants
//! - Name and ISBN are non-empty and at most [`MAX_NAME_LEN`] characters.
//! - `number_of_pages` is never negative (defaults to 0 when omitted).
//! - Related entities are referenced by name in payloads, never by id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable storage identifier for a book row.
pub type BookId = i64;

/// Maximum length for name-like fields (book name, ISBN, related names).
pub const MAX_NAME_LEN: usize = 50;

/// Full read representation of a persisted book.
///
/// Related entities are flattened to their names: `authors` is a list of
/// author name strings, `country` and `publisher` are single names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub isbn: String,
    pub authors: Vec<String>,
    pub number_of_pages: i64,
    pub publisher: String,
    pub country: String,
    pub release_date: NaiveDate,
}

impl Book {
    /// Serializes this book without its `id`.
    ///
    /// Used when echoing a create payload back to the caller, where the
    /// identifier is not part of the submitted shape.
    pub fn to_minimal_value(&self) -> serde_json::Value {
        let mut value = serde_json::json!(self);
        if let Some(map) = value.as_object_mut() {
            map.remove("id");
        }
        value
    }
}

/// Create payload for a new book.
///
/// `country` and `publisher` must name existing rows; `authors` entries are
/// resolved through find-or-create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub name: String,
    pub isbn: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub number_of_pages: i64,
    pub publisher: String,
    pub country: String,
    pub release_date: NaiveDate,
}

impl BookDraft {
    /// Checks scalar field constraints before any storage work happens.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        validate_name_field("name", &self.name)?;
        validate_name_field("isbn", &self.isbn)?;
        validate_name_field("publisher", &self.publisher)?;
        validate_name_field("country", &self.country)?;
        for author in &self.authors {
            validate_name_field("authors", author)?;
        }
        if self.number_of_pages < 0 {
            return Err(BookValidationError::NegativePageCount(self.number_of_pages));
        }
        Ok(())
    }
}

/// Partial update payload for an existing book.
///
/// # Contract
/// - Omitted fields keep their persisted value.
/// - `authors: Some(vec![])` clears all author links; `authors: None` keeps
///   the existing set untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
}

impl BookPatch {
    /// Checks scalar field constraints for every field present in the patch.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if let Some(name) = &self.name {
            validate_name_field("name", name)?;
        }
        if let Some(isbn) = &self.isbn {
            validate_name_field("isbn", isbn)?;
        }
        if let Some(publisher) = &self.publisher {
            validate_name_field("publisher", publisher)?;
        }
        if let Some(country) = &self.country {
            validate_name_field("country", country)?;
        }
        if let Some(authors) = &self.authors {
            for author in authors {
                validate_name_field("authors", author)?;
            }
        }
        if let Some(pages) = self.number_of_pages {
            if pages < 0 {
                return Err(BookValidationError::NegativePageCount(pages));
            }
        }
        Ok(())
    }
}

/// Payload-level validation failures for book writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyField(&'static str),
    FieldTooLong { field: &'static str, max: usize },
    NegativePageCount(i64),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "field `{field}` exceeds maximum length of {max}")
            }
            Self::NegativePageCount(value) => {
                write!(f, "number_of_pages must be >= 0, got {value}")
            }
        }
    }
}

impl Error for BookValidationError {}

fn validate_name_field(field: &'static str, value: &str) -> Result<(), BookValidationError> {
    if value.trim().is_empty() {
        return Err(BookValidationError::EmptyField(field));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(BookValidationError::FieldTooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BookDraft, BookPatch, BookValidationError, MAX_NAME_LEN};
    use chrono::NaiveDate;

    fn draft() -> BookDraft {
        BookDraft {
            name: "A Game of Thrones".to_string(),
            isbn: "978-0553103540".to_string(),
            authors: vec!["George R. R. Martin".to_string()],
            number_of_pages: 694,
            publisher: "Bantam Books".to_string(),
            country: "United States".to_string(),
            release_date: NaiveDate::from_ymd_opt(1996, 8, 1).unwrap(),
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn draft_rejects_empty_and_overlong_fields() {
        let mut empty = draft();
        empty.isbn = "  ".to_string();
        assert_eq!(
            empty.validate().unwrap_err(),
            BookValidationError::EmptyField("isbn")
        );

        let mut long = draft();
        long.name = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            long.validate().unwrap_err(),
            BookValidationError::FieldTooLong {
                field: "name",
                max: MAX_NAME_LEN
            }
        );
    }

    #[test]
    fn draft_rejects_negative_page_count() {
        let mut bad = draft();
        bad.number_of_pages = -1;
        assert_eq!(
            bad.validate().unwrap_err(),
            BookValidationError::NegativePageCount(-1)
        );
    }

    #[test]
    fn patch_only_validates_present_fields() {
        let patch = BookPatch {
            name: Some("Updated book name".to_string()),
            ..BookPatch::default()
        };
        assert!(patch.validate().is_ok());

        let bad = BookPatch {
            number_of_pages: Some(-3),
            ..BookPatch::default()
        };
        assert_eq!(
            bad.validate().unwrap_err(),
            BookValidationError::NegativePageCount(-3)
        );
    }

    #[test]
    fn patch_deserializes_with_omitted_fields_as_none() {
        let patch: BookPatch = serde_json::from_str(r#"{"name": "Updated book name"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Updated book name"));
        assert!(patch.authors.is_none());
        assert!(patch.release_date.is_none());
    }
}
