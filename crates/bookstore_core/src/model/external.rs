//! Remote catalog record shapes and their local projection.
//!
//! # Responsibility
//! - Deserialize third-party book records from their wire schema.
//! - Project them onto the local field naming and date convention.
//!
//! # Invariants
//! - Projection is allow-list: keys not declared here (`characters`, `url`,
//!   ...) are dropped at deserialization time.
//! - `released` timestamps are reduced to a `YYYY-MM-DD` date string.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One record as returned by the remote catalog API.
///
/// The serde renames are the external-to-local field mapping table: wire key
/// on the attribute, local key on the field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalBookRecord {
    pub name: String,
    pub isbn: String,
    pub authors: Vec<String>,
    #[serde(rename = "numberOfPages")]
    pub number_of_pages: i64,
    pub publisher: String,
    pub country: String,
    #[serde(rename = "released")]
    pub release_timestamp: String,
}

/// Local projection of one remote record.
///
/// Authors are passed through as raw strings and never resolved against local
/// author rows; `release_date` is the date part of the remote timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalBookView {
    pub name: String,
    pub isbn: String,
    pub authors: Vec<String>,
    pub number_of_pages: i64,
    pub publisher: String,
    pub country: String,
    pub release_date: String,
}

impl ExternalBookRecord {
    /// Projects this record onto the local book shape.
    pub fn into_view(self) -> Result<ExternalBookView, ExternalRecordError> {
        let release_date = parse_release_date(&self.release_timestamp).ok_or_else(|| {
            ExternalRecordError::InvalidReleaseTimestamp {
                isbn: self.isbn.clone(),
                value: self.release_timestamp.clone(),
            }
        })?;

        Ok(ExternalBookView {
            name: self.name,
            isbn: self.isbn,
            authors: self.authors,
            number_of_pages: self.number_of_pages,
            publisher: self.publisher,
            country: self.country,
            release_date: release_date.format("%Y-%m-%d").to_string(),
        })
    }
}

/// Projection failures for remote records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalRecordError {
    InvalidReleaseTimestamp { isbn: String, value: String },
}

impl Display for ExternalRecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReleaseTimestamp { isbn, value } => write!(
                f,
                "invalid release timestamp `{value}` on external record isbn={isbn}"
            ),
        }
    }
}

impl Error for ExternalRecordError {}

/// Parses an ISO-like remote timestamp down to its calendar date.
///
/// Accepted forms, tried in order: RFC 3339 with offset, naive
/// `YYYY-MM-DDTHH:MM:SS`, bare `YYYY-MM-DD`.
fn parse_release_date(value: &str) -> Option<NaiveDate> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.date_naive());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::{parse_release_date, ExternalBookRecord, ExternalRecordError};

    const REMOTE_RECORD: &str = r#"{
        "name": "dummy-name",
        "isbn": "90-12",
        "authors": ["George R. R. Martin"],
        "numberOfPages": 90,
        "publisher": "Batam Pages",
        "country": "United States",
        "characters": [],
        "url": "dummy-url",
        "released": "1996-08-01T00:00:00"
    }"#;

    #[test]
    fn record_deserializes_with_wire_key_renames() {
        let record: ExternalBookRecord = serde_json::from_str(REMOTE_RECORD).unwrap();
        assert_eq!(record.number_of_pages, 90);
        assert_eq!(record.release_timestamp, "1996-08-01T00:00:00");
    }

    #[test]
    fn projection_drops_undeclared_remote_keys() {
        let record: ExternalBookRecord = serde_json::from_str(REMOTE_RECORD).unwrap();
        let view = record.into_view().unwrap();
        let value = serde_json::json!(view);
        let map = value.as_object().unwrap();
        assert!(!map.contains_key("characters"));
        assert!(!map.contains_key("url"));
        assert_eq!(map["number_of_pages"], 90);
        assert_eq!(map["release_date"], "1996-08-01");
    }

    #[test]
    fn projection_rejects_unparseable_timestamp() {
        let record = ExternalBookRecord {
            name: "dummy-name".to_string(),
            isbn: "90-12".to_string(),
            authors: vec![],
            number_of_pages: 0,
            publisher: "Batam Pages".to_string(),
            country: "United States".to_string(),
            release_timestamp: "not-a-date".to_string(),
        };
        assert_eq!(
            record.into_view().unwrap_err(),
            ExternalRecordError::InvalidReleaseTimestamp {
                isbn: "90-12".to_string(),
                value: "not-a-date".to_string(),
            }
        );
    }

    #[test]
    fn release_date_parsing_accepts_iso_variants() {
        for value in [
            "1996-08-01T00:00:00",
            "1996-08-01T00:00:00+00:00",
            "1996-08-01",
        ] {
            let parsed = parse_release_date(value).unwrap();
            assert_eq!(parsed.format("%Y-%m-%d").to_string(), "1996-08-01");
        }
        assert!(parse_release_date("08/01/1996").is_none());
    }
}
