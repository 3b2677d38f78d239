//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the catalog.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate payloads before SQL mutations.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateIsbn`,
//!   `UnknownCountry`/`UnknownPublisher`) in addition to DB transport errors.

pub mod book_repo;
