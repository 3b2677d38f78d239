//! Domain model for the bookstore catalog.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep payload validation rules next to the shapes they protect.
//!
//! # Invariants
//! - `Book.isbn` is globally unique (enforced by storage).
//! - A persisted book references exactly one existing country and publisher.

pub mod book;
pub mod external;
