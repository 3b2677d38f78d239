//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and store calls into envelope-shaped responses.
//! - Keep transport/routing layers decoupled from storage and remote details.

pub mod books_service;
pub mod catalog_service;
