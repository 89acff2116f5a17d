//! Application use cases. Orchestrate domain logic via ports.

pub mod document_service;

pub use document_service::{ChatReply, DocumentService};
