//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DocumentKind, DomainError, GeneratedDocument, Narrative};
use std::path::PathBuf;

/// Repository port. Persist generated documents.
#[async_trait::async_trait]
pub trait DocumentRepoPort: Send + Sync {
    /// Append a document. Regenerating produces a new id, never an overwrite.
    async fn save(&self, document: &GeneratedDocument) -> Result<(), DomainError>;

    /// Look up a document by id (e.g. `COT-2025-0001`).
    async fn get(&self, id: &str) -> Result<Option<GeneratedDocument>, DomainError>;

    /// Most recent documents first. `kind = None` lists every kind.
    async fn list(
        &self,
        kind: Option<DocumentKind>,
        limit: usize,
    ) -> Result<Vec<GeneratedDocument>, DomainError>;
}

/// Sequence port. Hands out per-kind, per-year document numbers.
#[async_trait::async_trait]
pub trait SequencePort: Send + Sync {
    /// Next number for `kind` in `year`, starting at 1. Persisted before returning.
    async fn next_number(&self, kind: DocumentKind, year: i32) -> Result<u32, DomainError>;
}

/// Renderer port. Turns a document into files the client receives.
///
/// The DOCX/PDF template engine lives outside this crate; the bundled
/// adapter writes Markdown and CSV.
#[async_trait::async_trait]
pub trait RendererPort: Send + Sync {
    /// Render and return the paths written.
    async fn render(
        &self,
        document: &GeneratedDocument,
        narrative: &Narrative,
    ) -> Result<Vec<PathBuf>, DomainError>;
}

/// AI port. Optional LLM pass that rewrites PILI's summary in a friendlier tone.
#[async_trait::async_trait]
pub trait AiPort: Send + Sync {
    /// Rewrite `draft` for `document`. Figures must not change.
    async fn refine_summary(
        &self,
        document: &GeneratedDocument,
        draft: &str,
    ) -> Result<String, DomainError>;
}
