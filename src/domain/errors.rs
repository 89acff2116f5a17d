//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. The rule engine itself never fails.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repo(String),

    #[error("State error: {0}")]
    State(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("AI refinement failed: {0}")]
    Ai(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Document not found: {0}")]
    NotFound(String),
}
