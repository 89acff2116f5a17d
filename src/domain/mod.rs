//! Core domain layer. No external I/O dependencies.
//!
//! Entities and the PILI rule engine live here. Dependencies flow inward.

pub mod brain;
pub mod catalog;
pub mod detector;
pub mod entities;
pub mod errors;
pub mod extractor;
pub mod formulas;
pub mod narrative;
pub mod planner;
pub mod report;
pub mod totals;

pub use brain::{Generation, PiliBrain};
pub use catalog::Catalog;
pub use entities::{
    Complexity, Detection, DetectionConfidence, DocumentHeader, DocumentKind, ExtractedEntities,
    GeneratedDocument, InstallationType, LineItem, Narrative, Phase, ProjectPlan, QuoteRecord,
    ReportSection, ServiceCategory, ServiceCategoryId, TechnicalReport, Totals,
};
pub use errors::DomainError;
