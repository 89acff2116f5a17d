//! Document service. Orchestrates one chat turn: numbering, generation,
//! optional AI polish, persistence and export.

use crate::domain::{
    Detection, DocumentHeader, DocumentKind, DomainError, ExtractedEntities, GeneratedDocument,
    Narrative, PiliBrain,
};
use crate::ports::{AiPort, DocumentRepoPort, RendererPort, SequencePort};
use chrono::{Datelike, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// What PILI answers to one message.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub document: GeneratedDocument,
    pub narrative: Narrative,
    pub detection: Detection,
    pub entities: ExtractedEntities,
    /// Files written by the renderer.
    pub files: Vec<PathBuf>,
    /// True when the summary came back from the AI adapter.
    pub refined: bool,
}

pub struct DocumentService {
    brain: Arc<PiliBrain>,
    repo: Arc<dyn DocumentRepoPort>,
    sequence: Arc<dyn SequencePort>,
    renderer: Arc<dyn RendererPort>,
    ai: Option<Arc<dyn AiPort>>,
}

impl DocumentService {
    /// `ai = None` keeps the rule-based summary as is.
    pub fn new(
        brain: Arc<PiliBrain>,
        repo: Arc<dyn DocumentRepoPort>,
        sequence: Arc<dyn SequencePort>,
        renderer: Arc<dyn RendererPort>,
        ai: Option<Arc<dyn AiPort>>,
    ) -> Self {
        Self {
            brain,
            repo,
            sequence,
            renderer,
            ai,
        }
    }

    /// Generate, store and export a document of `kind` from a free-text message.
    pub async fn handle_message(
        &self,
        text: &str,
        kind: DocumentKind,
    ) -> Result<ChatReply, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::Input("Empty message".to_string()));
        }

        let now = Utc::now();
        let number = self.sequence.next_number(kind, now.year()).await?;
        let header = DocumentHeader {
            id: format!("{}-{}-{:04}", kind.prefix(), now.year(), number),
            created_at: now.timestamp(),
        };

        let generation = self.brain.generate(kind, text, header);
        let mut narrative = generation.narrative;
        let document = generation.document;

        info!(
            id = document.id(),
            category = %generation.detection.category,
            confidence = ?generation.detection.confidence,
            items = item_count(&document),
            "document generated"
        );

        let mut refined = false;
        if let Some(ai) = &self.ai {
            match ai.refine_summary(&document, &narrative.summary).await {
                Ok(summary) => {
                    narrative.summary = summary;
                    refined = true;
                }
                Err(e) => {
                    warn!(id = document.id(), error = %e, "AI refinement failed, keeping rule-based summary");
                }
            }
        }

        self.repo.save(&document).await?;
        let files = self.renderer.render(&document, &narrative).await?;

        Ok(ChatReply {
            document,
            narrative,
            detection: generation.detection,
            entities: generation.entities,
            files,
            refined,
        })
    }

    /// Most recent documents first.
    pub async fn list_documents(
        &self,
        kind: Option<DocumentKind>,
        limit: usize,
    ) -> Result<Vec<GeneratedDocument>, DomainError> {
        self.repo.list(kind, limit).await
    }

    pub async fn get_document(&self, id: &str) -> Result<GeneratedDocument, DomainError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }
}

fn item_count(document: &GeneratedDocument) -> usize {
    match document {
        GeneratedDocument::Cotizacion(q) => q.items.len(),
        GeneratedDocument::Proyecto(p) => p.items.len(),
        GeneratedDocument::Informe(r) => r.sections.len(),
    }
}
