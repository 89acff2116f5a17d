//! Markdown renderer. Writes one `.md` per document plus a CSV item sheet.

use super::csv_utils::items_to_csv;
use crate::domain::totals::{format_soles, round_money};
use crate::domain::{
    DomainError, GeneratedDocument, LineItem, Narrative, ProjectPlan, QuoteRecord,
    TechnicalReport, Totals,
};
use crate::ports::RendererPort;
use chrono::DateTime;
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

pub struct MarkdownRenderer {
    exports_dir: PathBuf,
    company_name: String,
}

impl MarkdownRenderer {
    pub fn new(exports_dir: impl Into<PathBuf>, company_name: impl Into<String>) -> Self {
        Self {
            exports_dir: exports_dir.into(),
            company_name: company_name.into(),
        }
    }

    /// Full Markdown for a document.
    pub fn to_markdown(&self, document: &GeneratedDocument, narrative: &Narrative) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "# {} {}\n\n",
            document.kind().label(),
            document.id()
        ));
        let date = DateTime::from_timestamp(document.created_at(), 0)
            .map(|dt| dt.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        md.push_str(&format!(
            "**{}** | **Cliente:** {} | **Fecha:** {}\n\n",
            self.company_name,
            document.client(),
            date
        ));
        md.push_str("---\n\n");

        match document {
            GeneratedDocument::Cotizacion(q) => push_quote(&mut md, q),
            GeneratedDocument::Proyecto(p) => push_project(&mut md, p),
            GeneratedDocument::Informe(r) => push_report(&mut md, r),
        }

        md.push_str("## Resumen de PILI\n\n");
        md.push_str(&narrative.summary);
        md.push_str("\n\n");

        if !narrative.open_questions.is_empty() {
            md.push_str("## Datos por confirmar\n\n");
            for q in &narrative.open_questions {
                md.push_str(&format!("- {}\n", q));
            }
            md.push('\n');
        }

        md.push_str("---\n");
        md.push_str(&format!("*Generado por PILI - {}*\n", self.company_name));
        md
    }
}

fn push_quote(md: &mut String, q: &QuoteRecord) {
    md.push_str(&format!("## {}\n\n", q.project_name));
    push_items(md, &q.items, &q.totals());
    md.push_str(&format!("**Validez:** {}\n\n", q.validity_note));
    md.push_str(&format!("**Notas técnicas:** {}\n\n", q.technical_notes));
}

fn push_project(md: &mut String, p: &ProjectPlan) {
    md.push_str(&format!("## {}\n\n", p.project_name));
    md.push_str("### Cronograma\n\n");
    md.push_str("| Fase | Duración (días) | Entregables |\n|---|---:|---|\n");
    for phase in &p.phases {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            phase.name,
            phase.duration_days,
            phase.deliverables.join("; ")
        ));
    }
    md.push_str(&format!(
        "\n**Duración total estimada:** {} días calendario\n\n",
        p.total_duration_days
    ));
    md.push_str("### Presupuesto\n\n");
    push_items(md, &p.items, &p.budget);
}

fn push_report(md: &mut String, r: &TechnicalReport) {
    md.push_str(&format!("## {}\n\n", r.project_name));
    for (n, section) in r.sections.iter().enumerate() {
        md.push_str(&format!("### {}. {}\n\n{}\n\n", n + 1, section.title, section.body));
    }
}

fn push_items(md: &mut String, items: &[LineItem], totals: &Totals) {
    md.push_str("| # | Descripción | Cant. | Und. | P. unit. | Total |\n");
    md.push_str("|---:|---|---:|---|---:|---:|\n");
    for (n, item) in items.iter().enumerate() {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            n + 1,
            item.description,
            item.quantity.normalize(),
            item.unit,
            format_soles(item.unit_price),
            format_soles(round_money(item.total)),
        ));
    }
    md.push('\n');
    md.push_str(&format!("- **Subtotal:** {}\n", format_soles(totals.subtotal)));
    md.push_str(&format!("- **IGV (18%):** {}\n", format_soles(totals.tax)));
    md.push_str(&format!("- **Total:** {}\n\n", format_soles(totals.total)));
}

fn items_of(document: &GeneratedDocument) -> Option<(&[LineItem], Totals)> {
    match document {
        GeneratedDocument::Cotizacion(q) => Some((&q.items, q.totals())),
        GeneratedDocument::Proyecto(p) => Some((&p.items, p.budget)),
        GeneratedDocument::Informe(_) => None,
    }
}

#[async_trait::async_trait]
impl RendererPort for MarkdownRenderer {
    async fn render(
        &self,
        document: &GeneratedDocument,
        narrative: &Narrative,
    ) -> Result<Vec<PathBuf>, DomainError> {
        fs::create_dir_all(&self.exports_dir)
            .await
            .map_err(|e| DomainError::Render(format!("Failed to create exports dir: {}", e)))?;

        let mut written = Vec::with_capacity(2);

        let md_path = self.exports_dir.join(format!("{}.md", document.id()));
        fs::write(&md_path, self.to_markdown(document, narrative))
            .await
            .map_err(|e| DomainError::Render(format!("Failed to write document: {}", e)))?;
        written.push(md_path);

        if let Some((items, totals)) = items_of(document) {
            let csv = items_to_csv(items, &totals)
                .map_err(|e| DomainError::Render(format!("Failed to generate CSV: {}", e)))?;
            let csv_path = self.exports_dir.join(format!("{}_partidas.csv", document.id()));
            fs::write(&csv_path, csv)
                .await
                .map_err(|e| DomainError::Render(format!("Failed to write CSV: {}", e)))?;
            written.push(csv_path);
        }

        info!(id = document.id(), files = written.len(), "document rendered");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentHeader, DocumentKind, PiliBrain};

    fn generate(kind: DocumentKind, id: &str) -> (GeneratedDocument, Narrative) {
        let g = PiliBrain::default().generate(
            kind,
            "Necesito instalación eléctrica para una oficina de 100m2",
            DocumentHeader {
                id: id.to_string(),
                created_at: 1_735_689_600, // 2025-01-01 00:00:00 UTC
            },
        );
        (g.document, g.narrative)
    }

    #[test]
    fn quote_markdown_has_items_and_totals() {
        let renderer = MarkdownRenderer::new("unused", "Tesla Electricidad");
        let (doc, narrative) = generate(DocumentKind::Cotizacion, "COT-2025-0001");
        let md = renderer.to_markdown(&doc, &narrative);

        assert!(md.starts_with("# Cotización COT-2025-0001"));
        assert!(md.contains("**Fecha:** 01/01/2025"));
        assert!(md.contains("| 1 | Tablero general trifásico autosoportado |"));
        assert!(md.contains("**IGV (18%):**"));
        assert!(md.contains("## Datos por confirmar"));
    }

    #[test]
    fn project_markdown_has_schedule() {
        let renderer = MarkdownRenderer::new("unused", "Tesla Electricidad");
        let (doc, narrative) = generate(DocumentKind::Proyecto, "PRY-2025-0001");
        let md = renderer.to_markdown(&doc, &narrative);
        assert!(md.contains("### Cronograma"));
        assert!(md.contains("| Instalación |"));
    }

    #[tokio::test]
    async fn render_writes_markdown_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = MarkdownRenderer::new(dir.path().join("exports"), "Tesla Electricidad");

        let (quote, narrative) = generate(DocumentKind::Cotizacion, "COT-2025-0002");
        let paths = renderer.render(&quote, &narrative).await.unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.exists()));

        let (report, narrative) = generate(DocumentKind::Informe, "INF-2025-0001");
        let paths = renderer.render(&report, &narrative).await.unwrap();
        assert_eq!(paths.len(), 1);
        let md = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(md.contains("Normativa aplicable"));
    }
}
