//! Implements InputPort. Inquire-based chat with PILI.
//!
//! Main menu picks the document kind; the free-text answer goes to DocumentService.

use super::progress::spinner;
use crate::domain::totals::{format_soles, round_money};
use crate::domain::{DetectionConfidence, DocumentKind, DomainError, GeneratedDocument, LineItem};
use crate::ports::InputPort;
use crate::usecases::{ChatReply, DocumentService};
use async_trait::async_trait;
use chrono::DateTime;
use crossterm::style::Stylize;
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{Select, Text};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Applies the prompt theme globally. Call once before the first prompt.
pub fn apply_theme() {
    let config = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("⚡").with_fg(Color::LightYellow))
        .with_highlighted_option_prefix(Styled::new("➜").with_fg(Color::LightBlue))
        .with_help_message(StyleSheet::new().with_fg(Color::DarkGrey));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Generate(DocumentKind),
    History,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 5] = [
        MenuAction::Generate(DocumentKind::Cotizacion),
        MenuAction::Generate(DocumentKind::Proyecto),
        MenuAction::Generate(DocumentKind::Informe),
        MenuAction::History,
        MenuAction::Exit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Generate(DocumentKind::Cotizacion) => f.write_str("Nueva cotización"),
            MenuAction::Generate(DocumentKind::Proyecto) => f.write_str("Nuevo plan de proyecto"),
            MenuAction::Generate(DocumentKind::Informe) => f.write_str("Nuevo informe técnico"),
            MenuAction::History => f.write_str("Ver documentos generados"),
            MenuAction::Exit => f.write_str("Salir"),
        }
    }
}

/// Esc and Ctrl-C mean "go back", not failure.
fn prompt_or_back<T>(result: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Input(e.to_string())),
    }
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    service: Arc<DocumentService>,
    history_limit: usize,
}

impl TuiInputPort {
    pub fn new(service: Arc<DocumentService>, history_limit: usize) -> Self {
        Self {
            service,
            history_limit,
        }
    }

    async fn generate(&self, kind: DocumentKind) -> Result<(), DomainError> {
        let text = Text::new("Cuéntame qué necesitas:")
            .with_help_message(
                "Ej.: instalación eléctrica para oficina de 120 m2 en 2 pisos, empresa Grupo Norte",
            )
            .prompt();
        let Some(text) = prompt_or_back(text)? else {
            return Ok(());
        };
        if text.trim().is_empty() {
            println!("{}", "Escribe una descripción del servicio.".yellow());
            return Ok(());
        }

        let pb = spinner("PILI está preparando tu documento...");
        let result = self.service.handle_message(&text, kind).await;
        pb.finish_and_clear();

        match result {
            Ok(reply) => println!("{}", format_reply(&reply)),
            Err(e) => {
                warn!(error = %e, "document generation failed");
                println!("{} {}", "✗".red(), e);
            }
        }
        Ok(())
    }

    async fn history(&self) -> Result<(), DomainError> {
        let docs = self.service.list_documents(None, self.history_limit).await?;
        if docs.is_empty() {
            println!("{}", "Aún no hay documentos generados.".yellow());
            return Ok(());
        }

        let options: Vec<String> = docs.iter().map(history_line).collect();
        let picked = Select::new("Documentos recientes:", options.clone())
            .with_page_size(10)
            .prompt();
        let Some(picked) = prompt_or_back(picked)? else {
            return Ok(());
        };
        // Map the selected display string back to its document
        let Some(idx) = options.iter().position(|o| *o == picked) else {
            return Ok(());
        };

        let doc = self.service.get_document(docs[idx].id()).await?;
        println!("{}", format_document(&doc));
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let action = Select::new("¿Qué deseas hacer?", MenuAction::ALL.to_vec()).prompt();
            let action = prompt_or_back(action)?.unwrap_or(MenuAction::Exit);

            match action {
                MenuAction::Generate(kind) => self.generate(kind).await?,
                MenuAction::History => {
                    if let Err(e) = self.history().await {
                        warn!(error = %e, "history view failed");
                        println!("{} {}", "✗".red(), e);
                    }
                }
                MenuAction::Exit => {
                    println!("{}", "¡Hasta pronto!".cyan());
                    return Ok(());
                }
            }
        }
    }
}

fn history_line(doc: &GeneratedDocument) -> String {
    let date = DateTime::from_timestamp(doc.created_at(), 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!(
        "{} | {} | {} | {}",
        doc.id(),
        date,
        doc.client(),
        format_soles(doc.totals().total)
    )
}

fn push_items(out: &mut String, items: &[LineItem]) {
    for (n, item) in items.iter().enumerate() {
        out.push_str(&format!(
            "  {:>2}. {} ({} {} x {}) = {}\n",
            n + 1,
            item.description,
            item.quantity.normalize(),
            item.unit,
            format_soles(item.unit_price),
            format_soles(round_money(item.total)),
        ));
    }
}

/// Plain-text rendering of a stored document.
fn format_document(doc: &GeneratedDocument) -> String {
    let mut out = format!(
        "\n{} {}\nCliente: {}\n",
        doc.kind().label(),
        doc.id(),
        doc.client()
    );
    match doc {
        GeneratedDocument::Cotizacion(q) => {
            out.push_str(&format!("{}\n", q.project_name));
            push_items(&mut out, &q.items);
            out.push_str(&format!("Validez: {}\n", q.validity_note));
        }
        GeneratedDocument::Proyecto(p) => {
            out.push_str(&format!("{}\n", p.project_name));
            for phase in &p.phases {
                out.push_str(&format!("  - {} ({} días)\n", phase.name, phase.duration_days));
            }
            out.push_str(&format!("Duración total: {} días\n", p.total_duration_days));
            push_items(&mut out, &p.items);
        }
        GeneratedDocument::Informe(r) => {
            out.push_str(&format!("{}\n", r.project_name));
            for section in &r.sections {
                out.push_str(&format!("  - {}\n", section.title));
            }
        }
    }
    let totals = doc.totals();
    out.push_str(&format!(
        "Subtotal {} | IGV {} | Total {}\n",
        format_soles(totals.subtotal),
        format_soles(totals.tax),
        format_soles(totals.total)
    ));
    out
}

/// What the user sees after a message: document, PILI's summary, follow-ups, files.
fn format_reply(reply: &ChatReply) -> String {
    let mut out = format_document(&reply.document);

    match reply.detection.confidence {
        DetectionConfidence::None => {
            out.push_str("(No identifiqué el tipo de servicio; usé instalación residencial.)\n")
        }
        DetectionConfidence::Ambiguous => out.push_str(&format!(
            "(Tu mensaje encaja con varios servicios; elegí {}.)\n",
            reply.detection.category
        )),
        DetectionConfidence::Clear => {}
    }

    out.push_str(&format!("\nPILI: {}\n", reply.narrative.summary));
    if !reply.narrative.open_questions.is_empty() {
        out.push_str("\nPara afinar el documento:\n");
        for q in &reply.narrative.open_questions {
            out.push_str(&format!("  • {}\n", q));
        }
    }
    if !reply.files.is_empty() {
        out.push_str("\nArchivos:\n");
        for f in &reply.files {
            out.push_str(&format!("  {}\n", f.display()));
        }
    }
    out
}
