//! PILI brain: the offline generator behind the chat assistant.
//!
//! detect -> extract -> generate_items -> compute_totals + compose.
//! Pure and synchronous; safe to share behind an `Arc`.

use crate::domain::catalog::Catalog;
use crate::domain::detector;
use crate::domain::entities::{
    Complexity, Detection, DocumentHeader, DocumentKind, ExtractedEntities, GeneratedDocument,
    LineItem, Narrative, ProjectPlan, QuoteRecord, ServiceCategory, ServiceCategoryId,
    TechnicalReport, Totals,
};
use crate::domain::extractor;
use crate::domain::formulas;
use crate::domain::narrative::{self, QUESTION_SERVICE};
use crate::domain::planner;
use crate::domain::report;
use crate::domain::totals;

pub const DEFAULT_VALIDITY_DAYS: u32 = 30;
pub const UNKNOWN_CLIENT: &str = "Cliente por confirmar";

/// Everything produced for one message.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation<T> {
    pub document: T,
    pub narrative: Narrative,
    pub detection: Detection,
    pub entities: ExtractedEntities,
}

impl<T> Generation<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> Generation<U> {
        Generation {
            document: f(self.document),
            narrative: self.narrative,
            detection: self.detection,
            entities: self.entities,
        }
    }
}

/// Shared steps before a document is shaped.
struct Analysis<'a> {
    detection: Detection,
    category: &'a ServiceCategory,
    entities: ExtractedEntities,
    items: Vec<LineItem>,
    totals: Totals,
}

#[derive(Debug, Clone)]
pub struct PiliBrain {
    catalog: Catalog,
    validity_days: u32,
}

impl PiliBrain {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            validity_days: DEFAULT_VALIDITY_DAYS,
        }
    }

    pub fn with_validity_days(mut self, days: u32) -> Self {
        self.validity_days = days;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn detect(&self, text: &str) -> ServiceCategoryId {
        detector::detect(&self.catalog, text)
    }

    pub fn analyze(&self, text: &str) -> Detection {
        detector::analyze(&self.catalog, text)
    }

    pub fn extract(&self, text: &str) -> ExtractedEntities {
        extractor::extract(text)
    }

    pub fn generate_items(&self, id: ServiceCategoryId, entities: &ExtractedEntities) -> Vec<LineItem> {
        formulas::generate_items(&self.catalog, id, entities)
    }

    pub fn compute_totals(&self, items: &[LineItem]) -> Totals {
        totals::compute_totals(items)
    }

    pub fn compose(
        &self,
        id: ServiceCategoryId,
        entities: &ExtractedEntities,
        totals: &Totals,
    ) -> Narrative {
        narrative::compose(self.catalog.get(id), entities, totals)
    }

    pub fn generate(
        &self,
        kind: DocumentKind,
        text: &str,
        header: DocumentHeader,
    ) -> Generation<GeneratedDocument> {
        match kind {
            DocumentKind::Cotizacion => self
                .generate_quote(text, header)
                .map(GeneratedDocument::Cotizacion),
            DocumentKind::Proyecto => self
                .generate_project(text, header)
                .map(GeneratedDocument::Proyecto),
            DocumentKind::Informe => self
                .generate_report(text, header)
                .map(GeneratedDocument::Informe),
        }
    }

    pub fn generate_quote(&self, text: &str, header: DocumentHeader) -> Generation<QuoteRecord> {
        let a = self.run(text);
        let narrative = self.narrative_for(DocumentKind::Cotizacion, &a);
        let document = QuoteRecord {
            id: header.id,
            client: client_of(&a.entities),
            project_name: project_name(a.category, &a.entities),
            category: a.category.id,
            subtotal: a.totals.subtotal,
            tax: a.totals.tax,
            total: a.totals.total,
            items: a.items,
            validity_note: format!(
                "Cotización válida por {} días calendario. Precios en soles; el total incluye IGV (18%).",
                self.validity_days
            ),
            technical_notes: technical_notes(a.category, &a.entities),
            created_at: header.created_at,
        };
        Generation {
            document,
            narrative,
            detection: a.detection,
            entities: a.entities,
        }
    }

    pub fn generate_project(&self, text: &str, header: DocumentHeader) -> Generation<ProjectPlan> {
        let a = self.run(text);
        let narrative = self.narrative_for(DocumentKind::Proyecto, &a);
        let phases = planner::plan_phases(a.category, &a.entities);
        let document = ProjectPlan {
            id: header.id,
            client: client_of(&a.entities),
            project_name: project_name(a.category, &a.entities),
            category: a.category.id,
            total_duration_days: planner::total_duration(&phases),
            phases,
            items: a.items,
            budget: a.totals,
            created_at: header.created_at,
        };
        Generation {
            document,
            narrative,
            detection: a.detection,
            entities: a.entities,
        }
    }

    pub fn generate_report(&self, text: &str, header: DocumentHeader) -> Generation<TechnicalReport> {
        let a = self.run(text);
        let narrative = self.narrative_for(DocumentKind::Informe, &a);
        let document = TechnicalReport {
            id: header.id,
            client: client_of(&a.entities),
            project_name: project_name(a.category, &a.entities),
            category: a.category.id,
            standard_reference: a.category.standard_reference.to_string(),
            sections: report::report_sections(a.category, &a.entities, &a.items, &a.totals),
            budget: a.totals,
            created_at: header.created_at,
        };
        Generation {
            document,
            narrative,
            detection: a.detection,
            entities: a.entities,
        }
    }

    fn run(&self, text: &str) -> Analysis<'_> {
        let detection = self.analyze(text);
        let category = self.catalog.get(detection.category);
        let entities = self.extract(text);
        let items = self.generate_items(category.id, &entities);
        let totals = self.compute_totals(&items);
        Analysis {
            detection,
            category,
            entities,
            items,
            totals,
        }
    }

    fn narrative_for(&self, kind: DocumentKind, a: &Analysis<'_>) -> Narrative {
        let mut n = narrative::compose_for(kind, a.category, &a.entities, &a.totals);
        if a.detection.needs_clarification() {
            n.open_questions.insert(0, QUESTION_SERVICE.to_string());
        }
        n
    }
}

impl Default for PiliBrain {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

fn client_of(entities: &ExtractedEntities) -> String {
    entities
        .client_name
        .clone()
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn project_name(category: &ServiceCategory, entities: &ExtractedEntities) -> String {
    match entities.area_m2 {
        Some(area) => format!("{} ({area:.0} m²)", category.display_name),
        None => category.display_name.to_string(),
    }
}

fn technical_notes(category: &ServiceCategory, entities: &ExtractedEntities) -> String {
    let mut notes = format!(
        "Trabajos según {}. Tipo de intervención: {}.",
        category.standard_reference,
        entities.installation_type.label()
    );
    if entities.complexity == Complexity::Complex {
        notes.push_str(" Proyecto de complejidad alta: incluye supervisión de ingeniero residente.");
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DetectionConfidence;
    use crate::domain::totals::{IGV_RATE, round_money};
    use rust_decimal::Decimal;

    fn header(id: &str) -> DocumentHeader {
        DocumentHeader {
            id: id.to_string(),
            created_at: 1_735_689_600,
        }
    }

    #[test]
    fn office_quote_end_to_end() {
        let brain = PiliBrain::default();
        let g = brain.generate_quote(
            "Necesito instalación eléctrica para una oficina de 100m2",
            header("COT-2025-0001"),
        );
        assert_eq!(g.document.category, ServiceCategoryId::ElectricoComercial);
        assert_eq!(g.entities.area_m2, Some(100.0));
        assert_eq!(g.document.id, "COT-2025-0001");
        assert_eq!(g.document.client, UNKNOWN_CLIENT);
        assert!(!g.document.items.is_empty());
        assert!(g.narrative.open_questions.contains(&narrative::QUESTION_CLIENT.to_string()));
        assert!(!g.narrative.open_questions.contains(&QUESTION_SERVICE.to_string()));
    }

    #[test]
    fn residential_without_area_uses_default_area() {
        let brain = PiliBrain::default();
        let g = brain.generate_quote("instalación eléctrica residencial", header("COT-1"));
        assert_eq!(g.document.category, ServiceCategoryId::ElectricoResidencial);
        assert_eq!(g.entities.area_m2, None);
        let circuits = g
            .document
            .items
            .iter()
            .find(|i| i.unit == "circuito")
            .unwrap();
        assert_eq!(circuits.quantity, Decimal::from(6));
    }

    #[test]
    fn totals_invariants_hold_for_every_category() {
        let brain = PiliBrain::default();
        let texts = [
            "casa de 180 m2 con 3 pisos",
            "oficina de 95,5 m2",
            "planta industrial de 40 kw",
            "alarma contra incendio para 420 m2",
            "domótica con 14 puntos",
            "cctv 7 cámaras",
            "cableado estructurado 30 puntos de red",
            "automatización con plc 20 entradas",
            "3 pozos a tierra",
            "certificado itse local de 130 m2",
        ];
        for text in texts {
            let q = brain.generate_quote(text, header("T")).document;
            let exact: Decimal = q.items.iter().map(|i| i.total).sum();
            assert_eq!(q.subtotal, round_money(exact), "{text}");
            assert_eq!(q.total, round_money(exact + exact * IGV_RATE), "{text}");
            assert_eq!(q.total, round_money(q.subtotal + q.subtotal * IGV_RATE), "{text}");
        }
    }

    #[test]
    fn generation_is_idempotent() {
        let brain = PiliBrain::default();
        let text = "remodelación de vivienda de 2 pisos, cliente: Ana Torres";
        for kind in DocumentKind::ALL {
            let a = brain.generate(kind, text, header("X"));
            let b = brain.generate(kind, text, header("X"));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn unknown_service_asks_for_clarification() {
        let brain = PiliBrain::default();
        let g = brain.generate_quote("necesito un presupuesto", header("COT-9"));
        assert_eq!(g.detection.confidence, DetectionConfidence::None);
        assert_eq!(g.document.category, ServiceCategoryId::FALLBACK);
        assert_eq!(g.narrative.open_questions[0], QUESTION_SERVICE);
    }

    #[test]
    fn project_and_report_share_the_budget() {
        let brain = PiliBrain::default();
        let text = "oficina de 200 m2, empresa Grupo Norte";
        let quote = brain.generate_quote(text, header("COT")).document;
        let plan = brain.generate_project(text, header("PRY")).document;
        let report = brain.generate_report(text, header("INF")).document;

        assert_eq!(plan.budget, quote.totals());
        assert_eq!(report.budget, quote.totals());
        assert_eq!(plan.client, "Grupo Norte");
        assert_eq!(plan.total_duration_days, planner::total_duration(&plan.phases));
        assert!(report.standard_reference.contains("EM.010"));
    }

    #[test]
    fn industrial_request_is_complex() {
        let brain = PiliBrain::default();
        let g = brain.generate_quote("tablero para nave industrial de 120 m2", header("C"));
        assert_eq!(g.entities.complexity, Complexity::Complex);
        assert!(g.document.technical_notes.contains("complejidad alta"));
    }

    #[test]
    fn absurd_magnitudes_never_panic() {
        let brain = PiliBrain::default();
        let texts = [
            "oficina de 100000000000 m2",
            "casa de 4000000000 pisos",
            "casa de 9999999999999999999999999999 m2",
            "planta industrial de 99999999999999999999 kw con 4294967295 puntos",
        ];
        for text in texts {
            for kind in DocumentKind::ALL {
                let g = brain.generate(kind, text, header("X"));
                assert!(g.document.totals().total >= Decimal::ZERO, "{text}");
            }
        }
        let plan = brain.generate_project("casa de 4000000000 pisos", header("P")).document;
        assert_eq!(plan.total_duration_days, planner::total_duration(&plan.phases));
    }
}
