//! Domain entities. Pure data structures for the core business.
//!
//! All records are value objects: built once per request, never edited in place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a service category. Declaration order is catalog order,
/// which decides detection ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceCategoryId {
    ElectricoResidencial,
    ElectricoComercial,
    ElectricoIndustrial,
    Contraincendios,
    Domotica,
    Cctv,
    Redes,
    AutomatizacionIndustrial,
    PozoTierra,
    CertificadoItse,
}

impl ServiceCategoryId {
    pub const ALL: [ServiceCategoryId; 10] = [
        ServiceCategoryId::ElectricoResidencial,
        ServiceCategoryId::ElectricoComercial,
        ServiceCategoryId::ElectricoIndustrial,
        ServiceCategoryId::Contraincendios,
        ServiceCategoryId::Domotica,
        ServiceCategoryId::Cctv,
        ServiceCategoryId::Redes,
        ServiceCategoryId::AutomatizacionIndustrial,
        ServiceCategoryId::PozoTierra,
        ServiceCategoryId::CertificadoItse,
    ];

    /// Category used when no keyword matches.
    pub const FALLBACK: ServiceCategoryId = ServiceCategoryId::ElectricoResidencial;

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategoryId::ElectricoResidencial => "electrico-residencial",
            ServiceCategoryId::ElectricoComercial => "electrico-comercial",
            ServiceCategoryId::ElectricoIndustrial => "electrico-industrial",
            ServiceCategoryId::Contraincendios => "contraincendios",
            ServiceCategoryId::Domotica => "domotica",
            ServiceCategoryId::Cctv => "cctv",
            ServiceCategoryId::Redes => "redes",
            ServiceCategoryId::AutomatizacionIndustrial => "automatizacion-industrial",
            ServiceCategoryId::PozoTierra => "pozo-tierra",
            ServiceCategoryId::CertificadoItse => "certificado-itse",
        }
    }
}

impl fmt::Display for ServiceCategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a service the company sells.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceCategory {
    pub id: ServiceCategoryId,
    pub display_name: &'static str,
    /// Lowercase keywords; matched as substrings.
    pub keywords: &'static [&'static str],
    pub standard_reference: &'static str,
    pub unit_of_measure: &'static str,
    pub base_unit_price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallationType {
    #[default]
    New,
    Remodel,
    Expansion,
}

impl InstallationType {
    pub fn label(&self) -> &'static str {
        match self {
            InstallationType::New => "instalación nueva",
            InstallationType::Remodel => "remodelación",
            InstallationType::Expansion => "ampliación",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Simple,
    Complex,
}

/// Facts pulled out of one free-text message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub area_m2: Option<f64>,
    pub floor_count: u32,
    pub point_count: Option<u32>,
    pub power_rating_kw: Option<f64>,
    pub installation_type: InstallationType,
    pub complexity: Complexity,
    pub client_name: Option<String>,
}

impl Default for ExtractedEntities {
    fn default() -> Self {
        Self {
            area_m2: None,
            floor_count: 1,
            point_count: None,
            power_rating_kw: None,
            installation_type: InstallationType::New,
            complexity: Complexity::Simple,
            client_name: None,
        }
    }
}

/// One priced row. `total` is always `quantity * unit_price`, saturating at `Decimal::MAX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub total: Decimal,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            total: quantity.saturating_mul(unit_price),
        }
    }
}

/// Subtotal, IGV and total, rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionConfidence {
    /// No keyword matched; the fallback category was used.
    None,
    /// Another category reached the same score as the winner.
    Ambiguous,
    Clear,
}

/// Outcome of scoring a message against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub category: ServiceCategoryId,
    pub score: usize,
    pub matched_keywords: Vec<String>,
    pub runner_up: Option<ServiceCategoryId>,
    pub confidence: DetectionConfidence,
}

impl Detection {
    pub fn needs_clarification(&self) -> bool {
        self.confidence != DetectionConfidence::Clear
    }
}

/// Human-readable summary plus the follow-up checklist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Narrative {
    pub summary: String,
    pub open_questions: Vec<String>,
}

/// Identity assigned by the caller; keeps generation deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    pub id: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: String,
    pub client: String,
    pub project_name: String,
    pub category: ServiceCategoryId,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub validity_note: String,
    pub technical_notes: String,
    pub created_at: i64,
}

impl QuoteRecord {
    pub fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub duration_days: u32,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPlan {
    pub id: String,
    pub client: String,
    pub project_name: String,
    pub category: ServiceCategoryId,
    pub phases: Vec<Phase>,
    pub total_duration_days: u32,
    pub items: Vec<LineItem>,
    pub budget: Totals,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub id: String,
    pub client: String,
    pub project_name: String,
    pub category: ServiceCategoryId,
    pub standard_reference: String,
    pub sections: Vec<ReportSection>,
    pub budget: Totals,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Cotizacion,
    Proyecto,
    Informe,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Cotizacion,
        DocumentKind::Proyecto,
        DocumentKind::Informe,
    ];

    /// Prefix used in document ids (e.g. `COT-2025-0001`).
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Cotizacion => "COT",
            DocumentKind::Proyecto => "PRY",
            DocumentKind::Informe => "INF",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Cotizacion => "Cotización",
            DocumentKind::Proyecto => "Proyecto",
            DocumentKind::Informe => "Informe técnico",
        }
    }
}

/// Any document PILI can produce, tagged by `kind` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GeneratedDocument {
    Cotizacion(QuoteRecord),
    Proyecto(ProjectPlan),
    Informe(TechnicalReport),
}

impl GeneratedDocument {
    pub fn kind(&self) -> DocumentKind {
        match self {
            GeneratedDocument::Cotizacion(_) => DocumentKind::Cotizacion,
            GeneratedDocument::Proyecto(_) => DocumentKind::Proyecto,
            GeneratedDocument::Informe(_) => DocumentKind::Informe,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            GeneratedDocument::Cotizacion(q) => &q.id,
            GeneratedDocument::Proyecto(p) => &p.id,
            GeneratedDocument::Informe(r) => &r.id,
        }
    }

    pub fn client(&self) -> &str {
        match self {
            GeneratedDocument::Cotizacion(q) => &q.client,
            GeneratedDocument::Proyecto(p) => &p.client,
            GeneratedDocument::Informe(r) => &r.client,
        }
    }

    pub fn created_at(&self) -> i64 {
        match self {
            GeneratedDocument::Cotizacion(q) => q.created_at,
            GeneratedDocument::Proyecto(p) => p.created_at,
            GeneratedDocument::Informe(r) => r.created_at,
        }
    }

    pub fn totals(&self) -> Totals {
        match self {
            GeneratedDocument::Cotizacion(q) => q.totals(),
            GeneratedDocument::Proyecto(p) => p.budget,
            GeneratedDocument::Informe(r) => r.budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_item_total_is_quantity_times_price() {
        let item = LineItem::new("Circuito", Decimal::from(6), "circuito", Decimal::new(12000, 2));
        assert_eq!(item.total, Decimal::new(72000, 2));
    }

    #[test]
    fn line_item_total_saturates_instead_of_panicking() {
        let item = LineItem::new("x", Decimal::MAX, "m²", Decimal::new(4500, 2));
        assert_eq!(item.total, Decimal::MAX);
    }

    #[test]
    fn category_ids_serialize_kebab_case() {
        let json = serde_json::to_string(&ServiceCategoryId::AutomatizacionIndustrial).unwrap();
        assert_eq!(json, "\"automatizacion-industrial\"");
        for id in ServiceCategoryId::ALL {
            assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{}\"", id));
        }
    }

    #[test]
    fn default_entities_have_one_floor() {
        let e = ExtractedEntities::default();
        assert_eq!(e.floor_count, 1);
        assert_eq!(e.installation_type, InstallationType::New);
        assert_eq!(e.complexity, Complexity::Simple);
        assert!(e.area_m2.is_none());
    }
}
