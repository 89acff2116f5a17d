//! Narrative composer. Turns the generated data into PILI's reply text.

use crate::domain::entities::{
    Complexity, DocumentKind, ExtractedEntities, Narrative, ServiceCategory, Totals,
};
use crate::domain::totals::format_soles;

pub const QUESTION_AREA: &str = "¿Cuál es el área total aproximada en m²?";
pub const QUESTION_POINTS: &str = "¿Cuántos puntos o elementos necesita?";
pub const QUESTION_POWER: &str = "¿Cuál es la potencia instalada requerida en kW?";
pub const QUESTION_CLIENT: &str = "¿A nombre de qué cliente o empresa emitimos el documento?";
pub const QUESTION_SERVICE: &str =
    "¿Qué tipo de servicio necesita (instalación residencial, comercial, industrial, CCTV, redes, pozo a tierra, ...)?";

/// Quote narrative.
pub fn compose(category: &ServiceCategory, entities: &ExtractedEntities, totals: &Totals) -> Narrative {
    compose_for(DocumentKind::Cotizacion, category, entities, totals)
}

/// Narrative for any document kind. Open questions depend only on which
/// optional entity fields are unset.
pub fn compose_for(
    kind: DocumentKind,
    category: &ServiceCategory,
    entities: &ExtractedEntities,
    totals: &Totals,
) -> Narrative {
    let mut summary = format!(
        "He preparado {} de {} para {}",
        article(kind),
        category.display_name.to_lowercase(),
        entities.client_name.as_deref().unwrap_or("su proyecto"),
    );

    let facts = describe(entities);
    if !facts.is_empty() {
        summary.push_str(": ");
        summary.push_str(&facts.join(", "));
    }
    summary.push_str(". ");
    summary.push_str(&format!(
        "Subtotal {}, IGV (18%) {}, total {}.",
        format_soles(totals.subtotal),
        format_soles(totals.tax),
        format_soles(totals.total),
    ));

    Narrative {
        summary,
        open_questions: open_questions(entities),
    }
}

pub fn open_questions(entities: &ExtractedEntities) -> Vec<String> {
    let mut questions = Vec::new();
    if entities.area_m2.is_none() {
        questions.push(QUESTION_AREA.to_string());
    }
    if entities.point_count.is_none() {
        questions.push(QUESTION_POINTS.to_string());
    }
    if entities.power_rating_kw.is_none() {
        questions.push(QUESTION_POWER.to_string());
    }
    if entities.client_name.is_none() {
        questions.push(QUESTION_CLIENT.to_string());
    }
    questions
}

fn article(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Cotizacion => "una cotización",
        DocumentKind::Proyecto => "un plan de proyecto",
        DocumentKind::Informe => "un informe técnico",
    }
}

fn describe(entities: &ExtractedEntities) -> Vec<String> {
    let mut facts = Vec::new();
    if let Some(area) = entities.area_m2 {
        facts.push(format!("área de {area:.2} m²"));
    }
    facts.push(match entities.floor_count {
        1 => "1 piso".to_string(),
        n => format!("{n} pisos"),
    });
    if let Some(points) = entities.point_count {
        facts.push(format!("{points} puntos"));
    }
    if let Some(kw) = entities.power_rating_kw {
        facts.push(format!("potencia de {kw:.2} kW"));
    }
    facts.push(entities.installation_type.label().to_string());
    facts.push(
        match entities.complexity {
            Complexity::Simple => "complejidad estándar",
            Complexity::Complex => "complejidad alta",
        }
        .to_string(),
    );
    facts
}
