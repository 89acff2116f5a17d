//! Technical report sections.

use crate::domain::entities::{
    Complexity, ExtractedEntities, LineItem, ReportSection, ServiceCategory, Totals,
};
use crate::domain::totals::format_soles;

pub fn report_sections(
    category: &ServiceCategory,
    entities: &ExtractedEntities,
    items: &[LineItem],
    totals: &Totals,
) -> Vec<ReportSection> {
    let client = entities.client_name.as_deref().unwrap_or("el cliente");

    let mut scope = format!(
        "El servicio comprende {} ({}).",
        category.display_name.to_lowercase(),
        entities.installation_type.label()
    );
    if let Some(area) = entities.area_m2 {
        scope.push_str(&format!(" Área intervenida: {area:.2} m²."));
    }
    scope.push_str(&format!(" Número de pisos: {}.", entities.floor_count));
    if let Some(kw) = entities.power_rating_kw {
        scope.push_str(&format!(" Potencia instalada: {kw:.2} kW."));
    }

    let description = items
        .iter()
        .map(|i| format!("- {}: {} {}", i.description, i.quantity.normalize(), i.unit))
        .collect::<Vec<_>>()
        .join("\n");

    let mut recommendations = vec![
        "Ejecutar los trabajos con personal certificado y equipos de protección personal.",
        "Verificar la resistencia del sistema de puesta a tierra antes de energizar.",
    ];
    if entities.complexity == Complexity::Complex {
        recommendations
            .push("Por la complejidad del proyecto, se recomienda supervisión permanente de un ingeniero residente.");
    }

    vec![
        section(
            "Antecedentes",
            format!(
                "A solicitud de {client}, se elabora el presente informe técnico sobre {}.",
                category.display_name.to_lowercase()
            ),
        ),
        section("Alcance", scope),
        section(
            "Normativa aplicable",
            format!("Los trabajos se rigen por: {}.", category.standard_reference),
        ),
        section("Descripción técnica", description),
        section(
            "Presupuesto referencial",
            format!(
                "Subtotal {}, IGV (18%) {}, total {}.",
                format_soles(totals.subtotal),
                format_soles(totals.tax),
                format_soles(totals.total)
            ),
        ),
        section(
            "Conclusiones y recomendaciones",
            recommendations
                .iter()
                .map(|r| format!("- {r}"))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    ]
}

fn section(title: &str, body: String) -> ReportSection {
    ReportSection {
        title: title.to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Catalog;
    use crate::domain::entities::ServiceCategoryId;
    use crate::domain::formulas::generate_items;
    use crate::domain::totals::compute_totals;

    #[test]
    fn report_cites_standard_and_lists_items() {
        let catalog = Catalog::builtin();
        let category = catalog.get(ServiceCategoryId::PozoTierra);
        let entities = ExtractedEntities::default();
        let items = generate_items(&catalog, category.id, &entities);
        let totals = compute_totals(&items);

        let sections = report_sections(category, &entities, &items, &totals);
        assert_eq!(sections.len(), 6);
        assert_eq!(sections[2].title, "Normativa aplicable");
        assert!(sections[2].body.contains("IEEE 80"));
        assert_eq!(sections[3].body.lines().count(), items.len());
        assert!(sections[0].body.contains("el cliente"));
    }

    #[test]
    fn complex_jobs_get_supervision_note() {
        let catalog = Catalog::builtin();
        let category = catalog.get(ServiceCategoryId::ElectricoIndustrial);
        let entities = ExtractedEntities {
            complexity: Complexity::Complex,
            ..ExtractedEntities::default()
        };
        let items = generate_items(&catalog, category.id, &entities);
        let sections = report_sections(category, &entities, &items, &compute_totals(&items));
        assert!(sections[5].body.contains("ingeniero residente"));
    }
}
