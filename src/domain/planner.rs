//! Project planner. Execution phases and durations for a project plan.

use crate::domain::entities::{
    Complexity, ExtractedEntities, InstallationType, Phase, ServiceCategory,
};
use crate::domain::formulas::DEFAULT_AREA_M2;

/// Builds the phase list. Durations grow with area, floors and complexity;
/// a remodel adds a dismantling phase, an expansion adds a survey phase.
pub fn plan_phases(category: &ServiceCategory, entities: &ExtractedEntities) -> Vec<Phase> {
    let area = entities.area_m2.unwrap_or(DEFAULT_AREA_M2);
    let area_blocks = ((area / 100.0).ceil() as u32).max(1);
    let extra_floors = entities.floor_count.saturating_sub(1);

    let mut phases = Vec::with_capacity(6);
    match entities.installation_type {
        InstallationType::Remodel => phases.push(phase(
            "Desmontaje y retiro de instalación existente",
            area_blocks.max(2),
            &["Acta de retiro de materiales", "Registro fotográfico del estado inicial"],
        )),
        InstallationType::Expansion => phases.push(phase(
            "Evaluación de la instalación existente",
            1,
            &["Informe de capacidad disponible del tablero y acometida"],
        )),
        InstallationType::New => {}
    }

    phases.push(phase(
        "Ingeniería y diseño",
        3,
        &["Planos de instalaciones", "Memoria descriptiva", "Cuadro de cargas"],
    ));
    phases.push(phase(
        "Suministro de materiales",
        5,
        &["Orden de compra", "Guías de remisión de materiales"],
    ));
    phases.push(Phase {
        name: "Instalación".to_string(),
        duration_days: area_blocks
            .saturating_mul(5)
            .saturating_add(extra_floors.saturating_mul(2)),
        deliverables: vec![
            format!("{} ejecutadas", category.display_name),
            "Cuaderno de obra".to_string(),
        ],
    });
    phases.push(phase(
        "Pruebas y puesta en servicio",
        2,
        &["Protocolos de pruebas", "Medición de resistencia de aislamiento"],
    ));
    phases.push(phase(
        "Entrega y documentación",
        1,
        &["Planos as-built", "Acta de conformidad", "Garantía de trabajos"],
    ));

    if entities.complexity == Complexity::Complex {
        for p in &mut phases {
            // x1.5, rounded up
            p.duration_days = p.duration_days.saturating_mul(3).div_ceil(2);
        }
    }
    phases
}

pub fn total_duration(phases: &[Phase]) -> u32 {
    phases
        .iter()
        .fold(0u32, |acc, p| acc.saturating_add(p.duration_days))
}

fn phase(name: &str, days: u32, deliverables: &[&str]) -> Phase {
    Phase {
        name: name.to_string(),
        duration_days: days,
        deliverables: deliverables.iter().map(|d| d.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Catalog;
    use crate::domain::entities::ServiceCategoryId;

    fn residential() -> ServiceCategory {
        Catalog::builtin()
            .get(ServiceCategoryId::ElectricoResidencial)
            .clone()
    }

    #[test]
    fn default_plan_has_five_phases() {
        let phases = plan_phases(&residential(), &ExtractedEntities::default());
        assert_eq!(phases.len(), 5);
        assert_eq!(phases[2].name, "Instalación");
        assert_eq!(phases[2].duration_days, 5);
        assert_eq!(total_duration(&phases), 3 + 5 + 5 + 2 + 1);
    }

    #[test]
    fn installation_scales_with_area_and_floors() {
        let e = ExtractedEntities {
            area_m2: Some(250.0),
            floor_count: 3,
            ..ExtractedEntities::default()
        };
        let phases = plan_phases(&residential(), &e);
        // ceil(250/100) = 3 blocks, 2 extra floors.
        assert_eq!(phases[2].duration_days, 5 * 3 + 2 * 2);
    }

    #[test]
    fn remodel_adds_dismantling_and_complex_stretches() {
        let e = ExtractedEntities {
            installation_type: InstallationType::Remodel,
            complexity: Complexity::Complex,
            ..ExtractedEntities::default()
        };
        let phases = plan_phases(&residential(), &e);
        assert_eq!(phases.len(), 6);
        assert!(phases[0].name.starts_with("Desmontaje"));
        // 2 days x1.5 = 3; 3 days x1.5 = 4.5 -> 5.
        assert_eq!(phases[0].duration_days, 3);
        assert_eq!(phases[1].duration_days, 5);
    }

    #[test]
    fn huge_inputs_saturate_instead_of_overflowing() {
        let e = ExtractedEntities {
            area_m2: Some(1e11),
            floor_count: u32::MAX,
            complexity: Complexity::Complex,
            ..ExtractedEntities::default()
        };
        let phases = plan_phases(&residential(), &e);
        assert_eq!(phases[2].duration_days, u32::MAX.div_ceil(2));
        assert_eq!(total_duration(&phases), u32::MAX);
    }
}
