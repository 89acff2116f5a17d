//! Item generator. One pricing formula per service category.
//!
//! Quantities come from simple ratios over the extracted entities, truncated
//! toward zero, with fixed fallbacks when a field is missing. Every formula
//! returns a non-empty list.

use crate::domain::catalog::Catalog;
use crate::domain::entities::{ExtractedEntities, LineItem, ServiceCategory, ServiceCategoryId};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

pub const DEFAULT_AREA_M2: f64 = 100.0;
pub const DEFAULT_INDUSTRIAL_AREA_M2: f64 = 500.0;
pub const DEFAULT_POWER_KW: f64 = 50.0;
pub const DEFAULT_DOMOTICS_POINTS: u32 = 10;
pub const DEFAULT_CAMERAS: u32 = 4;
pub const DEFAULT_NETWORK_POINTS: u32 = 12;
pub const DEFAULT_IO_POINTS: u32 = 16;
pub const DEFAULT_GROUNDING_PITS: u32 = 1;

/// Pricing strategy for one category.
pub trait ItemFormula: Send + Sync {
    fn items(&self, category: &ServiceCategory, entities: &ExtractedEntities) -> Vec<LineItem>;
}

/// Builds the line items for `id` from the catalog entry and entities.
pub fn generate_items(
    catalog: &Catalog,
    id: ServiceCategoryId,
    entities: &ExtractedEntities,
) -> Vec<LineItem> {
    formula_for(id).items(catalog.get(id), entities)
}

pub fn formula_for(id: ServiceCategoryId) -> &'static dyn ItemFormula {
    match id {
        ServiceCategoryId::ElectricoResidencial => &Residential,
        ServiceCategoryId::ElectricoComercial => &Commercial,
        ServiceCategoryId::ElectricoIndustrial => &Industrial,
        ServiceCategoryId::Contraincendios => &FireAlarm,
        ServiceCategoryId::Domotica => &HomeAutomation,
        ServiceCategoryId::Cctv => &Surveillance,
        ServiceCategoryId::Redes => &Networking,
        ServiceCategoryId::AutomatizacionIndustrial => &IndustrialControl,
        ServiceCategoryId::PozoTierra => &Grounding,
        ServiceCategoryId::CertificadoItse => &Certification,
    }
}

fn soles(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn count(n: u32) -> Decimal {
    Decimal::from(n)
}

/// `⌊value / per⌋`, saturating at `u32::MAX`.
fn per(value: f64, per: f64) -> u32 {
    (value / per).trunc() as u32
}

/// Measured quantity (m², kW) to two decimals.
fn measured(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

fn area_or(entities: &ExtractedEntities, default: f64) -> f64 {
    entities.area_m2.unwrap_or(default)
}

struct Residential;

impl ItemFormula for Residential {
    fn items(&self, category: &ServiceCategory, e: &ExtractedEntities) -> Vec<LineItem> {
        let area = area_or(e, DEFAULT_AREA_M2);
        let outlets = e.point_count.unwrap_or_else(|| per(area, 15.0).max(4));
        vec![
            LineItem::new(
                "Tablero de distribución monofásico con interruptores termomagnéticos y diferencial",
                count(e.floor_count),
                "und",
                soles(45000),
            ),
            LineItem::new(
                "Circuitos derivados con conductor LSOH 2.5/4 mm² en tubería PVC-SAP",
                count(per(area, 25.0).max(6)),
                "circuito",
                soles(12000),
            ),
            LineItem::new(
                "Salidas de iluminación (centros de luz)",
                count(per(area, 10.0).max(4)),
                "punto",
                soles(3500),
            ),
            LineItem::new(
                "Tomacorrientes dobles con línea a tierra",
                count(outlets),
                "punto",
                soles(4000),
            ),
            LineItem::new(
                "Pozo de puesta a tierra con varilla de cobre",
                count(1),
                "und",
                soles(85000),
            ),
            LineItem::new(
                "Mano de obra, materiales menores y pruebas",
                measured(area),
                category.unit_of_measure,
                category.base_unit_price,
            ),
        ]
    }
}

struct Commercial;

impl ItemFormula for Commercial {
    fn items(&self, category: &ServiceCategory, e: &ExtractedEntities) -> Vec<LineItem> {
        let area = area_or(e, DEFAULT_AREA_M2);
        let outlets = e.point_count.unwrap_or_else(|| per(area, 12.0).max(6));
        vec![
            LineItem::new(
                "Tablero general trifásico autosoportado",
                count(e.floor_count),
                "und",
                soles(120000),
            ),
            LineItem::new(
                "Circuitos derivados de alumbrado y fuerza",
                count(per(area, 20.0).max(8)),
                "circuito",
                soles(15000),
            ),
            LineItem::new(
                "Luminarias LED tipo panel 60x60 40 W",
                count(per(area, 8.0).max(4)),
                "und",
                soles(9500),
            ),
            LineItem::new(
                "Tomacorrientes y salidas de fuerza",
                count(outlets),
                "punto",
                soles(5500),
            ),
            LineItem::new(
                "Luces de emergencia autónomas",
                count(per(area, 50.0).max(2)),
                "und",
                soles(12000),
            ),
            LineItem::new(
                "Mano de obra e instalación",
                measured(area),
                category.unit_of_measure,
                category.base_unit_price,
            ),
        ]
    }
}

struct Industrial;

impl ItemFormula for Industrial {
    fn items(&self, category: &ServiceCategory, e: &ExtractedEntities) -> Vec<LineItem> {
        let power = e.power_rating_kw.unwrap_or(DEFAULT_POWER_KW);
        let area = area_or(e, DEFAULT_INDUSTRIAL_AREA_M2);
        vec![
            LineItem::new(
                "Tablero general de distribución trifásico 380/220 V",
                count(1),
                "und",
                soles(450000),
            ),
            LineItem::new(
                "Alimentadores y circuitos de fuerza",
                count(per(power, 10.0).max(4)),
                "circuito",
                soles(65000),
            ),
            LineItem::new(
                "Banco de condensadores para corrección del factor de potencia",
                count(1),
                "und",
                soles(380000),
            ),
            LineItem::new(
                "Luminarias industriales LED high bay 150 W",
                count(per(area, 40.0).max(6)),
                "und",
                soles(42000),
            ),
            LineItem::new(
                "Malla de puesta a tierra",
                count(1),
                "glb",
                soles(280000),
            ),
            LineItem::new(
                "Montaje e instalación por potencia instalada",
                measured(power),
                category.unit_of_measure,
                category.base_unit_price,
            ),
        ]
    }
}

struct FireAlarm;

impl ItemFormula for FireAlarm {
    fn items(&self, category: &ServiceCategory, e: &ExtractedEntities) -> Vec<LineItem> {
        let area = area_or(e, DEFAULT_AREA_M2);
        // One detector per 60 m² unless the client gave a count.
        let detectors = e.point_count.unwrap_or_else(|| per(area, 60.0).max(1));
        vec![
            LineItem::new(
                "Central de detección y alarma direccionable",
                count(1),
                "und",
                soles(350000),
            ),
            LineItem::new(
                "Detectores de humo fotoeléctricos",
                count(detectors),
                "und",
                soles(18000),
            ),
            LineItem::new(
                "Estaciones manuales de alarma",
                count(e.floor_count.max(1)),
                "und",
                soles(15000),
            ),
            LineItem::new(
                "Sirenas con luz estroboscópica",
                count(e.floor_count.saturating_mul(2).max(2)),
                "und",
                soles(22000),
            ),
            LineItem::new(
                "Cableado FPL 2x18 AWG en tubería EMT",
                measured(area),
                category.unit_of_measure,
                category.base_unit_price,
            ),
        ]
    }
}

struct HomeAutomation;

impl ItemFormula for HomeAutomation {
    fn items(&self, category: &ServiceCategory, e: &ExtractedEntities) -> Vec<LineItem> {
        let points = e.point_count.unwrap_or(DEFAULT_DOMOTICS_POINTS);
        vec![
            LineItem::new(
                "Controlador domótico central (gateway KNX/IP)",
                count(1),
                "und",
                soles(280000),
            ),
            LineItem::new(
                "Actuadores y módulos de control",
                count(points),
                category.unit_of_measure,
                category.base_unit_price,
            ),
            LineItem::new(
                "Sensores de presencia y temperatura",
                count((points / 3).max(2)),
                "und",
                soles(18000),
            ),
            LineItem::new(
                "Pantalla táctil y aplicación de control",
                count(1),
                "und",
                soles(95000),
            ),
            LineItem::new(
                "Programación de escenas y puesta en marcha",
                count(1),
                "glb",
                soles(150000),
            ),
        ]
    }
}

struct Surveillance;

impl ItemFormula for Surveillance {
    fn items(&self, category: &ServiceCategory, e: &ExtractedEntities) -> Vec<LineItem> {
        let cameras = e.point_count.unwrap_or(DEFAULT_CAMERAS);
        vec![
            LineItem::new(
                "Cámaras IP 4 MP con visión nocturna",
                count(cameras),
                category.unit_of_measure,
                category.base_unit_price,
            ),
            LineItem::new("Grabador NVR", count(1), "und", soles(120000)),
            LineItem::new(
                "Disco duro para videovigilancia 4 TB",
                count((cameras / 8).max(1)),
                "und",
                soles(45000),
            ),
            LineItem::new(
                "Cableado UTP Cat6 y canalización por cámara",
                count(cameras),
                "punto",
                soles(9000),
            ),
            LineItem::new(
                "Configuración, acceso remoto y capacitación",
                count(1),
                "glb",
                soles(35000),
            ),
        ]
    }
}

struct Networking;

impl ItemFormula for Networking {
    fn items(&self, category: &ServiceCategory, e: &ExtractedEntities) -> Vec<LineItem> {
        let points = e.point_count.unwrap_or(DEFAULT_NETWORK_POINTS);
        let panels = points / 24 + 1;
        vec![
            LineItem::new(
                "Puntos de red Cat6",
                count(points),
                category.unit_of_measure,
                category.base_unit_price,
            ),
            LineItem::new(
                "Gabinete de comunicaciones 24 RU",
                count(1),
                "und",
                soles(180000),
            ),
            LineItem::new(
                "Switch administrable 24 puertos PoE",
                count(panels),
                "und",
                soles(95000),
            ),
            LineItem::new("Patch panel Cat6 24 puertos", count(panels), "und", soles(38000)),
            LineItem::new(
                "Certificación de puntos con analizador",
                count(points),
                "punto",
                soles(2500),
            ),
        ]
    }
}

struct IndustrialControl;

impl ItemFormula for IndustrialControl {
    fn items(&self, category: &ServiceCategory, e: &ExtractedEntities) -> Vec<LineItem> {
        let io = e.point_count.unwrap_or(DEFAULT_IO_POINTS);
        vec![
            LineItem::new(
                "PLC con CPU y fuente de alimentación",
                count(1),
                "und",
                soles(450000),
            ),
            LineItem::new(
                "Módulos de entradas/salidas de 8 canales",
                count((io / 8).max(1)),
                "und",
                soles(85000),
            ),
            LineItem::new("Panel HMI táctil de 7\"", count(1), "und", soles(320000)),
            LineItem::new("Tablero de control y fuerza", count(1), "und", soles(250000)),
            LineItem::new(
                "Programación e ingeniería por punto de E/S",
                count(io),
                category.unit_of_measure,
                category.base_unit_price,
            ),
        ]
    }
}

struct Grounding;

impl ItemFormula for Grounding {
    fn items(&self, category: &ServiceCategory, e: &ExtractedEntities) -> Vec<LineItem> {
        let pits = e.point_count.unwrap_or(DEFAULT_GROUNDING_PITS);
        vec![
            LineItem::new(
                "Pozo de puesta a tierra: excavación, varilla de cobre 2.4 m, tierra de cultivo y dosis electrolíticas",
                count(pits),
                category.unit_of_measure,
                category.base_unit_price,
            ),
            LineItem::new(
                "Caja de registro con tapa de concreto",
                count(pits),
                "und",
                soles(12000),
            ),
            LineItem::new(
                "Conductor de cobre desnudo 35 mm²",
                count(pits.saturating_mul(15)),
                "m",
                soles(1800),
            ),
            LineItem::new(
                "Medición de resistencia y protocolo de pruebas",
                count(pits),
                "und",
                soles(15000),
            ),
        ]
    }
}

struct Certification;

impl ItemFormula for Certification {
    fn items(&self, category: &ServiceCategory, e: &ExtractedEntities) -> Vec<LineItem> {
        let area = area_or(e, DEFAULT_AREA_M2);
        vec![
            LineItem::new(
                "Inspección técnica y levantamiento de observaciones",
                measured(area),
                category.unit_of_measure,
                category.base_unit_price,
            ),
            LineItem::new(
                "Pruebas de aislamiento y continuidad",
                count(per(area, 100.0).max(1)),
                "prueba",
                soles(25000),
            ),
            LineItem::new(
                "Planos eléctricos as-built",
                count(e.floor_count),
                "lámina",
                soles(35000),
            ),
            LineItem::new(
                "Informe técnico y protocolos firmados por ingeniero colegiado",
                count(1),
                "glb",
                soles(60000),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items_for(id: ServiceCategoryId, e: &ExtractedEntities) -> Vec<LineItem> {
        generate_items(&Catalog::builtin(), id, e)
    }

    #[test]
    fn every_category_produces_items_at_defaults() {
        let defaults = ExtractedEntities::default();
        for id in ServiceCategoryId::ALL {
            let items = items_for(id, &defaults);
            assert!(
                (3..=6).contains(&items.len()),
                "{id} produced {} items",
                items.len()
            );
            for item in &items {
                assert!(item.quantity > Decimal::ZERO, "{id}: {}", item.description);
                assert_eq!(item.total, item.quantity * item.unit_price);
            }
        }
    }

    #[test]
    fn residential_defaults_to_six_circuits() {
        let items = items_for(ServiceCategoryId::ElectricoResidencial, &ExtractedEntities::default());
        let circuits = items.iter().find(|i| i.unit == "circuito").unwrap();
        assert_eq!(circuits.quantity, Decimal::from(6));
        assert_eq!(circuits.unit_price, Decimal::new(12000, 2));
    }

    #[test]
    fn residential_circuits_scale_with_area() {
        let e = ExtractedEntities {
            area_m2: Some(260.0),
            ..ExtractedEntities::default()
        };
        let items = items_for(ServiceCategoryId::ElectricoResidencial, &e);
        let circuits = items.iter().find(|i| i.unit == "circuito").unwrap();
        // 260 / 25 = 10.4, truncated.
        assert_eq!(circuits.quantity, Decimal::from(10));
    }

    #[test]
    fn fire_alarm_uses_one_detector_per_sixty_m2() {
        let e = ExtractedEntities {
            area_m2: Some(250.0),
            floor_count: 2,
            ..ExtractedEntities::default()
        };
        let items = items_for(ServiceCategoryId::Contraincendios, &e);
        assert_eq!(items[1].quantity, Decimal::from(4));
        assert_eq!(items[3].quantity, Decimal::from(4));
    }

    #[test]
    fn cctv_uses_point_count_as_cameras() {
        let e = ExtractedEntities {
            point_count: Some(9),
            ..ExtractedEntities::default()
        };
        let items = items_for(ServiceCategoryId::Cctv, &e);
        assert_eq!(items[0].quantity, Decimal::from(9));
        assert_eq!(items[0].unit_price, Decimal::new(38000, 2));
        assert_eq!(items[2].quantity, Decimal::from(1));
    }

    #[test]
    fn base_price_comes_from_catalog() {
        let catalog = Catalog::builtin()
            .with_base_price(ServiceCategoryId::Redes, Decimal::new(20000, 2));
        let items = generate_items(
            &catalog,
            ServiceCategoryId::Redes,
            &ExtractedEntities::default(),
        );
        assert_eq!(items[0].unit_price, Decimal::new(20000, 2));
        assert_eq!(items[0].total, Decimal::new(240000, 2));
    }

    #[test]
    fn generation_is_repeatable() {
        let e = ExtractedEntities {
            area_m2: Some(123.45),
            power_rating_kw: Some(37.5),
            ..ExtractedEntities::default()
        };
        for id in ServiceCategoryId::ALL {
            assert_eq!(items_for(id, &e), items_for(id, &e));
        }
    }
}
