//! Service catalog. The static price/keyword table PILI quotes against.
//!
//! Built once at startup and shared read-only. Reference prices are 2024-2025
//! Lima market values in soles, IGV excluded.

use crate::domain::entities::{ServiceCategory, ServiceCategoryId};
use rust_decimal::Decimal;

/// Immutable table with exactly one entry per [`ServiceCategoryId`], in catalog order.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<ServiceCategory>,
}

impl Catalog {
    /// Built-in table used by the company.
    pub fn builtin() -> Self {
        let entries = ServiceCategoryId::ALL.iter().map(|&id| builtin_entry(id)).collect();
        Self { entries }
    }

    /// Same table with a different base unit price for one category
    /// (per-tenant pricing without touching shared state).
    pub fn with_base_price(mut self, id: ServiceCategoryId, price: Decimal) -> Self {
        self.entries[index_of(id)].base_unit_price = price;
        self
    }

    pub fn get(&self, id: ServiceCategoryId) -> &ServiceCategory {
        &self.entries[index_of(id)]
    }

    /// Categories in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceCategory> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// Entries are stored in `ServiceCategoryId::ALL` order, which matches declaration order.
fn index_of(id: ServiceCategoryId) -> usize {
    id as usize
}

fn builtin_entry(id: ServiceCategoryId) -> ServiceCategory {
    match id {
        ServiceCategoryId::ElectricoResidencial => ServiceCategory {
            id,
            display_name: "Instalaciones eléctricas residenciales",
            keywords: &[
                "residencial",
                "casa",
                "vivienda",
                "departamento",
                "hogar",
                "domicilio",
                "dúplex",
                "duplex",
            ],
            standard_reference: "CNE-Utilización 2006 / RNE EM.010",
            unit_of_measure: "m²",
            base_unit_price: Decimal::new(4500, 2),
        },
        ServiceCategoryId::ElectricoComercial => ServiceCategory {
            id,
            display_name: "Instalaciones eléctricas comerciales",
            keywords: &[
                "comercial",
                "oficina",
                "tienda",
                "local",
                "restaurante",
                "negocio",
                "consultorio",
            ],
            standard_reference: "CNE-Utilización 2006 / RNE EM.010 / RNE A.070",
            unit_of_measure: "m²",
            base_unit_price: Decimal::new(6500, 2),
        },
        ServiceCategoryId::ElectricoIndustrial => ServiceCategory {
            id,
            display_name: "Instalaciones eléctricas industriales",
            keywords: &[
                "industrial",
                "fábrica",
                "fabrica",
                "nave",
                "almacén",
                "almacen",
                "motor",
                "trifásico",
                "trifasico",
            ],
            standard_reference: "CNE-Utilización 2006 / CNE-Suministro 2011 / IEC 60364",
            unit_of_measure: "kW",
            base_unit_price: Decimal::new(35000, 2),
        },
        ServiceCategoryId::Contraincendios => ServiceCategory {
            id,
            display_name: "Sistemas de detección y alarma contra incendios",
            keywords: &[
                "incendio",
                "humo",
                "alarma contra",
                "rociador",
                "sprinkler",
                "nfpa",
                "extintor",
            ],
            standard_reference: "NFPA 72 / RNE A.130",
            unit_of_measure: "m²",
            base_unit_price: Decimal::new(2800, 2),
        },
        ServiceCategoryId::Domotica => ServiceCategory {
            id,
            display_name: "Domótica y automatización del hogar",
            keywords: &[
                "domótica",
                "domotica",
                "inteligente",
                "smart home",
                "knx",
                "persianas",
                "escenas",
            ],
            standard_reference: "KNX ISO/IEC 14543-3 / CNE-Utilización 2006",
            unit_of_measure: "punto",
            base_unit_price: Decimal::new(32000, 2),
        },
        ServiceCategoryId::Cctv => ServiceCategory {
            id,
            display_name: "Sistemas de videovigilancia CCTV",
            keywords: &[
                "cctv",
                "cámara",
                "camara",
                "videovigilancia",
                "vigilancia",
                "dvr",
                "nvr",
            ],
            standard_reference: "IEC 62676 / NTP-ISO/IEC 27001",
            unit_of_measure: "cámara",
            base_unit_price: Decimal::new(38000, 2),
        },
        ServiceCategoryId::Redes => ServiceCategory {
            id,
            display_name: "Redes y cableado estructurado",
            keywords: &[
                "cableado estructurado",
                "red de datos",
                "redes",
                "punto de red",
                "puntos de red",
                "rack",
                "cat6",
                "wifi",
                "switch",
            ],
            standard_reference: "ANSI/TIA-568-C / ISO/IEC 11801",
            unit_of_measure: "punto",
            base_unit_price: Decimal::new(18000, 2),
        },
        ServiceCategoryId::AutomatizacionIndustrial => ServiceCategory {
            id,
            display_name: "Automatización industrial y control",
            keywords: &[
                "automatización",
                "automatizacion",
                "automatización industrial",
                "automatizacion industrial",
                "plc",
                "scada",
                "variador",
                "hmi",
                "tablero de control",
            ],
            standard_reference: "IEC 61131-3 / IEC 60204-1",
            unit_of_measure: "E/S",
            base_unit_price: Decimal::new(12000, 2),
        },
        ServiceCategoryId::PozoTierra => ServiceCategory {
            id,
            display_name: "Sistemas de puesta a tierra",
            keywords: &[
                "pozo a tierra",
                "pozos a tierra",
                "puesta a tierra",
                "spat",
                "tierra",
                "resistencia de tierra",
            ],
            standard_reference: "CNE-Utilización Sección 060 / IEEE 80",
            unit_of_measure: "pozo",
            base_unit_price: Decimal::new(85000, 2),
        },
        ServiceCategoryId::CertificadoItse => ServiceCategory {
            id,
            display_name: "Certificaciones ITSE y conformidad eléctrica",
            keywords: &[
                "itse",
                "certificado",
                "certificación",
                "certificacion",
                "inspección",
                "inspeccion",
                "defensa civil",
                "conformidad",
            ],
            standard_reference: "D.S. 002-2018-PCM / CNE-Utilización 2006",
            unit_of_measure: "m²",
            base_unit_price: Decimal::new(800, 2),
        },
    }
}
