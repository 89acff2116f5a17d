//! Entity extractor. Pulls quantities and labels out of a free-text request.
//!
//! Numeric fields are driven by one declarative table: for each field an
//! ordered list of patterns, each with the parser that turns its first capture
//! into a number. The first pattern whose capture parses wins. Nothing here
//! can fail; unmatched fields keep their defaults.

use crate::domain::entities::{Complexity, ExtractedEntities, InstallationType};
use regex::Regex;
use std::sync::LazyLock;

/// Areas above this many m² are classified as complex.
pub const COMPLEX_AREA_THRESHOLD_M2: f64 = 300.0;

const COMPLEXITY_KEYWORDS: &[&str] = &[
    "industrial",
    "hospital",
    "clínica",
    "clinica",
    "centro comercial",
    "trifásico",
    "trifasico",
    "media tensión",
    "media tension",
    "alta tensión",
    "alta tension",
    "subestación",
    "subestacion",
    "data center",
    "plc",
    "scada",
];

const REMODEL_KEYWORDS: &[&str] = &[
    "remodelación",
    "remodelacion",
    "remodelar",
    "renovación",
    "renovacion",
    "reforma",
    "rehabilitación",
    "rehabilitacion",
    "cambio de cableado",
];

const EXPANSION_KEYWORDS: &[&str] = &[
    "ampliación",
    "ampliacion",
    "ampliar",
    "expansión",
    "expansion",
];

/// Lowercase names of leading words that mean the "name" capture went wrong.
const NAME_STOPWORDS: &[&str] = &["de", "del", "la", "el", "una", "un", "que", "mi", "su"];

/// Words that end a client name captured after "empresa", "cliente", ...
const NAME_FOLLOW_ON: &[&str] = &[
    "necesita", "necesito", "requiere", "solicita", "quiere", "desea", "para", "con", "en",
    "ubicado", "ubicada", "oficina", "casa", "local", "vivienda", "tienda", "planta", "edificio",
    "departamento", "almacén", "almacen", "que", "por", "sobre",
];
const MAX_NAME_WORDS: usize = 6;

// Upper bounds; anything larger is treated as a misread, not a request.
const MAX_AREA_M2: f64 = 10_000_000.0;
const MAX_FLOORS: f64 = 200.0;
const MAX_POINTS: f64 = 100_000.0;
const MAX_POWER_KW: f64 = 1_000_000.0;

// kVA to kW at a typical 0.8 power factor; HP to kW.
const KVA_TO_KW: f64 = 0.8;
const HP_TO_KW: f64 = 0.746;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericField {
    Area,
    Floors,
    Points,
    Power,
}

impl NumericField {
    fn max_value(self) -> f64 {
        match self {
            NumericField::Area => MAX_AREA_M2,
            NumericField::Floors => MAX_FLOORS,
            NumericField::Points => MAX_POINTS,
            NumericField::Power => MAX_POWER_KW,
        }
    }

    /// Measured fields may be fractional; counts may not.
    fn is_measured(self) -> bool {
        matches!(self, NumericField::Area | NumericField::Power)
    }
}

#[derive(Debug, Clone, Copy)]
enum Parser {
    /// Decimal with `.` or `,` separator, scaled by the factor.
    Decimal(f64),
    /// Whole number.
    Integer,
    /// Spanish number word ("dos", "tres", ...).
    Word,
}

struct Pattern {
    regex: Regex,
    parser: Parser,
}

struct FieldRule {
    field: NumericField,
    patterns: Vec<Pattern>,
}

const NUM: &str = r"\b(\d+(?:[.,]\d+)?)";
const WORDS: &str = r"(uno|una|dos|tres|cuatro|cinco|seis|siete|ocho|nueve|diez)";

fn rule(field: NumericField, specs: &[(String, Parser)]) -> FieldRule {
    FieldRule {
        field,
        patterns: specs
            .iter()
            .map(|(src, parser)| Pattern {
                regex: Regex::new(src).unwrap(),
                parser: *parser,
            })
            .collect(),
    }
}

static RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        rule(
            NumericField::Area,
            &[
                (
                    format!(r"{NUM}\s*(?:m2|m²|mt2|mts2|mts²|metros\s+cuadrados|metros2)"),
                    Parser::Decimal(1.0),
                ),
                (
                    format!(
                        r"(?:área|area|superficie)\s*(?:total|aproximada|aprox\.?)?\s*(?:de)?\s*:?\s*{NUM}"
                    ),
                    Parser::Decimal(1.0),
                ),
                (format!(r"{NUM}\s*metros\b"), Parser::Decimal(1.0)),
            ],
        ),
        rule(
            NumericField::Floors,
            &[
                (r"\b(\d+)\s*(?:pisos?|niveles?|plantas)\b".to_string(), Parser::Integer),
                (format!(r"\b{WORDS}\s+(?:pisos?|niveles?|plantas)\b"), Parser::Word),
            ],
        ),
        rule(
            NumericField::Points,
            &[
                (
                    r"\b(\d+)\s*(?:puntos?|salidas?|tomacorrientes?|luminarias?|cámaras?|camaras?|detectores?|elementos?|equipos?|pozos?|entradas?)\b"
                        .to_string(),
                    Parser::Integer,
                ),
                (
                    r"(?:puntos|cámaras|camaras|detectores)\s*:\s*(\d+)".to_string(),
                    Parser::Integer,
                ),
            ],
        ),
        rule(
            NumericField::Power,
            &[
                (
                    format!(r"{NUM}\s*(?:kw|kilowatts?|kilovatios?)\b"),
                    Parser::Decimal(1.0),
                ),
                (format!(r"{NUM}\s*kva\b"), Parser::Decimal(KVA_TO_KW)),
                (format!(r"{NUM}\s*(?:hp|caballos)\b"), Parser::Decimal(HP_TO_KW)),
            ],
        ),
    ]
});

static RE_CLIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:cliente|empresa|raz[oó]n social|señora?)\b|\bsra?\.)\s*[:\-]?\s*([\p{L}0-9&.\- ]{2,80})",
    )
    .unwrap()
});

/// Extracts every entity from `text`. Always returns a complete record.
pub fn extract(text: &str) -> ExtractedEntities {
    let normalized = text.to_lowercase();
    let mut entities = ExtractedEntities::default();

    for rule in RULES.iter() {
        let Some(value) = first_match(rule, &normalized) else {
            continue;
        };
        match rule.field {
            NumericField::Area => entities.area_m2 = Some(value),
            NumericField::Floors => {
                if let Some(n) = to_count(value) {
                    entities.floor_count = n;
                }
            }
            NumericField::Points => entities.point_count = to_count(value),
            NumericField::Power => entities.power_rating_kw = Some(value),
        }
    }

    entities.installation_type = installation_type(&normalized);
    entities.complexity = complexity(&normalized, entities.area_m2);
    entities.client_name = client_name(text);
    entities
}

fn first_match(rule: &FieldRule, text: &str) -> Option<f64> {
    rule.patterns.iter().find_map(|p| {
        let caps = p.regex.captures(text)?;
        let raw = caps.get(1)?.as_str();
        let value = match p.parser {
            Parser::Decimal(scale) => parse_decimal(raw).map(|v| v * scale),
            Parser::Integer => raw.parse::<u32>().ok().map(f64::from),
            Parser::Word => word_to_number(raw),
        }?;
        let valid = value.is_finite()
            && value > 0.0
            && value <= rule.field.max_value()
            && (rule.field.is_measured() || value.fract() == 0.0);
        valid.then_some(value)
    })
}

/// Parses `12`, `12.5` or `12,5`. A separator followed by exactly three digits
/// after a short non-zero integer part is read as a thousands separator
/// (`1.500` = 1500, but `0,004` = 0.004).
fn parse_decimal(raw: &str) -> Option<f64> {
    if let Some(pos) = raw.find(['.', ',']) {
        let (int_part, frac_part) = (&raw[..pos], &raw[pos + 1..]);
        let zero_int = int_part.trim_start_matches('0').is_empty();
        if frac_part.len() == 3 && int_part.len() <= 3 && !zero_int {
            return format!("{int_part}{frac_part}").parse().ok();
        }
        return format!("{int_part}.{frac_part}").parse().ok();
    }
    raw.parse().ok()
}

fn word_to_number(word: &str) -> Option<f64> {
    let n = match word {
        "uno" | "una" => 1,
        "dos" => 2,
        "tres" => 3,
        "cuatro" => 4,
        "cinco" => 5,
        "seis" => 6,
        "siete" => 7,
        "ocho" => 8,
        "nueve" => 9,
        "diez" => 10,
        _ => return None,
    };
    Some(f64::from(n))
}

fn to_count(value: f64) -> Option<u32> {
    (value >= 1.0 && value <= f64::from(u32::MAX)).then(|| value as u32)
}

fn installation_type(normalized: &str) -> InstallationType {
    if REMODEL_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        InstallationType::Remodel
    } else if EXPANSION_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        InstallationType::Expansion
    } else {
        InstallationType::New
    }
}

fn complexity(normalized: &str, area_m2: Option<f64>) -> Complexity {
    let keyword = COMPLEXITY_KEYWORDS.iter().any(|kw| normalized.contains(kw));
    let large = area_m2.is_some_and(|a| a > COMPLEX_AREA_THRESHOLD_M2);
    if keyword || large {
        Complexity::Complex
    } else {
        Complexity::Simple
    }
}

fn client_name(text: &str) -> Option<String> {
    let caps = RE_CLIENT.captures(text)?;
    let raw = caps.get(1)?.as_str();
    let first = raw.split_whitespace().next()?.to_lowercase();
    if NAME_STOPWORDS.contains(&first.as_str()) {
        return None;
    }

    // The capture runs to the next separator; keep only the leading name words.
    let words: Vec<&str> = raw
        .split_whitespace()
        .take_while(|w| {
            !w.chars().any(|c| c.is_ascii_digit())
                && !NAME_FOLLOW_ON.contains(&w.to_lowercase().as_str())
        })
        .take(MAX_NAME_WORDS)
        .collect();
    let name = words.join(" ");
    let name = name.trim_end_matches(['.', '-']).trim();
    if name.chars().count() < 2 {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_area_from_compact_unit() {
        let e = extract("Necesito instalación eléctrica para una oficina de 100m2");
        assert_eq!(e.area_m2, Some(100.0));
        assert_eq!(e.floor_count, 1);
        assert_eq!(e.point_count, None);
    }

    #[test]
    fn missing_area_stays_unset() {
        let e = extract("instalación eléctrica residencial");
        assert_eq!(e.area_m2, None);
        assert_eq!(e.complexity, Complexity::Simple);
        assert_eq!(e.installation_type, InstallationType::New);
    }

    #[test]
    fn reads_decimal_comma_and_labeled_area() {
        assert_eq!(extract("local de 85,5 m2").area_m2, Some(85.5));
        assert_eq!(extract("área total de 240").area_m2, Some(240.0));
        assert_eq!(extract("un terreno de 1.500 m²").area_m2, Some(1500.0));
    }

    #[test]
    fn first_matching_pattern_wins() {
        // The explicit m² pattern is tried before the "área" label.
        let e = extract("área de 50, construidos 120 m2");
        assert_eq!(e.area_m2, Some(120.0));
    }

    #[test]
    fn floors_points_and_power() {
        let e = extract("edificio de 3 pisos con 24 puntos de red y tablero de 15 kW");
        assert_eq!(e.floor_count, 3);
        assert_eq!(e.point_count, Some(24));
        assert_eq!(e.power_rating_kw, Some(15.0));
    }

    #[test]
    fn floor_words_and_power_conversions() {
        let e = extract("casa de dos pisos, motor de 10 hp");
        assert_eq!(e.floor_count, 2);
        let kw = e.power_rating_kw.unwrap();
        assert!((kw - 7.46).abs() < 1e-9);

        let e = extract("transformador de 100 kva");
        assert_eq!(e.power_rating_kw, Some(80.0));
    }

    #[test]
    fn zero_floors_keeps_default() {
        assert_eq!(extract("0 pisos").floor_count, 1);
    }

    #[test]
    fn industrial_keyword_is_complex_regardless_of_area() {
        let e = extract("planta industrial de 50 m2");
        assert_eq!(e.complexity, Complexity::Complex);
    }

    #[test]
    fn large_area_is_complex() {
        let e = extract("vivienda de 350 m2");
        assert_eq!(e.complexity, Complexity::Complex);
        assert_eq!(extract("vivienda de 300 m2").complexity, Complexity::Simple);
    }

    #[test]
    fn installation_type_keywords() {
        assert_eq!(
            extract("remodelación de departamento").installation_type,
            InstallationType::Remodel
        );
        assert_eq!(
            extract("ampliación de tienda").installation_type,
            InstallationType::Expansion
        );
    }

    #[test]
    fn client_name_keeps_original_casing() {
        let e = extract("Cotización para la empresa Constructora Andina SAC, oficina de 80 m2");
        assert_eq!(e.client_name.as_deref(), Some("Constructora Andina SAC"));

        let e = extract("cliente: Juan Pérez");
        assert_eq!(e.client_name.as_deref(), Some("Juan Pérez"));

        assert_eq!(extract("somos una empresa de ventas, 80 m2").client_name, None);
    }

    #[test]
    fn client_name_stops_before_the_request() {
        let e = extract("empresa Grupo Norte necesita cableado estructurado de 20 puntos");
        assert_eq!(e.client_name.as_deref(), Some("Grupo Norte"));

        let e = extract("cliente Juan Perez oficina de 100 m2");
        assert_eq!(e.client_name.as_deref(), Some("Juan Perez"));

        let e = extract("cliente: Inversiones Lima 2020 SAC");
        assert_eq!(e.client_name.as_deref(), Some("Inversiones Lima"));
    }

    #[test]
    fn absurd_magnitudes_are_ignored() {
        let e = extract("oficina de 100000000000 m2, 4000000000 pisos, 500000 puntos, 9999999 kw");
        assert_eq!(e.area_m2, None);
        assert_eq!(e.floor_count, 1);
        assert_eq!(e.point_count, None);
        assert_eq!(e.power_rating_kw, None);

        let e = extract("casa de 9999999999999999999999999999 m2");
        assert_eq!(e.area_m2, None);

        let e = extract("edificio de 200 pisos y 10000000 m2");
        assert_eq!(e.floor_count, 200);
        assert_eq!(e.area_m2, Some(10_000_000.0));
    }

    #[test]
    fn leading_zero_is_not_a_thousands_group() {
        assert_eq!(extract("muestra de 0,004 m2").area_m2, Some(0.004));
        assert_eq!(extract("terreno de 2.500 m2").area_m2, Some(2500.0));
    }

    #[test]
    fn garbage_input_yields_defaults() {
        let e = extract("m2 m2 kw pisos ,,, 99999999999999 pisos");
        assert_eq!(e, ExtractedEntities::default());
    }
}
