//! CSV utilities for item sheets. Uses the `csv` crate for safe serialization.
//!
//! Semicolon-delimited so spreadsheets in a Spanish locale open it directly.

use crate::domain::{LineItem, Totals};
use crate::domain::totals::round_money;

/// Convert line items (plus a totals footer) to a CSV string.
///
/// Format: `Item;Descripción;Cantidad;Unidad;Precio unitario;Total`
pub fn items_to_csv(items: &[LineItem], totals: &Totals) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_writer(Vec::new());

    wtr.write_record([
        "Item",
        "Descripción",
        "Cantidad",
        "Unidad",
        "Precio unitario",
        "Total",
    ])?;

    for (n, item) in items.iter().enumerate() {
        // Descriptions are single-line in the sheet
        let description = item.description.replace('\n', " ").replace('\r', "");
        wtr.write_record([
            (n + 1).to_string(),
            description,
            item.quantity.normalize().to_string(),
            item.unit.clone(),
            format!("{:.2}", item.unit_price),
            format!("{:.2}", round_money(item.total)),
        ])?;
    }

    for (label, value) in [
        ("Subtotal", totals.subtotal),
        ("IGV 18%", totals.tax),
        ("Total", totals.total),
    ] {
        let amount = format!("{:.2}", value);
        wtr.write_record(["", label, "", "", "", amount.as_str()])?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::totals::compute_totals;
    use rust_decimal::Decimal;

    #[test]
    fn test_items_to_csv_basic() {
        let items = vec![
            LineItem::new("Tablero", Decimal::from(1), "und", Decimal::new(45000, 2)),
            LineItem::new("Circuitos", Decimal::from(6), "circuito", Decimal::new(12000, 2)),
        ];
        let csv = items_to_csv(&items, &compute_totals(&items)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Item;Descripción;Cantidad;Unidad;Precio unitario;Total");
        assert_eq!(lines[1], "1;Tablero;1;und;450.00;450.00");
        assert_eq!(lines[2], "2;Circuitos;6;circuito;120.00;720.00");
        assert_eq!(lines[5], ";Total;;;;1380.60");
    }

    #[test]
    fn test_items_to_csv_special_chars() {
        let items = vec![LineItem::new(
            "Panel HMI táctil de 7\"; con\nsoporte",
            Decimal::from(1),
            "und",
            Decimal::new(320000, 2),
        )];
        let csv = items_to_csv(&items, &compute_totals(&items)).unwrap();
        // header + 1 item + 3 totals rows; the quoted description stays on one line
        assert_eq!(csv.lines().count(), 5);
        assert!(csv.contains("\"Panel HMI táctil de 7\"\"; con soporte\""));
    }
}
