//! Totals calculator. Subtotal, IGV and grand total.

use crate::domain::entities::{LineItem, Totals};
use rust_decimal::{Decimal, RoundingStrategy};

/// Peruvian IGV, 18%.
pub const IGV_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Sums item totals exactly and rounds each output to 2 decimals.
///
/// Nothing is rounded during accumulation, so `total` is always
/// `round(subtotal + subtotal * 0.18)` of the exact sum. Amounts beyond
/// `Decimal::MAX` saturate.
pub fn compute_totals(items: &[LineItem]) -> Totals {
    let subtotal = items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.total));
    let tax = subtotal.saturating_mul(IGV_RATE);
    Totals {
        subtotal: round_money(subtotal),
        tax: round_money(tax),
        total: round_money(subtotal.saturating_add(tax)),
    }
}

/// Two decimals, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as `S/ 1,380.60`.
pub fn format_soles(value: Decimal) -> String {
    let rounded = format!("{:.2}", round_money(value.abs()));
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{sign}S/ {grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(qty: i64, cents: i64) -> LineItem {
        LineItem::new("x", Decimal::from(qty), "und", Decimal::new(cents, 2))
    }

    #[test]
    fn igv_rate_is_eighteen_percent() {
        assert_eq!(IGV_RATE, Decimal::new(18, 2));
    }

    #[test]
    fn board_and_circuits_example() {
        let totals = compute_totals(&[item(1, 45000), item(6, 12000)]);
        assert_eq!(totals.subtotal, Decimal::new(117000, 2));
        assert_eq!(totals.tax, Decimal::new(21060, 2));
        assert_eq!(totals.total, Decimal::new(138060, 2));
    }

    #[test]
    fn formats_soles_with_grouping() {
        assert_eq!(format_soles(Decimal::new(138060, 2)), "S/ 1,380.60");
        assert_eq!(format_soles(Decimal::from(450)), "S/ 450.00");
        assert_eq!(format_soles(Decimal::new(123456789, 1)), "S/ 12,345,678.90");
        assert_eq!(format_soles(Decimal::ZERO), "S/ 0.00");
    }

    #[test]
    fn empty_items_give_zero() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn huge_amounts_saturate() {
        let items = vec![
            LineItem::new("a", Decimal::MAX, "und", Decimal::ONE),
            LineItem::new("b", Decimal::MAX, "und", Decimal::ONE),
        ];
        let totals = compute_totals(&items);
        assert_eq!(totals.subtotal, Decimal::MAX);
        assert_eq!(totals.total, Decimal::MAX);
    }

    #[test]
    fn rounds_only_at_output() {
        // 123.45 m² at 12.35 = 1524.6075; tax 274.42935.
        let items = vec![LineItem::new(
            "m2",
            Decimal::new(12345, 2),
            "m²",
            Decimal::new(1235, 2),
        )];
        let totals = compute_totals(&items);
        assert_eq!(totals.subtotal, Decimal::new(152461, 2));
        assert_eq!(totals.tax, Decimal::new(27443, 2));
        assert_eq!(totals.total, Decimal::new(179904, 2));
        let exact = Decimal::new(15246075, 4);
        assert_eq!(totals.total, round_money(exact + exact * IGV_RATE));
    }
}
