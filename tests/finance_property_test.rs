use procurement_api::finance::{compute_totals, LineInput, TAX_RATE};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

fn arb_line() -> impl Strategy<Value = LineInput> {
    (0..1_000i32, 0..1_000_000i64, any::<bool>()).prop_map(|(quantity, price_cents, is_heading)| {
        LineInput {
            quantity,
            unit_price: cents(price_cents),
            is_heading,
        }
    })
}

proptest! {
    #[test]
    fn totals_are_idempotent(items in prop::collection::vec(arb_line(), 0..20), taxed in any::<bool>()) {
        let first = compute_totals(&items, taxed);
        let second = compute_totals(&items, taxed);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn headings_never_contribute(items in prop::collection::vec(arb_line(), 0..20)) {
        let priced_only: Vec<LineInput> = items.iter().filter(|i| !i.is_heading).cloned().collect();
        prop_assert_eq!(compute_totals(&items, true), compute_totals(&priced_only, true));
    }

    #[test]
    fn tax_is_exactly_ten_percent_of_subtotal(items in prop::collection::vec(arb_line(), 0..20)) {
        let taxed = compute_totals(&items, true);
        let untaxed = compute_totals(&items, false);

        prop_assert_eq!(taxed.subtotal, untaxed.subtotal);
        prop_assert_eq!(untaxed.tax_amount, Decimal::ZERO);
        prop_assert_eq!(taxed.tax_amount, taxed.subtotal * TAX_RATE);
        prop_assert_eq!(taxed.total_amount, taxed.subtotal + taxed.tax_amount);
    }

    #[test]
    fn subtotal_is_additive_over_concatenation(
        left in prop::collection::vec(arb_line(), 0..10),
        right in prop::collection::vec(arb_line(), 0..10),
    ) {
        let combined: Vec<LineInput> = left.iter().chain(right.iter()).cloned().collect();
        let sum = compute_totals(&left, false).subtotal + compute_totals(&right, false).subtotal;
        prop_assert_eq!(compute_totals(&combined, false).subtotal, sum);
    }
}
