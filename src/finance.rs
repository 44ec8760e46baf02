//! Monetary computation for purchase orders.
//!
//! All arithmetic is done with `rust_decimal` at full precision; values are
//! only rounded to currency precision when they cross a persistence or
//! display boundary. Tax is computed once on the aggregate subtotal, never
//! per line.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// GST rate applied to orders placed against tax-registered suppliers.
/// Fixed system-wide; only the supplier's registration flag gates it.
pub const TAX_RATE: Decimal = dec!(0.10);

/// Decimal places used when persisting or displaying currency amounts.
pub const CURRENCY_DP: u32 = 2;

/// A single priced line as seen by the aggregator. Heading rows group the
/// order visually and never contribute to any monetary total.
#[derive(Debug, Clone, PartialEq)]
pub struct LineInput {
    pub quantity: i32,
    pub unit_price: Decimal,
    pub is_heading: bool,
}

impl LineInput {
    pub fn new(quantity: i32, unit_price: Decimal) -> Self {
        Self {
            quantity,
            unit_price,
            is_heading: false,
        }
    }

    pub fn heading() -> Self {
        Self {
            quantity: 0,
            unit_price: Decimal::ZERO,
            is_heading: true,
        }
    }

    /// Line total at full precision. Headings always yield zero, regardless
    /// of any quantity or price stored against them.
    pub fn line_total(&self) -> Decimal {
        if self.is_heading {
            Decimal::ZERO
        } else {
            compute_line_total(self.quantity, self.unit_price)
        }
    }
}

/// Aggregate totals for a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

impl OrderTotals {
    pub const ZERO: OrderTotals = OrderTotals {
        subtotal: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total_amount: Decimal::ZERO,
    };

    /// Totals rounded to currency precision, for the persistence boundary.
    pub fn rounded(&self) -> OrderTotals {
        OrderTotals {
            subtotal: round_currency(self.subtotal),
            tax_amount: round_currency(self.tax_amount),
            total_amount: round_currency(self.total_amount),
        }
    }
}

/// Computes `quantity * unit_price` at full precision.
pub fn compute_line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

/// Sums non-heading line totals into a subtotal, applies GST on the
/// aggregate iff `tax_applicable`, and returns the resulting totals.
///
/// Pure and idempotent: the same line items always produce the same totals.
/// An empty item set is a valid zero-value order, not an error.
pub fn compute_totals<'a, I>(items: I, tax_applicable: bool) -> OrderTotals
where
    I: IntoIterator<Item = &'a LineInput>,
{
    let subtotal: Decimal = items
        .into_iter()
        .filter(|item| !item.is_heading)
        .map(LineInput::line_total)
        .sum();

    let tax_amount = if tax_applicable {
        subtotal * TAX_RATE
    } else {
        Decimal::ZERO
    };

    OrderTotals {
        subtotal,
        tax_amount,
        total_amount: subtotal + tax_amount,
    }
}

/// Rounds to currency precision. Applied once, at the boundary.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp(CURRENCY_DP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn line(quantity: i32, unit_price: Decimal) -> LineInput {
        LineInput::new(quantity, unit_price)
    }

    #[test_case(2, dec!(10.00), dec!(20.00) ; "whole dollars")]
    #[test_case(3, dec!(9.99), dec!(29.97) ; "cents multiply out")]
    #[test_case(0, dec!(123.45), dec!(0) ; "zero quantity")]
    #[test_case(5, dec!(0), dec!(0) ; "zero price")]
    fn line_total_is_quantity_times_price(quantity: i32, unit_price: Decimal, expected: Decimal) {
        assert_eq!(compute_line_total(quantity, unit_price), expected);
    }

    #[test]
    fn totals_with_gst() {
        let items = vec![line(2, dec!(10.00)), line(1, dec!(5.00))];
        let totals = compute_totals(&items, true);
        assert_eq!(totals.subtotal, dec!(25.00));
        assert_eq!(totals.tax_amount, dec!(2.50));
        assert_eq!(totals.total_amount, dec!(27.50));
    }

    #[test]
    fn totals_without_gst() {
        let items = vec![line(2, dec!(10.00)), line(1, dec!(5.00))];
        let totals = compute_totals(&items, false);
        assert_eq!(totals.subtotal, dec!(25.00));
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total_amount, dec!(25.00));
    }

    #[test]
    fn headings_are_excluded_from_aggregation() {
        let items = vec![LineInput::heading(), line(3, dec!(9.99))];
        let totals = compute_totals(&items, false);
        assert_eq!(totals.subtotal, dec!(29.97));

        // A heading row carrying stale quantity/price still contributes zero.
        let stale_heading = LineInput {
            quantity: 7,
            unit_price: dec!(100.00),
            is_heading: true,
        };
        let totals = compute_totals([&stale_heading, &items[1]], true);
        assert_eq!(totals.subtotal, dec!(29.97));
    }

    #[test]
    fn empty_order_has_zero_totals() {
        assert_eq!(compute_totals(&[], true), OrderTotals::ZERO);
        assert_eq!(compute_totals(&[], false), OrderTotals::ZERO);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let items = vec![line(4, dec!(2.25)), line(1, dec!(0.10))];
        let first = compute_totals(&items, true);
        let second = compute_totals(&items, true);
        assert_eq!(first, second);
    }

    #[test]
    fn rounding_happens_only_at_the_boundary() {
        // Three-decimal unit price: exact during aggregation, rounded once
        // when the totals are taken to the boundary.
        let items = vec![line(3, dec!(0.333))];
        let totals = compute_totals(&items, true);
        assert_eq!(totals.subtotal, dec!(0.999));
        assert_eq!(totals.tax_amount, dec!(0.0999));
        assert_eq!(totals.total_amount, dec!(1.0989));

        let rounded = totals.rounded();
        assert_eq!(rounded.subtotal, dec!(1.00));
        assert_eq!(rounded.tax_amount, dec!(0.10));
        assert_eq!(rounded.total_amount, dec!(1.10));
    }
}
