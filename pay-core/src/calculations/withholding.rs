//! Annual percentage-method withholding against a single bracket table.
//!
//! IRS Publication 15-T expresses each schedule as rows of
//! `(threshold, base withholding, rate)`. Withholding for an annual wage is
//! the base of the highest row at or below that wage plus the rate applied
//! to the excess over the row's threshold.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pay_core::calculations::compute_withholding;
//! use pay_core::{WithholdingBracket, WithholdingTable};
//!
//! let table = WithholdingTable::new(vec![
//!     WithholdingBracket::new(dec!(0), dec!(0), dec!(0)),
//!     WithholdingBracket::new(dec!(6400), dec!(0), dec!(0.10)),
//!     WithholdingBracket::new(dec!(18325), dec!(1192.50), dec!(0.12)),
//! ])
//! .unwrap();
//!
//! // 1192.50 + (30000 - 18325) × 12%
//! assert_eq!(compute_withholding(dec!(30000), &table), dec!(2593.50));
//! ```

use rust_decimal::Decimal;

use crate::WithholdingTable;
use crate::calculations::common::{non_negative, round_half_up};

/// Annual withholding for `annual_income`, rounded to cents and never
/// negative. Negative income is treated as zero.
pub fn compute_withholding(
    annual_income: Decimal,
    table: &WithholdingTable,
) -> Decimal {
    let income = non_negative(annual_income);
    let bracket = table.bracket_for(income);
    let amount = bracket.base_withholding + (income - bracket.threshold) * bracket.rate;

    non_negative(round_half_up(amount))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, proptest};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::fixtures;

    fn all_fixture_tables() -> Vec<WithholdingTable> {
        vec![
            fixtures::single_standard(),
            fixtures::single_multiple_jobs(),
            fixtures::married_jointly_standard(),
            fixtures::married_jointly_multiple_jobs(),
            fixtures::head_of_household_standard(),
        ]
    }

    fn cents(value: u64) -> Decimal {
        Decimal::new(value as i64, 2)
    }

    // =========================================================================
    // compute_withholding tests
    // =========================================================================

    #[test]
    fn zero_income_withholds_nothing() {
        let result = compute_withholding(dec!(0), &fixtures::single_standard());

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn negative_income_is_treated_as_zero() {
        let result = compute_withholding(dec!(-5000), &fixtures::single_standard());

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn income_in_zero_rate_bracket_withholds_nothing() {
        let result = compute_withholding(dec!(6000), &fixtures::single_standard());

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn second_bracket_applies_ten_percent() {
        let result = compute_withholding(dec!(10000), &fixtures::single_standard());

        // (10000 - 6400) × 10% = 360
        assert_eq!(result, dec!(360.00));
    }

    #[test]
    fn twenty_two_percent_bracket() {
        let result = compute_withholding(dec!(75999.82), &fixtures::single_standard());

        // 5578.50 + (75999.82 - 54875) × 22% = 5578.50 + 4647.4604
        assert_eq!(result, dec!(10225.96));
    }

    #[test]
    fn exact_threshold_uses_new_row() {
        let result = compute_withholding(dec!(54875), &fixtures::single_standard());

        assert_eq!(result, dec!(5578.50));
    }

    #[test]
    fn top_bracket_has_no_ceiling() {
        let result = compute_withholding(dec!(700000), &fixtures::single_standard());

        // 188769.75 + (700000 - 632750) × 37% = 188769.75 + 24882.50
        assert_eq!(result, dec!(213652.25));
    }

    #[test]
    fn multiple_jobs_table_withholds_more_than_standard() {
        let standard = compute_withholding(dec!(60000), &fixtures::single_standard());
        let multiple = compute_withholding(dec!(60000), &fixtures::single_multiple_jobs());

        assert_eq!(standard, dec!(6706.00));
        // 8825.50 + (60000 - 59175) × 24% = 8825.50 + 198
        assert_eq!(multiple, dec!(9023.50));
    }

    #[test]
    fn sub_cent_base_is_rounded() {
        let result = compute_withholding(dec!(320675), &fixtures::single_multiple_jobs());

        assert_eq!(result, dec!(94384.88));
    }

    // =========================================================================
    // table shape properties
    // =========================================================================

    #[test]
    fn tables_are_continuous_at_bracket_edges() {
        for table in all_fixture_tables() {
            for pair in table.brackets().windows(2) {
                let (previous, next) = (&pair[0], &pair[1]);
                let from_previous_row = previous.base_withholding
                    + (next.threshold - previous.threshold) * previous.rate;

                assert_eq!(
                    from_previous_row, next.base_withholding,
                    "discontinuity at threshold {}",
                    next.threshold
                );
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(256))]

        #[test]
        fn prop_withholding_is_never_negative(income in 0u64..10_000_000_000) {
            for table in all_fixture_tables() {
                prop_assert!(compute_withholding(cents(income), &table) >= Decimal::ZERO);
            }
        }

        #[test]
        fn prop_withholding_is_non_decreasing(
            low in 0u64..200_000_000,
            step in 0u64..50_000_000,
        ) {
            let high = low + step;
            for table in all_fixture_tables() {
                let at_low = compute_withholding(cents(low), &table);
                let at_high = compute_withholding(cents(high), &table);
                prop_assert!(at_low <= at_high, "{} > {}", at_low, at_high);
            }
        }
    }
}
