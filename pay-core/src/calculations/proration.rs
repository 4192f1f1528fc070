//! Year-to-date and projected amounts from dated income periods.
//!
//! All arithmetic is in pay periods: the number of paychecks between two
//! dates is the day count divided by the average year length, times the
//! paychecks per year. "Today" is always passed in.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{non_negative, round_half_up};
use crate::calculations::diagnostics::CalculationWarning;
use crate::{IncomePeriod, PayPeriod};

/// 365.25
const DAYS_PER_YEAR: Decimal = Decimal::from_parts(36525, 0, 0, false, 2);

/// Income earned so far this year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtdIncome {
    pub amount: Decimal,
    /// Latest end date among the periods that counted.
    pub through: Option<NaiveDate>,
    /// No periods were recorded and the fallback was used.
    pub used_fallback: bool,
    pub warnings: Vec<CalculationWarning>,
}

/// YTD income plus the rest of the year at the current salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeProjection {
    pub ytd_income: Decimal,
    pub remaining_income: Decimal,
    pub projected_annual_income: Decimal,
    pub warnings: Vec<CalculationWarning>,
}

/// Fractional paychecks between `start` and `end`. Zero when `end` is not
/// after `start`.
pub fn periods_between(
    start: NaiveDate,
    end: NaiveDate,
    pay_period: PayPeriod,
) -> Decimal {
    let days = (end - start).num_days();
    if days <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(days) / DAYS_PER_YEAR * pay_period.per_year()
}

/// December 31 of `today`'s year.
pub fn year_end(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today)
}

/// Income earned in `today`'s year from the recorded periods.
///
/// With no periods at all, `fallback` (normally the current salary) is the
/// answer. A period covering exactly January 1 through December 31 counts
/// its salary in full; any other period is prorated by pay periods.
/// Malformed periods and periods in other years are skipped with a warning.
pub fn compute_ytd_income(
    periods: &[IncomePeriod],
    pay_period: PayPeriod,
    fallback: Decimal,
    today: NaiveDate,
) -> YtdIncome {
    if periods.is_empty() {
        return YtdIncome {
            amount: fallback,
            through: None,
            used_fallback: true,
            warnings: Vec::new(),
        };
    }
    recorded_ytd_income(periods, pay_period, today)
}

/// Income earned in `today`'s year when income periods were recorded, even
/// if none of them survived loading. Never falls back to a salary.
pub fn recorded_ytd_income(
    periods: &[IncomePeriod],
    pay_period: PayPeriod,
    today: NaiveDate,
) -> YtdIncome {
    let year = today.year();
    let mut amount = Decimal::ZERO;
    let mut through: Option<NaiveDate> = None;
    let mut warnings = Vec::new();

    for (index, period) in periods.iter().enumerate() {
        if period.end_date < period.start_date {
            warn!(
                index,
                start_date = %period.start_date,
                end_date = %period.end_date,
                "Skipping income period that ends before it starts"
            );
            warnings.push(CalculationWarning::MalformedIncomePeriod {
                index,
                start_date: period.start_date,
                end_date: period.end_date,
            });
            continue;
        }

        if period.start_date.year() != year || period.end_date.year() != year {
            warn!(index, year, "Skipping income period outside the current year");
            warnings.push(CalculationWarning::IncomePeriodOutsideYear { index, year });
            continue;
        }

        amount += period_income(period, pay_period, year);
        through = through.max(Some(period.end_date));
    }

    YtdIncome {
        amount,
        through,
        used_fallback: false,
        warnings,
    }
}

/// YTD income plus `current_salary` prorated from the last recorded period
/// end (or `today` when nothing valid was recorded) through December 31.
pub fn compute_projected_annual_income(
    periods: &[IncomePeriod],
    current_salary: Decimal,
    pay_period: PayPeriod,
    today: NaiveDate,
) -> IncomeProjection {
    let ytd = compute_ytd_income(periods, pay_period, current_salary, today);
    project_annual_income(ytd, current_salary, pay_period, today)
}

/// Adds `current_salary` from the end of `ytd` through December 31.
pub fn project_annual_income(
    ytd: YtdIncome,
    current_salary: Decimal,
    pay_period: PayPeriod,
    today: NaiveDate,
) -> IncomeProjection {
    let remaining_income = if ytd.used_fallback {
        Decimal::ZERO
    } else {
        let from = ytd.through.unwrap_or(today);
        round_half_up(
            current_salary / pay_period.per_year()
                * periods_between(from, year_end(today), pay_period),
        )
    };

    IncomeProjection {
        ytd_income: ytd.amount,
        remaining_income,
        projected_annual_income: ytd.amount + remaining_income,
        warnings: ytd.warnings,
    }
}

/// Payroll contributions still to come between `from` and `year_end`.
pub fn projected_pay_contribution(
    per_paycheck: Decimal,
    pay_period: PayPeriod,
    from: NaiveDate,
    year_end: NaiveDate,
) -> Decimal {
    non_negative(round_half_up(
        per_paycheck * periods_between(from, year_end, pay_period),
    ))
}

/// Monthly contributions for the whole months left after the current one.
pub fn projected_monthly_contribution(
    monthly: Decimal,
    today: NaiveDate,
) -> Decimal {
    non_negative(monthly * Decimal::from(12 - today.month()))
}

fn period_income(
    period: &IncomePeriod,
    pay_period: PayPeriod,
    year: i32,
) -> Decimal {
    if period.spans_full_year(year) {
        return period.gross_salary;
    }
    round_half_up(
        period.gross_salary / pay_period.per_year()
            * periods_between(period.start_date, period.end_date, pay_period),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::fixtures::init_test_tracing;

    fn date(
        y: i32,
        m: u32,
        d: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // =========================================================================
    // periods_between tests
    // =========================================================================

    #[test]
    fn average_year_is_a_full_set_of_paychecks() {
        // 1461 days is exactly four average years
        let result = periods_between(date(2021, 1, 1), date(2025, 1, 1), PayPeriod::Monthly);

        assert_eq!(result, dec!(48));
    }

    #[test]
    fn reversed_dates_are_zero_periods() {
        let result = periods_between(date(2025, 6, 1), date(2025, 1, 1), PayPeriod::Weekly);

        assert_eq!(result, Decimal::ZERO);
    }

    // =========================================================================
    // compute_ytd_income tests
    // =========================================================================

    #[test]
    fn no_periods_uses_fallback() {
        let result = compute_ytd_income(&[], PayPeriod::BiWeekly, dec!(120000), date(2025, 6, 1));

        assert_eq!(result.amount, dec!(120000));
        assert!(result.used_fallback);
    }

    #[test]
    fn full_year_period_counts_salary_exactly() {
        let periods = [IncomePeriod::new(date(2025, 1, 1), date(2025, 12, 31), dec!(90000))];

        let result = compute_ytd_income(&periods, PayPeriod::BiWeekly, dec!(0), date(2025, 6, 1));

        assert_eq!(result.amount, dec!(90000));
        assert_eq!(result.through, Some(date(2025, 12, 31)));
    }

    #[test]
    fn partial_period_is_prorated() {
        // 146 days at 73050 a year: 73050 / 365.25 = 200 a day
        let periods = [IncomePeriod::new(date(2025, 1, 1), date(2025, 5, 27), dec!(73050))];

        let result = compute_ytd_income(&periods, PayPeriod::Weekly, dec!(0), date(2025, 6, 1));

        assert_eq!(result.amount, dec!(29200.00));
    }

    #[test]
    fn malformed_period_is_skipped_with_warning() {
        let _guard = init_test_tracing();
        let periods = [
            IncomePeriod::new(date(2025, 5, 1), date(2025, 2, 1), dec!(50000)),
            IncomePeriod::new(date(2025, 1, 1), date(2025, 5, 27), dec!(73050)),
        ];

        let result = compute_ytd_income(&periods, PayPeriod::Monthly, dec!(0), date(2025, 6, 1));

        assert_eq!(result.amount, dec!(29200.00));
        assert_eq!(
            result.warnings,
            vec![CalculationWarning::MalformedIncomePeriod {
                index: 0,
                start_date: date(2025, 5, 1),
                end_date: date(2025, 2, 1),
            }]
        );
    }

    #[test]
    fn period_from_another_year_is_skipped_with_warning() {
        let _guard = init_test_tracing();
        let periods = [IncomePeriod::new(date(2024, 1, 1), date(2024, 12, 31), dec!(80000))];

        let result = compute_ytd_income(&periods, PayPeriod::BiWeekly, dec!(0), date(2025, 6, 1));

        assert_eq!(result.amount, dec!(0));
        assert_eq!(result.through, None);
        assert!(!result.used_fallback);
        assert_eq!(
            result.warnings,
            vec![CalculationWarning::IncomePeriodOutsideYear { index: 0, year: 2025 }]
        );
    }

    #[test]
    fn period_straddling_new_year_is_skipped() {
        let _guard = init_test_tracing();
        let periods = [IncomePeriod::new(date(2024, 11, 1), date(2025, 2, 1), dec!(80000))];

        let result = compute_ytd_income(&periods, PayPeriod::BiWeekly, dec!(0), date(2025, 6, 1));

        assert_eq!(result.amount, dec!(0));
        assert_eq!(result.warnings.len(), 1);
    }

    // =========================================================================
    // compute_projected_annual_income tests
    // =========================================================================

    #[test]
    fn projection_without_periods_is_current_salary() {
        let result = compute_projected_annual_income(
            &[],
            dec!(85000),
            PayPeriod::BiWeekly,
            date(2025, 3, 15),
        );

        assert_eq!(result.ytd_income, dec!(85000));
        assert_eq!(result.remaining_income, dec!(0));
        assert_eq!(result.projected_annual_income, dec!(85000));
    }

    #[test]
    fn projection_adds_rest_of_year_at_current_salary() {
        // Jan 1 to May 27 is 146 days, May 27 to Dec 31 is 218 days
        let periods = [IncomePeriod::new(date(2025, 1, 1), date(2025, 5, 27), dec!(73050))];

        let result = compute_projected_annual_income(
            &periods,
            dec!(146100),
            PayPeriod::SemiMonthly,
            date(2025, 6, 1),
        );

        assert_eq!(result.ytd_income, dec!(29200.00));
        // 146100 / 365.25 = 400 a day × 218
        assert_eq!(result.remaining_income, dec!(87200.00));
        assert_eq!(result.projected_annual_income, dec!(116400.00));
    }

    #[test]
    fn full_year_period_leaves_nothing_to_project() {
        let periods = [IncomePeriod::new(date(2025, 1, 1), date(2025, 12, 31), dec!(90000))];

        let result = compute_projected_annual_income(
            &periods,
            dec!(120000),
            PayPeriod::BiWeekly,
            date(2025, 8, 1),
        );

        assert_eq!(result.projected_annual_income, dec!(90000));
    }

    #[test]
    fn projection_from_today_when_no_valid_period() {
        let _guard = init_test_tracing();
        let periods = [IncomePeriod::new(date(2024, 1, 1), date(2024, 12, 31), dec!(80000))];

        // Jun 1 to Dec 31 is 213 days at 400 a day
        let result = compute_projected_annual_income(
            &periods,
            dec!(146100),
            PayPeriod::Weekly,
            date(2025, 6, 1),
        );

        assert_eq!(result.ytd_income, dec!(0));
        assert_eq!(result.remaining_income, dec!(85200.00));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn recorded_history_with_no_usable_period_projects_from_today() {
        let ytd = recorded_ytd_income(&[], PayPeriod::Weekly, date(2025, 6, 1));

        assert_eq!(ytd.amount, dec!(0));
        assert!(!ytd.used_fallback);

        let result = project_annual_income(ytd, dec!(146100), PayPeriod::Weekly, date(2025, 6, 1));

        assert_eq!(result.remaining_income, dec!(85200.00));
        assert_eq!(result.projected_annual_income, dec!(85200.00));
    }

    // =========================================================================
    // contribution projection tests
    // =========================================================================

    #[test]
    fn monthly_contribution_counts_months_after_current() {
        let result = projected_monthly_contribution(dec!(500), date(2025, 9, 15));

        assert_eq!(result, dec!(1500));
    }

    #[test]
    fn monthly_contribution_in_december_is_zero() {
        let result = projected_monthly_contribution(dec!(500), date(2025, 12, 1));

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn pay_contribution_prorates_remaining_paychecks() {
        // four average years of bi-weekly paychecks
        let result = projected_pay_contribution(
            dec!(100),
            PayPeriod::BiWeekly,
            date(2021, 1, 1),
            date(2025, 1, 1),
        );

        assert_eq!(result, dec!(10400));
    }

    #[test]
    fn pay_contribution_after_year_end_is_zero() {
        let result = projected_pay_contribution(
            dec!(100),
            PayPeriod::BiWeekly,
            date(2025, 12, 31),
            date(2025, 12, 31),
        );

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn year_end_is_december_31() {
        assert_eq!(year_end(date(2025, 2, 14)), date(2025, 12, 31));
    }
}
