//! Federal income tax withholding for one employee.
//!
//! Follows the annual percentage method of Publication 15-T:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Choose the Standard or Multiple Jobs (W-4 Step 2 checked) table |
//! | 2    | Tentative withholding from the table |
//! | 3    | Pre-2020 W-4: reduce the wage by allowances before the lookup |
//! | 4a   | 2020+ W-4: subtract dependent credits (Step 3), minimum 0 |
//! | 4b   | 2020+ W-4: add withholding on other income (Step 4a), standard table |
//! | 5    | Add extra per-paycheck withholding (Step 4c), annualized |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pay_core::calculations::FederalWithholding;
//! use pay_core::{
//!     FilingStatus, PayPeriod, TableVariant, TaxYearConfig, W4Profile, WithholdingBracket,
//!     WithholdingTable, WithholdingTables,
//! };
//!
//! let mut tables = WithholdingTables::new(2025);
//! tables.insert(
//!     FilingStatus::Single,
//!     TableVariant::Standard,
//!     WithholdingTable::new(vec![
//!         WithholdingBracket::new(dec!(0), dec!(0), dec!(0)),
//!         WithholdingBracket::new(dec!(6400), dec!(0), dec!(0.10)),
//!     ])
//!     .unwrap(),
//! );
//! let config = TaxYearConfig {
//!     tax_year: 2025,
//!     social_security_rate: dec!(0.062),
//!     medicare_rate: dec!(0.0145),
//!     child_tax_credit: dec!(2000),
//!     other_dependent_credit: dec!(500),
//!     allowance_amount: dec!(4300),
//!     supplemental_rate: dec!(0.22),
//! };
//! let w4 = W4Profile {
//!     extra_withholding: dec!(10),
//!     ..W4Profile::default()
//! };
//!
//! let federal = FederalWithholding::new(&tables, &config);
//! let result = federal
//!     .calculate(dec!(16400), FilingStatus::Single, &w4, PayPeriod::BiWeekly)
//!     .unwrap();
//!
//! // 10% of (16400 - 6400) plus $10 × 26 paychecks
//! assert_eq!(result.annual_tax, dec!(1260.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{non_negative, round_half_up};
use crate::calculations::diagnostics::{CalculationError, CalculationWarning};
use crate::calculations::withholding::compute_withholding;
use crate::{
    FilingStatus, PayPeriod, TableVariant, TaxYearConfig, W4FormVersion, W4Profile,
    WithholdingTable, WithholdingTables,
};

/// Breakdown of annual federal withholding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalWithholdingResult {
    /// Table the wage was looked up in.
    pub table_variant: TableVariant,

    /// Tentative withholding from the table (after allowances on an old W-4).
    pub base_tax: Decimal,

    /// Dependent credits claimed on a 2020+ W-4.
    pub credits: Decimal,

    /// Withholding on W-4 Step 4(a) other income.
    pub additional_income_tax: Decimal,

    /// Step 4(c) extra withholding multiplied by paychecks per year.
    pub extra_withholding_annual: Decimal,

    /// Total annual federal withholding.
    pub annual_tax: Decimal,

    /// `true` when the filing status had no table and `Single` was used.
    pub fell_back_to_single: bool,

    pub warnings: Vec<CalculationWarning>,
}

/// Calculator for federal income tax withholding.
///
/// Holds the year's tables and constants; every call is independent.
#[derive(Debug, Clone, Copy)]
pub struct FederalWithholding<'a> {
    tables: &'a WithholdingTables,
    config: &'a TaxYearConfig,
}

impl<'a> FederalWithholding<'a> {
    pub fn new(
        tables: &'a WithholdingTables,
        config: &'a TaxYearConfig,
    ) -> Self {
        Self { tables, config }
    }

    /// Annual federal withholding on `adjusted_annual_income`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::MissingWithholdingTable`] when neither the
    /// filing status nor `Single` has a table of the required variant.
    pub fn calculate(
        &self,
        adjusted_annual_income: Decimal,
        filing_status: FilingStatus,
        w4: &W4Profile,
        pay_period: PayPeriod,
    ) -> Result<FederalWithholdingResult, CalculationError> {
        let mut warnings = Vec::new();

        // Step 1: table selection
        let table_variant = self.table_variant(w4);
        let table = self.table(filing_status, table_variant, &mut warnings)?;

        // Steps 2 and 3: tentative withholding
        let base_tax = self.base_tax(adjusted_annual_income, w4, table);

        // Step 4: W-4 (2020+) credits and other income
        let (credits, additional_income_tax) = match w4.form_version {
            W4FormVersion::New => (
                self.dependent_credits(w4),
                self.additional_income_tax(w4, filing_status, &mut warnings)?,
            ),
            W4FormVersion::Old => (Decimal::ZERO, Decimal::ZERO),
        };
        let after_credits = non_negative(base_tax - credits);

        // Step 5: extra withholding is entered per paycheck
        let extra_withholding_annual = self.extra_withholding_annual(w4, pay_period);

        let annual_tax =
            round_half_up(after_credits + additional_income_tax + extra_withholding_annual);

        let fell_back_to_single = warnings
            .iter()
            .any(|w| matches!(w, CalculationWarning::MissingWithholdingTable { .. }));

        Ok(FederalWithholdingResult {
            table_variant,
            base_tax,
            credits,
            additional_income_tax,
            extra_withholding_annual,
            annual_tax,
            fell_back_to_single,
            warnings,
        })
    }

    /// The Multiple Jobs table applies only to a 2020+ W-4 with Step 2 checked.
    fn table_variant(
        &self,
        w4: &W4Profile,
    ) -> TableVariant {
        if w4.form_version == W4FormVersion::New && w4.multiple_jobs {
            TableVariant::MultipleJobs
        } else {
            TableVariant::Standard
        }
    }

    /// Looks up a table, substituting `Single` for a missing filing status.
    fn table(
        &self,
        status: FilingStatus,
        variant: TableVariant,
        warnings: &mut Vec<CalculationWarning>,
    ) -> Result<&'a WithholdingTable, CalculationError> {
        if let Some(table) = self.tables.get(status, variant) {
            return Ok(table);
        }

        let fallback = self.tables.get(FilingStatus::Single, variant).ok_or(
            CalculationError::MissingWithholdingTable {
                tax_year: self.tables.tax_year,
                status,
                variant,
            },
        )?;

        warn!(
            filing_status = %status,
            variant = %variant,
            tax_year = self.tables.tax_year,
            "No withholding table for filing status; using single"
        );
        let warning = CalculationWarning::MissingWithholdingTable { status, variant };
        if !warnings.contains(&warning) {
            warnings.push(warning);
        }

        Ok(fallback)
    }

    /// Tentative withholding. Allowances on a pre-2020 W-4 reduce the wage
    /// looked up; the result replaces the unreduced lookup.
    fn base_tax(
        &self,
        income: Decimal,
        w4: &W4Profile,
        table: &WithholdingTable,
    ) -> Decimal {
        if w4.form_version == W4FormVersion::Old && w4.allowances > 0 {
            let allowance_total = Decimal::from(w4.allowances) * self.config.allowance_amount;
            return compute_withholding(non_negative(income - allowance_total), table);
        }
        compute_withholding(income, table)
    }

    fn dependent_credits(
        &self,
        w4: &W4Profile,
    ) -> Decimal {
        Decimal::from(w4.qualifying_children) * self.config.child_tax_credit
            + Decimal::from(w4.other_dependents) * self.config.other_dependent_credit
    }

    /// Other income is always looked up in the standard table, whatever the
    /// Step 2 checkbox says.
    fn additional_income_tax(
        &self,
        w4: &W4Profile,
        status: FilingStatus,
        warnings: &mut Vec<CalculationWarning>,
    ) -> Result<Decimal, CalculationError> {
        if w4.additional_income <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        let table = self.table(status, TableVariant::Standard, warnings)?;
        Ok(compute_withholding(w4.additional_income, table))
    }

    fn extra_withholding_annual(
        &self,
        w4: &W4Profile,
        pay_period: PayPeriod,
    ) -> Decimal {
        non_negative(w4.extra_withholding) * pay_period.per_year()
    }
}
