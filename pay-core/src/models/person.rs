use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FilingStatus, HsaCoverage, PayPeriod, W4Profile};

/// A user-named deduction with a fixed schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDeduction {
    pub id: String,
    pub name: String,
    /// Per-paycheck amount.
    pub amount: Decimal,
}

/// Payroll 401(k) elections, as percentages of gross pay (0–100).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementOptions {
    pub traditional_401k_percent: Decimal,
    pub roth_401k_percent: Decimal,
    pub is_over_50: bool,
}

impl RetirementOptions {
    pub fn combined_percent(&self) -> Decimal {
        self.traditional_401k_percent + self.roth_401k_percent
    }

    /// Both percentages are non-negative and together do not exceed 100.
    pub fn is_valid(&self) -> bool {
        self.traditional_401k_percent >= Decimal::ZERO
            && self.roth_401k_percent >= Decimal::ZERO
            && self.combined_percent() <= Decimal::ONE_HUNDRED
    }
}

/// Pre-tax benefit deductions. Everything is per paycheck except
/// `employer_hsa_annual`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalDeductions {
    pub medical: Decimal,
    pub dental: Decimal,
    pub vision: Decimal,
    pub short_term_disability: Decimal,
    pub long_term_disability: Decimal,
    pub hsa_per_paycheck: Decimal,
    pub employer_hsa_annual: Decimal,
    pub additional_pretax: Vec<NamedDeduction>,
}

impl MedicalDeductions {
    /// Insurance premiums plus the additional named pre-tax items.
    pub fn premiums_per_paycheck(&self) -> Decimal {
        self.medical
            + self.dental
            + self.vision
            + self.short_term_disability
            + self.long_term_disability
            + self.additional_pretax.iter().map(|d| d.amount).sum::<Decimal>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerageContribution {
    pub name: String,
    pub monthly_amount: Decimal,
}

/// Savings made from take-home pay rather than through payroll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetImpacting {
    pub traditional_ira_monthly: Decimal,
    pub roth_ira_monthly: Decimal,
    pub brokerage_accounts: Vec<BrokerageContribution>,
}

impl BudgetImpacting {
    pub fn ira_monthly(&self) -> Decimal {
        self.traditional_ira_monthly + self.roth_ira_monthly
    }

    pub fn brokerage_monthly(&self) -> Decimal {
        self.brokerage_accounts.iter().map(|b| b.monthly_amount).sum()
    }
}

/// Annual bonus expectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusOptions {
    /// Target bonus as a percentage of salary (0–100).
    pub bonus_percent: Decimal,
    /// Company/individual performance multiplier applied to the target.
    pub bonus_multiplier: Decimal,
    /// Whether 401(k) elections also apply to the bonus check.
    pub apply_401k: bool,
}

impl Default for BonusOptions {
    fn default() -> Self {
        Self {
            bonus_percent: Decimal::ZERO,
            bonus_multiplier: Decimal::ONE,
            apply_401k: true,
        }
    }
}

/// A stretch of employment at one annualized salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomePeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub gross_salary: Decimal,
}

impl IncomePeriod {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        gross_salary: Decimal,
    ) -> Self {
        Self {
            start_date,
            end_date,
            gross_salary,
        }
    }

    /// Runs exactly from January 1 through December 31 of `year`.
    pub fn spans_full_year(
        &self,
        year: i32,
    ) -> bool {
        self.start_date.year() == year
            && self.start_date.ordinal() == 1
            && self.end_date.year() == year
            && self.end_date.month() == 12
            && self.end_date.day() == 31
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    /// Current annual salary.
    pub salary: Decimal,
    pub birthday: NaiveDate,
    pub pay_period: PayPeriod,
    pub filing_status: FilingStatus,
    pub w4: W4Profile,
    pub retirement: RetirementOptions,
    pub medical: MedicalDeductions,
    pub budget: BudgetImpacting,
    /// ESPP election as a percentage of gross pay (0–100).
    pub espp_percent: Decimal,
    pub post_tax_deductions: Vec<NamedDeduction>,
    pub bonus: BonusOptions,
    pub hsa_coverage: HsaCoverage,
    pub income_periods: Vec<IncomePeriod>,
    /// Income periods that were recorded but could not be read.
    #[serde(default)]
    pub unreadable_income_periods: usize,
}

impl Person {
    /// Completed years of age on `date`; zero for a birthday in the future.
    pub fn age_on(
        &self,
        date: NaiveDate,
    ) -> u32 {
        date.years_since(self.birthday).unwrap_or(0)
    }

    pub fn gross_per_paycheck(&self) -> Decimal {
        self.salary / self.pay_period.per_year()
    }

    /// Whether any income period was recorded, readable or not.
    pub fn has_income_history(&self) -> bool {
        !self.income_periods.is_empty() || self.unreadable_income_periods > 0
    }
}
