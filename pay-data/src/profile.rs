//! TOML household member profiles.
//!
//! ## Format
//!
//! Only `name`, `salary` and `birthday` are required; every other section
//! falls back to its default.
//!
//! ```toml
//! name = "Alex"
//! salary = 80000
//! birthday = "1990-03-01"
//! pay_period = "biWeekly"
//! filing_status = "S"
//! hsa_coverage = "self"
//!
//! [w4]
//! qualifying_children = 1
//! extra_withholding = 25
//!
//! [retirement]
//! traditional_401k_percent = 5
//!
//! [[income_periods]]
//! start_date = "2025-01-01"
//! end_date = "2025-03-31"
//! gross_salary = 72000
//! ```
//!
//! An unknown `filing_status` loads as Single and an unreadable income
//! period is dropped; both are reported as warnings.

use chrono::NaiveDate;
use pay_core::calculations::CalculationWarning;
use pay_core::{
    BonusOptions, BudgetImpacting, FilingStatus, HsaCoverage, IncomePeriod, MedicalDeductions,
    NamedDeduction, PayPeriod, Person, RetirementOptions, W4Profile,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::loader::DataLoadError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomePeriodEntry {
    pub start_date: String,
    pub end_date: String,
    pub gross_salary: Decimal,
}

/// On-disk shape of a [`Person`]. Dates and the filing status stay as
/// strings until [`PersonProfile::into_person`] checks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonProfile {
    pub name: String,
    pub salary: Decimal,
    pub birthday: String,
    #[serde(default)]
    pub pay_period: PayPeriod,
    #[serde(default = "default_filing_status")]
    pub filing_status: String,
    #[serde(default)]
    pub hsa_coverage: HsaCoverage,
    #[serde(default)]
    pub espp_percent: Decimal,
    #[serde(default)]
    pub w4: W4Profile,
    #[serde(default)]
    pub retirement: RetirementOptions,
    #[serde(default)]
    pub medical: MedicalDeductions,
    #[serde(default)]
    pub budget: BudgetImpacting,
    #[serde(default)]
    pub bonus: BonusOptions,
    #[serde(default)]
    pub post_tax_deductions: Vec<NamedDeduction>,
    #[serde(default)]
    pub income_periods: Vec<IncomePeriodEntry>,
}

fn default_filing_status() -> String {
    FilingStatus::Single.as_str().to_string()
}

/// A loaded person plus whatever had to be patched up on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProfile {
    pub person: Person,
    pub warnings: Vec<CalculationWarning>,
}

impl PersonProfile {
    pub fn parse(text: &str) -> Result<Self, DataLoadError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String, DataLoadError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_person(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            salary: person.salary,
            birthday: person.birthday.format(DATE_FORMAT).to_string(),
            pay_period: person.pay_period,
            filing_status: person.filing_status.as_str().to_string(),
            hsa_coverage: person.hsa_coverage,
            espp_percent: person.espp_percent,
            w4: person.w4.clone(),
            retirement: person.retirement.clone(),
            medical: person.medical.clone(),
            budget: person.budget.clone(),
            bonus: person.bonus.clone(),
            post_tax_deductions: person.post_tax_deductions.clone(),
            income_periods: person
                .income_periods
                .iter()
                .map(|p| IncomePeriodEntry {
                    start_date: p.start_date.format(DATE_FORMAT).to_string(),
                    end_date: p.end_date.format(DATE_FORMAT).to_string(),
                    gross_salary: p.gross_salary,
                })
                .collect(),
        }
    }

    /// Converts to a [`Person`].
    ///
    /// # Errors
    ///
    /// [`DataLoadError::InvalidDate`] for an unreadable birthday and
    /// [`DataLoadError::InvalidProfile`] for an inconsistent W-4.
    pub fn into_person(self) -> Result<LoadedProfile, DataLoadError> {
        let mut warnings = Vec::new();

        let birthday = parse_date("birthday", &self.birthday)?;

        if let Err(e) = self.w4.validate() {
            return Err(DataLoadError::InvalidProfile {
                name: self.name,
                reason: e.to_string(),
            });
        }

        let (filing_status, fell_back) = FilingStatus::resolve(&self.filing_status);
        if fell_back {
            warn!(
                person = %self.name,
                code = %self.filing_status,
                "Unknown filing status; using single"
            );
            warnings.push(CalculationWarning::UnknownFilingStatus {
                code: self.filing_status.clone(),
            });
        }

        let mut income_periods = Vec::with_capacity(self.income_periods.len());
        let mut unreadable_income_periods = 0;
        for (index, entry) in self.income_periods.iter().enumerate() {
            let dates = parse_date("start_date", &entry.start_date)
                .and_then(|start| Ok((start, parse_date("end_date", &entry.end_date)?)));
            match dates {
                Ok((start_date, end_date)) => {
                    income_periods.push(IncomePeriod::new(start_date, end_date, entry.gross_salary));
                }
                Err(e) => {
                    warn!(person = %self.name, index, error = %e, "Skipping unreadable income period");
                    unreadable_income_periods += 1;
                    warnings.push(CalculationWarning::UnparsableIncomePeriod {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let person = Person {
            name: self.name,
            salary: self.salary,
            birthday,
            pay_period: self.pay_period,
            filing_status,
            w4: self.w4,
            retirement: self.retirement,
            medical: self.medical,
            budget: self.budget,
            espp_percent: self.espp_percent,
            post_tax_deductions: self.post_tax_deductions,
            bonus: self.bonus,
            hsa_coverage: self.hsa_coverage,
            income_periods,
            unreadable_income_periods,
        };

        Ok(LoadedProfile { person, warnings })
    }
}

fn parse_date(
    field: &'static str,
    value: &str,
) -> Result<NaiveDate, DataLoadError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| DataLoadError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
