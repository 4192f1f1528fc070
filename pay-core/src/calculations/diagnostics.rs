//! Errors and recoverable warnings raised by the payroll calculators.
//!
//! Errors are reserved for broken reference data: a caller cannot fix them
//! by editing a profile. Everything a user can get wrong is either skipped
//! (the calculation returns `None`) or recorded as a [`CalculationWarning`]
//! alongside the result.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FilingStatus, TableVariant};

/// Configuration errors. These fail loudly.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// Neither the requested table nor the `Single` fallback exists.
    #[error("no {variant} withholding table for {status} (and no single fallback) in {tax_year}")]
    MissingWithholdingTable {
        tax_year: i32,
        status: FilingStatus,
        variant: TableVariant,
    },

    /// Reference data sets were published for different years.
    #[error(
        "reference data years disagree: tables {tables}, limits {limits}, tax year config {config}"
    )]
    ReferenceYearMismatch { tables: i32, limits: i32, config: i32 },

    /// A rate in the tax-year configuration is outside 0..=1.
    #[error("{field} must be between 0 and 1, got {value}")]
    InvalidRate { field: &'static str, value: Decimal },
}

/// Anomalies the calculators recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationWarning {
    /// A filing status code was not recognised; `Single` was used.
    UnknownFilingStatus { code: String },

    /// The table for `status` was missing; the `Single` table was used.
    MissingWithholdingTable {
        status: FilingStatus,
        variant: TableVariant,
    },

    /// An income period ends before it starts.
    MalformedIncomePeriod {
        index: usize,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    /// An income period is not inside the year being calculated.
    IncomePeriodOutsideYear { index: usize, year: i32 },

    /// An income period's dates could not be parsed at load time.
    UnparsableIncomePeriod { index: usize, reason: String },

    /// HSA payroll contributions were entered without HSA-eligible coverage.
    HsaWithoutCoverage { per_paycheck: Decimal },

    /// Pre-tax deductions exceed gross pay.
    DeductionsExceedGross { gross: Decimal, deductions: Decimal },
}

impl fmt::Display for CalculationWarning {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::UnknownFilingStatus { code } => {
                write!(f, "unknown filing status '{code}', using Single")
            }
            Self::MissingWithholdingTable { status, variant } => {
                write!(f, "no {variant} table for {status}, using Single")
            }
            Self::MalformedIncomePeriod {
                index,
                start_date,
                end_date,
            } => write!(
                f,
                "income period #{index} ends ({end_date}) before it starts ({start_date}); skipped"
            ),
            Self::IncomePeriodOutsideYear { index, year } => {
                write!(f, "income period #{index} is not within {year}; skipped")
            }
            Self::UnparsableIncomePeriod { index, reason } => {
                write!(f, "income period #{index} could not be read ({reason}); skipped")
            }
            Self::HsaWithoutCoverage { per_paycheck } => {
                write!(f, "HSA contribution of {per_paycheck} ignored: no HSA coverage")
            }
            Self::DeductionsExceedGross { gross, deductions } => {
                write!(f, "pre-tax deductions {deductions} exceed gross pay {gross}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn warning_messages_name_the_problem() {
        let warning = CalculationWarning::UnknownFilingStatus {
            code: "QSS".to_string(),
        };
        assert_eq!(warning.to_string(), "unknown filing status 'QSS', using Single");

        let warning = CalculationWarning::IncomePeriodOutsideYear { index: 2, year: 2025 };
        assert_eq!(warning.to_string(), "income period #2 is not within 2025; skipped");
    }

    #[test]
    fn error_message_lists_years() {
        let error = CalculationError::ReferenceYearMismatch {
            tables: 2025,
            limits: 2024,
            config: 2025,
        };

        assert_eq!(
            error.to_string(),
            "reference data years disagree: tables 2025, limits 2024, tax year config 2025"
        );
    }

    #[test]
    fn hsa_warning_includes_amount() {
        let warning = CalculationWarning::HsaWithoutCoverage {
            per_paycheck: dec!(75.00),
        };

        assert!(warning.to_string().contains("75.00"));
    }
}
