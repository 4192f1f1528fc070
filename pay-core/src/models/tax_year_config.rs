use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-year payroll constants that are not part of a bracket table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,
    /// Employee share of Social Security, e.g. 0.062.
    pub social_security_rate: Decimal,
    /// Employee share of Medicare, e.g. 0.0145.
    pub medicare_rate: Decimal,
    /// Credit per qualifying child under 17 (W-4 Step 3).
    pub child_tax_credit: Decimal,
    /// Credit per other dependent (W-4 Step 3).
    pub other_dependent_credit: Decimal,
    /// Annual value of one withholding allowance on a pre-2020 W-4.
    pub allowance_amount: Decimal,
    /// Flat federal rate for supplemental wages such as bonuses.
    pub supplemental_rate: Decimal,
}
