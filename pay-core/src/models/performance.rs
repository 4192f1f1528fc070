use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AccountType;

/// Owner name used by the store for accounts held by the whole household.
pub const JOINT_OWNER: &str = "Joint";

/// Year-to-date contributions observed for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub year: i32,
    pub account_type: AccountType,
    pub account_name: String,
    pub owner: String,
    pub contributions: Decimal,
    pub employer_match: Decimal,
}

impl PerformanceRecord {
    /// Employee and employer money together.
    pub fn total_contributions(&self) -> Decimal {
        self.contributions + self.employer_match
    }
}
