//! Statutory contribution limits and remaining room.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::non_negative;
use crate::{ContributionLimits, HsaCoverage, LimitCategory};

/// Age at which 401(k) and IRA catch-up contributions open up.
pub const RETIREMENT_CATCH_UP_AGE: u32 = 50;

/// Age at which the HSA catch-up contribution opens up.
pub const HSA_CATCH_UP_AGE: u32 = 55;

/// The 401(k) catch-up applies when payroll was told the person is over 50
/// or they have reached the catch-up age.
pub fn k401_catch_up(
    is_over_50: bool,
    age: u32,
) -> bool {
    is_over_50 || age >= RETIREMENT_CATCH_UP_AGE
}

/// Limit, usage and what is left for one account category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRoom {
    pub limit: Decimal,
    /// YTD plus projected contributions.
    pub used: Decimal,
    /// Room left, never negative.
    pub remaining: Decimal,
    /// `limit - used`; negative when over-contributed.
    pub delta: Decimal,
    pub over_contribution: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ContributionLimitEngine<'a> {
    limits: &'a ContributionLimits,
}

impl<'a> ContributionLimitEngine<'a> {
    pub fn new(limits: &'a ContributionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &'a ContributionLimits {
        self.limits
    }

    /// Maximum annual contribution for a person of `age`.
    ///
    /// `coverage` only matters for the HSA; without HSA-eligible coverage
    /// the HSA limit is zero.
    pub fn max_for(
        &self,
        category: LimitCategory,
        age: u32,
        coverage: HsaCoverage,
    ) -> Decimal {
        match category {
            LimitCategory::K401 => self.k401_limit(age >= RETIREMENT_CATCH_UP_AGE),
            LimitCategory::Ira => {
                let catch_up = if age >= RETIREMENT_CATCH_UP_AGE {
                    self.limits.ira_catch_up
                } else {
                    Decimal::ZERO
                };
                self.limits.ira_self + catch_up
            }
            LimitCategory::Hsa => {
                let base = match coverage {
                    HsaCoverage::None => return Decimal::ZERO,
                    HsaCoverage::SelfOnly => self.limits.hsa_self,
                    HsaCoverage::Family => self.limits.hsa_family,
                };
                let catch_up = if age >= HSA_CATCH_UP_AGE {
                    self.limits.hsa_catch_up
                } else {
                    Decimal::ZERO
                };
                base + catch_up
            }
        }
    }

    /// 401(k) employee deferral limit given the payroll catch-up election.
    pub fn k401_limit(
        &self,
        catch_up: bool,
    ) -> Decimal {
        if catch_up {
            self.limits.k401_employee + self.limits.k401_catch_up
        } else {
            self.limits.k401_employee
        }
    }

    pub fn remaining_room(
        &self,
        limit: Decimal,
        used: Decimal,
    ) -> ContributionRoom {
        let delta = limit - used;
        ContributionRoom {
            limit,
            used,
            remaining: non_negative(delta),
            delta,
            over_contribution: delta < Decimal::ZERO,
        }
    }
}
