//! Payroll calculations: withholding, FICA, 401(k) caps, contribution room
//! and the person and household reports built from them.
//!
//! Every calculator takes plain values and `today` explicitly, so the same
//! inputs always give the same result.

pub mod bonus;
pub mod common;
pub mod diagnostics;
pub mod federal;
pub mod household;
pub mod joint;
pub mod limits;
pub mod payroll_tax;
pub mod proration;
pub mod report;
pub mod take_home;
pub mod withholding;

#[cfg(test)]
mod fixtures;

pub use bonus::{BonusCalculator, BonusResult};
pub use diagnostics::{CalculationError, CalculationWarning};
pub use federal::{FederalWithholding, FederalWithholdingResult};
pub use household::{HouseholdAccountTotal, HouseholdSummary, MemberSummary};
pub use joint::{Attribution, IRA_ALWAYS_JOINT, JointAccountAllocator, JointPolicy};
pub use limits::{
    ContributionLimitEngine, ContributionRoom, HSA_CATCH_UP_AGE, RETIREMENT_CATCH_UP_AGE,
    k401_catch_up,
};
pub use payroll_tax::{PayrollTax, compute_payroll_tax};
pub use proration::{
    IncomeProjection, YtdIncome, compute_projected_annual_income, compute_ytd_income,
    periods_between, project_annual_income, projected_monthly_contribution,
    projected_pay_contribution, recorded_ytd_income, year_end,
};
pub use report::{
    ContributionAccount, ContributionLine, MonthlyBudget, PersonReport, ReferenceData,
};
pub use take_home::{PaycheckAmounts, TakeHomeInput, TakeHomePay, TakeHomePayAssembler};
pub use withholding::compute_withholding;
