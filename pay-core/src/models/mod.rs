mod contribution_limits;
mod filing_status;
mod pay_period;
mod performance;
mod person;
mod tax_year_config;
mod w4;
mod withholding_table;

pub use contribution_limits::{AccountType, ContributionLimits, HsaCoverage, LimitCategory};
pub use filing_status::FilingStatus;
pub use pay_period::PayPeriod;
pub use performance::{JOINT_OWNER, PerformanceRecord};
pub use person::{
    BonusOptions, BrokerageContribution, BudgetImpacting, IncomePeriod, MedicalDeductions,
    NamedDeduction, Person, RetirementOptions,
};
pub use tax_year_config::TaxYearConfig;
pub use w4::{W4Error, W4FormVersion, W4Profile};
pub use withholding_table::{
    TableError, TableVariant, WithholdingBracket, WithholdingTable, WithholdingTables,
};
