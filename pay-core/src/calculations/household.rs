//! Household roll-up of individual reports.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::joint::JointAccountAllocator;
use crate::calculations::report::PersonReport;
use crate::{AccountType, PerformanceRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub name: String,
    pub gross_annual: Decimal,
    pub total_tax_annual: Decimal,
    pub net_annual: Decimal,
    pub net_per_paycheck: Decimal,
    pub monthly_budget_remaining: Decimal,
}

/// YTD money in one account type across the household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdAccountTotal {
    pub account_type: AccountType,
    /// Joint records counted once.
    pub total: Decimal,
    /// `(member, attributed amount)` in member order.
    pub attributions: Vec<(String, Decimal)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdSummary {
    pub members: Vec<MemberSummary>,
    pub totals: MemberSummary,
    pub accounts: Vec<HouseholdAccountTotal>,
}

impl HouseholdSummary {
    /// Sums the members' reports. Members without a computable paycheck
    /// contribute zero pay. Account types with no records are left out.
    pub fn from_reports(
        reports: &[PersonReport],
        records: &[PerformanceRecord],
        allocator: &JointAccountAllocator,
    ) -> Self {
        let members: Vec<MemberSummary> = reports.iter().map(member_summary).collect();

        let totals = members.iter().fold(
            MemberSummary {
                name: "Household".to_string(),
                ..MemberSummary::default()
            },
            |mut acc, m| {
                acc.gross_annual += m.gross_annual;
                acc.total_tax_annual += m.total_tax_annual;
                acc.net_annual += m.net_annual;
                acc.net_per_paycheck += m.net_per_paycheck;
                acc.monthly_budget_remaining += m.monthly_budget_remaining;
                acc
            },
        );

        let accounts = AccountType::all()
            .iter()
            .filter(|account_type| records.iter().any(|r| r.account_type == **account_type))
            .map(|account_type| HouseholdAccountTotal {
                account_type: *account_type,
                total: allocator.household_total(records, *account_type),
                attributions: reports
                    .iter()
                    .map(|report| {
                        (
                            report.name.clone(),
                            allocator.attributed_total(records, &report.name, *account_type),
                        )
                    })
                    .collect(),
            })
            .collect();

        Self {
            members,
            totals,
            accounts,
        }
    }
}

fn member_summary(report: &PersonReport) -> MemberSummary {
    let mut summary = MemberSummary {
        name: report.name.clone(),
        ..MemberSummary::default()
    };
    if let Some(take_home) = &report.take_home {
        summary.gross_annual = take_home.annual.gross;
        summary.total_tax_annual = take_home.annual.total_tax;
        summary.net_annual = take_home.annual.net;
        summary.net_per_paycheck = take_home.per_paycheck.net;
    }
    if let Some(budget) = &report.budget {
        summary.monthly_budget_remaining = budget.remaining;
    }
    summary
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::fixtures::{config_2025, limits_2025, tables_2025};
    use crate::calculations::joint::JointPolicy;
    use crate::calculations::report::ReferenceData;
    use crate::{
        BonusOptions, BudgetImpacting, FilingStatus, HsaCoverage, MedicalDeductions, PayPeriod,
        Person, RetirementOptions, W4Profile,
    };

    fn person(
        name: &str,
        salary: Decimal,
    ) -> Person {
        Person {
            name: name.to_string(),
            salary,
            birthday: NaiveDate::from_ymd_opt(1988, 5, 5).unwrap(),
            pay_period: PayPeriod::BiWeekly,
            filing_status: FilingStatus::Single,
            w4: W4Profile::default(),
            retirement: RetirementOptions {
                traditional_401k_percent: dec!(5),
                ..RetirementOptions::default()
            },
            medical: MedicalDeductions::default(),
            budget: BudgetImpacting::default(),
            espp_percent: dec!(0),
            post_tax_deductions: Vec::new(),
            bonus: BonusOptions::default(),
            hsa_coverage: HsaCoverage::None,
            income_periods: Vec::new(),
            unreadable_income_periods: 0,
        }
    }

    fn ira(
        owner: &str,
        contributions: Decimal,
    ) -> PerformanceRecord {
        PerformanceRecord {
            year: 2025,
            account_type: AccountType::TraditionalIra,
            account_name: "IRA".to_string(),
            owner: owner.to_string(),
            contributions,
            employer_match: Decimal::ZERO,
        }
    }

    fn summarize(
        people: &[Person],
        records: &[PerformanceRecord],
    ) -> HouseholdSummary {
        let reference = ReferenceData::new(config_2025(), limits_2025(), tables_2025()).unwrap();
        let allocator = JointAccountAllocator::new(
            JointPolicy::default(),
            people.iter().map(|p| p.name.clone()).collect(),
        );
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let reports: Vec<PersonReport> = people
            .iter()
            .map(|p| PersonReport::build(&reference, p, records, &allocator, today).unwrap())
            .collect();

        HouseholdSummary::from_reports(&reports, records, &allocator)
    }

    #[test]
    fn totals_sum_member_pay() {
        let people = [person("Alex", dec!(80000)), person("Sam", dec!(80000))];

        let summary = summarize(&people, &[]);

        assert_eq!(summary.members.len(), 2);
        assert_eq!(summary.members[0].net_per_paycheck, dec!(2306.15));
        assert_eq!(summary.totals.net_per_paycheck, dec!(4612.30));
        assert_eq!(summary.totals.net_annual, dec!(119919.80));
        assert!(summary.accounts.is_empty());
    }

    #[test]
    fn joint_accounts_are_counted_once() {
        let people = [person("Alex", dec!(80000)), person("Sam", dec!(60000))];
        let records = vec![ira("Joint", dec!(6000)), ira("Alex", dec!(1000))];

        let summary = summarize(&people, &records);

        assert_eq!(
            summary.accounts,
            vec![HouseholdAccountTotal {
                account_type: AccountType::TraditionalIra,
                total: dec!(7000),
                attributions: vec![
                    ("Alex".to_string(), dec!(3500)),
                    ("Sam".to_string(), dec!(3500)),
                ],
            }]
        );
    }

    #[test]
    fn member_without_paycheck_contributes_zero() {
        let people = [person("Alex", dec!(80000)), person("Sam", dec!(0))];

        let summary = summarize(&people, &[]);

        assert_eq!(summary.members[1].net_annual, dec!(0));
        assert_eq!(summary.totals.net_annual, summary.members[0].net_annual);
    }
}
