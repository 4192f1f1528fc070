//! Per-person report: take-home pay, income, bonus, contribution room and
//! the monthly budget, all for the year containing `today`.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::bonus::{BonusCalculator, BonusResult};
use crate::calculations::common::round_half_up;
use crate::calculations::diagnostics::{CalculationError, CalculationWarning};
use crate::calculations::federal::FederalWithholding;
use crate::calculations::joint::JointAccountAllocator;
use crate::calculations::limits::{ContributionLimitEngine, ContributionRoom, k401_catch_up};
use crate::calculations::proration::{
    IncomeProjection, compute_ytd_income, project_annual_income, projected_monthly_contribution,
    projected_pay_contribution, recorded_ytd_income, year_end,
};
use crate::calculations::take_home::{TakeHomeInput, TakeHomePay, TakeHomePayAssembler};
use crate::{
    AccountType, ContributionLimits, FilingStatus, LimitCategory, PayPeriod, PerformanceRecord,
    Person, TaxYearConfig, WithholdingTables,
};

/// Reference data for one tax year, checked for consistency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceData {
    config: TaxYearConfig,
    limits: ContributionLimits,
    tables: WithholdingTables,
}

impl ReferenceData {
    /// # Errors
    ///
    /// [`CalculationError::ReferenceYearMismatch`] when the three sets were
    /// published for different years, and [`CalculationError::InvalidRate`]
    /// for a rate outside 0..=1.
    pub fn new(
        config: TaxYearConfig,
        limits: ContributionLimits,
        tables: WithholdingTables,
    ) -> Result<Self, CalculationError> {
        if config.tax_year != limits.plan_year || config.tax_year != tables.tax_year {
            return Err(CalculationError::ReferenceYearMismatch {
                tables: tables.tax_year,
                limits: limits.plan_year,
                config: config.tax_year,
            });
        }

        let rates = [
            ("social_security_rate", config.social_security_rate),
            ("medicare_rate", config.medicare_rate),
            ("supplemental_rate", config.supplemental_rate),
        ];
        for (field, value) in rates {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(CalculationError::InvalidRate { field, value });
            }
        }

        Ok(Self {
            config,
            limits,
            tables,
        })
    }

    pub fn tax_year(&self) -> i32 {
        self.config.tax_year
    }

    pub fn config(&self) -> &TaxYearConfig {
        &self.config
    }

    pub fn limits(&self) -> &ContributionLimits {
        &self.limits
    }

    pub fn tables(&self) -> &WithholdingTables {
        &self.tables
    }
}

/// Accounts reported on, with 401(k) and IRA types combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionAccount {
    #[serde(rename = "401k")]
    K401,
    Ira,
    Hsa,
    Espp,
    Brokerage,
}

impl ContributionAccount {
    pub fn all() -> &'static [ContributionAccount] {
        &[
            ContributionAccount::K401,
            ContributionAccount::Ira,
            ContributionAccount::Hsa,
            ContributionAccount::Espp,
            ContributionAccount::Brokerage,
        ]
    }

    pub fn account_types(&self) -> &'static [AccountType] {
        match self {
            Self::K401 => &[AccountType::Traditional401k, AccountType::Roth401k],
            Self::Ira => &[AccountType::TraditionalIra, AccountType::RothIra],
            Self::Hsa => &[AccountType::Hsa],
            Self::Espp => &[AccountType::Espp],
            Self::Brokerage => &[AccountType::Brokerage],
        }
    }

    pub fn limit_category(&self) -> Option<LimitCategory> {
        match self {
            Self::K401 => Some(LimitCategory::K401),
            Self::Ira => Some(LimitCategory::Ira),
            Self::Hsa => Some(LimitCategory::Hsa),
            Self::Espp | Self::Brokerage => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::K401 => "401(k)",
            Self::Ira => "IRA",
            Self::Hsa => "HSA",
            Self::Espp => "ESPP",
            Self::Brokerage => "Brokerage",
        }
    }

    /// Whether employer money counts toward the account's limit.
    fn counts_employer_match(&self) -> bool {
        matches!(self, Self::Hsa)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionLine {
    pub account: ContributionAccount,
    pub ytd: Decimal,
    pub projected_remaining: Decimal,
    pub projected_total: Decimal,
    /// `None` for accounts without a statutory limit.
    pub room: Option<ContributionRoom>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub net_monthly: Decimal,
    pub ira_monthly: Decimal,
    pub brokerage_monthly: Decimal,
    pub remaining: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonReport {
    pub name: String,
    pub tax_year: i32,
    pub age: u32,
    pub pay_period: PayPeriod,
    pub filing_status: FilingStatus,
    /// `None` when the profile cannot produce a paycheck.
    pub take_home: Option<TakeHomePay>,
    pub income: IncomeProjection,
    pub bonus: BonusResult,
    pub contributions: Vec<ContributionLine>,
    pub budget: Option<MonthlyBudget>,
    pub warnings: Vec<CalculationWarning>,
}

impl PersonReport {
    /// Builds the report for `person` as of `today`.
    ///
    /// `records` may span several years; only those for `today`'s year are
    /// used.
    pub fn build(
        reference: &ReferenceData,
        person: &Person,
        records: &[PerformanceRecord],
        allocator: &JointAccountAllocator,
        today: NaiveDate,
    ) -> Result<Self, CalculationError> {
        let year = today.year();
        if year != reference.tax_year() {
            debug!(
                year,
                tax_year = reference.tax_year(),
                "Report date is outside the reference data year"
            );
        }
        let records: Vec<PerformanceRecord> =
            records.iter().filter(|r| r.year == year).cloned().collect();

        let age = person.age_on(today);
        let federal = FederalWithholding::new(reference.tables(), reference.config());
        let assembler =
            TakeHomePayAssembler::new(&federal, reference.config(), reference.limits());
        let take_home = assembler.calculate(&TakeHomeInput::from_person(person, age))?;

        let ytd = if person.has_income_history() {
            recorded_ytd_income(&person.income_periods, person.pay_period, today)
        } else {
            compute_ytd_income(&person.income_periods, person.pay_period, person.salary, today)
        };
        let income = project_annual_income(ytd, person.salary, person.pay_period, today);

        let mut warnings = Vec::new();
        if let Some(take_home) = &take_home {
            warnings.extend(take_home.warnings.iter().cloned());
        }
        warnings.extend(income.warnings.iter().cloned());

        let builder = LineBuilder {
            engine: ContributionLimitEngine::new(reference.limits()),
            person,
            records: &records,
            allocator,
            take_home: take_home.as_ref(),
            age,
            today,
        };

        let mut k401 = builder.line(ContributionAccount::K401);
        let bonus_room = k401
            .room
            .as_ref()
            .map(|room| room.remaining)
            .unwrap_or_default();
        let bonus = BonusCalculator::new(reference.config()).calculate(
            person.salary,
            &person.bonus,
            &person.retirement,
            bonus_room,
        );
        builder.add_projected(&mut k401, bonus.traditional_401k + bonus.roth_401k);

        let mut contributions = vec![k401];
        contributions.extend(
            ContributionAccount::all()
                .iter()
                .filter(|account| **account != ContributionAccount::K401)
                .map(|account| builder.line(*account)),
        );

        let budget = take_home.as_ref().map(|take_home| {
            let net_monthly = round_half_up(take_home.annual.net / Decimal::from(12));
            let ira_monthly = person.budget.ira_monthly();
            let brokerage_monthly = person.budget.brokerage_monthly();
            MonthlyBudget {
                net_monthly,
                ira_monthly,
                brokerage_monthly,
                remaining: net_monthly - ira_monthly - brokerage_monthly,
            }
        });

        Ok(Self {
            name: person.name.clone(),
            tax_year: reference.tax_year(),
            age,
            pay_period: person.pay_period,
            filing_status: person.filing_status,
            take_home,
            income,
            bonus,
            contributions,
            budget,
            warnings,
        })
    }

    pub fn contribution(
        &self,
        account: ContributionAccount,
    ) -> Option<&ContributionLine> {
        self.contributions.iter().find(|line| line.account == account)
    }
}

struct LineBuilder<'a> {
    engine: ContributionLimitEngine<'a>,
    person: &'a Person,
    records: &'a [PerformanceRecord],
    allocator: &'a JointAccountAllocator,
    take_home: Option<&'a TakeHomePay>,
    age: u32,
    today: NaiveDate,
}

impl LineBuilder<'_> {
    fn line(
        &self,
        account: ContributionAccount,
    ) -> ContributionLine {
        let ytd = self.ytd(account);
        let projected_remaining = self.projected_remaining(account);
        let projected_total = ytd + projected_remaining;
        let room = self
            .limit(account)
            .map(|limit| self.engine.remaining_room(limit, projected_total));

        ContributionLine {
            account,
            ytd,
            projected_remaining,
            projected_total,
            room,
        }
    }

    fn add_projected(
        &self,
        line: &mut ContributionLine,
        amount: Decimal,
    ) {
        line.projected_remaining += amount;
        line.projected_total += amount;
        if let Some(room) = &line.room {
            line.room = Some(self.engine.remaining_room(room.limit, line.projected_total));
        }
    }

    fn ytd(
        &self,
        account: ContributionAccount,
    ) -> Decimal {
        account
            .account_types()
            .iter()
            .map(|account_type| {
                let attribution =
                    self.allocator
                        .attribute(self.records, &self.person.name, *account_type);
                if account.counts_employer_match() {
                    attribution.total()
                } else {
                    attribution.contributions()
                }
            })
            .sum()
    }

    fn projected_remaining(
        &self,
        account: ContributionAccount,
    ) -> Decimal {
        let pay_period = self.person.pay_period;
        let end = year_end(self.today);
        let per_paycheck =
            |amount: Decimal| projected_pay_contribution(amount, pay_period, self.today, end);

        match account {
            ContributionAccount::K401 => self
                .take_home
                .map(|t| per_paycheck(t.per_paycheck.traditional_401k + t.per_paycheck.roth_401k))
                .unwrap_or_default(),
            ContributionAccount::Hsa => {
                let employee = self
                    .take_home
                    .map(|t| per_paycheck(t.per_paycheck.hsa))
                    .unwrap_or_default();
                let employer =
                    per_paycheck(self.person.medical.employer_hsa_annual / pay_period.per_year());
                employee + employer
            }
            ContributionAccount::Espp => self
                .take_home
                .map(|t| per_paycheck(t.per_paycheck.espp))
                .unwrap_or_default(),
            ContributionAccount::Ira => {
                projected_monthly_contribution(self.person.budget.ira_monthly(), self.today)
            }
            ContributionAccount::Brokerage => {
                projected_monthly_contribution(self.person.budget.brokerage_monthly(), self.today)
            }
        }
    }

    /// Annual limit for the account, with the same 401(k) catch-up rule
    /// the payroll cap uses.
    fn limit(
        &self,
        account: ContributionAccount,
    ) -> Option<Decimal> {
        let category = account.limit_category()?;
        if category == LimitCategory::K401 {
            let catch_up = k401_catch_up(self.person.retirement.is_over_50, self.age);
            return Some(self.engine.k401_limit(catch_up));
        }
        Some(
            self.engine
                .max_for(category, self.age, self.person.hsa_coverage),
        )
    }
}
