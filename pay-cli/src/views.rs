//! Plain-text renderings of reports, one [`fmt::Display`] wrapper per
//! subcommand.

use std::fmt;

use pay_core::calculations::{
    CalculationWarning, ContributionLine, HouseholdSummary, MemberSummary, PaycheckAmounts,
    PersonReport,
};
use pay_core::{FilingStatus, WithholdingTables};
use rust_decimal::Decimal;

use crate::utils::{format_money, format_rate, opt_money_display};

fn header(
    f: &mut fmt::Formatter<'_>,
    report: &PersonReport,
) -> fmt::Result {
    writeln!(
        f,
        "{} ({} tax year, paid {}, {}, age {})",
        report.name,
        report.tax_year,
        report.pay_period.label(),
        report.filing_status.label(),
        report.age
    )
}

fn warnings(
    f: &mut fmt::Formatter<'_>,
    warnings: &[CalculationWarning],
) -> fmt::Result {
    if warnings.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "Warnings:")?;
    for warning in warnings {
        writeln!(f, "  - {warning}")?;
    }
    Ok(())
}

fn amount_row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    per_paycheck: Decimal,
    annual: Decimal,
) -> fmt::Result {
    writeln!(
        f,
        "  {:<24}{:>16}{:>16}",
        label,
        format_money(per_paycheck),
        format_money(annual)
    )
}

/// Output of `paycheck <name>`.
pub struct PaycheckView<'a>(pub &'a PersonReport);

impl fmt::Display for PaycheckView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let report = self.0;
        header(f, report)?;

        let Some(take_home) = &report.take_home else {
            writeln!(
                f,
                "  No paycheck could be computed. Check the salary, 401(k) percentages, ESPP election and W-4."
            )?;
            return warnings(f, &report.warnings);
        };

        writeln!(f)?;
        writeln!(f, "  {:<24}{:>16}{:>16}", "", "Per paycheck", "Annual")?;
        let rows: [(&str, fn(&PaycheckAmounts) -> Decimal); 13] = [
            ("Gross", |a| a.gross),
            ("Traditional 401(k)", |a| a.traditional_401k),
            ("Roth 401(k)", |a| a.roth_401k),
            ("Pre-tax benefits", |a| a.pretax_premiums),
            ("HSA", |a| a.hsa),
            ("Taxable wages", |a| a.taxable_wages),
            ("Federal withholding", |a| a.federal_withholding),
            ("Social Security", |a| a.social_security),
            ("Medicare", |a| a.medicare),
            ("Total tax", |a| a.total_tax),
            ("ESPP", |a| a.espp),
            ("Post-tax deductions", |a| a.post_tax_deductions),
            ("Net pay", |a| a.net),
        ];
        for (label, field) in rows {
            amount_row(f, label, field(&take_home.per_paycheck), field(&take_home.annual))?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "  Federal table: {} ({} annual withholding)",
            take_home.table_variant(),
            format_money(take_home.federal.annual_tax)
        )?;
        if take_home.contribution_limit_reached {
            writeln!(
                f,
                "  401(k) deferrals capped at the {} annual limit",
                format_money(take_home.k401_limit)
            )?;
        }

        let bonus = &report.bonus;
        if !bonus.gross.is_zero() {
            writeln!(f)?;
            writeln!(f, "  Bonus")?;
            writeln!(f, "    {:<22}{:>16}", "Gross", format_money(bonus.gross))?;
            writeln!(
                f,
                "    {:<22}{:>16}",
                "401(k) deferral",
                format_money(bonus.traditional_401k + bonus.roth_401k)
            )?;
            writeln!(
                f,
                "    {:<22}{:>16}",
                "Taxes",
                format_money(bonus.federal_withholding + bonus.social_security + bonus.medicare)
            )?;
            writeln!(f, "    {:<22}{:>16}", "Net", format_money(bonus.net))?;
        }

        if let Some(budget) = &report.budget {
            writeln!(f)?;
            writeln!(f, "  Monthly budget")?;
            writeln!(f, "    {:<22}{:>16}", "Net pay", format_money(budget.net_monthly))?;
            writeln!(f, "    {:<22}{:>16}", "IRA", format_money(budget.ira_monthly))?;
            writeln!(
                f,
                "    {:<22}{:>16}",
                "Brokerage",
                format_money(budget.brokerage_monthly)
            )?;
            writeln!(f, "    {:<22}{:>16}", "Remaining", format_money(budget.remaining))?;
        }

        warnings(f, &report.warnings)
    }
}

fn room_row(
    f: &mut fmt::Formatter<'_>,
    line: &ContributionLine,
) -> fmt::Result {
    let (limit, remaining, note) = match &line.room {
        Some(room) if room.over_contribution => (
            Some(room.limit),
            Some(room.remaining),
            format!("  over by {}", format_money(-room.delta)),
        ),
        Some(room) => (Some(room.limit), Some(room.remaining), String::new()),
        None => (None, None, String::new()),
    };
    writeln!(
        f,
        "  {:<12}{:>14}{:>14}{:>14}{:>14}{:>14}{note}",
        line.account.label(),
        format_money(line.ytd),
        format_money(line.projected_remaining),
        format_money(line.projected_total),
        opt_money_display(limit),
        opt_money_display(remaining),
    )
}

/// Output of `room <name>`.
pub struct RoomView<'a>(pub &'a PersonReport);

impl fmt::Display for RoomView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let report = self.0;
        header(f, report)?;
        writeln!(f)?;
        writeln!(
            f,
            "  {:<12}{:>14}{:>14}{:>14}{:>14}{:>14}",
            "Account", "YTD", "Rest of year", "Projected", "Limit", "Room left"
        )?;
        for line in &report.contributions {
            room_row(f, line)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "  Income so far {}, projected for the year {}",
            format_money(report.income.ytd_income),
            format_money(report.income.projected_annual_income)
        )?;

        warnings(f, &report.warnings)
    }
}

fn member_row(
    f: &mut fmt::Formatter<'_>,
    member: &MemberSummary,
) -> fmt::Result {
    writeln!(
        f,
        "  {:<14}{:>14}{:>14}{:>14}{:>14}{:>16}",
        member.name,
        format_money(member.gross_annual),
        format_money(member.total_tax_annual),
        format_money(member.net_annual),
        format_money(member.net_per_paycheck),
        format_money(member.monthly_budget_remaining),
    )
}

/// Output of `household`.
pub struct HouseholdView<'a> {
    pub tax_year: i32,
    pub summary: &'a HouseholdSummary,
}

impl fmt::Display for HouseholdView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Household, {} tax year", self.tax_year)?;
        writeln!(f)?;
        writeln!(
            f,
            "  {:<14}{:>14}{:>14}{:>14}{:>14}{:>16}",
            "Member", "Gross", "Taxes", "Net", "Per paycheck", "Budget left"
        )?;
        for member in &self.summary.members {
            member_row(f, member)?;
        }
        member_row(f, &self.summary.totals)?;

        if self.summary.accounts.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "  Contributions so far")?;
        for account in &self.summary.accounts {
            writeln!(
                f,
                "    {:<18}{:>14}",
                account.account_type.as_str(),
                format_money(account.total)
            )?;
            for (name, amount) in &account.attributions {
                writeln!(f, "      {:<16}{:>14}", name, format_money(*amount))?;
            }
        }
        Ok(())
    }
}

/// Output of `tables`.
pub struct TablesView<'a> {
    pub tables: &'a WithholdingTables,
    pub status: Option<FilingStatus>,
}

impl fmt::Display for TablesView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "Annual percentage-method withholding tables, {}",
            self.tables.tax_year
        )?;
        for (status, variant, table) in self.tables.iter() {
            if self.status.is_some_and(|s| s != status) {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "  {} ({variant})", status.label())?;
            writeln!(f, "    {:>16}{:>16}{:>10}", "Over", "Base", "Rate")?;
            for bracket in table.brackets() {
                writeln!(
                    f,
                    "    {:>16}{:>16}{:>10}",
                    format_money(bracket.threshold),
                    format_money(bracket.base_withholding),
                    format_rate(bracket.rate)
                )?;
            }
        }
        Ok(())
    }
}
