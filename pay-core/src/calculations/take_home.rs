//! Take-home pay for one paycheck.
//!
//! Deductions are applied in payroll order:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Nominal 401(k) elections as a percentage of gross |
//! | 2    | Cap traditional first, then Roth, at the annual 401(k) limit |
//! | 3    | Subtract traditional 401(k) and pre-tax benefits from gross |
//! | 4    | Federal withholding and FICA on the annualized taxable wage |
//! | 5    | Net = gross - taxes - 401(k) - pre-tax - post-tax |
//!
//! Taxes are computed annually and spread evenly over the paychecks.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{min, non_negative, percent_of, round_half_up};
use crate::calculations::diagnostics::{CalculationError, CalculationWarning};
use crate::calculations::federal::{FederalWithholding, FederalWithholdingResult};
use crate::calculations::limits::{ContributionLimitEngine, k401_catch_up};
use crate::calculations::payroll_tax::{PayrollTax, compute_payroll_tax};
use crate::{
    ContributionLimits, FilingStatus, HsaCoverage, MedicalDeductions, NamedDeduction, PayPeriod,
    Person, RetirementOptions, TableVariant, TaxYearConfig, W4Profile,
};

/// Everything the assembler needs about one paycheck.
#[derive(Debug, Clone, Copy)]
pub struct TakeHomeInput<'a> {
    pub gross_per_paycheck: Decimal,
    pub pay_period: PayPeriod,
    pub filing_status: FilingStatus,
    pub w4: &'a W4Profile,
    pub retirement: &'a RetirementOptions,
    pub medical: &'a MedicalDeductions,
    pub hsa_coverage: HsaCoverage,
    pub espp_percent: Decimal,
    pub post_tax_deductions: &'a [NamedDeduction],
    /// Whether the 401(k) catch-up raises the deferral cap.
    pub k401_catch_up: bool,
}

impl<'a> TakeHomeInput<'a> {
    /// Input for `person` at `age`.
    pub fn from_person(
        person: &'a Person,
        age: u32,
    ) -> Self {
        Self {
            gross_per_paycheck: person.gross_per_paycheck(),
            pay_period: person.pay_period,
            filing_status: person.filing_status,
            w4: &person.w4,
            retirement: &person.retirement,
            medical: &person.medical,
            hsa_coverage: person.hsa_coverage,
            espp_percent: person.espp_percent,
            post_tax_deductions: &person.post_tax_deductions,
            k401_catch_up: k401_catch_up(person.retirement.is_over_50, age),
        }
    }
}

/// One line per deduction, for a single paycheck or for the year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaycheckAmounts {
    pub gross: Decimal,
    pub traditional_401k: Decimal,
    pub roth_401k: Decimal,
    /// Insurance premiums and named pre-tax items.
    pub pretax_premiums: Decimal,
    pub hsa: Decimal,
    pub taxable_wages: Decimal,
    pub federal_withholding: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub total_tax: Decimal,
    pub espp: Decimal,
    pub post_tax_deductions: Decimal,
    pub net: Decimal,
}

impl PaycheckAmounts {
    /// Gross less taxes and every deduction.
    fn net_pay(&self) -> Decimal {
        self.gross
            - self.total_tax
            - self.traditional_401k
            - self.roth_401k
            - self.pretax_premiums
            - self.hsa
            - self.espp
            - self.post_tax_deductions
    }

    /// The year's amounts: every line times `ppy`, except 401(k) deferrals,
    /// which take the capped annual figures. Net is recomputed from the lines.
    fn annualized(
        &self,
        ppy: Decimal,
        deferrals: &Deferrals,
    ) -> Self {
        let mut annual = Self {
            gross: self.gross * ppy,
            traditional_401k: deferrals.traditional_annual,
            roth_401k: deferrals.roth_annual,
            pretax_premiums: self.pretax_premiums * ppy,
            hsa: self.hsa * ppy,
            taxable_wages: self.taxable_wages * ppy,
            federal_withholding: self.federal_withholding * ppy,
            social_security: self.social_security * ppy,
            medicare: self.medicare * ppy,
            total_tax: self.total_tax * ppy,
            espp: self.espp * ppy,
            post_tax_deductions: self.post_tax_deductions * ppy,
            net: Decimal::ZERO,
        };
        annual.net = annual.net_pay();
        annual
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeHomePay {
    pub pay_period: PayPeriod,
    pub per_paycheck: PaycheckAmounts,
    /// Amounts for the year. 401(k) deferrals never exceed `k401_limit`.
    pub annual: PaycheckAmounts,
    /// Taxable wages for the year, before per-paycheck rounding of taxes.
    pub adjusted_annual_income: Decimal,
    pub federal: FederalWithholdingResult,
    pub payroll_tax: PayrollTax,
    /// 401(k) employee limit used for the cap, including catch-up.
    pub k401_limit: Decimal,
    /// The elections asked for more than `k401_limit` and were capped.
    pub contribution_limit_reached: bool,
    pub warnings: Vec<CalculationWarning>,
}

impl TakeHomePay {
    pub fn table_variant(&self) -> TableVariant {
        self.federal.table_variant
    }
}

/// Capped 401(k) deferrals, per paycheck and for the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Deferrals {
    traditional: Decimal,
    roth: Decimal,
    traditional_annual: Decimal,
    roth_annual: Decimal,
    limit_reached: bool,
}

pub struct TakeHomePayAssembler<'a> {
    federal: &'a FederalWithholding<'a>,
    config: &'a TaxYearConfig,
    limits: ContributionLimitEngine<'a>,
}

impl<'a> TakeHomePayAssembler<'a> {
    pub fn new(
        federal: &'a FederalWithholding<'a>,
        config: &'a TaxYearConfig,
        limits: &'a ContributionLimits,
    ) -> Self {
        Self {
            federal,
            config,
            limits: ContributionLimitEngine::new(limits),
        }
    }

    /// Take-home pay, or `None` when the input cannot describe a paycheck.
    ///
    /// # Errors
    ///
    /// Propagates [`CalculationError`] from the federal engine when the
    /// withholding tables are incomplete.
    pub fn calculate(
        &self,
        input: &TakeHomeInput<'_>,
    ) -> Result<Option<TakeHomePay>, CalculationError> {
        if !self.is_valid(input) {
            return Ok(None);
        }

        let ppy = input.pay_period.per_year();
        let gross = round_half_up(input.gross_per_paycheck);
        let mut warnings = Vec::new();

        // Steps 1 and 2: 401(k) deferrals
        let k401_limit = self.limits.k401_limit(input.k401_catch_up);
        let deferrals = self.deferrals(gross, input.retirement, ppy, k401_limit);

        // Step 3: pre-tax benefits and taxable wages
        let hsa = self.hsa_per_paycheck(input, &mut warnings);
        let pretax_premiums = round_half_up(input.medical.premiums_per_paycheck());
        let pretax_total = deferrals.traditional + pretax_premiums + hsa;
        let taxable_wages = self.taxable_wages(gross, pretax_total, &mut warnings);
        let adjusted_annual_income = taxable_wages * ppy;

        // Step 4: annual taxes
        let federal = self.federal.calculate(
            adjusted_annual_income,
            input.filing_status,
            input.w4,
            input.pay_period,
        )?;
        warnings.extend(federal.warnings.iter().cloned());
        let payroll_tax = compute_payroll_tax(adjusted_annual_income, self.config);

        // Step 5: spread over paychecks and net out
        let federal_withholding = round_half_up(federal.annual_tax / ppy);
        let social_security = round_half_up(payroll_tax.social_security / ppy);
        let medicare = round_half_up(payroll_tax.medicare / ppy);
        let espp = percent_of(gross, input.espp_percent);
        let post_tax_deductions = round_half_up(
            input
                .post_tax_deductions
                .iter()
                .map(|d| d.amount)
                .sum::<Decimal>(),
        );

        let mut per_paycheck = PaycheckAmounts {
            gross,
            traditional_401k: deferrals.traditional,
            roth_401k: deferrals.roth,
            pretax_premiums,
            hsa,
            taxable_wages,
            federal_withholding,
            social_security,
            medicare,
            total_tax: federal_withholding + social_security + medicare,
            espp,
            post_tax_deductions,
            net: Decimal::ZERO,
        };
        per_paycheck.net = per_paycheck.net_pay();
        let annual = per_paycheck.annualized(ppy, &deferrals);

        Ok(Some(TakeHomePay {
            pay_period: input.pay_period,
            per_paycheck,
            annual,
            adjusted_annual_income,
            federal,
            payroll_tax,
            k401_limit,
            contribution_limit_reached: deferrals.limit_reached,
            warnings,
        }))
    }

    fn is_valid(
        &self,
        input: &TakeHomeInput<'_>,
    ) -> bool {
        if input.gross_per_paycheck <= Decimal::ZERO {
            debug!(gross = %input.gross_per_paycheck, "Skipping take-home pay: no gross pay");
            return false;
        }
        if !input.retirement.is_valid() {
            debug!(
                traditional = %input.retirement.traditional_401k_percent,
                roth = %input.retirement.roth_401k_percent,
                "Skipping take-home pay: invalid 401(k) percentages"
            );
            return false;
        }
        if input.espp_percent < Decimal::ZERO || input.espp_percent > Decimal::ONE_HUNDRED {
            debug!(espp = %input.espp_percent, "Skipping take-home pay: invalid ESPP percentage");
            return false;
        }
        if let Err(e) = input.w4.validate() {
            debug!(error = %e, "Skipping take-home pay: invalid W-4");
            return false;
        }
        true
    }

    /// Traditional deferrals fill the annual limit first; Roth gets what is
    /// left. A capped election is spread evenly over the year, and the annual
    /// figure stays at the cap rather than the rounded paycheck times `ppy`.
    fn deferrals(
        &self,
        gross: Decimal,
        retirement: &RetirementOptions,
        ppy: Decimal,
        limit: Decimal,
    ) -> Deferrals {
        let traditional_nominal = percent_of(gross, retirement.traditional_401k_percent);
        let roth_nominal = percent_of(gross, retirement.roth_401k_percent);

        let traditional_annual_nominal = traditional_nominal * ppy;
        let roth_annual_nominal = roth_nominal * ppy;

        let traditional_annual = min(traditional_annual_nominal, limit);
        let roth_annual = min(roth_annual_nominal, non_negative(limit - traditional_annual));

        let per_paycheck = |nominal: Decimal, nominal_annual: Decimal, capped: Decimal| {
            if capped < nominal_annual {
                round_half_up(capped / ppy)
            } else {
                nominal
            }
        };

        Deferrals {
            traditional: per_paycheck(
                traditional_nominal,
                traditional_annual_nominal,
                traditional_annual,
            ),
            roth: per_paycheck(roth_nominal, roth_annual_nominal, roth_annual),
            traditional_annual,
            roth_annual,
            limit_reached: traditional_annual_nominal + roth_annual_nominal > limit,
        }
    }

    /// Employee HSA deferral; dropped when there is no eligible coverage.
    fn hsa_per_paycheck(
        &self,
        input: &TakeHomeInput<'_>,
        warnings: &mut Vec<CalculationWarning>,
    ) -> Decimal {
        let hsa = round_half_up(non_negative(input.medical.hsa_per_paycheck));
        if hsa > Decimal::ZERO && input.hsa_coverage == HsaCoverage::None {
            warn!(per_paycheck = %hsa, "Ignoring HSA contribution without HSA coverage");
            warnings.push(CalculationWarning::HsaWithoutCoverage { per_paycheck: hsa });
            return Decimal::ZERO;
        }
        hsa
    }

    fn taxable_wages(
        &self,
        gross: Decimal,
        deductions: Decimal,
        warnings: &mut Vec<CalculationWarning>,
    ) -> Decimal {
        if deductions > gross {
            warn!(%gross, %deductions, "Pre-tax deductions exceed gross pay");
            warnings.push(CalculationWarning::DeductionsExceedGross { gross, deductions });
        }
        non_negative(gross - deductions)
    }
}
