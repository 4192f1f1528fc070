//! Annual bonus taxed at the flat supplemental rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{min, non_negative, percent_of, round_half_up};
use crate::{BonusOptions, RetirementOptions, TaxYearConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusResult {
    pub gross: Decimal,
    pub traditional_401k: Decimal,
    pub roth_401k: Decimal,
    pub federal_withholding: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct BonusCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> BonusCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Bonus check for `salary` at the target percentage and multiplier.
    ///
    /// When the bonus is subject to 401(k) elections, deferrals are limited
    /// to `remaining_401k_room`, traditional first.
    pub fn calculate(
        &self,
        salary: Decimal,
        bonus: &BonusOptions,
        retirement: &RetirementOptions,
        remaining_401k_room: Decimal,
    ) -> BonusResult {
        let gross = non_negative(round_half_up(
            salary * bonus.bonus_percent / Decimal::ONE_HUNDRED * bonus.bonus_multiplier,
        ));
        if gross.is_zero() {
            return BonusResult::default();
        }

        let (traditional_401k, roth_401k) = if bonus.apply_401k {
            let room = non_negative(remaining_401k_room);
            let traditional = min(
                percent_of(gross, non_negative(retirement.traditional_401k_percent)),
                room,
            );
            let roth = min(
                percent_of(gross, non_negative(retirement.roth_401k_percent)),
                room - traditional,
            );
            (traditional, roth)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        let taxable = gross - traditional_401k;
        let federal_withholding = round_half_up(taxable * self.config.supplemental_rate);
        let social_security = round_half_up(taxable * self.config.social_security_rate);
        let medicare = round_half_up(taxable * self.config.medicare_rate);

        BonusResult {
            gross,
            traditional_401k,
            roth_401k,
            federal_withholding,
            social_security,
            medicare,
            net: gross
                - traditional_401k
                - roth_401k
                - federal_withholding
                - social_security
                - medicare,
        }
    }
}
