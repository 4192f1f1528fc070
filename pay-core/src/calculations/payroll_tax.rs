//! Employee-side FICA: Social Security and Medicare.
//!
//! Both taxes are a flat rate of the wage base handed in. The Social
//! Security wage-base cap is not applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::TaxYearConfig;
use crate::calculations::common::{non_negative, round_half_up};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTax {
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub total: Decimal,
}

impl PayrollTax {
    pub fn zero() -> Self {
        Self {
            social_security: Decimal::ZERO,
            medicare: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Social Security and Medicare on `annual_gross_income`, each rounded to
/// cents. Negative income yields zero tax.
pub fn compute_payroll_tax(
    annual_gross_income: Decimal,
    config: &TaxYearConfig,
) -> PayrollTax {
    let wages = non_negative(annual_gross_income);
    let social_security = round_half_up(wages * config.social_security_rate);
    let medicare = round_half_up(wages * config.medicare_rate);

    PayrollTax {
        social_security,
        medicare,
        total: social_security + medicare,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::fixtures::config_2025;

    #[test]
    fn applies_flat_rates() {
        let result = compute_payroll_tax(dec!(100000), &config_2025());

        assert_eq!(
            result,
            PayrollTax {
                social_security: dec!(6200.00),
                medicare: dec!(1450.00),
                total: dec!(7650.00),
            }
        );
    }

    #[test]
    fn rounds_each_component_to_cents() {
        let result = compute_payroll_tax(dec!(75999.82), &config_2025());

        // 75999.82 × 6.2% = 4711.98884, × 1.45% = 1101.99739
        assert_eq!(result.social_security, dec!(4711.99));
        assert_eq!(result.medicare, dec!(1102.00));
        assert_eq!(result.total, dec!(5813.99));
    }

    #[test]
    fn does_not_cap_social_security_wages() {
        let result = compute_payroll_tax(dec!(300000), &config_2025());

        assert_eq!(result.social_security, dec!(18600.00));
    }

    #[test]
    fn negative_income_is_zero_tax() {
        let result = compute_payroll_tax(dec!(-10), &config_2025());

        assert_eq!(result, PayrollTax::zero());
    }
}
