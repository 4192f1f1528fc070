use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Statutory annual contribution limits for one plan year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionLimits {
    pub plan_year: i32,
    pub k401_employee: Decimal,
    pub k401_catch_up: Decimal,
    pub hsa_self: Decimal,
    pub hsa_family: Decimal,
    pub hsa_catch_up: Decimal,
    pub ira_self: Decimal,
    pub ira_catch_up: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HsaCoverage {
    #[default]
    None,
    #[serde(rename = "self")]
    SelfOnly,
    Family,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[serde(rename = "traditional_401k")]
    Traditional401k,
    #[serde(rename = "roth_401k")]
    Roth401k,
    TraditionalIra,
    RothIra,
    Hsa,
    Espp,
    Brokerage,
}

/// Accounts that share one statutory limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitCategory {
    K401,
    Ira,
    Hsa,
}

impl AccountType {
    pub fn all() -> &'static [AccountType] {
        &[
            AccountType::Traditional401k,
            AccountType::Roth401k,
            AccountType::TraditionalIra,
            AccountType::RothIra,
            AccountType::Hsa,
            AccountType::Espp,
            AccountType::Brokerage,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traditional401k => "traditional_401k",
            Self::Roth401k => "roth_401k",
            Self::TraditionalIra => "traditional_ira",
            Self::RothIra => "roth_ira",
            Self::Hsa => "hsa",
            Self::Espp => "espp",
            Self::Brokerage => "brokerage",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// The limit this account counts against, if it has one.
    pub fn limit_category(&self) -> Option<LimitCategory> {
        match self {
            Self::Traditional401k | Self::Roth401k => Some(LimitCategory::K401),
            Self::TraditionalIra | Self::RothIra => Some(LimitCategory::Ira),
            Self::Hsa => Some(LimitCategory::Hsa),
            Self::Espp | Self::Brokerage => None,
        }
    }

    pub fn is_ira(&self) -> bool {
        matches!(self, Self::TraditionalIra | Self::RothIra)
    }
}

impl fmt::Display for AccountType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for LimitCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::K401 => "401(k)",
            Self::Ira => "IRA",
            Self::Hsa => "HSA",
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(AccountType::parse("HSA"), Some(AccountType::Hsa));
        assert_eq!(
            AccountType::parse(" roth_401k "),
            Some(AccountType::Roth401k)
        );
        assert_eq!(AccountType::parse("pension"), None);
    }

    #[test]
    fn ira_variants_share_a_limit() {
        assert_eq!(
            AccountType::TraditionalIra.limit_category(),
            AccountType::RothIra.limit_category()
        );
        assert_eq!(AccountType::Brokerage.limit_category(), None);
    }
}
