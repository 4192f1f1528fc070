use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PayPeriod {
    Weekly,
    #[default]
    BiWeekly,
    SemiMonthly,
    Monthly,
}

impl PayPeriod {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Weekly => 52,
            Self::BiWeekly => 26,
            Self::SemiMonthly => 24,
            Self::Monthly => 12,
        }
    }

    /// [`PayPeriod::periods_per_year`] as a decimal multiplier.
    pub fn per_year(&self) -> Decimal {
        Decimal::from(self.periods_per_year())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::BiWeekly => "bi-weekly",
            Self::SemiMonthly => "semi-monthly",
            Self::Monthly => "monthly",
        }
    }
}
