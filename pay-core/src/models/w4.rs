use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum W4FormVersion {
    /// 2020 and later redesign (dependents, other income, Step 2 checkbox).
    #[default]
    New,
    /// Pre-2020 allowance-based form.
    Old,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum W4Error {
    #[error("allowances only apply to the pre-2020 form")]
    AllowancesOnNewForm,

    #[error("'{0}' only applies to the 2020 and later form")]
    NewFormFieldOnOldForm(&'static str),

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },
}

/// Employee's Form W-4 elections.
///
/// `extra_withholding` is a per-paycheck amount; callers annualize it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct W4Profile {
    pub form_version: W4FormVersion,
    pub allowances: u32,
    pub qualifying_children: u32,
    pub other_dependents: u32,
    pub additional_income: Decimal,
    pub extra_withholding: Decimal,
    pub multiple_jobs: bool,
}

impl W4Profile {
    /// Checks that only the fields of the selected form version are set.
    pub fn validate(&self) -> Result<(), W4Error> {
        if self.extra_withholding < Decimal::ZERO {
            return Err(W4Error::Negative {
                field: "extra_withholding",
                value: self.extra_withholding,
            });
        }
        if self.additional_income < Decimal::ZERO {
            return Err(W4Error::Negative {
                field: "additional_income",
                value: self.additional_income,
            });
        }
        match self.form_version {
            W4FormVersion::New if self.allowances > 0 => Err(W4Error::AllowancesOnNewForm),
            W4FormVersion::New => Ok(()),
            W4FormVersion::Old => {
                if self.qualifying_children > 0 {
                    Err(W4Error::NewFormFieldOnOldForm("qualifying_children"))
                } else if self.other_dependents > 0 {
                    Err(W4Error::NewFormFieldOnOldForm("other_dependents"))
                } else if self.additional_income > Decimal::ZERO {
                    Err(W4Error::NewFormFieldOnOldForm("additional_income"))
                } else if self.multiple_jobs {
                    Err(W4Error::NewFormFieldOnOldForm("multiple_jobs"))
                } else {
                    Ok(())
                }
            }
        }
    }
}
