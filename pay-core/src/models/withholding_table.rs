use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FilingStatus;

/// Problems found while assembling a withholding table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("withholding table has no brackets")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    FirstThresholdNotZero(Decimal),

    #[error("bracket thresholds must be strictly increasing ({previous} then {next})")]
    NotIncreasing { previous: Decimal, next: Decimal },

    #[error("bracket rate must be between 0 and 1, got {0}")]
    InvalidRate(Decimal),
}

/// One row of an annual percentage-method withholding schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingBracket {
    pub threshold: Decimal,
    pub base_withholding: Decimal,
    pub rate: Decimal,
}

impl WithholdingBracket {
    pub fn new(
        threshold: Decimal,
        base_withholding: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            threshold,
            base_withholding,
            rate,
        }
    }
}

/// A piecewise-linear withholding function, sorted by threshold.
///
/// Construction goes through [`WithholdingTable::new`], so a table that
/// exists is never empty and always starts at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WithholdingBracket>", into = "Vec<WithholdingBracket>")]
pub struct WithholdingTable {
    brackets: Vec<WithholdingBracket>,
}

impl WithholdingTable {
    pub fn new(brackets: Vec<WithholdingBracket>) -> Result<Self, TableError> {
        let first = brackets.first().ok_or(TableError::Empty)?;
        if first.threshold != Decimal::ZERO {
            return Err(TableError::FirstThresholdNotZero(first.threshold));
        }
        for bracket in &brackets {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(TableError::InvalidRate(bracket.rate));
            }
        }
        for pair in brackets.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(TableError::NotIncreasing {
                    previous: pair[0].threshold,
                    next: pair[1].threshold,
                });
            }
        }
        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[WithholdingBracket] {
        &self.brackets
    }

    /// Highest bracket whose threshold is at or below `income`.
    pub fn bracket_for(
        &self,
        income: Decimal,
    ) -> &WithholdingBracket {
        self.brackets
            .iter()
            .rev()
            .find(|b| b.threshold <= income)
            .unwrap_or(&self.brackets[0])
    }
}

impl TryFrom<Vec<WithholdingBracket>> for WithholdingTable {
    type Error = TableError;

    fn try_from(brackets: Vec<WithholdingBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<WithholdingTable> for Vec<WithholdingBracket> {
    fn from(table: WithholdingTable) -> Self {
        table.brackets
    }
}

/// Which Pub 15-T schedule a table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableVariant {
    /// Form W-4 Step 2 box not checked (and all pre-2020 forms).
    Standard,
    /// Form W-4 Step 2 box checked.
    MultipleJobs,
}

impl TableVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::MultipleJobs => "multiple_jobs",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "standard" => Some(Self::Standard),
            "multiple_jobs" => Some(Self::MultipleJobs),
            _ => None,
        }
    }
}

impl fmt::Display for TableVariant {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every withholding table published for one tax year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithholdingTables {
    pub tax_year: i32,
    tables: BTreeMap<(FilingStatus, TableVariant), WithholdingTable>,
}

impl WithholdingTables {
    pub fn new(tax_year: i32) -> Self {
        Self {
            tax_year,
            tables: BTreeMap::new(),
        }
    }

    /// Adds or replaces the table for `status` / `variant`.
    pub fn insert(
        &mut self,
        status: FilingStatus,
        variant: TableVariant,
        table: WithholdingTable,
    ) {
        self.tables.insert((status, variant), table);
    }

    pub fn get(
        &self,
        status: FilingStatus,
        variant: TableVariant,
    ) -> Option<&WithholdingTable> {
        self.tables.get(&(status, variant))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilingStatus, TableVariant, &WithholdingTable)> {
        self.tables
            .iter()
            .map(|((status, variant), table)| (*status, *variant, table))
    }
}
