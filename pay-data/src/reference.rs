//! Reference data keyed by tax year, with the built-in 2025 tables.

use std::collections::BTreeMap;

use pay_core::{ContributionLimits, RepositoryError, TaxYearConfig, WithholdingTables};

use crate::loader::{
    DataLoadError, WithholdingTableLoader, load_contribution_limits, load_tax_year_configs,
};

const BUILTIN_TABLES: &str = include_str!("../data/withholding_tables.csv");
const BUILTIN_LIMITS: &str = include_str!("../data/contribution_limits.csv");
const BUILTIN_CONFIG: &str = include_str!("../data/tax_year_config.csv");

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceStore {
    configs: BTreeMap<i32, TaxYearConfig>,
    limits: BTreeMap<i32, ContributionLimits>,
    tables: BTreeMap<i32, WithholdingTables>,
}

impl ReferenceStore {
    /// Data shipped with the crate.
    pub fn builtin() -> Result<Self, DataLoadError> {
        Ok(Self {
            configs: load_tax_year_configs(BUILTIN_CONFIG.as_bytes())?,
            limits: load_contribution_limits(BUILTIN_LIMITS.as_bytes())?,
            tables: WithholdingTableLoader::load(BUILTIN_TABLES.as_bytes())?,
        })
    }

    /// Adds or replaces whole years of tax constants.
    pub fn merge_configs(
        &mut self,
        configs: BTreeMap<i32, TaxYearConfig>,
    ) {
        self.configs.extend(configs);
    }

    pub fn merge_limits(
        &mut self,
        limits: BTreeMap<i32, ContributionLimits>,
    ) {
        self.limits.extend(limits);
    }

    /// A year's tables are replaced as a unit, never bracket by bracket.
    pub fn merge_tables(
        &mut self,
        tables: BTreeMap<i32, WithholdingTables>,
    ) {
        self.tables.extend(tables);
    }

    /// Years for which config, limits and tables are all present.
    pub fn tax_years(&self) -> Vec<i32> {
        self.configs
            .keys()
            .copied()
            .filter(|year| self.limits.contains_key(year) && self.tables.contains_key(year))
            .collect()
    }

    pub fn tax_year_config(
        &self,
        year: i32,
    ) -> Result<TaxYearConfig, RepositoryError> {
        self.configs
            .get(&year)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("tax year config for {year}")))
    }

    pub fn contribution_limits(
        &self,
        year: i32,
    ) -> Result<ContributionLimits, RepositoryError> {
        self.limits
            .get(&year)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("contribution limits for {year}")))
    }

    pub fn withholding_tables(
        &self,
        year: i32,
    ) -> Result<WithholdingTables, RepositoryError> {
        self.tables
            .get(&year)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("withholding tables for {year}")))
    }
}
